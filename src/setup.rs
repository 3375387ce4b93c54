// Interactive configuration wizard.
// Asks for every setting on the terminal and writes config.json and mail.config.json.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{
    ApiTokens, DEFAULT_PORT, DESIGNS, DesignOption, Experience, MailAuth, MailConfig,
    PersonalInfo, Seo, SiteConfig, Skill, TechStack,
};
use crate::error::Result;

const DEFAULT_MAIL_PORT: u16 = 587;
const DEFAULT_VIEWPORT: &str = "width=device-width, initial-scale=1.0";
const STOP: &str = "stop";

/// Line-oriented question and answer over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask one question; end of input counts as an empty answer.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Collect answers until `stop` or end of input.
    pub fn ask_list(&mut self, field: &str) -> Result<Vec<String>> {
        let mut values = Vec::new();
        loop {
            write!(self.output, "Enter a value for {field} (type '{STOP}' to finish): ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let value = line.trim();
            if value.eq_ignore_ascii_case(STOP) {
                break;
            }
            if !value.is_empty() {
                values.push(value.to_string());
            }
        }
        Ok(values)
    }

    fn section(&mut self, title: &str) -> Result<()> {
        writeln!(self.output, "\n{title}")?;
        Ok(())
    }

    /// Walk through every setting and return both documents.
    pub fn collect(&mut self) -> Result<(SiteConfig, MailConfig)> {
        writeln!(self.output, "Welcome to the configuration setup.")?;
        writeln!(self.output, "Please provide the following details:")?;

        let site_name = self.ask("Site Name")?;
        let port = self
            .ask(&format!("Port (default {DEFAULT_PORT})"))?
            .parse()
            .unwrap_or(DEFAULT_PORT);
        let github_username = self.ask("GitHub Username")?;
        let twitch_username = self.ask("Twitch Username")?;

        self.section("Available Designs:")?;
        for (name, description) in DESIGNS {
            writeln!(self.output, "- {name}: {description}")?;
        }
        let design = self.ask("Choose a design from the above options")?;

        let api_tokens = ApiTokens {
            github_token: self.ask("GitHub API Token")?,
            twitch_token: self.ask("Twitch OAuth Token")?,
            twitch_client_id: self.ask("Twitch Client ID")?,
        };

        self.section("SEO Configuration:")?;
        let mut seo = Seo {
            title: self.ask("SEO Title")?,
            description: self.ask("SEO Description")?,
            keywords: self.ask("SEO Keywords (comma-separated)")?,
            author: self.ask("Author Name")?,
            viewport: self.ask(&format!("Viewport (default \"{DEFAULT_VIEWPORT}\")"))?,
        };
        if seo.viewport.is_empty() {
            seo.viewport = DEFAULT_VIEWPORT.to_string();
        }

        self.section("Personal Information:")?;
        let name = self.ask("Name")?;
        let age = self.ask("Age")?;
        let country = self.ask("Country")?;
        self.section("Languages:")?;
        let languages = self.ask_list("language")?;
        self.section("Hobbies:")?;
        let hobbies = self.ask_list("hobby")?;

        self.section("Experience:")?;
        let experience = Experience {
            job_title: self.ask("Job Title")?,
            company: self.ask("Company")?,
            description: self.ask("Job Description")?,
        };

        self.section("Tech Stack - Languages:")?;
        let stack_languages = self.ask_list("programming language")?;
        self.section("Tech Stack - Tools:")?;
        let tools = self.ask_list("tool")?;

        self.section("Skills (as name:level):")?;
        let skills = self
            .ask_list("skill")?
            .into_iter()
            .map(|entry| parse_skill(&entry))
            .collect();

        self.section("Mail Configuration:")?;
        let mail = MailConfig {
            host: self.ask("Mail Host (e.g., smtp.gmail.com)")?,
            port: self
                .ask(&format!("Mail Port (e.g., {DEFAULT_MAIL_PORT})"))?
                .parse()
                .unwrap_or(DEFAULT_MAIL_PORT),
            secure: self
                .ask("Secure connection? (true/false)")?
                .eq_ignore_ascii_case("true"),
            auth: MailAuth {
                user: self.ask("Email Address (username)")?,
                pass: self.ask("Email Password")?,
            },
            recipient_email: self
                .ask("Recipient Email (where to receive contact form messages)")?,
        };

        let site = SiteConfig {
            site_name,
            port: Some(port),
            github_username,
            twitch_username,
            design,
            design_options: DESIGNS
                .iter()
                .map(|(name, description)| {
                    (
                        name.to_string(),
                        DesignOption {
                            description: description.to_string(),
                        },
                    )
                })
                .collect(),
            api_tokens,
            seo,
            personal_info: PersonalInfo {
                name,
                age,
                country,
                languages,
                hobbies,
            },
            experience,
            tech_stack: TechStack {
                languages: stack_languages,
                tools,
            },
            skills,
            ..Default::default()
        };

        writeln!(self.output, "\nConfiguration completed.")?;
        Ok((site, mail))
    }
}

fn parse_skill(entry: &str) -> Skill {
    match entry.split_once(':') {
        Some((name, level)) => Skill {
            name: name.trim().to_string(),
            level: level.trim().to_string(),
        },
        None => Skill {
            name: entry.trim().to_string(),
            level: String::new(),
        },
    }
}

/// Write both documents as pretty JSON into `dir`, creating it if needed.
pub fn write_configs(dir: &Path, site: &SiteConfig, mail: &MailConfig) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)?;
    let site_path = dir.join("config.json");
    let mail_path = dir.join("mail.config.json");
    fs::write(&site_path, serde_json::to_string_pretty(site)?)?;
    fs::write(&mail_path, serde_json::to_string_pretty(mail)?)?;
    info!(path = %site_path.display(), "config.json saved");
    info!(path = %mail_path.display(), "mail.config.json saved");
    Ok((site_path, mail_path))
}

/// Run the wizard on the terminal.
pub fn run(dir: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let (site, mail) = prompter.collect()?;
    write_configs(dir, &site, &mail)?;
    Ok(())
}
