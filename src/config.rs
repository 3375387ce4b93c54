// Site and mail configuration.
// Loads the two JSON documents written by the setup wizard and verifies the fields the server needs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info, warn};

use crate::error::{FolioError, Result};

/// Port used when the main config does not name one.
pub const DEFAULT_PORT: u16 = 3000;

/// Designs shipped with the site.
pub const DESIGNS: &[(&str, &str)] = &[
    ("default", "Default design with a balanced and classic look."),
    ("midnight", "A sleek dark theme with deep blues and purples."),
    ("sunset", "Warm and vibrant colors inspired by a sunset."),
    ("caprihan", "Cool blues and greens inspired by the island of Capri."),
    ("ocean", "An oceanic theme featuring teals and deep blues."),
];

/// Main site configuration (`config.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub site_name: String,
    #[serde(deserialize_with = "de_opt_port", skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub github_username: String,
    pub twitch_username: String,
    pub design: String,
    #[serde(rename = "design-options")]
    pub design_options: BTreeMap<String, DesignOption>,
    pub api_tokens: ApiTokens,
    pub seo: Seo,
    pub personal_info: PersonalInfo,
    pub experience: Experience,
    pub tech_stack: TechStack,
    pub skills: Vec<Skill>,
    pub testimonials: Vec<Testimonial>,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignOption {
    #[serde(default)]
    pub description: String,
}

/// Credentials for the upstream APIs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiTokens {
    pub github_token: String,
    pub twitch_token: String,
    pub twitch_client_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Seo {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub author: String,
    pub viewport: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    #[serde(deserialize_with = "de_string_or_number")]
    pub age: String,
    pub country: String,
    pub languages: Vec<String>,
    pub hobbies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub job_title: String,
    pub company: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechStack {
    pub languages: Vec<String>,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub date: String,
}

/// Tuning for the repository cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub per_page: u32,
    pub max_pages: u32,
    /// Keep the last good list when a refresh fails instead of replacing it with nothing.
    pub keep_stale_on_error: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            per_page: 100,
            max_pages: 50,
            keep_stale_on_error: true,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// SMTP configuration (`mail.config.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MailConfig {
    pub host: String,
    #[serde(deserialize_with = "de_port")]
    pub port: u16,
    #[serde(deserialize_with = "de_bool")]
    pub secure: bool,
    pub auth: MailAuth,
    pub recipient_email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MailAuth {
    pub user: String,
    pub pass: String,
}

/// Filesystem locations the server reads from and writes to.
#[derive(Debug, Clone)]
pub struct ContentPaths {
    pub public_dir: PathBuf,
    pub blog_dir: PathBuf,
    pub upload_dir: PathBuf,
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
            blog_dir: PathBuf::from("src/markdown"),
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub site: SiteConfig,
    pub mail: MailConfig,
    pub paths: ContentPaths,
}

impl Config {
    /// Read both configuration documents and verify them.
    pub fn load(site_path: &Path, mail_path: &Path, paths: ContentPaths) -> Result<Self> {
        let site: SiteConfig = read_json(site_path)?;
        let mail: MailConfig = read_json(mail_path)?;
        let config = Self { site, mail, paths };
        config.verify()?;
        Ok(config)
    }

    /// Port to listen on.
    pub fn port(&self) -> u16 {
        self.site.port.unwrap_or(DEFAULT_PORT)
    }

    /// Design name after falling back for unknown values.
    pub fn design(&self) -> &str {
        let known = DESIGNS.iter().any(|(name, _)| *name == self.site.design)
            || self.site.design_options.contains_key(&self.site.design);
        if known { self.site.design.as_str() } else { "default" }
    }

    /// Configured design name when it is set but not recognized.
    pub fn unknown_design(&self) -> Option<&str> {
        let design = self.site.design.as_str();
        (!design.is_empty() && self.design() != design).then_some(design)
    }

    /// Whether enough Twitch settings are present to query live status.
    pub fn twitch_enabled(&self) -> bool {
        !self.site.twitch_username.is_empty()
            && !self.site.api_tokens.twitch_token.is_empty()
            && !self.site.api_tokens.twitch_client_id.is_empty()
    }

    /// Check required fields, logging every problem before failing.
    pub fn verify(&self) -> Result<()> {
        info!("verifying configuration");
        let problems = self.problems();

        if self.site.port.is_none() {
            warn!(port = DEFAULT_PORT, "port is not set in config.json, using default");
        }
        if let Some(design) = self.unknown_design() {
            warn!(design = %design, "unknown design, using default");
        }
        if !self.twitch_enabled() {
            warn!("twitch settings incomplete, live status disabled");
        }
        if self.site.api_tokens.github_token.is_empty() {
            warn!("github token not set, using unauthenticated requests");
        }

        if problems.is_empty() {
            info!("all configurations are set correctly");
            return Ok(());
        }

        for problem in &problems {
            error!(problem = %problem, "configuration error");
        }
        Err(FolioError::Config(problems.join("; ")))
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.site.github_username.trim().is_empty() {
            problems.push("GitHub username is not set in config.json".to_string());
        }
        if self.mail.host.trim().is_empty() {
            problems.push("mail host is not set in mail.config.json".to_string());
        }
        if self.mail.auth.user.is_empty() || self.mail.auth.pass.is_empty() {
            problems.push("mail authentication details are not set in mail.config.json".to_string());
        }
        if self.mail.recipient_email.trim().is_empty() {
            problems.push("recipient email is not set in mail.config.json".to_string());
        }
        problems
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| FolioError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| FolioError::Config(format!("invalid JSON in {}: {}", path.display(), e)))
}

/// The setup wizard stores answers as strings, so numeric fields may arrive either way.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Num(u64),
    Bool(bool),
    Str(String),
}

fn de_opt_port<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u16>, D::Error> {
    use serde::de::Error;
    match Option::<Loose>::deserialize(d)? {
        None => Ok(None),
        Some(Loose::Num(n)) => u16::try_from(n).map(Some).map_err(D::Error::custom),
        Some(Loose::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Loose::Str(s)) => s.trim().parse().map(Some).map_err(D::Error::custom),
        Some(Loose::Bool(_)) => Err(D::Error::custom("port must be a number")),
    }
}

fn de_port<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u16, D::Error> {
    de_opt_port(d).map(Option::unwrap_or_default)
}

fn de_bool<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    use serde::de::Error;
    match Option::<Loose>::deserialize(d)? {
        None => Ok(false),
        Some(Loose::Bool(b)) => Ok(b),
        Some(Loose::Num(n)) => Ok(n != 0),
        Some(Loose::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" | "" => Ok(false),
            other => Err(D::Error::custom(format!("expected true or false, got {other}"))),
        },
    }
}

fn de_string_or_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(match Option::<Loose>::deserialize(d)? {
        None => String::new(),
        Some(Loose::Num(n)) => n.to_string(),
        Some(Loose::Bool(b)) => b.to_string(),
        Some(Loose::Str(s)) => s,
    })
}
