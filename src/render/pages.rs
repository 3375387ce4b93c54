// Page templates.
// One function per route, each taking its view model and returning a full page.

use maud::{Markup, PreEscaped, html};

use crate::blog::BlogPost;
use crate::config::Config;
use crate::contact::ContactView;
use crate::github::Repository;
use crate::twitch::LiveStatus;
use crate::upload::{ALLOWED_EXTENSIONS, MAX_UPLOAD_BYTES};

use super::format::{format_count, format_date, format_relative_time};
use super::page;

fn repo_card(repo: &Repository) -> Markup {
    html! {
        article class="card" {
            h3 { a href={ "/projects/" (repo.name) } { (repo.name) } }
            @if let Some(description) = &repo.description {
                p class="muted" { (description) }
            }
            p class="muted" {
                "★ " (format_count(repo.stargazers_count))
                @if let Some(language) = &repo.language {
                    " · " (language)
                }
            }
        }
    }
}

/// Landing page: most starred projects, live status, tech stack.
pub fn home(config: &Config, top_repos: &[Repository], live: Option<&LiveStatus>) -> Markup {
    let site = &config.site;
    let stack = &site.tech_stack;
    let name = if site.personal_info.name.is_empty() {
        &site.github_username
    } else {
        &site.personal_info.name
    };
    let body = html! {
        section {
            h1 { "Hi, I'm " (name) }
            @if !site.experience.job_title.is_empty() {
                p class="muted" {
                    (site.experience.job_title)
                    @if !site.experience.company.is_empty() { " at " (site.experience.company) }
                }
            }
        }
        @if let Some(status) = live {
            section class="card" {
                h2 { "Twitch" }
                p class=[status.is_live.then_some("live")] { (status.label) }
                a href={ "https://twitch.tv/" (site.twitch_username) } { "twitch.tv/" (site.twitch_username) }
            }
        }
        section {
            h2 { "Top Projects" }
            @if top_repos.is_empty() {
                p class="muted" { "No projects to show right now." }
            } @else {
                div class="grid" {
                    @for repo in top_repos { (repo_card(repo)) }
                }
            }
            p { a href="/projects" { "All projects →" } }
        }
        @if !stack.languages.is_empty() || !stack.tools.is_empty() {
            section {
                h2 { "Tech Stack" }
                div class="grid" {
                    @if !stack.languages.is_empty() {
                        div class="card" {
                            h3 { "Languages" }
                            @for language in &stack.languages { span class="badge" { (language) } " " }
                        }
                    }
                    @if !stack.tools.is_empty() {
                        div class="card" {
                            h3 { "Tools" }
                            @for tool in &stack.tools { span class="badge" { (tool) } " " }
                        }
                    }
                }
            }
        }
    };
    page(config, "", body)
}

/// Every cached repository.
pub fn projects(config: &Config, repos: &[Repository]) -> Markup {
    let body = html! {
        h1 { "Projects" }
        p class="muted" { (repos.len()) " repositories" }
        div class="grid" {
            @for repo in repos { (repo_card(repo)) }
        }
    };
    page(config, "Projects", body)
}

pub fn project_detail(config: &Config, repo: &Repository) -> Markup {
    let body = html! {
        article {
            h1 { (repo.name) }
            @if let Some(description) = &repo.description {
                p { (description) }
            }
            p class="muted" {
                "★ " (repo.stargazers_count) " stars · "
                (repo.forks_count) " forks · "
                (repo.open_issues_count) " open issues"
                @if let Some(language) = &repo.language { " · " (language) }
            }
            @if !repo.topics.is_empty() {
                p { @for topic in &repo.topics { span class="badge" { (topic) } " " } }
            }
            @if let Some(pushed) = &repo.pushed_at.or(repo.updated_at) {
                p class="muted" { "Last updated " (format_relative_time(pushed)) }
            }
            @if repo.archived {
                p class="notice" { "This repository is archived." }
            }
            p {
                a href=(repo.html_url) { "View on GitHub" }
                @if let Some(homepage) = repo.homepage.as_deref().filter(|h| !h.is_empty()) {
                    " · " a href=(homepage) { "Website" }
                }
            }
        }
        p { a href="/projects" { "← Back to projects" } }
    };
    page(config, &repo.name, body)
}

pub fn skills(config: &Config) -> Markup {
    let body = html! {
        h1 { "Skills" }
        div class="grid" {
            @for skill in &config.site.skills {
                div class="card" {
                    h3 { (skill.name) }
                    @if !skill.level.is_empty() { p class="muted" { (skill.level) } }
                }
            }
        }
    };
    page(config, "Skills", body)
}

pub fn about(config: &Config) -> Markup {
    let info = &config.site.personal_info;
    let experience = &config.site.experience;
    let body = html! {
        h1 { "About" }
        dl {
            @if !info.name.is_empty() { dt { "Name" } dd { (info.name) } }
            @if !info.age.is_empty() { dt { "Age" } dd { (info.age) } }
            @if !info.country.is_empty() { dt { "Country" } dd { (info.country) } }
            @if !info.languages.is_empty() { dt { "Languages" } dd { (info.languages.join(", ")) } }
            @if !info.hobbies.is_empty() { dt { "Hobbies" } dd { (info.hobbies.join(", ")) } }
        }
        @if !experience.job_title.is_empty() {
            h2 { "Experience" }
            div class="card" {
                h3 {
                    (experience.job_title)
                    @if !experience.company.is_empty() { " · " (experience.company) }
                }
                @if !experience.description.is_empty() { p { (experience.description) } }
            }
        }
    };
    page(config, "About", body)
}

pub fn testimonials(config: &Config) -> Markup {
    let body = html! {
        h1 { "Testimonials" }
        @for testimonial in &config.site.testimonials {
            blockquote class="card" {
                p { "“" (testimonial.feedback) "”" }
                p class="muted" {
                    "— " (testimonial.name)
                    @if !testimonial.date.is_empty() { ", " (testimonial.date) }
                }
            }
        }
    };
    page(config, "Testimonials", body)
}

pub fn blog_summary(config: &Config, posts: &[BlogPost]) -> Markup {
    let body = html! {
        h1 { "Blog" }
        @if posts.is_empty() {
            p class="muted" { "No posts yet." }
        }
        @for post in posts {
            article class="card" {
                h2 { a href={ "/blog/" (post.filename) } { (post.title) } }
                p class="muted" { (format_date(&post.date)) }
                p { (post.summary) "…" }
            }
        }
    };
    page(config, "Blog", body)
}

/// A single post; `content` is HTML already rendered from markdown.
pub fn blog_post(config: &Config, content: &str) -> Markup {
    let body = html! {
        article class="post" { (PreEscaped(content)) }
        p { a href="/blog" { "← All posts" } }
    };
    page(config, "Blog", body)
}

pub fn contact(config: &Config, view: &ContactView) -> Markup {
    let form = &view.form;
    let body = html! {
        h1 { "Contact" }
        @if let Some(success) = view.success() {
            p class="notice success" { (success) }
        }
        @if let Some(error) = view.error() {
            p class="notice error" { (error) }
        }
        form method="post" action="/contact" {
            label for="name" { "Name" }
            input id="name" name="name" type="text" value=(form.name);
            label for="email" { "Email" }
            input id="email" name="email" type="email" value=(form.email);
            label for="message" { "Message" }
            textarea id="message" name="message" rows="6" { (form.message) }
            button type="submit" { "Send" }
        }
    };
    page(config, "Contact", body)
}

pub fn upload(config: &Config) -> Markup {
    let body = html! {
        h1 { "Upload an image" }
        p class="muted" {
            "Accepted: " (ALLOWED_EXTENSIONS.join(", "))
            ". Maximum " (MAX_UPLOAD_BYTES / (1024 * 1024)) " MB."
        }
        form method="post" action="/upload" enctype="multipart/form-data" {
            input type="file" name="file" accept="image/*";
            button type="submit" { "Upload" }
        }
    };
    page(config, "Upload", body)
}

pub fn not_found(config: &Config) -> Markup {
    let body = html! {
        h1 { "404" }
        p { "Nothing here. Go " a href="/" { "home" } "." }
    };
    page(config, "Not Found", body)
}
