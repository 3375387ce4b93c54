// Markdown blog posts.
// Scans the posts directory for listings and renders single posts to HTML.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use pulldown_cmark::{Options, Parser, html as md_html};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::Result;

/// Number of characters of raw markdown shown on the listing page.
pub const SUMMARY_CHARS: usize = 200;

/// Listing entry derived from a markdown file.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    /// File name without the `.md` extension; used as the URL slug.
    pub filename: String,
    pub title: String,
    pub summary: String,
    pub date: DateTime<Utc>,
}

/// Build a listing entry from a post's file name and contents.
///
/// `now` is used when the post has no parseable `Date:` line.
pub fn parse_post(filename: &str, content: &str, now: DateTime<Utc>) -> BlogPost {
    let title = content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| filename.to_string());

    let date = content
        .lines()
        .find_map(|line| line.strip_prefix("Date:"))
        .and_then(|value| parse_date(value.trim()))
        .unwrap_or(now);

    BlogPost {
        filename: filename.strip_suffix(".md").unwrap_or(filename).to_string(),
        title,
        summary: content.chars().take(SUMMARY_CHARS).collect(),
        date,
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, and `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// List every `.md` file in `dir`, newest first.
///
/// A missing directory yields an empty listing.
pub async fn list_posts(dir: &Path) -> Result<Vec<BlogPost>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(dir = %dir.display(), "blog directory does not exist");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    let now = Utc::now();
    let mut posts = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        match fs::read_to_string(&path).await {
            Ok(content) => posts.push(parse_post(filename, &content, now)),
            Err(err) => warn!(file = %path.display(), error = %err, "skipping unreadable post"),
        }
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date));
    debug!(count = posts.len(), "listed blog posts");
    Ok(posts)
}

/// Read one post by slug and render it to HTML.
///
/// Returns `None` for slugs that could escape the directory and for files that
/// are missing or unreadable.
pub async fn read_post(dir: &Path, slug: &str) -> Option<String> {
    if !is_safe_slug(slug) {
        warn!(slug = %slug, "rejected blog slug");
        return None;
    }

    let path = dir.join(format!("{slug}.md"));
    match fs::read_to_string(&path).await {
        Ok(content) => Some(render_markdown(&content)),
        Err(err) => {
            warn!(slug = %slug, error = %err, "error reading blog post");
            None
        }
    }
}

fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains(['/', '\\']) && !slug.contains("..")
}

/// Render markdown text to HTML.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::with_capacity(markdown.len() * 2);
    md_html::push_html(&mut html_output, parser);
    html_output
}
