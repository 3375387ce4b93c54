//! Folio - personal portfolio web server.
//!
//! Shows GitHub repositories from a TTL cache, Twitch live status, markdown
//! blog posts, a contact form delivered over SMTP, and an image upload endpoint.

pub mod blog;
pub mod cache;
pub mod config;
pub mod contact;
pub mod error;
pub mod github;
pub mod render;
pub mod routes;
pub mod setup;
pub mod state;
pub mod twitch;
pub mod upload;

pub use config::{Config, ContentPaths};
pub use error::{FolioError, Result};
pub use routes::router;
pub use state::AppState;
