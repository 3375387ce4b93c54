// GitHub API module.
// Provides the client and types for listing a user's repositories.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::GitHubClient;
pub use endpoints::prepare_page;
pub use types::*;
