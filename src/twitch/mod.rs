// Twitch live status module.
// Resolves the configured channel and reports whether it is streaming.

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::TwitchClient;
pub use types::LiveStatus;

/// Source of the live status section on the home page.
#[async_trait]
pub trait LiveStatusSource: Send + Sync {
    /// Fresh status, or `None` when it could not be determined.
    async fn live_status(&self) -> Option<LiveStatus>;
}
