// Shared application state.
// Holds configuration and the collaborators route handlers call into.

use std::sync::Arc;

use tracing::info;

use crate::cache::{RepositoryCache, RepositorySource};
use crate::config::Config;
use crate::contact::{Mailer, SmtpMailer};
use crate::error::Result;
use crate::github::GitHubClient;
use crate::twitch::{LiveStatusSource, TwitchClient};

/// State available to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repos: Arc<RepositoryCache>,
    /// Absent when Twitch is not configured.
    pub live: Option<Arc<dyn LiveStatusSource>>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Assemble state from explicit collaborators.
    pub fn new(
        config: Config,
        source: Arc<dyn RepositorySource>,
        live: Option<Arc<dyn LiveStatusSource>>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let repos = Arc::new(RepositoryCache::new(source, config.site.cache.clone()));
        Self {
            config: Arc::new(config),
            repos,
            live,
            mailer,
        }
    }

    /// Build the production clients described by `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let site = &config.site;
        let github = GitHubClient::new(&site.github_username, &site.api_tokens.github_token)?;

        let live: Option<Arc<dyn LiveStatusSource>> = if config.twitch_enabled() {
            Some(Arc::new(TwitchClient::new(
                &site.twitch_username,
                &site.api_tokens.twitch_client_id,
                &site.api_tokens.twitch_token,
            )?))
        } else {
            None
        };

        let mailer = Arc::new(SmtpMailer::new(config.mail.clone()));

        info!(
            github_user = %site.github_username,
            twitch = live.is_some(),
            cache_ttl_secs = site.cache.ttl_secs,
            design = %config.design(),
            "application state initialized"
        );

        Ok(Self::new(config, Arc::new(github), live, mailer))
    }
}
