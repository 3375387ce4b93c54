// Repository cache.
// Drives pagination against a repository source and keeps the result for a fixed TTL.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::CacheSettings;
use crate::error::Result;
use crate::github::Repository;

use super::store::CachedData;

/// One page of repositories after filtering.
#[derive(Debug, Clone, Default)]
pub struct RepositoryPage {
    /// Repositories left after dropping forks, most starred first.
    pub repos: Vec<Repository>,
    /// Number of entries the upstream returned before filtering.
    pub received: usize,
}

/// Anything that can list repositories one page at a time.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Fetch page `page` (1-based) holding at most `per_page` entries.
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<RepositoryPage>;
}

/// Fetch every page, starting at 1, until the upstream returns a short page.
///
/// Stops early after `max_pages` pages. Any failed page fails the whole fetch so
/// callers never see a partial listing.
pub async fn fetch_all(
    source: &dyn RepositorySource,
    per_page: u32,
    max_pages: u32,
) -> Result<Vec<Repository>> {
    let mut all = Vec::new();
    let mut page = 1;

    loop {
        let RepositoryPage { repos, received } = source.fetch_page(page, per_page).await?;
        info!(page, received, kept = repos.len(), "fetched repository page");
        all.extend(repos);

        if received < per_page as usize {
            break;
        }
        if page >= max_pages {
            warn!(max_pages, "page limit reached, ending repository pagination");
            break;
        }
        page += 1;
    }

    // Pages are sorted individually; the combined list must be too.
    all.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    info!(total = all.len(), "total repositories fetched");
    Ok(all)
}

/// Process-wide repository cache.
///
/// Refreshes are not deduplicated: concurrent callers that all see an expired
/// entry each run their own fetch, and the last one to finish wins.
pub struct RepositoryCache {
    source: Arc<dyn RepositorySource>,
    settings: CacheSettings,
    slot: RwLock<Option<CachedData<Arc<Vec<Repository>>>>>,
    refreshes: AtomicU64,
}

impl RepositoryCache {
    pub fn new(source: Arc<dyn RepositorySource>, settings: CacheSettings) -> Self {
        Self {
            source,
            settings,
            slot: RwLock::new(None),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Current repository list, refreshing it first if absent or expired.
    pub async fn repositories(&self) -> Arc<Vec<Repository>> {
        if let Some(entry) = self.slot.read().await.as_ref() {
            if entry.is_valid(self.settings.ttl()) {
                debug!(count = entry.data.len(), "using cached repositories");
                return Arc::clone(&entry.data);
            }
        }
        self.refresh().await
    }

    /// First `n` repositories, for the landing page.
    pub async fn top(&self, n: usize) -> Vec<Repository> {
        self.repositories().await.iter().take(n).cloned().collect()
    }

    /// Repository whose name matches `name` ignoring case.
    pub async fn find(&self, name: &str) -> Option<Repository> {
        self.repositories()
            .await
            .iter()
            .find(|repo| repo.name_matches(name))
            .cloned()
    }

    /// Number of refresh attempts since startup.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    /// When the cached list was fetched, if there is one.
    pub async fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.slot.read().await.as_ref().map(|entry| entry.cached_at)
    }

    async fn refresh(&self) -> Arc<Vec<Repository>> {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        info!("fetching repositories");

        match fetch_all(
            self.source.as_ref(),
            self.settings.per_page,
            self.settings.max_pages,
        )
        .await
        {
            Ok(repos) => {
                let data = Arc::new(repos);
                *self.slot.write().await = Some(CachedData::new(Arc::clone(&data)));
                info!(count = data.len(), "repository cache updated");
                data
            }
            Err(err) => {
                error!(error = %err, "failed to fetch repositories");
                let mut slot = self.slot.write().await;

                if !self.settings.keep_stale_on_error {
                    let empty = Arc::new(Vec::new());
                    *slot = Some(CachedData::new(Arc::clone(&empty)));
                    return empty;
                }

                match slot.as_ref() {
                    Some(entry) => {
                        warn!(
                            age_secs = entry.age().as_secs(),
                            "serving stale repositories"
                        );
                        Arc::clone(&entry.data)
                    }
                    None => Arc::new(Vec::new()),
                }
            }
        }
    }
}
