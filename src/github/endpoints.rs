// GitHub API endpoint functions.
// Fetches one page of a user's repositories and prepares it for display.

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{RepositoryPage, RepositorySource};
use crate::error::Result;

use super::client::GitHubClient;
use super::types::Repository;

impl GitHubClient {
    /// Get one page of public repositories owned by the configured user.
    pub async fn get_user_repos(&self, page: u32, per_page: u32) -> Result<Vec<Repository>> {
        let params = [
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let response = self
            .get_with_params(&format!("/users/{}/repos", self.username()), &params)
            .await?;
        let repos: Vec<Repository> = response.json().await?;
        Ok(repos)
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<RepositoryPage> {
        let raw = self.get_user_repos(page, per_page).await?;
        let received = raw.len();
        let repos = prepare_page(raw);
        debug!(page, received, kept = repos.len(), "prepared repository page");
        Ok(RepositoryPage { repos, received })
    }
}

/// Drop forks and order by stars, most starred first.
///
/// The sort is stable so repositories with equal star counts keep the upstream order.
pub fn prepare_page(mut repos: Vec<Repository>) -> Vec<Repository> {
    repos.retain(|repo| !repo.fork);
    repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    repos
}
