// Cache module for upstream data.
// Keeps the repository listing in memory between refreshes.

pub mod repos;
pub mod store;

pub use repos::{RepositoryCache, RepositoryPage, RepositorySource, fetch_all};
pub use store::CachedData;
