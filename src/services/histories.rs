//! History ledger reporting service

use crate::{
    error::AppResult,
    models::history::{History, HistoryQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct HistoriesService {
    repository: Repository,
}

impl HistoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List ledger rows
    pub async fn list(&self, query: &HistoryQuery) -> AppResult<Vec<History>> {
        self.repository.histories.list(query).await
    }
}
