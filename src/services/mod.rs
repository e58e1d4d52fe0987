//! Business logic services

pub mod catalog;
pub mod histories;
pub mod library_logs;
pub mod loans;
pub mod members;
pub mod reminders;
pub mod stats;
pub mod telegram;

use crate::{config::TelegramConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub members: members::MembersService,
    pub loans: loans::LoansService,
    pub library_logs: library_logs::LibraryLogsService,
    pub histories: histories::HistoriesService,
    pub stats: stats::StatsService,
    pub telegram: telegram::TelegramService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub async fn new(repository: Repository, telegram_config: TelegramConfig) -> AppResult<Self> {
        Ok(Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            members: members::MembersService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            library_logs: library_logs::LibraryLogsService::new(repository.clone()),
            histories: histories::HistoriesService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            telegram: telegram::TelegramService::new(telegram_config),
            repository,
        })
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn db_ready(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.repository.pool)
            .await?;
        Ok(())
    }
}
