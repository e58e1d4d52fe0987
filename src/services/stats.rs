//! Statistics service

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::enums::LogStatus, repository::Repository};

/// Library statistics response
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    pub catalogs: CatalogStats,
    pub members: MemberStats,
    pub loans: LoanStats,
    pub library_logs: LogStats,
}

#[derive(Serialize, ToSchema)]
pub struct CatalogStats {
    /// Total number of titles
    pub total: i64,
    /// Total number of physical copies
    pub copies: i64,
    /// Copies currently available
    pub available: i64,
}

#[derive(Serialize, ToSchema)]
pub struct MemberStats {
    pub total: i64,
}

#[derive(Serialize, ToSchema)]
pub struct LoanStats {
    pub active: i64,
    pub overdue: i64,
    pub returned_today: i64,
}

#[derive(Serialize, ToSchema)]
pub struct LogStats {
    pub pending: i64,
    pub approved: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Gather the dashboard counters
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let (copies, available) = self.repository.books.counts().await?;

        Ok(StatsResponse {
            catalogs: CatalogStats {
                total: self.repository.catalogs.count().await?,
                copies,
                available,
            },
            members: MemberStats {
                total: self.repository.members.count().await?,
            },
            loans: LoanStats {
                active: self.repository.loans.count_active().await?,
                overdue: self.repository.loans.count_overdue().await?,
                returned_today: self.repository.loans.count_returned_today().await?,
            },
            library_logs: LogStats {
                pending: self
                    .repository
                    .library_logs
                    .count_by_status(LogStatus::Pending)
                    .await?,
                approved: self
                    .repository
                    .library_logs
                    .count_by_status(LogStatus::Approved)
                    .await?,
            },
        })
    }
}
