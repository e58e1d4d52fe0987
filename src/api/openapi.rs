//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{catalogs, health, histories, library_logs, loans, members, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblios API",
        version = "1.0.0",
        description = "Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalogs and copies
        catalogs::list_catalogs,
        catalogs::get_catalog,
        catalogs::create_catalog,
        catalogs::update_catalog,
        catalogs::delete_catalog,
        catalogs::create_book,
        catalogs::get_book,
        catalogs::get_book_by_barcode,
        catalogs::delete_book,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        members::get_member_loans,
        // Loans
        loans::list_loans,
        loans::get_loan,
        loans::create_loan,
        loans::update_loan,
        loans::return_loan,
        loans::unreturn_loan,
        loans::delete_loan,
        // Library logs
        library_logs::list_logs,
        library_logs::get_log,
        library_logs::create_log,
        library_logs::update_log,
        library_logs::approve_log,
        library_logs::return_log_items,
        library_logs::unreturn_log_items,
        library_logs::log_to_pending,
        library_logs::delete_log,
        // Histories
        histories::list_histories,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Catalogs and copies
            crate::models::catalog::Catalog,
            crate::models::catalog::CatalogDetails,
            crate::models::catalog::CatalogList,
            crate::models::catalog::CreateCatalog,
            crate::models::catalog::UpdateCatalog,
            crate::models::book::Book,
            crate::models::book::CreateBook,
            // Members
            crate::models::member::Member,
            crate::models::member::CreateMember,
            crate::models::member::UpdateMember,
            members::MemberList,
            // Loans
            crate::models::loan::BookBorrow,
            crate::models::loan::BookBorrowDetail,
            crate::models::loan::BookReturn,
            crate::models::loan::LoanDetails,
            crate::models::loan::LoanItem,
            crate::models::loan::CreateLoan,
            crate::models::loan::UpdateLoan,
            crate::models::loan::ConditionItem,
            crate::models::loan::ReturnLoan,
            crate::models::loan::UnReturnLoan,
            crate::models::loan::LoanStatusFilter,
            // Library logs
            crate::models::library_log::LibraryLog,
            crate::models::library_log::LibraryLogItem,
            crate::models::library_log::LogDetails,
            crate::models::library_log::CreateLibraryLog,
            crate::models::library_log::UpdateLibraryLog,
            crate::models::library_log::LogItemSelection,
            // Histories
            crate::models::history::History,
            // Stats
            crate::services::stats::StatsResponse,
            crate::services::stats::CatalogStats,
            crate::services::stats::MemberStats,
            crate::services::stats::LoanStats,
            crate::services::stats::LogStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalogs", description = "Catalog and copy management"),
        (name = "members", description = "Member management"),
        (name = "loans", description = "Take-home loan management"),
        (name = "library-logs", description = "In-library reading sessions"),
        (name = "histories", description = "Audit ledger"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
