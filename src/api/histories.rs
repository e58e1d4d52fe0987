//! History ledger endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::history::{History, HistoryQuery},
};

/// List history ledger rows, newest first
#[utoipa::path(
    get,
    path = "/histories",
    tag = "histories",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History rows", body = Vec<History>)
    )
)]
pub async fn list_histories(
    State(state): State<crate::AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<History>>> {
    let rows = state.services.histories.list(&query).await?;
    Ok(Json(rows))
}
