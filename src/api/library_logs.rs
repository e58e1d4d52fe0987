//! Library log (in-library reading session) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::library_log::{
        CreateLibraryLog, LibraryLog, LogDetails, LogItemSelection, LogQuery, UpdateLibraryLog,
    },
};

/// List library logs
#[utoipa::path(
    get,
    path = "/library-logs",
    tag = "library-logs",
    params(LogQuery),
    responses(
        (status = 200, description = "Log list", body = Vec<LibraryLog>)
    )
)]
pub async fn list_logs(
    State(state): State<crate::AppState>,
    Query(query): Query<LogQuery>,
) -> AppResult<Json<Vec<LibraryLog>>> {
    let logs = state.services.library_logs.list(&query).await?;
    Ok(Json(logs))
}

/// Get a log with its items
#[utoipa::path(
    get,
    path = "/library-logs/{id}",
    tag = "library-logs",
    params(
        ("id" = i32, Path, description = "Log ID")
    ),
    responses(
        (status = 200, description = "Log details", body = LogDetails),
        (status = 404, description = "Log not found")
    )
)]
pub async fn get_log(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LogDetails>> {
    let log = state.services.library_logs.get(id).await?;
    Ok(Json(log))
}

/// Create a pending library log
#[utoipa::path(
    post,
    path = "/library-logs",
    tag = "library-logs",
    request_body = CreateLibraryLog,
    responses(
        (status = 201, description = "Log created", body = LogDetails),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "A selected book is already in use")
    )
)]
pub async fn create_log(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLibraryLog>,
) -> AppResult<(StatusCode, Json<LogDetails>)> {
    request.validate()?;
    let log = state.services.library_logs.create(&request).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// Edit a log, replacing its book set
#[utoipa::path(
    put,
    path = "/library-logs/{id}",
    tag = "library-logs",
    params(
        ("id" = i32, Path, description = "Log ID")
    ),
    request_body = UpdateLibraryLog,
    responses(
        (status = 200, description = "Log updated", body = LogDetails),
        (status = 404, description = "Log not found"),
        (status = 409, description = "A selected book is already in use"),
        (status = 422, description = "Returned logs cannot be edited")
    )
)]
pub async fn update_log(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateLibraryLog>,
) -> AppResult<Json<LogDetails>> {
    request.validate()?;
    let log = state.services.library_logs.update(id, &request).await?;
    Ok(Json(log))
}

/// Approve a pending log, claiming its books
#[utoipa::path(
    post,
    path = "/library-logs/{id}/approve",
    tag = "library-logs",
    params(
        ("id" = i32, Path, description = "Log ID")
    ),
    responses(
        (status = 200, description = "Log approved", body = LogDetails),
        (status = 404, description = "Log not found"),
        (status = 409, description = "A book is no longer available"),
        (status = 422, description = "Log is not pending")
    )
)]
pub async fn approve_log(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LogDetails>> {
    let log = state.services.library_logs.approve(id).await?;
    Ok(Json(log))
}

/// Return items; an empty selection returns everything outstanding
#[utoipa::path(
    post,
    path = "/library-logs/{id}/return",
    tag = "library-logs",
    params(
        ("id" = i32, Path, description = "Log ID")
    ),
    request_body = LogItemSelection,
    responses(
        (status = 200, description = "Items returned", body = LogDetails),
        (status = 404, description = "Log not found"),
        (status = 422, description = "Log is not approved")
    )
)]
pub async fn return_log_items(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<LogItemSelection>,
) -> AppResult<Json<LogDetails>> {
    let log = state.services.library_logs.return_items(id, &request).await?;
    Ok(Json(log))
}

/// Undo item returns; an empty selection targets all returned items
#[utoipa::path(
    post,
    path = "/library-logs/{id}/unreturn",
    tag = "library-logs",
    params(
        ("id" = i32, Path, description = "Log ID")
    ),
    request_body = LogItemSelection,
    responses(
        (status = 200, description = "Returns undone", body = LogDetails),
        (status = 404, description = "Log not found"),
        (status = 409, description = "A book is no longer available"),
        (status = 422, description = "Log is pending")
    )
)]
pub async fn unreturn_log_items(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<LogItemSelection>,
) -> AppResult<Json<LogDetails>> {
    let log = state.services.library_logs.unreturn_items(id, &request).await?;
    Ok(Json(log))
}

/// Reset a log to pending, releasing any held books
#[utoipa::path(
    post,
    path = "/library-logs/{id}/to-pending",
    tag = "library-logs",
    params(
        ("id" = i32, Path, description = "Log ID")
    ),
    responses(
        (status = 200, description = "Log reset to pending", body = LogDetails),
        (status = 404, description = "Log not found")
    )
)]
pub async fn log_to_pending(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LogDetails>> {
    let log = state.services.library_logs.to_pending(id).await?;
    Ok(Json(log))
}

/// Delete a pending log
#[utoipa::path(
    delete,
    path = "/library-logs/{id}",
    tag = "library-logs",
    params(
        ("id" = i32, Path, description = "Log ID")
    ),
    responses(
        (status = 204, description = "Log deleted"),
        (status = 404, description = "Log not found"),
        (status = 422, description = "Log is not pending")
    )
)]
pub async fn delete_log(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.library_logs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
