//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::loan::{
        BookBorrow, CreateLoan, LoanDetails, LoanQuery, ReturnLoan, UnReturnLoan, UpdateLoan,
    },
};

/// List loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(LoanQuery),
    responses(
        (status = 200, description = "Loan list", body = Vec<BookBorrow>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<Vec<BookBorrow>>> {
    let loans = state.services.loans.list(&query).await?;
    Ok(Json(loans))
}

/// Get a loan with its items and return events
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get(id).await?;
    Ok(Json(loan))
}

/// Create a loan (borrow books home)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanDetails),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Member not found"),
        (status = 409, description = "A selected book is unavailable"),
        (status = 422, description = "Member already has an active loan")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanDetails>)> {
    request.validate()?;
    let loan = state.services.loans.create(&request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Edit a loan, replacing its item set
#[utoipa::path(
    put,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan updated", body = LoanDetails),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "A selected book is unavailable")
    )
)]
pub async fn update_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateLoan>,
) -> AppResult<Json<LoanDetails>> {
    request.validate()?;
    let loan = state.services.loans.update(id, &request).await?;
    Ok(Json(loan))
}

/// Return a loan
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = ReturnLoan,
    responses(
        (status = 200, description = "Loan returned", body = LoanDetails),
        (status = 404, description = "Loan not found"),
        (status = 422, description = "Loan already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ReturnLoan>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.return_loan(id, &request).await?;
    Ok(Json(loan))
}

/// Undo a return, putting the books back on loan
#[utoipa::path(
    post,
    path = "/loans/{id}/unreturn",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = UnReturnLoan,
    responses(
        (status = 200, description = "Return undone", body = LoanDetails),
        (status = 404, description = "Loan or return event not found"),
        (status = 409, description = "A book on the loan is no longer available"),
        (status = 422, description = "Loan is not returned")
    )
)]
pub async fn unreturn_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UnReturnLoan>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.unreturn_loan(id, &request).await?;
    Ok(Json(loan))
}

/// Delete a loan, reversing its inventory effects
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.loans.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
