//! Catalog and physical copy endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, CreateBook},
        catalog::{Catalog, CatalogDetails, CatalogList, CatalogQuery, CreateCatalog, UpdateCatalog},
    },
};

/// List catalogs
#[utoipa::path(
    get,
    path = "/catalogs",
    tag = "catalogs",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Catalog list", body = CatalogList)
    )
)]
pub async fn list_catalogs(
    State(state): State<crate::AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<CatalogList>> {
    let (items, total) = state.services.catalog.list(&query).await?;
    Ok(Json(CatalogList { items, total }))
}

/// Get a catalog with its copies
#[utoipa::path(
    get,
    path = "/catalogs/{id}",
    tag = "catalogs",
    params(
        ("id" = i32, Path, description = "Catalog ID")
    ),
    responses(
        (status = 200, description = "Catalog details", body = CatalogDetails),
        (status = 404, description = "Catalog not found")
    )
)]
pub async fn get_catalog(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CatalogDetails>> {
    let details = state.services.catalog.get(id).await?;
    Ok(Json(details))
}

/// Create a catalog, optionally with initial copies
#[utoipa::path(
    post,
    path = "/catalogs",
    tag = "catalogs",
    request_body = CreateCatalog,
    responses(
        (status = 201, description = "Catalog created", body = Catalog),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Duplicate barcode")
    )
)]
pub async fn create_catalog(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateCatalog>,
) -> AppResult<(StatusCode, Json<Catalog>)> {
    request.validate()?;
    let catalog = state.services.catalog.create(&request).await?;
    Ok((StatusCode::CREATED, Json(catalog)))
}

/// Update catalog title fields
#[utoipa::path(
    put,
    path = "/catalogs/{id}",
    tag = "catalogs",
    params(
        ("id" = i32, Path, description = "Catalog ID")
    ),
    request_body = UpdateCatalog,
    responses(
        (status = 200, description = "Catalog updated", body = Catalog),
        (status = 404, description = "Catalog not found")
    )
)]
pub async fn update_catalog(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateCatalog>,
) -> AppResult<Json<Catalog>> {
    request.validate()?;
    let catalog = state.services.catalog.update(id, &request).await?;
    Ok(Json(catalog))
}

/// Delete a catalog
#[utoipa::path(
    delete,
    path = "/catalogs/{id}",
    tag = "catalogs",
    params(
        ("id" = i32, Path, description = "Catalog ID")
    ),
    responses(
        (status = 204, description = "Catalog deleted"),
        (status = 404, description = "Catalog not found"),
        (status = 409, description = "A copy is on loan or in the library")
    )
)]
pub async fn delete_catalog(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a physical copy under a catalog
#[utoipa::path(
    post,
    path = "/catalogs/{id}/books",
    tag = "catalogs",
    params(
        ("id" = i32, Path, description = "Catalog ID")
    ),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Copy created", body = Book),
        (status = 404, description = "Catalog not found"),
        (status = 409, description = "Duplicate barcode")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Path(catalog_id): Path<i32>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    request.validate()?;
    let book = state.services.catalog.create_book(catalog_id, &request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Get a copy by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "catalogs",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Get a copy by barcode
#[utoipa::path(
    get,
    path = "/books/barcode/{barcode}",
    tag = "catalogs",
    params(
        ("barcode" = String, Path, description = "Copy barcode")
    ),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_by_barcode(
    State(state): State<crate::AppState>,
    Path(barcode): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book_by_barcode(&barcode).await?;
    Ok(Json(book))
}

/// Remove a physical copy
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "catalogs",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Copy removed"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Copy is on loan or in the library")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
