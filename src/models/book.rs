//! Book (physical copy) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book model from database; `status` holds a [`super::enums::BookStatus`] code
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub catalog_id: i32,
    pub barcode: String,
    pub status: String,
    pub notes: Option<String>,
}

/// Create book (new physical copy) request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "barcode must not be blank"))]
    pub barcode: String,
    pub notes: Option<String>,
}
