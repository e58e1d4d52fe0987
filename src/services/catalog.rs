//! Catalog and copy management service

use crate::{
    error::AppResult,
    models::{
        book::{Book, CreateBook},
        catalog::{Catalog, CatalogDetails, CatalogQuery, CreateCatalog, UpdateCatalog},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List catalogs
    pub async fn list(&self, query: &CatalogQuery) -> AppResult<(Vec<Catalog>, i64)> {
        self.repository.catalogs.list(query).await
    }

    /// Get a catalog with its copies
    pub async fn get(&self, id: i32) -> AppResult<CatalogDetails> {
        self.repository.catalogs.get_details(id).await
    }

    /// Create a catalog with its initial copies
    pub async fn create(&self, data: &CreateCatalog) -> AppResult<Catalog> {
        self.repository.catalogs.create(data).await
    }

    /// Update catalog title fields
    pub async fn update(&self, id: i32, data: &UpdateCatalog) -> AppResult<Catalog> {
        self.repository.catalogs.update(id, data).await
    }

    /// Delete a catalog
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.catalogs.delete(id).await
    }

    /// Add a physical copy under a catalog
    pub async fn create_book(&self, catalog_id: i32, data: &CreateBook) -> AppResult<Book> {
        // Verify catalog exists
        self.repository.catalogs.get_by_id(catalog_id).await?;
        self.repository.books.create(catalog_id, data).await
    }

    /// Get a copy by id
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Get a copy by barcode
    pub async fn get_book_by_barcode(&self, barcode: &str) -> AppResult<Book> {
        self.repository.books.get_by_barcode(barcode).await
    }

    /// Remove a physical copy
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}
