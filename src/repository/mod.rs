//! Repository layer for database operations

pub mod books;
pub mod catalogs;
pub mod histories;
pub mod library_logs;
pub mod loans;
pub mod members;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub catalogs: catalogs::CatalogsRepository,
    pub books: books::BooksRepository,
    pub members: members::MembersRepository,
    pub loans: loans::LoansRepository,
    pub library_logs: library_logs::LibraryLogsRepository,
    pub histories: histories::HistoriesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            catalogs: catalogs::CatalogsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            members: members::MembersRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            library_logs: library_logs::LibraryLogsRepository::new(pool.clone()),
            histories: histories::HistoriesRepository::new(pool.clone()),
            pool,
        }
    }
}
