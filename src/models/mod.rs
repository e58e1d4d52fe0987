//! Data models for Biblios

pub mod book;
pub mod catalog;
pub mod enums;
pub mod history;
pub mod library_log;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::Book;
pub use catalog::Catalog;
pub use enums::{BookStatus, HistoryAction, HistoryEntityType, LogStatus};
pub use history::History;
pub use library_log::{LibraryLog, LibraryLogItem};
pub use loan::{BookBorrow, BookBorrowDetail, BookReturn};
pub use member::Member;
