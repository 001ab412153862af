//! Storage layer: SQLite tables for bills and their derived stage events.

mod error;
pub use error::StoreError;

mod sqlite;
pub use sqlite::BillStore;
