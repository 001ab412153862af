use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bill not found: term {term} nr {number}")]
    BillNotFound { term: i64, number: String },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored status is not a known value: {0}")]
    BadStatus(#[from] sejmoskop_core::ParseStatusError),
}
