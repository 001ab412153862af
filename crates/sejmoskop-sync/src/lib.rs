//! Sync layer: Sejm API client and the fetch → derive → persist orchestration.

pub mod http;
pub mod orchestrator;

pub use http::{DEFAULT_BASE_URL, ProcessDetail, ProcessHeader, SejmClient, SyncError};
pub use orchestrator::{BillSyncError, SyncReport, apply_process, sync_bill, sync_term};
