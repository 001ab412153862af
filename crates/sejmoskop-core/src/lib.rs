//! Legislative stage-event derivation: flatten a Sejm process-stage tree
//! into a chronological event list and derive the bill's canonical status.

pub mod stages;
pub mod status;
pub mod timeline;

pub use stages::{Event, MAX_STAGE_DEPTH, StageNode, flatten};
pub use status::{BillStatus, ParseStatusError, classify};
pub use timeline::{InvalidDateError, parse_event_date, sort_by_date};
