mod event;
mod log;

pub use event::{HistoryEvent, HistoryKind, SnapshotError};
pub use log::{history_path, HistoryLog};
