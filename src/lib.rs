mod error;
mod history;
mod part;
mod project;
mod shared;
mod store;
mod version;

pub use error::StoreError;
pub use history::{history_path, HistoryEvent, HistoryKind, HistoryLog, SnapshotError};
pub use part::{Parameter, Part, MPN_FIELD};
pub use project::{Material, Project, Version};
pub use shared::SharedDatastore;
pub use store::{Datastore, StoreOptions, PARTS_CHANGED, PROJECTS_CHANGED};
pub use version::{version_cmp, VersionKey};

// Re-export the EventEmitter from the event_emitter_rs crate
pub use event_emitter_rs::EventEmitter;
