use std::fmt;
use std::io;

/// Failures surfaced by [`crate::Datastore`] operations.
///
/// Constraint violations are checked before any mutation, so a returned error
/// always means the in-memory state is unchanged.
#[derive(Debug)]
pub enum StoreError {
    /// A part with this MPN already exists, or a rename targets a taken key.
    DuplicateMpn(String),
    /// No part with this MPN exists.
    UnknownMpn(String),
    /// An empty string is not a valid MPN.
    EmptyMpn,
    /// The edited field is not a recognized part parameter.
    UnknownParameter(String),
    DuplicateProject(String),
    UnknownProject(String),
    DuplicateVersion { project: String, version: String },
    UnknownVersion { project: String, version: String },
    /// Material index past the end of a version's BOM.
    MaterialOutOfRange { version: String, index: usize },
    /// Operation invoked while no store instance is open.
    NotOpen,
    /// A shared handle's mutex was poisoned by a panicking holder.
    LockPoisoned(&'static str),
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateMpn(mpn) => {
                write!(f, "a part with MPN {:?} already exists", mpn)
            }
            StoreError::UnknownMpn(mpn) => write!(f, "no part with MPN {:?}", mpn),
            StoreError::EmptyMpn => write!(f, "MPN must not be empty"),
            StoreError::UnknownParameter(name) => {
                write!(f, "unknown part parameter {:?}", name)
            }
            StoreError::DuplicateProject(name) => {
                write!(f, "a project named {:?} already exists", name)
            }
            StoreError::UnknownProject(name) => write!(f, "no project named {:?}", name),
            StoreError::DuplicateVersion { project, version } => write!(
                f,
                "project {:?} already has a version {:?}",
                project, version
            ),
            StoreError::UnknownVersion { project, version } => {
                write!(f, "project {:?} has no version {:?}", project, version)
            }
            StoreError::MaterialOutOfRange { version, index } => write!(
                f,
                "version {:?} has no material at index {}",
                version, index
            ),
            StoreError::NotOpen => write!(f, "no datastore is open"),
            StoreError::LockPoisoned(what) => write!(f, "datastore lock poisoned ({})", what),
            StoreError::Io(err) => write!(f, "i/o error: {}", err),
            StoreError::Json(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Json(err)
    }
}
