use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::part::Part;

/// Error when decoding a snapshot payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotError {
    pub message: String,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snapshot error: {}", self.message)
    }
}

impl std::error::Error for SnapshotError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryKind {
    Insert,
    Update,
    Delete,
}

/// One immutable audit record of a part mutation.
///
/// Snapshots are value copies taken around the mutation, stored as encoded
/// payloads: `before` is absent for inserts, `after` absent for deletes.
/// Events are append-only; once recorded they are never rewritten.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct HistoryEvent {
    pub kind: HistoryKind,
    pub mpn: String,
    #[serde(default, with = "snapshot_serde", skip_serializing_if = "Option::is_none")]
    before: Option<Vec<u8>>,
    #[serde(default, with = "snapshot_serde", skip_serializing_if = "Option::is_none")]
    after: Option<Vec<u8>>,
    pub sequence: u64,
    pub timestamp: SystemTime,
}

mod snapshot_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(payload: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match payload {
            Some(bytes) => STANDARD.encode(bytes).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        value
            .map(|s| STANDARD.decode(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

impl HistoryEvent {
    pub(crate) fn new(
        kind: HistoryKind,
        mpn: impl Into<String>,
        before: Option<&Part>,
        after: Option<&Part>,
        sequence: u64,
    ) -> Self {
        HistoryEvent {
            kind,
            mpn: mpn.into(),
            before: before.map(encode),
            after: after.map(encode),
            sequence,
            timestamp: SystemTime::now(),
        }
    }

    /// Decode the pre-change snapshot. `Ok(None)` for insert events.
    pub fn before(&self) -> Result<Option<Part>, SnapshotError> {
        decode(self.before.as_deref())
    }

    /// Decode the post-change snapshot. `Ok(None)` for delete events.
    pub fn after(&self) -> Result<Option<Part>, SnapshotError> {
        decode(self.after.as_deref())
    }
}

fn encode(part: &Part) -> Vec<u8> {
    bitcode::serialize(part).expect("failed to serialize part snapshot")
}

fn decode(payload: Option<&[u8]>) -> Result<Option<Part>, SnapshotError> {
    payload
        .map(|bytes| {
            bitcode::deserialize(bytes).map_err(|e| SnapshotError {
                message: e.to_string(),
            })
        })
        .transpose()
}
