use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{HistoryEvent, HistoryKind};
use crate::error::StoreError;
use crate::part::Part;

/// Backing file for the history of the dataset at `dataset`.
pub fn history_path(dataset: &Path) -> PathBuf {
    let mut name = dataset.as_os_str().to_os_string();
    name.push(".history");
    PathBuf::from(name)
}

/// Append-only recorder of part mutations, bound 1:1 to one open store.
///
/// Events accumulate in memory and [`HistoryLog::save`] appends the pending
/// ones to the backing file, one JSON document per line. Prior lines are
/// never rewritten. Sequence numbers continue from whatever the backing file
/// already holds, so appends stay monotonic across sessions.
#[derive(Debug)]
pub struct HistoryLog {
    path: PathBuf,
    events: Vec<HistoryEvent>,
    flushed: usize,
    sequence: u64,
}

impl HistoryLog {
    pub fn open(dataset: &Path) -> Result<Self, StoreError> {
        let path = history_path(dataset);
        let sequence = match fs::read_to_string(&path) {
            Ok(contents) => contents.lines().filter(|line| !line.trim().is_empty()).count()
                as u64,
            Err(err) if err.kind() == io::ErrorKind::NotFound => 0,
            Err(err) => return Err(err.into()),
        };

        Ok(HistoryLog {
            path,
            events: Vec::new(),
            flushed: 0,
            sequence,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Events recorded during this session, in order of occurrence.
    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    /// Events recorded but not yet appended to the backing file.
    pub fn pending(&self) -> usize {
        self.events.len() - self.flushed
    }

    pub fn record_insert(&mut self, part: &Part) {
        self.record(HistoryKind::Insert, part.mpn().to_string(), None, Some(part));
    }

    pub fn record_update(&mut self, before: &Part, after: &Part) {
        self.record(
            HistoryKind::Update,
            after.mpn().to_string(),
            Some(before),
            Some(after),
        );
    }

    pub fn record_delete(&mut self, part: &Part) {
        self.record(HistoryKind::Delete, part.mpn().to_string(), Some(part), None);
    }

    fn record(
        &mut self,
        kind: HistoryKind,
        mpn: String,
        before: Option<&Part>,
        after: Option<&Part>,
    ) {
        self.sequence += 1;
        self.events
            .push(HistoryEvent::new(kind, mpn, before, after, self.sequence));
    }

    /// Append pending events to the backing file.
    pub fn save(&mut self) -> Result<(), StoreError> {
        if self.flushed == self.events.len() {
            return Ok(());
        }

        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for event in &self.events[self.flushed..] {
            serde_json::to_writer(&mut writer, event)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        tracing::debug!(
            "appended {} history event(s) to {}",
            self.events.len() - self.flushed,
            self.path.display()
        );
        self.flushed = self.events.len();
        Ok(())
    }
}
