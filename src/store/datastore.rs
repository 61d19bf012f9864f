use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use event_emitter_rs::EventEmitter;

use super::dataset::Dataset;
use crate::error::StoreError;
use crate::history::HistoryLog;
use crate::part::{Parameter, Part, MPN_FIELD};
use crate::project::{Material, Project, Version};

/// Event name raised after any part mutation.
pub const PARTS_CHANGED: &str = "parts_changed";
/// Event name raised after any project, version, or material mutation.
pub const PROJECTS_CHANGED: &str = "projects_changed";

/// Options applied when opening a dataset.
#[derive(Clone, Copy, Debug)]
pub struct StoreOptions {
    /// Record mutations to the history log. Off, the store works identically
    /// but records nothing; history is an observability add-on, never a
    /// dependency of CRUD correctness.
    pub history: bool,
    /// Write the dataset formatted for human readers.
    pub pretty: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            history: true,
            pretty: true,
        }
    }
}

impl StoreOptions {
    pub fn without_history() -> Self {
        StoreOptions {
            history: false,
            ..StoreOptions::default()
        }
    }
}

struct OpenStore {
    path: PathBuf,
    parts: BTreeMap<String, Part>,
    projects: BTreeMap<String, Project>,
    history: Option<HistoryLog>,
    pretty: bool,
}

impl OpenStore {
    fn save(&mut self) -> Result<(), StoreError> {
        let dataset = Dataset {
            parts: self.parts.values().cloned().collect(),
            projects: self.projects.values().cloned().collect(),
        };
        dataset.write(&self.path, self.pretty)?;
        if let Some(history) = self.history.as_mut() {
            history.save()?;
        }
        Ok(())
    }
}

/// The authoritative in-memory store for parts and projects.
///
/// A `Datastore` is a caller-owned handle that is either closed or holds
/// exactly one open dataset; `open` replaces the current instance (persisting
/// it first) and `close` persists and releases it. Every operation on a
/// closed handle fails fast with [`StoreError::NotOpen`]; nothing ever
/// touches stale state.
///
/// All operations run on the caller's thread with no internal locking.
/// Change listeners are delivered before the mutating call returns, after
/// the in-memory state is consistent; a listener must not re-enter a
/// mutating operation on the same store; that reentrancy is unsupported.
/// For multi-threaded hosts, wrap the handle in
/// [`crate::SharedDatastore`].
pub struct Datastore {
    inner: Option<OpenStore>,
    emitter: EventEmitter,
}

impl Default for Datastore {
    fn default() -> Self {
        Datastore::new()
    }
}

impl fmt::Debug for Datastore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Datastore");
        match &self.inner {
            Some(inner) => s
                .field("path", &inner.path)
                .field("parts", &inner.parts.len())
                .field("projects", &inner.projects.len())
                .finish(),
            None => s.field("open", &false).finish(),
        }
    }
}

impl Datastore {
    /// A closed handle; call [`Datastore::open`] to load a dataset.
    /// Listeners registered on the handle survive close and reopen.
    pub fn new() -> Self {
        Datastore {
            inner: None,
            emitter: EventEmitter::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.as_ref().map(|inner| inner.path.as_path())
    }

    /// The history log of the open instance, if history is enabled.
    pub fn history(&self) -> Option<&HistoryLog> {
        self.inner.as_ref().and_then(|inner| inner.history.as_ref())
    }

    /// Open the dataset at `path` with default options.
    ///
    /// A missing or empty file yields empty collections. The loaded state is
    /// re-persisted immediately, normalizing the on-disk format. Any
    /// previously open instance is persisted and replaced.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        self.open_with(path, StoreOptions::default())
    }

    pub fn open_with(
        &mut self,
        path: impl AsRef<Path>,
        options: StoreOptions,
    ) -> Result<(), StoreError> {
        if self.inner.is_some() {
            self.close()?;
        }

        let path = path.as_ref().to_path_buf();
        let dataset = Dataset::load(&path)?;

        let mut parts = BTreeMap::new();
        for part in dataset.parts {
            parts.insert(part.mpn().to_string(), part);
        }
        let mut projects = BTreeMap::new();
        for project in dataset.projects {
            projects.insert(project.name().to_string(), project);
        }

        let history = if options.history {
            Some(HistoryLog::open(&path)?)
        } else {
            None
        };

        let mut inner = OpenStore {
            path,
            parts,
            projects,
            history,
            pretty: options.pretty,
        };
        inner.save()?;

        tracing::info!(
            "opened datastore at {} ({} parts, {} projects)",
            inner.path.display(),
            inner.parts.len(),
            inner.projects.len()
        );
        self.inner = Some(inner);
        Ok(())
    }

    /// Persist and release the open instance.
    pub fn close(&mut self) -> Result<(), StoreError> {
        let mut inner = match self.inner.take() {
            Some(inner) => inner,
            None => return Err(StoreError::NotOpen),
        };
        if let Err(err) = inner.save() {
            // nothing is discarded on a failed save
            self.inner = Some(inner);
            return Err(err);
        }
        tracing::info!("closed datastore at {}", inner.path.display());
        Ok(())
    }

    /// Persist parts, projects, and pending history events to disk.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.open_mut()?.save()
    }

    // ------------------------------------------------------------------
    // Parts
    // ------------------------------------------------------------------

    pub fn part(&self, mpn: &str) -> Result<Option<&Part>, StoreError> {
        Ok(self.open_ref()?.parts.get(mpn))
    }

    /// All parts in ascending MPN order.
    pub fn parts(&self) -> Result<impl Iterator<Item = &Part>, StoreError> {
        Ok(self.open_ref()?.parts.values())
    }

    pub fn part_count(&self) -> Result<usize, StoreError> {
        Ok(self.open_ref()?.parts.len())
    }

    pub fn add_part(&mut self, part: Part) -> Result<(), StoreError> {
        let inner = self.open_mut()?;
        if part.mpn().is_empty() {
            return Err(StoreError::EmptyMpn);
        }
        if inner.parts.contains_key(part.mpn()) {
            return Err(StoreError::DuplicateMpn(part.mpn().to_string()));
        }

        if let Some(history) = inner.history.as_mut() {
            history.record_insert(&part);
        }
        tracing::debug!("added part {}", part.mpn());
        inner.parts.insert(part.mpn().to_string(), part);
        self.notify(PARTS_CHANGED);
        Ok(())
    }

    /// Remove a part, returning the removed record.
    pub fn delete_part(&mut self, mpn: &str) -> Result<Part, StoreError> {
        let inner = self.open_mut()?;
        let part = match inner.parts.remove(mpn) {
            Some(part) => part,
            None => return Err(StoreError::UnknownMpn(mpn.to_string())),
        };

        if let Some(history) = inner.history.as_mut() {
            history.record_delete(&part);
        }
        tracing::debug!("deleted part {}", mpn);
        self.notify(PARTS_CHANGED);
        Ok(part)
    }

    /// Apply a single-field change to a part.
    ///
    /// `parameter` is the field name: one of the [`Parameter`] names, or
    /// [`MPN_FIELD`] to rename. Renaming re-keys the part's slot atomically
    /// and fails with [`StoreError::DuplicateMpn`] when the target key is
    /// taken, leaving the part unmodified. The pre-change snapshot is taken
    /// before mutation and both snapshots go into the history log.
    pub fn edit_part(
        &mut self,
        mpn: &str,
        parameter: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let inner = self.open_mut()?;
        if !inner.parts.contains_key(mpn) {
            return Err(StoreError::UnknownMpn(mpn.to_string()));
        }

        if parameter == MPN_FIELD {
            if value.is_empty() {
                return Err(StoreError::EmptyMpn);
            }
            if inner.parts.contains_key(value) {
                return Err(StoreError::DuplicateMpn(value.to_string()));
            }
            let mut part = match inner.parts.remove(mpn) {
                Some(part) => part,
                None => return Err(StoreError::UnknownMpn(mpn.to_string())),
            };
            let before = part.clone();
            part.set_mpn(value);
            if let Some(history) = inner.history.as_mut() {
                history.record_update(&before, &part);
            }
            tracing::debug!("renamed part {} to {}", mpn, value);
            inner.parts.insert(value.to_string(), part);
        } else {
            let field: Parameter = parameter.parse()?;
            let part = match inner.parts.get_mut(mpn) {
                Some(part) => part,
                None => return Err(StoreError::UnknownMpn(mpn.to_string())),
            };
            let before = part.clone();
            part.set(field, value);
            if let Some(history) = inner.history.as_mut() {
                history.record_update(&before, part);
            }
            tracing::debug!("edited part {} field {}", mpn, parameter);
        }

        self.notify(PARTS_CHANGED);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    pub fn project(&self, name: &str) -> Result<Option<&Project>, StoreError> {
        Ok(self.open_ref()?.projects.get(name))
    }

    /// All projects in ascending name order.
    pub fn projects(&self) -> Result<impl Iterator<Item = &Project>, StoreError> {
        Ok(self.open_ref()?.projects.values())
    }

    pub fn project_count(&self) -> Result<usize, StoreError> {
        Ok(self.open_ref()?.projects.len())
    }

    pub fn add_project(&mut self, name: &str) -> Result<(), StoreError> {
        let inner = self.open_mut()?;
        if inner.projects.contains_key(name) {
            return Err(StoreError::DuplicateProject(name.to_string()));
        }
        inner.projects.insert(name.to_string(), Project::new(name));
        tracing::debug!("added project {}", name);
        self.notify(PROJECTS_CHANGED);
        Ok(())
    }

    pub fn delete_project(&mut self, name: &str) -> Result<Project, StoreError> {
        let inner = self.open_mut()?;
        let project = match inner.projects.remove(name) {
            Some(project) => project,
            None => return Err(StoreError::UnknownProject(name.to_string())),
        };
        tracing::debug!("deleted project {}", name);
        self.notify(PROJECTS_CHANGED);
        Ok(project)
    }

    pub fn add_version(&mut self, project: &str, version: &str) -> Result<(), StoreError> {
        let inner = self.open_mut()?;
        let entry = match inner.projects.get_mut(project) {
            Some(entry) => entry,
            None => return Err(StoreError::UnknownProject(project.to_string())),
        };
        if entry.contains_version(version) {
            return Err(StoreError::DuplicateVersion {
                project: project.to_string(),
                version: version.to_string(),
            });
        }
        entry.insert_version(Version::new(version));
        tracing::debug!("added version {} to project {}", version, project);
        self.notify(PROJECTS_CHANGED);
        Ok(())
    }

    pub fn delete_version(
        &mut self,
        project: &str,
        version: &str,
    ) -> Result<Version, StoreError> {
        let inner = self.open_mut()?;
        let entry = match inner.projects.get_mut(project) {
            Some(entry) => entry,
            None => return Err(StoreError::UnknownProject(project.to_string())),
        };
        let removed = match entry.remove_version(version) {
            Some(removed) => removed,
            None => {
                return Err(StoreError::UnknownVersion {
                    project: project.to_string(),
                    version: version.to_string(),
                })
            }
        };
        tracing::debug!("deleted version {} of project {}", version, project);
        self.notify(PROJECTS_CHANGED);
        Ok(removed)
    }

    pub fn add_material(
        &mut self,
        project: &str,
        version: &str,
        material: Material,
    ) -> Result<(), StoreError> {
        let inner = self.open_mut()?;
        let entry = Self::version_mut(&mut inner.projects, project, version)?;
        entry.push_material(material);
        self.notify(PROJECTS_CHANGED);
        Ok(())
    }

    pub fn remove_material(
        &mut self,
        project: &str,
        version: &str,
        index: usize,
    ) -> Result<Material, StoreError> {
        let inner = self.open_mut()?;
        let entry = Self::version_mut(&mut inner.projects, project, version)?;
        let removed = match entry.remove_material(index) {
            Some(removed) => removed,
            None => {
                return Err(StoreError::MaterialOutOfRange {
                    version: version.to_string(),
                    index,
                })
            }
        };
        self.notify(PROJECTS_CHANGED);
        Ok(removed)
    }

    /// Look up the part a material references. `Ok(None)` means the
    /// reference is orphaned: the part was deleted or renamed.
    pub fn resolve(&self, material: &Material) -> Result<Option<&Part>, StoreError> {
        Ok(self.open_ref()?.parts.get(&material.mpn))
    }

    // ------------------------------------------------------------------
    // Change notification
    // ------------------------------------------------------------------

    /// Register a listener for [`PARTS_CHANGED`]. The payload carries no
    /// delta; re-read the store. Returns the listener id.
    pub fn on_parts_changed<F>(&mut self, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(PARTS_CHANGED, listener)
    }

    /// Register a listener for [`PROJECTS_CHANGED`]. Same contract as
    /// [`Datastore::on_parts_changed`].
    pub fn on_projects_changed<F>(&mut self, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(PROJECTS_CHANGED, listener)
    }

    fn notify(&mut self, event: &str) {
        // The emitter runs each listener on its own thread; joining keeps
        // delivery inside the mutating call, so subscribers always observe
        // the post-mutation state before the operation returns.
        for handle in self.emitter.emit(event, String::new()) {
            if handle.join().is_err() {
                tracing::warn!("listener for {} panicked", event);
            }
        }
    }

    fn version_mut<'a>(
        projects: &'a mut BTreeMap<String, Project>,
        project: &str,
        version: &str,
    ) -> Result<&'a mut Version, StoreError> {
        let entry = match projects.get_mut(project) {
            Some(entry) => entry,
            None => return Err(StoreError::UnknownProject(project.to_string())),
        };
        match entry.version_mut(version) {
            Some(entry) => Ok(entry),
            None => Err(StoreError::UnknownVersion {
                project: project.to_string(),
                version: version.to_string(),
            }),
        }
    }

    fn open_ref(&self) -> Result<&OpenStore, StoreError> {
        self.inner.as_ref().ok_or(StoreError::NotOpen)
    }

    fn open_mut(&mut self) -> Result<&mut OpenStore, StoreError> {
        self.inner.as_mut().ok_or(StoreError::NotOpen)
    }
}
