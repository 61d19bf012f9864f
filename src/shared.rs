use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::store::Datastore;

/// Thread-safe wrapper for hosts that call the store from more than one
/// thread.
///
/// The store itself has no internal locking, so a multi-threaded host must
/// put every operation inside one mutual-exclusion scope covering both the
/// in-memory maps and the backing-file writes. `SharedDatastore` is that
/// scope: [`SharedDatastore::with`] holds the single mutex for the whole
/// closure, so a save can never interleave with a mutation.
#[derive(Clone)]
pub struct SharedDatastore {
    inner: Arc<Mutex<Datastore>>,
}

impl SharedDatastore {
    pub fn new(store: Datastore) -> Self {
        SharedDatastore {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the store.
    pub fn with<T>(&self, f: impl FnOnce(&mut Datastore) -> T) -> Result<T, StoreError> {
        let mut store = self
            .inner
            .lock()
            .map_err(|_| StoreError::LockPoisoned("datastore"))?;
        Ok(f(&mut store))
    }
}

impl Default for SharedDatastore {
    fn default() -> Self {
        SharedDatastore::new(Datastore::new())
    }
}
