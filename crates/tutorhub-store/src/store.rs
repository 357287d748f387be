//! Store handle and generic table plumbing.
//!
//! [`Store`] owns a [`StorageBackend`] and is passed by reference to the
//! role portals — there is no ambient global state. Every operation is a
//! complete, synchronous read-modify-write cycle: load the whole table,
//! apply the change, write the whole table back.

use std::path::Path;

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::codec;
use crate::error::{Result, StoreError};
use crate::storage::{FileStorage, MemoryStorage, StorageBackend};

/// Ties an entity type to its table key and identity.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Storage key of the table holding this entity kind.
    const TABLE: &'static str;

    /// Stable unique id of this record.
    fn id(&self) -> Uuid;
}

/// Handle to the embedded data store.
pub struct Store {
    backend: Box<dyn StorageBackend>,
}

impl Store {
    /// Open (or create) the default application store.
    ///
    /// Table files are placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/tutorhub/`
    /// - macOS:   `~/Library/Application Support/com.tutorhub.tutorhub/`
    /// - Windows: `{FOLDERID_RoamingAppData}\tutorhub\tutorhub\data\`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "tutorhub", "tutorhub").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        tracing::info!(path = %data_dir.display(), "opening store");

        Self::open_at(data_dir)
    }

    /// Open (or create) a store rooted at an explicit directory.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        Ok(Self {
            backend: Box::new(FileStorage::new(path)?),
        })
    }

    /// A store that lives entirely in memory. Nothing survives the handle.
    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(MemoryStorage::new()),
        }
    }

    /// Build a store on top of a caller-supplied backend.
    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    // ------------------------------------------------------------------
    // Generic table operations
    // ------------------------------------------------------------------

    /// Read a whole table. Missing or unreadable payloads come back empty.
    pub(crate) fn load<T: Record>(&self) -> Vec<T> {
        codec::decode(T::TABLE, self.backend.get(T::TABLE).as_deref())
    }

    /// Serialize and overwrite a whole table.
    pub(crate) fn save<T: Record>(&self, rows: &[T]) -> Result<()> {
        let payload = codec::encode(rows)?;
        self.backend.set(T::TABLE, &payload)?;
        tracing::debug!(table = T::TABLE, rows = rows.len(), "table saved");
        Ok(())
    }

    /// Append a record and persist the table.
    pub(crate) fn insert<T: Record>(&self, row: T) -> Result<T> {
        let mut rows = self.load::<T>();
        rows.push(row.clone());
        self.save(&rows)?;
        Ok(row)
    }

    /// Linear-scan lookup by id.
    pub(crate) fn find<T: Record>(&self, id: Uuid) -> Option<T> {
        self.load::<T>().into_iter().find(|row| row.id() == id)
    }

    /// Apply an in-place mutation to the record with the given id.
    ///
    /// Returns the updated record, or `None` when no record matched —
    /// absence is a checked outcome, not an error.
    pub(crate) fn modify<T: Record>(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut T),
    ) -> Result<Option<T>> {
        let mut rows = self.load::<T>();
        let Some(row) = rows.iter_mut().find(|row| row.id() == id) else {
            return Ok(None);
        };
        apply(row);
        let updated = row.clone();
        self.save(&rows)?;
        Ok(Some(updated))
    }

    /// Hard-remove the record with the given id. Returns whether a record
    /// was actually removed.
    pub(crate) fn remove<T: Record>(&self, id: Uuid) -> Result<bool> {
        let mut rows = self.load::<T>();
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        if rows.len() == before {
            return Ok(false);
        }
        self.save(&rows)?;
        Ok(true)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
