use std::{future::Future, io::ErrorKind, path::PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use super::{entities::TrackedStore, error::TrackerError};

/// Interface for abstracting the persisted [TrackedStore].
/// Every operation works on the whole document: it is loaded completely and written back
/// completely.
pub trait TrackedStoreAccess {
    /// Loads the store. A missing file is an error.
    fn load(&self) -> impl Future<Output = Result<TrackedStore, TrackerError>>;

    /// Loads the store, treating a missing file as an empty store. A corrupt file is still an
    /// error so that it never gets overwritten.
    fn load_or_default(&self) -> impl Future<Output = Result<TrackedStore, TrackerError>>;

    /// Overwrites the persisted store with `store`.
    fn save(&self, store: &TrackedStore) -> impl Future<Output = Result<(), TrackerError>>;
}

/// The main realization of [TrackedStoreAccess]: a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read_inner(&self) -> Result<Option<TrackedStore>, TrackerError> {
        debug!("Reading store {:?}", self.path);
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice::<TrackedStore>(&bytes)
            .map(Some)
            .map_err(|source| TrackerError::StoreCorrupt {
                path: self.path.clone(),
                source,
            })
    }
}

impl TrackedStoreAccess for JsonFileStore {
    async fn load(&self) -> Result<TrackedStore, TrackerError> {
        self.read_inner()
            .await?
            .ok_or_else(|| TrackerError::StoreMissing(self.path.clone()))
    }

    async fn load_or_default(&self) -> Result<TrackedStore, TrackerError> {
        Ok(self.read_inner().await?.unwrap_or_default())
    }

    async fn save(&self, store: &TrackedStore) -> Result<(), TrackerError> {
        let buffer = to_indented_json(store)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, buffer).await?;
        debug!("Wrote {} months into {:?}", store.len(), self.path);
        Ok(())
    }
}

/// Store files are indented with 4 spaces so that they stay comfortable to edit by hand.
fn to_indented_json(store: &TrackedStore) -> Result<Vec<u8>, TrackerError> {
    let mut buffer = Vec::<u8>::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    store
        .serialize(&mut serializer)
        .map_err(TrackerError::Serialize)?;
    Ok(buffer)
}
