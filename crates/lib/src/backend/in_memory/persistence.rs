//! Persistence operations for the InMemory engine
//!
//! This module handles serialization and file I/O for saving/loading
//! the in-memory store to/from JSON files.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Deserializer, Serialize};

use super::{InMemory, Record, State};
use crate::{Error, Result, backend::errors::BackendError};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// Serializable form of the store.
///
/// Nodes are written as a list in id order; restore points are never
/// persisted.
#[derive(Serialize, Deserialize)]
struct SerializableStore {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    #[serde(default)]
    scope_attributes: Vec<String>,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    nodes: Vec<Record>,
}

impl From<&State> for SerializableStore {
    fn from(state: &State) -> Self {
        Self {
            version: PERSISTENCE_VERSION,
            scope_attributes: state.scope_attributes.clone(),
            next_id: state.next_id,
            nodes: state.records.values().cloned().collect(),
        }
    }
}

impl From<SerializableStore> for State {
    fn from(store: SerializableStore) -> Self {
        let records: BTreeMap<_, _> = store
            .nodes
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        // Never hand out an id that is already taken, whatever the file says.
        let next_id = records
            .keys()
            .next_back()
            .map_or(1, |id| id.get() + 1)
            .max(store.next_id);
        State {
            records,
            next_id,
            scope_attributes: store.scope_attributes,
        }
    }
}

/// Saves the entire store to a specified file as JSON.
pub(crate) fn save_to_file<P: AsRef<Path>>(backend: &InMemory, path: P) -> Result<()> {
    let serializable = SerializableStore::from(&*backend.read());
    let json = serde_json::to_string_pretty(&serializable)
        .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })?;
    std::fs::write(path, json).map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })
}

/// Loads the store from a specified JSON file.
///
/// If the file does not exist, a new, empty `InMemory` store is returned.
pub(crate) fn load_from_file<P: AsRef<Path>>(path: P) -> Result<InMemory> {
    match std::fs::read_to_string(path) {
        Ok(json) => {
            let store: SerializableStore = serde_json::from_str(&json).map_err(|e| -> Error {
                BackendError::DeserializationFailed { source: e }.into()
            })?;
            Ok(InMemory::from_state(store.into()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(InMemory::new()),
        Err(e) => Err(BackendError::FileIo { source: e }.into()),
    }
}
