//! Map persistence: the XML map format and the async save/load systems.
//!
//! ## Module Structure
//!
//! - [`xml`] - Serializer for the map format
//! - [`import`] - Parser for the map format
//! - [`messages`] - Message types for map operations
//! - [`resources`] - Resource types for state tracking
//! - [`results`] - Result types for async operations
//! - [`helpers`] - Startup helpers (maps directory, default viewport)
//! - [`save`] - Save system and task polling
//! - [`load`] - Load system and task polling
//! - [`map_state`] - New map system

mod helpers;
mod import;
mod load;
mod map_state;
mod messages;
mod resources;
mod results;
mod save;
mod xml;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use thiserror::Error;

use crate::events::EventError;

use super::NetworkError;

// Re-exports - Format
pub use import::import_map;
pub use xml::export_map;

// Re-exports - Messages
pub use messages::{LoadMapRequest, NewMapRequest, SaveMapRequest};

// Re-exports - Resources
pub use resources::{AsyncMapOperation, CurrentMapFile, MapDirtyState, MapLoadError, MapSaveError};

// Re-exports - Systems
pub use helpers::{apply_config_viewport, ensure_maps_directory};
pub use load::{load_map_system, poll_load_tasks};
pub use map_state::new_map_system;
pub use save::{poll_save_tasks, save_map_system};

/// Byte offset into the map file, for error messages
pub type ByteOffset = usize;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapIoError {
    #[error("failed to read {path:?}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("failed to write {path:?}: {message}")]
    Write { path: PathBuf, message: String },
    #[error("malformed XML: {0}")]
    Xml(String),
    #[error("missing <{element}> at byte {offset}")]
    ElementMissing {
        element: &'static str,
        offset: ByteOffset,
    },
    #[error("missing attribute '{attribute}' at byte {offset}")]
    AttributeMissing {
        attribute: &'static str,
        offset: ByteOffset,
    },
    #[error("invalid value '{value}' for {field} at byte {offset}")]
    InvalidValue {
        field: &'static str,
        value: String,
        offset: ByteOffset,
    },
    #[error("unexpected <{0}> at byte {1}")]
    UnexpectedElement(String, ByteOffset),
    #[error("{kind} {id} referenced at byte {offset} does not exist")]
    UnknownReference {
        kind: &'static str,
        id: u32,
        offset: ByteOffset,
    },
    #[error("duplicate {kind} id {id} at byte {offset}")]
    DuplicateId {
        kind: &'static str,
        id: u32,
        offset: ByteOffset,
    },
    #[error("invalid id at byte {offset}: {source}")]
    InvalidId {
        offset: ByteOffset,
        source: NetworkError,
    },
    #[error("invalid area at byte {offset}: {source}")]
    InvalidArea {
        offset: ByteOffset,
        source: NetworkError,
    },
    #[error("invalid event at byte {offset}: {source}")]
    InvalidEvent {
        offset: ByteOffset,
        source: EventError,
    },
    #[error("no simulator configured")]
    SimulatorNotConfigured,
    #[error("failed to start simulator {path:?}: {message}")]
    SpawnFailed { path: PathBuf, message: String },
}
