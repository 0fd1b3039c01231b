//! Result types for async map operations.

use std::path::PathBuf;

use crate::network::NetworkDocument;

use super::MapIoError;

/// Result of an async save operation
pub struct SaveResult {
    pub path: PathBuf,
    pub outcome: Result<(), MapIoError>,
}

/// Result of an async load operation
pub struct LoadResult {
    pub path: PathBuf,
    pub document: Result<NetworkDocument, MapIoError>,
}
