//! Resource types for map persistence state tracking.

use bevy::prelude::*;
use bevy::tasks::Task;
use std::path::PathBuf;

use super::results::{LoadResult, SaveResult};

#[derive(Resource, Default)]
pub struct MapLoadError {
    pub message: Option<String>,
}

/// Resource tracking save operation errors for display to user.
#[derive(Resource, Default)]
pub struct MapSaveError {
    pub message: Option<String>,
}

/// Resource tracking async map I/O operations for modal dialog
#[derive(Resource, Default)]
pub struct AsyncMapOperation {
    /// Whether a save operation is in progress
    pub is_saving: bool,
    /// Whether a load operation is in progress
    pub is_loading: bool,
    /// Description of the current operation
    pub operation_description: Option<String>,
}

impl AsyncMapOperation {
    pub fn is_busy(&self) -> bool {
        self.is_saving || self.is_loading
    }

    pub(super) fn finish(&mut self) {
        self.is_saving = false;
        self.is_loading = false;
        self.operation_description = None;
    }
}

/// Component for save task
#[derive(Component)]
pub struct SaveMapTask(pub Task<SaveResult>);

/// Component for load task
#[derive(Component)]
pub struct LoadMapTask(pub Task<LoadResult>);

/// Resource tracking the currently loaded map file path
#[derive(Resource, Default)]
pub struct CurrentMapFile {
    pub path: Option<PathBuf>,
}

impl CurrentMapFile {
    /// File name shown in the title bar
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }
}

/// Resource tracking if the current map has unsaved changes
#[derive(Resource, Default)]
pub struct MapDirtyState {
    pub is_dirty: bool,
}

impl MapDirtyState {
    pub fn mark(&mut self) {
        self.is_dirty = true;
    }

    pub fn clear(&mut self) {
        self.is_dirty = false;
    }
}

/// File name used in progress messages
pub(super) fn map_name(path: &std::path::Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("map")
        .to_string()
}
