//! Message types for map persistence operations.

use bevy::prelude::*;
use std::path::PathBuf;

/// Message to save the current map to a file
#[derive(Message)]
pub struct SaveMapRequest {
    pub path: PathBuf,
}

/// Message to load a map from a file
#[derive(Message)]
pub struct LoadMapRequest {
    pub path: PathBuf,
}

/// Message to discard the current map and start an empty one
#[derive(Message)]
pub struct NewMapRequest;
