//! Startup helpers for map persistence.

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::network::NetworkDocument;
use crate::paths;

/// Creates the maps directory offered by the file dialogs
pub fn ensure_maps_directory() {
    let maps_dir = paths::maps_dir();
    if !maps_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(&maps_dir) {
            warn!("Failed to create maps directory: {}", e);
        } else {
            info!("Created maps directory at {:?}", maps_dir);
        }
    }
}

/// Centers the initial empty document on the configured default location
pub fn apply_config_viewport(config: Res<AppConfig>, mut doc: ResMut<NetworkDocument>) {
    let viewport = config
        .data
        .default_viewport(doc.viewport.width, doc.viewport.height);
    doc.viewport = viewport;
    doc.resync();
    debug!(
        "Default view at {:.4}, {:.4} zoom {}",
        viewport.center.latitude, viewport.center.longitude, viewport.zoom
    );
}
