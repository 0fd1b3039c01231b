//! New map system.

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::editor::{EditorSession, LineBuilder};
use crate::network::NetworkDocument;

use super::messages::NewMapRequest;
use super::resources::{CurrentMapFile, MapDirtyState};

/// Replaces the open document with an empty one at the configured default view
pub fn new_map_system(
    mut events: MessageReader<NewMapRequest>,
    config: Res<AppConfig>,
    mut doc: ResMut<NetworkDocument>,
    mut session: ResMut<EditorSession>,
    mut builder: ResMut<LineBuilder>,
    mut current_map_file: ResMut<CurrentMapFile>,
    mut dirty_state: ResMut<MapDirtyState>,
) {
    // Several requests in one frame still produce one fresh map
    if events.read().count() == 0 {
        return;
    }

    let viewport = config
        .data
        .default_viewport(doc.viewport.width, doc.viewport.height);
    *doc = NetworkDocument::new(viewport);
    *session = EditorSession::default();
    builder.active = None;
    current_map_file.path = None;
    dirty_state.clear();
    info!("Started a new map");
}
