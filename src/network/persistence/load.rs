//! Map load system and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::config::{AppConfig, UpdateLastMapPathRequest};
use crate::editor::{EditorSession, LineBuilder};
use crate::network::NetworkDocument;

use super::messages::LoadMapRequest;
use super::resources::{map_name, AsyncMapOperation, CurrentMapFile, LoadMapTask, MapDirtyState, MapLoadError};
use super::results::LoadResult;
use super::{import_map, MapIoError};

/// Starts an async load operation (file I/O and parsing)
pub fn load_map_system(
    mut commands: Commands,
    mut events: MessageReader<LoadMapRequest>,
    doc: Res<NetworkDocument>,
    config: Res<AppConfig>,
    mut async_op: ResMut<AsyncMapOperation>,
) {
    for event in events.read() {
        // Don't start a new load if one is already in progress
        if async_op.is_busy() {
            warn!("Load operation already in progress");
            continue;
        }

        let path = event.path.clone();
        let fallback = config
            .data
            .default_viewport(doc.viewport.width, doc.viewport.height);

        async_op.is_loading = true;
        async_op.operation_description = Some(format!("Loading {}...", map_name(&path)));

        let task_pool = IoTaskPool::get();
        let task = task_pool.spawn(async move {
            let document = std::fs::read_to_string(&path)
                .map_err(|e| MapIoError::Read {
                    path: path.clone(),
                    message: e.to_string(),
                })
                .and_then(|text| import_map(&text, &fallback));
            LoadResult { path, document }
        });

        commands.spawn(LoadMapTask(task));
    }
}

/// Polls load tasks and swaps in the loaded document
#[allow(clippy::too_many_arguments)]
pub fn poll_load_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut LoadMapTask)>,
    mut async_op: ResMut<AsyncMapOperation>,
    mut doc: ResMut<NetworkDocument>,
    mut session: ResMut<EditorSession>,
    mut builder: ResMut<LineBuilder>,
    mut current_map_file: ResMut<CurrentMapFile>,
    mut config_events: MessageWriter<UpdateLastMapPathRequest>,
    mut dirty_state: ResMut<MapDirtyState>,
    mut load_error: ResMut<MapLoadError>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut task.0)) {
            async_op.finish();

            match result.document {
                Ok(mut loaded) => {
                    // Keep the window size; stored geo positions re-derive the pixels
                    loaded.resize_viewport(doc.viewport.width, doc.viewport.height);
                    loaded.refresh_station_areas();
                    info!(
                        "Loaded {:?}: {} stations, {} lines, {} areas, {} events",
                        result.path,
                        loaded.stations().len(),
                        loaded.lines().len(),
                        loaded.areas().len(),
                        loaded.events().len()
                    );
                    *doc = loaded;
                    *session = EditorSession::default();
                    builder.active = None;
                    load_error.message = None;
                    current_map_file.path = Some(result.path.clone());
                    config_events.write(UpdateLastMapPathRequest { path: result.path });
                    dirty_state.clear();
                }
                Err(e) => {
                    error!("Failed to load map: {}", e);
                    load_error.message = Some(e.to_string());
                }
            }

            commands.entity(entity).despawn();
        }
    }
}
