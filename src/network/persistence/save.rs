//! Map save system and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::config::UpdateLastMapPathRequest;
use crate::network::NetworkDocument;

use super::messages::SaveMapRequest;
use super::resources::{map_name, AsyncMapOperation, CurrentMapFile, MapDirtyState, MapSaveError, SaveMapTask};
use super::results::SaveResult;
use super::{export_map, MapIoError};

/// Starts an async save operation
pub fn save_map_system(
    mut commands: Commands,
    mut events: MessageReader<SaveMapRequest>,
    doc: Res<NetworkDocument>,
    mut async_op: ResMut<AsyncMapOperation>,
) {
    for event in events.read() {
        // Don't start a new save if one is already in progress
        if async_op.is_busy() {
            warn!("Save operation already in progress");
            continue;
        }

        // Snapshot on the main thread; the task only touches the file
        let xml = export_map(&doc);
        let path = event.path.clone();

        async_op.is_saving = true;
        async_op.operation_description = Some(format!("Saving {}...", map_name(&path)));

        let task_pool = IoTaskPool::get();
        let task = task_pool.spawn(async move {
            let outcome = std::fs::write(&path, xml).map_err(|e| MapIoError::Write {
                path: path.clone(),
                message: e.to_string(),
            });
            SaveResult { path, outcome }
        });

        commands.spawn(SaveMapTask(task));
    }
}

/// Polls save tasks and handles completion
pub fn poll_save_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut SaveMapTask)>,
    mut async_op: ResMut<AsyncMapOperation>,
    mut current_map_file: ResMut<CurrentMapFile>,
    mut config_events: MessageWriter<UpdateLastMapPathRequest>,
    mut dirty_state: ResMut<MapDirtyState>,
    mut save_error: ResMut<MapSaveError>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut task.0)) {
            async_op.finish();

            match result.outcome {
                Ok(()) => {
                    info!("Map saved to {:?}", result.path);
                    save_error.message = None;
                    current_map_file.path = Some(result.path.clone());
                    config_events.write(UpdateLastMapPathRequest { path: result.path });
                    dirty_state.clear();
                }
                Err(e) => {
                    error!("{}", e);
                    save_error.message = Some(e.to_string());
                }
            }

            commands.entity(entity).despawn();
        }
    }
}
