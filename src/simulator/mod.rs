//! Hands the current network to the external simulator.
//!
//! The map is exported to a fixed file and the configured executable is
//! started with that file as its only argument. The process is not waited on.

use bevy::prelude::*;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::network::{export_map, MapIoError, NetworkDocument};
use crate::paths;

/// Message to export the map and start the simulator
#[derive(Message)]
pub struct RunSimulationRequest;

/// Resource tracking simulator launch errors for display to user
#[derive(Resource, Default)]
pub struct SimulatorError {
    pub message: Option<String>,
}

/// Write the map file the simulator reads.
pub fn export_for_simulation(doc: &NetworkDocument, path: &Path) -> Result<(), MapIoError> {
    let write_error = |e: std::io::Error| MapIoError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, export_map(doc)).map_err(write_error)
}

/// Export `doc` to `export_path` and start `simulator` on it. Returns the
/// process id.
pub fn launch(
    doc: &NetworkDocument,
    simulator: Option<&Path>,
    export_path: &Path,
) -> Result<u32, MapIoError> {
    let simulator = simulator.ok_or(MapIoError::SimulatorNotConfigured)?;
    export_for_simulation(doc, export_path)?;

    let child = std::process::Command::new(simulator)
        .arg(export_path)
        .spawn()
        .map_err(|e| MapIoError::SpawnFailed {
            path: simulator.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(child.id())
}

fn run_simulation_system(
    mut events: MessageReader<RunSimulationRequest>,
    doc: Res<NetworkDocument>,
    config: Res<AppConfig>,
    mut sim_error: ResMut<SimulatorError>,
) {
    // Repeated presses in one frame launch once
    if events.read().count() == 0 {
        return;
    }

    let export_path: PathBuf = paths::simulation_export_file();
    match launch(&doc, config.data.simulator_path.as_deref(), &export_path) {
        Ok(pid) => {
            info!("Simulator started (pid {}) on {:?}", pid, export_path);
            sim_error.message = None;
        }
        Err(e) => {
            error!("Simulation not started: {}", e);
            sim_error.message = Some(e.to_string());
        }
    }
}

pub struct SimulatorPlugin;

impl Plugin for SimulatorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulatorError>()
            .add_message::<RunSimulationRequest>()
            .add_systems(
                Update,
                run_simulation_system.run_if(on_message::<RunSimulationRequest>),
            );
    }
}
