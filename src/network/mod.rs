//! The spatial model: stations, lines, areas and the events attached to them.
//!
//! Everything lives in one [`NetworkDocument`] resource. Mutations go through
//! its API, which keeps pixel and geo positions consistent through the
//! current [`Viewport`](crate::geo::Viewport).

mod area;
mod distribution;
mod document;
mod ids;
mod line;
mod names;
pub mod persistence;
mod station;

#[cfg(test)]
mod tests;

pub use area::{Area, AreaRect};
pub use distribution::{Category, DestinationCategory, Distribution, PopulationCategory};
pub use document::NetworkDocument;
pub use ids::{AreaId, EventId, LineId, StationId};
pub use line::{line_name, Line};
pub use names::NamePool;
pub use persistence::{
    export_map, import_map, AsyncMapOperation, CurrentMapFile, LoadMapRequest, MapDirtyState,
    MapIoError, MapLoadError, MapSaveError, NewMapRequest, SaveMapRequest,
};
pub use station::Station;

use bevy::prelude::*;
use thiserror::Error;

use crate::config::ConfigLoaded;
use crate::events::EventError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("no station names left")]
    NamePoolExhausted,
    #[error("unknown {0}")]
    UnknownStation(StationId),
    #[error("unknown {0}")]
    UnknownLine(LineId),
    #[error("unknown {0}")]
    UnknownArea(AreaId),
    #[error("area of {width}x{height} pixels is too small")]
    AreaTooSmall { width: i32, height: i32 },
    #[error("{kind} id {id} is already taken")]
    DuplicateId { kind: &'static str, id: u32 },
    #[error("{kind} id {id} leaves no room for new ids")]
    IdOutOfRange { kind: &'static str, id: u32 },
    #[error(transparent)]
    InvalidEvent(#[from] EventError),
}

pub struct NetworkPlugin;

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NetworkDocument>()
            .init_resource::<MapLoadError>()
            .init_resource::<MapSaveError>()
            .init_resource::<CurrentMapFile>()
            .init_resource::<MapDirtyState>()
            .init_resource::<AsyncMapOperation>()
            .add_message::<SaveMapRequest>()
            .add_message::<LoadMapRequest>()
            .add_message::<NewMapRequest>()
            .add_systems(
                Startup,
                (
                    persistence::ensure_maps_directory,
                    persistence::apply_config_viewport.after(ConfigLoaded),
                ),
            )
            .add_systems(
                Update,
                (
                    persistence::save_map_system.run_if(on_message::<SaveMapRequest>),
                    persistence::load_map_system.run_if(on_message::<LoadMapRequest>),
                    persistence::new_map_system.run_if(on_message::<NewMapRequest>),
                    persistence::poll_save_tasks,
                    persistence::poll_load_tasks,
                ),
            );
    }
}
