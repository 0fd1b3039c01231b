use bevy::window::{CursorIcon, SystemCursorIcon};

use crate::common::BorderSide;
use crate::network::{AreaId, StationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// The one drag mode currently latched. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Shift the whole network with the map
    Panning,
    DraggingStation(StationId),
    DraggingArea(AreaId),
    /// Move one edge of an area, the opposite edge stays put
    Extending(AreaId, BorderSide),
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Cursor shown while this mode is latched.
    pub fn cursor_icon(&self) -> Option<CursorIcon> {
        match self {
            GestureState::Idle => None,
            GestureState::Panning => Some(CursorIcon::System(SystemCursorIcon::Grabbing)),
            GestureState::DraggingStation(_) | GestureState::DraggingArea(_) => {
                Some(CursorIcon::System(SystemCursorIcon::Move))
            }
            GestureState::Extending(_, side) => Some(side.cursor_icon()),
        }
    }

    pub fn station(&self) -> Option<StationId> {
        match self {
            GestureState::DraggingStation(id) => Some(*id),
            _ => None,
        }
    }

    pub fn area(&self) -> Option<AreaId> {
        match self {
            GestureState::DraggingArea(id) | GestureState::Extending(id, _) => Some(*id),
            _ => None,
        }
    }
}
