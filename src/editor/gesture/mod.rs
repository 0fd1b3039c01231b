//! Pointer gesture state machine.
//!
//! A press arms the machine; the first drag tick after it picks one mode by
//! priority (secondary button pans, then station, area interior, area border)
//! and latches it. The mode then holds until release, which is the only place
//! it is cleared. A new press while a mode is still latched starts over, so a
//! lost release can never leave two modes alive.

mod state;


pub use state::{GestureState, PointerButton};

use bevy::prelude::*;

use crate::network::{LineId, NetworkDocument};

use super::hit_test::{self, Hit};

#[derive(Debug, Clone, Default)]
pub struct GestureMachine {
    state: GestureState,
    /// Button held since the last press
    button: Option<PointerButton>,
    /// Pointer position at the previous tick
    last_point: Option<IVec2>,
    /// Mode has been chosen for the current press
    latched: bool,
    /// At least one tick changed the document
    moved: bool,
}

impl GestureMachine {
    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn button(&self) -> Option<PointerButton> {
        self.button
    }

    pub fn press(&mut self, button: PointerButton, point: IVec2) {
        if !self.state.is_idle() {
            debug!("Press while {:?} was latched, resetting", self.state);
        }
        *self = Self {
            button: Some(button),
            last_point: Some(point),
            ..Default::default()
        };
    }

    fn select_mode(&self, doc: &NetworkDocument, button: PointerButton, point: IVec2) -> GestureState {
        if button == PointerButton::Secondary {
            return GestureState::Panning;
        }
        match hit_test::hit_at(doc, point) {
            Some(Hit::Station(id)) => GestureState::DraggingStation(id),
            Some(Hit::Area(id)) => GestureState::DraggingArea(id),
            Some(Hit::Border(id, side)) => GestureState::Extending(id, side),
            None => GestureState::Idle,
        }
    }

    /// Pointer moved to `point` with the button held. Returns true when the
    /// document changed.
    pub fn drag(&mut self, doc: &mut NetworkDocument, point: IVec2) -> bool {
        let (Some(button), Some(last)) = (self.button, self.last_point) else {
            return false;
        };

        if !self.latched {
            self.state = self.select_mode(doc, button, last);
            self.latched = true;
            if !self.state.is_idle() {
                debug!("Gesture latched: {:?}", self.state);
            }
        }

        let delta = point - last;
        if delta == IVec2::ZERO {
            return false;
        }

        let changed = match self.state {
            GestureState::Idle => false,
            GestureState::Panning => {
                doc.pan_all(delta);
                true
            }
            GestureState::DraggingStation(id) => doc
                .move_station(id, delta)
                .is_some_and(|applied| applied != IVec2::ZERO),
            GestureState::DraggingArea(id) => doc
                .move_area(id, delta)
                .is_some_and(|applied| applied != IVec2::ZERO),
            GestureState::Extending(id, side) => match doc.extend_area(id, side, delta) {
                Ok(applied) => applied != IVec2::ZERO,
                Err(err) => {
                    // Keep the anchor so the edge catches up with the pointer
                    debug!("Rejected resize tick: {}", err);
                    return false;
                }
            },
        };
        self.last_point = Some(point);
        self.moved |= changed;
        changed
    }

    /// Button released. Clears every remembered reference and returns true
    /// when the gesture changed the document.
    pub fn release(&mut self, doc: &mut NetworkDocument) -> bool {
        let committed = self.moved;
        if committed {
            if matches!(
                self.state,
                GestureState::DraggingStation(_)
                    | GestureState::DraggingArea(_)
                    | GestureState::Extending(..)
            ) {
                doc.refresh_station_areas();
            }
            debug!("Gesture committed: {:?}", self.state);
        }
        *self = Self::default();
        committed
    }

    /// Single secondary click: take the station under the pointer off its
    /// owning line.
    pub fn secondary_click(
        &mut self,
        doc: &mut NetworkDocument,
        point: IVec2,
    ) -> Option<(LineId, usize)> {
        let station = hit_test::station_at(doc, point)?;
        doc.remove_from_owning_line(station)
    }

    /// Wheel zoom around the cursor. Returns true when the zoom level changed.
    pub fn wheel(&mut self, doc: &mut NetworkDocument, steps: i32, point: IVec2) -> bool {
        if steps == 0 {
            return false;
        }
        doc.zoom_by(steps, point)
    }
}
