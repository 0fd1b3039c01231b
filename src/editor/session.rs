//! Per-document editing state that outlives a single gesture.

use bevy::prelude::*;

use crate::events::{EventDraft, PendingSelection};
use crate::network::{EventId, NetworkDocument, StationId};

use super::gesture::GestureMachine;
use super::hit_test;
use super::merge::{MergeError, MergeOutcome, MergeProtocol, MergeState};

/// What a double-click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleClick {
    /// Station stored in the event draft field that was pending
    Recorded(PendingSelection, StationId),
    /// Merge source captured, the confirmation prompt should open
    MergePrompt(StationId),
    Merged(MergeOutcome),
    /// Background double-click; false when already at the zoom limit
    Zoomed(bool),
    /// Ignored while a merge prompt is open
    Ignored,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct EditorSession {
    pub gesture: GestureMachine,
    pub merge: MergeProtocol,
    pub pending: PendingSelection,
    pub draft: EventDraft,
    /// Event whose station range is highlighted
    pub selected_event: Option<EventId>,
}

impl EditorSession {
    pub fn double_click(
        &mut self,
        doc: &mut NetworkDocument,
        point: IVec2,
    ) -> Result<DoubleClick, MergeError> {
        let Some(station) = hit_test::station_at(doc, point) else {
            return Ok(DoubleClick::Zoomed(doc.zoom_in_at(point)));
        };

        if self.pending != PendingSelection::None {
            let pending = std::mem::take(&mut self.pending);
            self.draft.record_station(pending, station);
            debug!("Recorded {} as {:?}", station, pending);
            return Ok(DoubleClick::Recorded(pending, station));
        }

        match self.merge.state() {
            MergeState::Idle => {
                self.merge.begin(doc, station)?;
                Ok(DoubleClick::MergePrompt(station))
            }
            MergeState::AwaitingConfirmation { .. } => Ok(DoubleClick::Ignored),
            MergeState::AwaitingTarget { .. } => {
                self.merge.complete(doc, station).map(DoubleClick::Merged)
            }
        }
    }

    /// Stations to draw in the highlight color: those between the start and
    /// end station of the selected event, or of the draft being edited. A
    /// selected event without a range highlights the stations it names.
    pub fn highlighted_stations(&self, doc: &NetworkDocument) -> Vec<StationId> {
        let selected = self.selected_event.and_then(|id| doc.event(id));
        if let Some(event) = selected
            && event.kind().station_range().is_none()
        {
            return doc
                .stations()
                .iter()
                .filter(|s| event.refers_to(s.id))
                .map(|s| s.id)
                .collect();
        }

        let range = selected
            .and_then(|event| event.kind().station_range())
            .or_else(|| self.draft.station_start.zip(self.draft.station_end));
        match range {
            Some((start, end)) => doc.stations_between(start, end),
            None => Vec::new(),
        }
    }
}
