//! Two-step station merge.
//!
//! A double-click on station A captures it together with its owning line and
//! asks for confirmation. Once confirmed, the next double-click on station B
//! replaces B with A inside B's owning line, at B's index. B stays in the
//! registry and in any other line it belongs to.

use bevy::prelude::*;
use thiserror::Error;

use crate::network::{LineId, NetworkDocument, StationId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("cannot merge {0} with itself")]
    SameStation(StationId),
    #[error("{0} is not on any line")]
    StationNotOnLine(StationId),
    #[error("no merge in progress")]
    NotAwaitingTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeState {
    #[default]
    Idle,
    /// Source captured, waiting for the user to confirm
    AwaitingConfirmation { source: StationId, line: LineId },
    /// Confirmed, waiting for the target double-click
    AwaitingTarget { source: StationId, line: LineId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub source: StationId,
    pub target: StationId,
    pub line: LineId,
    pub index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MergeProtocol {
    state: MergeState,
}

impl MergeProtocol {
    pub fn state(&self) -> MergeState {
        self.state
    }

    pub fn in_progress(&self) -> bool {
        self.state != MergeState::Idle
    }

    /// Station picked as the merge source, while a merge is underway.
    pub fn source(&self) -> Option<StationId> {
        match self.state {
            MergeState::Idle => None,
            MergeState::AwaitingConfirmation { source, .. }
            | MergeState::AwaitingTarget { source, .. } => Some(source),
        }
    }

    /// Capture `source` and its owning line. A station on no line cannot
    /// start a merge.
    pub fn begin(&mut self, doc: &NetworkDocument, source: StationId) -> Result<(), MergeError> {
        let line = doc
            .owning_line(source)
            .ok_or(MergeError::StationNotOnLine(source))?;
        self.state = MergeState::AwaitingConfirmation { source, line };
        debug!("Merge source {} on {}", source, line);
        Ok(())
    }

    /// Accept the prompt. Returns false if nothing was waiting for it.
    pub fn confirm(&mut self) -> bool {
        match self.state {
            MergeState::AwaitingConfirmation { source, line } => {
                self.state = MergeState::AwaitingTarget { source, line };
                true
            }
            _ => false,
        }
    }

    /// Reject the prompt and forget the captured station.
    pub fn decline(&mut self) {
        if let MergeState::AwaitingConfirmation { source, .. } = self.state {
            debug!("Merge of {} declined", source);
        }
        self.state = MergeState::Idle;
    }

    /// Finish the merge on `target`. The protocol is idle afterwards whether
    /// or not it succeeded.
    pub fn complete(
        &mut self,
        doc: &mut NetworkDocument,
        target: StationId,
    ) -> Result<MergeOutcome, MergeError> {
        let MergeState::AwaitingTarget { source, .. } = std::mem::take(&mut self.state) else {
            return Err(MergeError::NotAwaitingTarget);
        };

        if source == target {
            return Err(MergeError::SameStation(target));
        }
        let line = doc
            .owning_line(target)
            .ok_or(MergeError::StationNotOnLine(target))?;
        let index = doc
            .replace_in_line(line, target, source)
            .ok_or(MergeError::StationNotOnLine(target))?;

        info!("Merged {} into {} on {} at index {}", target, source, line, index);
        Ok(MergeOutcome {
            source,
            target,
            line,
            index,
        })
    }
}
