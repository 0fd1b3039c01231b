use crate::network::{EventId, LineId, StationId};

use super::{Event, EventError, EventKind, Peak, TimestampFormat};

/// Which draft field the next station double-click fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingSelection {
    #[default]
    None,
    Start,
    End,
    Concerned,
}

/// Discriminant of [`EventKind`], used by the draft before any payload exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventKindTag {
    #[default]
    LineDelay,
    LineClosed,
    AttendancePeak,
    StationClosed,
    TrainHour,
    RampPeak,
    GaussianPeak,
    MultipleStationsClosed,
}

impl EventKindTag {
    pub const ALL: [EventKindTag; 8] = [
        EventKindTag::LineDelay,
        EventKindTag::LineClosed,
        EventKindTag::AttendancePeak,
        EventKindTag::StationClosed,
        EventKindTag::TrainHour,
        EventKindTag::RampPeak,
        EventKindTag::GaussianPeak,
        EventKindTag::MultipleStationsClosed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventKindTag::LineDelay => "Line delay",
            EventKindTag::LineClosed => "Line closed",
            EventKindTag::AttendancePeak => "Attendance peak",
            EventKindTag::StationClosed => "Station closed",
            EventKindTag::TrainHour => "Train hour",
            EventKindTag::RampPeak => "Ramp peak",
            EventKindTag::GaussianPeak => "Gaussian peak",
            EventKindTag::MultipleStationsClosed => "Stations closed",
        }
    }

    pub fn has_peak(&self) -> bool {
        matches!(
            self,
            EventKindTag::AttendancePeak | EventKindTag::RampPeak | EventKindTag::GaussianPeak
        )
    }

    pub fn has_range(&self) -> bool {
        matches!(self, EventKindTag::LineDelay | EventKindTag::LineClosed)
    }

    /// Kinds that refer to stations picked into the concerned list
    pub fn uses_concerned(&self) -> bool {
        self.has_peak()
            || matches!(
                self,
                EventKindTag::StationClosed | EventKindTag::MultipleStationsClosed
            )
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        match self {
            EventKindTag::TrainHour => TimestampFormat::TimeOfDay,
            _ => TimestampFormat::DateTime,
        }
    }
}

/// Event parameters as entered in the editor, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub kind: EventKindTag,
    pub start: String,
    pub end: String,
    pub peak: String,
    pub size: u32,
    pub delay_minutes: u32,
    pub train_number: u32,
    pub line: Option<LineId>,
    pub station_start: Option<StationId>,
    pub station_end: Option<StationId>,
    pub concerned: Vec<StationId>,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            kind: EventKindTag::default(),
            start: String::new(),
            end: String::new(),
            peak: String::new(),
            size: 0,
            delay_minutes: 0,
            train_number: 1,
            line: None,
            station_start: None,
            station_end: None,
            concerned: Vec::new(),
        }
    }
}

impl EventDraft {
    /// Store `station` in the field named by `pending`. Concerned stations
    /// accumulate without duplicates.
    pub fn record_station(&mut self, pending: PendingSelection, station: StationId) {
        match pending {
            PendingSelection::None => {}
            PendingSelection::Start => self.station_start = Some(station),
            PendingSelection::End => self.station_end = Some(station),
            PendingSelection::Concerned => {
                if !self.concerned.contains(&station) {
                    self.concerned.push(station);
                }
            }
        }
    }

    fn concerned_station(&self) -> Result<StationId, EventError> {
        self.concerned
            .last()
            .copied()
            .ok_or(EventError::MissingStation("concerned"))
    }

    fn peak(&self) -> Result<Peak, EventError> {
        Ok(Peak {
            station: self.concerned_station()?,
            size: self.size,
            peak: self.peak.trim().to_string(),
        })
    }

    /// Validate the draft and turn it into an event.
    pub fn build(&self, id: EventId) -> Result<Event, EventError> {
        let range = || -> Result<(StationId, StationId), EventError> {
            let start = self.station_start.ok_or(EventError::MissingStation("start"))?;
            let end = self.station_end.ok_or(EventError::MissingStation("end"))?;
            Ok((start, end))
        };

        let kind = match self.kind {
            EventKindTag::LineDelay => {
                let (station_start, station_end) = range()?;
                EventKind::LineDelay {
                    station_start,
                    station_end,
                    delay_minutes: self.delay_minutes,
                }
            }
            EventKindTag::LineClosed => {
                let (station_start, station_end) = range()?;
                EventKind::LineClosed {
                    station_start,
                    station_end,
                }
            }
            EventKindTag::AttendancePeak => EventKind::AttendancePeak(self.peak()?),
            EventKindTag::RampPeak => EventKind::RampPeak(self.peak()?),
            EventKindTag::GaussianPeak => EventKind::GaussianPeak(self.peak()?),
            EventKindTag::StationClosed => EventKind::StationClosed {
                station: self.concerned_station()?,
            },
            EventKindTag::TrainHour => EventKind::TrainHour {
                line: self.line.ok_or(EventError::MissingLine)?,
                train_number: self.train_number,
            },
            EventKindTag::MultipleStationsClosed => EventKind::MultipleStationsClosed {
                stations: self.concerned.clone(),
            },
        };

        Event::new(id, &self.start, &self.end, kind)
    }
}
