//! Time-windowed operational events: delays, closures and demand peaks.
//!
//! Every event owns a [`TimeWindow`] whose start never lies after its end.
//! Peak-shaped events also carry a peak instant that must fall inside the
//! window. All checks run at construction and again in every setter; a failed
//! setter leaves the event untouched.

mod draft;
pub mod timestamp;

pub use draft::{EventDraft, EventKindTag, PendingSelection};
pub use timestamp::TimestampFormat;

use thiserror::Error;

use crate::network::{EventId, LineId, StationId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("{field} '{value}' is not a valid {pattern} timestamp")]
    Unparsable {
        field: &'static str,
        value: String,
        pattern: &'static str,
    },
    #[error("start {start} is after end {end}")]
    StartAfterEnd { start: String, end: String },
    #[error("peak {peak} is outside {start} .. {end}")]
    PeakOutOfRange {
        peak: String,
        start: String,
        end: String,
    },
    #[error("no {0} station selected")]
    MissingStation(&'static str),
    #[error("no line selected")]
    MissingLine,
}

/// Start and end of an event, kept as the strings the user entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    format: TimestampFormat,
    start: String,
    end: String,
}

fn parse_field(
    format: TimestampFormat,
    field: &'static str,
    value: &str,
) -> Result<chrono::NaiveDateTime, EventError> {
    format.parse(value).ok_or_else(|| EventError::Unparsable {
        field,
        value: value.to_string(),
        pattern: format.pattern(),
    })
}

impl TimeWindow {
    pub fn new(format: TimestampFormat, start: &str, end: &str) -> Result<Self, EventError> {
        let window = Self {
            format,
            start: start.trim().to_string(),
            end: end.trim().to_string(),
        };
        window.validate()?;
        Ok(window)
    }

    fn validate(&self) -> Result<(), EventError> {
        let start = parse_field(self.format, "start", &self.start)?;
        let end = parse_field(self.format, "end", &self.end)?;
        if start > end {
            return Err(EventError::StartAfterEnd {
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }
        Ok(())
    }

    pub fn format(&self) -> TimestampFormat {
        self.format
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// Check that `peak` lies in [start, end].
    fn check_peak(&self, peak: &str) -> Result<(), EventError> {
        let peak_at = parse_field(self.format, "peak", peak)?;
        let start = parse_field(self.format, "start", &self.start)?;
        let end = parse_field(self.format, "end", &self.end)?;
        if peak_at < start || peak_at > end {
            return Err(EventError::PeakOutOfRange {
                peak: peak.to_string(),
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }
        Ok(())
    }
}

/// Payload shared by the peak-shaped demand events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peak {
    pub station: StationId,
    pub size: u32,
    pub peak: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    LineDelay {
        station_start: StationId,
        station_end: StationId,
        delay_minutes: u32,
    },
    LineClosed {
        station_start: StationId,
        station_end: StationId,
    },
    AttendancePeak(Peak),
    StationClosed {
        station: StationId,
    },
    TrainHour {
        line: LineId,
        train_number: u32,
    },
    RampPeak(Peak),
    GaussianPeak(Peak),
    MultipleStationsClosed {
        stations: Vec<StationId>,
    },
}

impl EventKind {
    pub fn timestamp_format(&self) -> TimestampFormat {
        match self {
            EventKind::TrainHour { .. } => TimestampFormat::TimeOfDay,
            _ => TimestampFormat::DateTime,
        }
    }

    pub fn peak(&self) -> Option<&Peak> {
        match self {
            EventKind::AttendancePeak(peak) | EventKind::RampPeak(peak) | EventKind::GaussianPeak(peak) => {
                Some(peak)
            }
            _ => None,
        }
    }

    fn peak_mut(&mut self) -> Option<&mut Peak> {
        match self {
            EventKind::AttendancePeak(peak) | EventKind::RampPeak(peak) | EventKind::GaussianPeak(peak) => {
                Some(peak)
            }
            _ => None,
        }
    }

    pub fn tag(&self) -> EventKindTag {
        match self {
            EventKind::LineDelay { .. } => EventKindTag::LineDelay,
            EventKind::LineClosed { .. } => EventKindTag::LineClosed,
            EventKind::AttendancePeak(_) => EventKindTag::AttendancePeak,
            EventKind::StationClosed { .. } => EventKindTag::StationClosed,
            EventKind::TrainHour { .. } => EventKindTag::TrainHour,
            EventKind::RampPeak(_) => EventKindTag::RampPeak,
            EventKind::GaussianPeak(_) => EventKindTag::GaussianPeak,
            EventKind::MultipleStationsClosed { .. } => EventKindTag::MultipleStationsClosed,
        }
    }

    /// Range endpoints for events that cover a stretch of line
    pub fn station_range(&self) -> Option<(StationId, StationId)> {
        match self {
            EventKind::LineDelay {
                station_start,
                station_end,
                ..
            }
            | EventKind::LineClosed {
                station_start,
                station_end,
            } => Some((*station_start, *station_end)),
            _ => None,
        }
    }

    /// Every station the event refers to
    pub fn stations(&self) -> Vec<StationId> {
        match self {
            EventKind::LineDelay {
                station_start,
                station_end,
                ..
            }
            | EventKind::LineClosed {
                station_start,
                station_end,
            } => vec![*station_start, *station_end],
            EventKind::AttendancePeak(peak)
            | EventKind::RampPeak(peak)
            | EventKind::GaussianPeak(peak) => vec![peak.station],
            EventKind::StationClosed { station } => vec![*station],
            EventKind::TrainHour { .. } => Vec::new(),
            EventKind::MultipleStationsClosed { stations } => stations.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    window: TimeWindow,
    kind: EventKind,
}

impl Event {
    pub fn new(id: EventId, start: &str, end: &str, kind: EventKind) -> Result<Self, EventError> {
        if let EventKind::MultipleStationsClosed { stations } = &kind
            && stations.is_empty()
        {
            return Err(EventError::MissingStation("closed"));
        }

        let window = TimeWindow::new(kind.timestamp_format(), start, end)?;
        if let Some(peak) = kind.peak() {
            window.check_peak(&peak.peak)?;
        }
        Ok(Self { id, window, kind })
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn start(&self) -> &str {
        self.window.start()
    }

    pub fn end(&self) -> &str {
        self.window.end()
    }

    /// Replace the window and, for peak-shaped events, the peak in one step.
    /// Nothing changes unless the new combination is valid.
    pub fn reschedule(
        &mut self,
        start: &str,
        end: &str,
        peak: Option<&str>,
    ) -> Result<(), EventError> {
        let window = TimeWindow::new(self.window.format, start, end)?;
        let peak = match (self.kind.peak(), peak) {
            (Some(_), Some(peak)) => Some(peak.trim().to_string()),
            (Some(current), None) => Some(current.peak.clone()),
            (None, _) => None,
        };
        if let Some(peak) = &peak {
            window.check_peak(peak)?;
        }

        self.window = window;
        if let (Some(peak), Some(current)) = (peak, self.kind.peak_mut()) {
            current.peak = peak;
        }
        Ok(())
    }

    pub fn set_start(&mut self, start: &str) -> Result<(), EventError> {
        let end = self.window.end.clone();
        self.reschedule(start, &end, None)
    }

    pub fn set_end(&mut self, end: &str) -> Result<(), EventError> {
        let start = self.window.start.clone();
        self.reschedule(&start, end, None)
    }

    /// Move the peak of a peak-shaped event. For other kinds the value is
    /// only validated against the window.
    pub fn set_peak(&mut self, peak: &str) -> Result<(), EventError> {
        self.window.check_peak(peak)?;
        if let Some(current) = self.kind.peak_mut() {
            current.peak = peak.trim().to_string();
        }
        Ok(())
    }

    /// Whether the event names `station` anywhere
    pub fn refers_to(&self, station: StationId) -> bool {
        self.kind.stations().contains(&station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delay(start: &str, end: &str) -> Result<Event, EventError> {
        Event::new(
            EventId(0),
            start,
            end,
            EventKind::LineDelay {
                station_start: StationId(1),
                station_end: StationId(2),
                delay_minutes: 5,
            },
        )
    }

    fn attendance(peak: &str) -> Result<Event, EventError> {
        Event::new(
            EventId(1),
            "2024/01/10-08:00",
            "2024/01/10-10:00",
            EventKind::AttendancePeak(Peak {
                station: StationId(3),
                size: 500,
                peak: peak.to_string(),
            }),
        )
    }

    #[test]
    fn test_line_delay_rejects_start_after_end() {
        let result = delay("2024/01/10-08:00", "2024/01/10-07:00");
        assert!(matches!(result, Err(EventError::StartAfterEnd { .. })));
    }

    #[test]
    fn test_line_delay_accepts_ordered_window() {
        let event = delay("2024/01/10-07:00", "2024/01/10-08:00").unwrap();
        assert_eq!(event.start(), "2024/01/10-07:00");
        assert_eq!(event.end(), "2024/01/10-08:00");
    }

    #[test]
    fn test_equal_start_and_end_allowed() {
        assert!(delay("2024/01/10-07:00", "2024/01/10-07:00").is_ok());
    }

    #[test]
    fn test_unparsable_start_rejected() {
        let result = delay("10.01.2024 07:00", "2024/01/10-08:00");
        assert!(matches!(result, Err(EventError::Unparsable { field: "start", .. })));
    }

    #[test]
    fn test_attendance_peak_inside_window() {
        assert!(attendance("2024/01/10-09:00").is_ok());
    }

    #[test]
    fn test_attendance_peak_outside_window() {
        let result = attendance("2024/01/10-11:00");
        assert!(matches!(result, Err(EventError::PeakOutOfRange { .. })));
    }

    #[test]
    fn test_peak_on_window_bounds() {
        assert!(attendance("2024/01/10-08:00").is_ok());
        assert!(attendance("2024/01/10-10:00").is_ok());
    }

    #[test]
    fn test_unparsable_peak_rejected() {
        let result = attendance("09:00");
        assert!(matches!(result, Err(EventError::Unparsable { field: "peak", .. })));
    }

    #[test]
    fn test_set_end_before_start_keeps_prior_value() {
        let mut event = delay("2024/01/10-07:00", "2024/01/10-08:00").unwrap();
        let result = event.set_end("2024/01/10-06:00");
        assert!(result.is_err());
        assert_eq!(event.end(), "2024/01/10-08:00");
    }

    #[test]
    fn test_set_start_valid() {
        let mut event = delay("2024/01/10-07:00", "2024/01/10-08:00").unwrap();
        event.set_start("2024/01/10-06:30").unwrap();
        assert_eq!(event.start(), "2024/01/10-06:30");
    }

    #[test]
    fn test_set_start_that_excludes_peak_rejected() {
        let mut event = attendance("2024/01/10-09:00").unwrap();
        assert!(event.set_start("2024/01/10-09:30").is_err());
        assert_eq!(event.start(), "2024/01/10-08:00");
    }

    #[test]
    fn test_set_peak() {
        let mut event = attendance("2024/01/10-09:00").unwrap();
        event.set_peak("2024/01/10-09:45").unwrap();
        assert_eq!(event.kind().peak().unwrap().peak, "2024/01/10-09:45");

        assert!(event.set_peak("2024/01/11-09:45").is_err());
        assert_eq!(event.kind().peak().unwrap().peak, "2024/01/10-09:45");
    }

    #[test]
    fn test_reschedule_moves_window_and_peak_together() {
        let mut event = attendance("2024/01/10-09:00").unwrap();

        // Neither setter alone could move the event to the next day
        event
            .reschedule("2024/01/11-08:00", "2024/01/11-10:00", Some("2024/01/11-09:00"))
            .unwrap();
        assert_eq!(event.start(), "2024/01/11-08:00");
        assert_eq!(event.kind().peak().unwrap().peak, "2024/01/11-09:00");
    }

    #[test]
    fn test_failed_reschedule_keeps_everything() {
        let mut event = attendance("2024/01/10-09:00").unwrap();
        let before = event.clone();

        let result = event.reschedule("2024/01/11-08:00", "2024/01/11-10:00", None);
        assert!(matches!(result, Err(EventError::PeakOutOfRange { .. })));
        assert_eq!(event, before);
    }

    #[test]
    fn test_train_hour_uses_time_of_day() {
        let kind = EventKind::TrainHour {
            line: LineId(0),
            train_number: 3,
        };
        assert!(Event::new(EventId(2), "06:00", "09:30", kind.clone()).is_ok());
        assert!(Event::new(EventId(2), "09:30", "06:00", kind.clone()).is_err());
        assert!(Event::new(EventId(2), "2024/01/10-06:00", "2024/01/10-09:30", kind).is_err());
    }

    #[test]
    fn test_multiple_stations_closed_needs_stations() {
        let result = Event::new(
            EventId(3),
            "2024/01/10-06:00",
            "2024/01/10-09:30",
            EventKind::MultipleStationsClosed { stations: vec![] },
        );
        assert_eq!(result, Err(EventError::MissingStation("closed")));
    }

    #[test]
    fn test_station_range_only_for_line_events() {
        let event = delay("2024/01/10-07:00", "2024/01/10-08:00").unwrap();
        assert_eq!(event.kind().station_range(), Some((StationId(1), StationId(2))));
        assert!(attendance("2024/01/10-09:00").unwrap().kind().station_range().is_none());
    }

    #[test]
    fn test_refers_to() {
        let event = delay("2024/01/10-07:00", "2024/01/10-08:00").unwrap();
        assert!(event.refers_to(StationId(2)));
        assert!(!event.refers_to(StationId(3)));
    }

    #[test]
    fn test_error_messages_are_readable() {
        let err = delay("2024/01/10-08:00", "2024/01/10-07:00").unwrap_err();
        assert_eq!(
            err.to_string(),
            "start 2024/01/10-08:00 is after end 2024/01/10-07:00"
        );
    }
}
