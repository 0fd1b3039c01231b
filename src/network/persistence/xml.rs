//! Serializer for the XML map format.
//!
//! The document is written in one pass into a `String`, so callers can
//! snapshot the map on the main thread and hand the text to an I/O task.

use std::fmt::Write;

use crate::events::timestamp::to_export;
use crate::events::{Event, EventKind, Peak};
use crate::network::{
    Area, Category, Distribution, Line, NetworkDocument, PopulationCategory, Station,
};

/// Small indenting element writer.
struct XmlWriter {
    out: String,
    depth: usize,
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            out: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn attributes(&mut self, attrs: &[(&str, String)]) {
        for (name, value) in attrs {
            let _ = write!(self.out, " {}=\"{}\"", name, escape(value));
        }
    }

    fn open(&mut self, name: &str) {
        self.indent();
        let _ = writeln!(self.out, "<{}>", name);
        self.depth += 1;
    }

    fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        let _ = writeln!(self.out, "</{}>", name);
    }

    /// `<name>text</name>`
    fn text(&mut self, name: &str, value: impl ToString) {
        self.indent();
        let _ = writeln!(self.out, "<{0}>{1}</{0}>", name, escape(&value.to_string()));
    }

    /// `<name a="..." b="..."/>`
    fn empty(&mut self, name: &str, attrs: &[(&str, String)]) {
        self.indent();
        let _ = write!(self.out, "<{}", name);
        self.attributes(attrs);
        self.out.push_str("/>\n");
    }

    fn finish(self) -> String {
        self.out
    }
}

fn distribution_attrs<C: Category>(dist: &Distribution<C>) -> Vec<(&'static str, String)> {
    dist.iter().map(|(c, v)| (c.key(), v.to_string())).collect()
}

fn write_station(w: &mut XmlWriter, doc: &NetworkDocument, station: &Station) {
    w.open("station");
    w.text("id", station.id.0);
    w.text("name", &station.name);
    w.open("position");
    w.text("latitude", station.geo.latitude);
    w.text("longitude", station.geo.longitude);
    w.close("position");

    w.open("lines");
    for line in doc.lines_through(station.id) {
        if let Some(stop) = line.stops.iter().find(|s| s.station == station.id) {
            w.empty(
                "line",
                &[("id", line.id.0.to_string()), ("platform", stop.platform.to_string())],
            );
        }
    }
    w.close("lines");

    match station.area.and_then(|id| doc.area(id)) {
        Some(area) => {
            w.empty("destination", &distribution_attrs(&area.destination));
            w.empty("areaDistribution", &distribution_attrs(&area.population));
        }
        None => w.empty(
            "areaDistribution",
            &distribution_attrs(&Distribution::<PopulationCategory>::default()),
        ),
    }
    w.close("station");
}

fn write_line(w: &mut XmlWriter, line: &Line) {
    w.open("line");
    w.text("id", line.id.0);
    w.text("name", line.name());
    w.text("numberOfTrain", line.train_count);
    w.open("stations");
    for (order, stop) in line.stops.iter().enumerate() {
        w.empty(
            "station",
            &[("id", stop.station.0.to_string()), ("order", order.to_string())],
        );
    }
    w.close("stations");
    w.close("line");
}

fn write_area(w: &mut XmlWriter, area: &Area) {
    w.open("area");
    w.text("id", area.id.0);
    w.empty(
        "position",
        &[("posX", area.rect.x.to_string()), ("posY", area.rect.y.to_string())],
    );
    w.empty(
        "size",
        &[
            ("width", area.rect.width.to_string()),
            ("height", area.rect.height.to_string()),
        ],
    );
    w.text("type", "destination");
    w.empty("distribution", &distribution_attrs(&area.population));
    w.empty("destination", &distribution_attrs(&area.destination));
    w.close("area");
}

fn write_peak(w: &mut XmlWriter, peak: &Peak) {
    w.text("stationId", peak.station.0);
    w.text("size", peak.size);
    w.text("peak", to_export(&peak.peak));
}

fn write_event(w: &mut XmlWriter, event: &Event) {
    let tag = event_tag(event.kind());
    w.open(tag);
    w.text("start", to_export(event.start()));
    w.text("end", to_export(event.end()));
    match event.kind() {
        EventKind::LineDelay {
            station_start,
            station_end,
            delay_minutes,
        } => {
            w.text("stationIdStart", station_start.0);
            w.text("stationIdEnd", station_end.0);
            w.text("delay", delay_minutes);
        }
        EventKind::LineClosed {
            station_start,
            station_end,
        } => {
            w.text("stationIdStart", station_start.0);
            w.text("stationIdEnd", station_end.0);
        }
        EventKind::AttendancePeak(peak) | EventKind::RampPeak(peak) | EventKind::GaussianPeak(peak) => {
            write_peak(w, peak)
        }
        EventKind::StationClosed { station } => w.text("idStation", station.0),
        EventKind::TrainHour { line, train_number } => {
            w.text("idLine", line.0);
            w.text("trainNumber", train_number);
        }
        EventKind::MultipleStationsClosed { stations } => {
            w.open("stations");
            for station in stations {
                w.empty("station", &[("id", station.0.to_string())]);
            }
            w.close("stations");
        }
    }
    w.close(tag);
}

/// Element name of an event in the map file
pub(super) fn event_tag(kind: &EventKind) -> &'static str {
    match kind {
        EventKind::LineDelay { .. } => "lineDelay",
        EventKind::LineClosed { .. } => "lineClose",
        EventKind::AttendancePeak(_) => "attendancePeak",
        EventKind::StationClosed { .. } => "stationClosed",
        EventKind::TrainHour { .. } => "hour",
        EventKind::RampPeak(_) => "rampPeak",
        EventKind::GaussianPeak(_) => "gaussianPeak",
        EventKind::MultipleStationsClosed { .. } => "multipleStationsClosed",
    }
}

/// Serialize the whole document.
pub fn export_map(doc: &NetworkDocument) -> String {
    let mut w = XmlWriter::new();
    w.open("map");

    let vp = doc.viewport;
    w.empty(
        "viewport",
        &[
            ("latitude", vp.center.latitude.to_string()),
            ("longitude", vp.center.longitude.to_string()),
            ("zoom", vp.zoom.to_string()),
            ("width", vp.width.to_string()),
            ("height", vp.height.to_string()),
        ],
    );

    w.open("stations");
    for station in doc.stations() {
        write_station(&mut w, doc, station);
    }
    w.close("stations");

    w.open("lines");
    for line in doc.lines() {
        write_line(&mut w, line);
    }
    w.close("lines");

    w.open("areas");
    for area in doc.areas() {
        write_area(&mut w, area);
    }
    w.close("areas");

    w.open("events");
    for event in doc.events() {
        write_event(&mut w, event);
    }
    w.close("events");

    w.close("map");
    w.finish()
}
