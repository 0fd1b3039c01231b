//! Parser for the XML map format.

use roxmltree as xml;
use std::collections::HashMap;
use std::str::FromStr;

use crate::events::timestamp::from_export;
use crate::events::{Event, EventKind, Peak};
use crate::geo::{GeoPosition, Viewport};
use crate::network::{
    Area, AreaId, AreaRect, Category, DestinationCategory, Distribution, Line, LineId,
    NetworkDocument, NetworkError, PopulationCategory, Station, StationId,
};

use super::MapIoError;

type Node<'a, 'input> = xml::Node<'a, 'input>;

fn offset(node: &Node) -> usize {
    node.range().start
}

fn child<'a, 'input>(node: &Node<'a, 'input>, name: &'static str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(name))
}

fn require<'a, 'input>(
    node: &Node<'a, 'input>,
    name: &'static str,
) -> Result<Node<'a, 'input>, MapIoError> {
    child(node, name).ok_or(MapIoError::ElementMissing {
        element: name,
        offset: offset(node),
    })
}

fn elements<'a, 'input>(
    node: &Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |c| c.has_tag_name(name))
}

fn parse_value<T: FromStr>(field: &'static str, value: &str, at: usize) -> Result<T, MapIoError> {
    value.trim().parse().map_err(|_| MapIoError::InvalidValue {
        field,
        value: value.to_string(),
        offset: at,
    })
}

/// Text content of a required child element.
fn text<'a>(node: &Node<'a, '_>, name: &'static str) -> Result<&'a str, MapIoError> {
    let element = require(node, name)?;
    Ok(element.text().unwrap_or(""))
}

fn number<T: FromStr>(node: &Node, name: &'static str) -> Result<T, MapIoError> {
    let element = require(node, name)?;
    parse_value(name, element.text().unwrap_or(""), offset(&element))
}

fn attribute<T: FromStr>(node: &Node, name: &'static str) -> Result<T, MapIoError> {
    let value = node.attribute(name).ok_or(MapIoError::AttributeMissing {
        attribute: name,
        offset: offset(node),
    })?;
    parse_value(name, value, offset(node))
}

/// Attach the element's position to an id the document refused.
fn registered(result: Result<(), NetworkError>, node: &Node) -> Result<(), MapIoError> {
    result.map_err(|source| match source {
        NetworkError::DuplicateId { kind, id } => MapIoError::DuplicateId {
            kind,
            id,
            offset: offset(node),
        },
        source => MapIoError::InvalidId {
            offset: offset(node),
            source,
        },
    })
}

fn distribution<C: Category>(node: &Node) -> Result<Distribution<C>, MapIoError> {
    let mut dist = Distribution::default();
    for category in C::ALL {
        if node.attribute(category.key()).is_some() {
            let value: u32 = attribute(node, category.key())?;
            dist.set(*category, value);
        }
    }
    Ok(dist)
}

fn parse_viewport(root: &Node, fallback: &Viewport) -> Result<Viewport, MapIoError> {
    let Some(node) = child(root, "viewport") else {
        return Ok(*fallback);
    };
    let center = GeoPosition::new(attribute(&node, "latitude")?, attribute(&node, "longitude")?);
    let mut viewport = Viewport::new(center, attribute(&node, "zoom")?);
    viewport.width = node
        .attribute("width")
        .map(|w| parse_value("width", w, offset(&node)))
        .transpose()?
        .unwrap_or(fallback.width);
    viewport.height = node
        .attribute("height")
        .map(|h| parse_value("height", h, offset(&node)))
        .transpose()?
        .unwrap_or(fallback.height);
    Ok(viewport)
}

/// What a station element says beyond the station itself.
struct StationExtras {
    platforms: Vec<(LineId, u32)>,
    destination: Option<Distribution<DestinationCategory>>,
}

fn parse_station(node: &Node, viewport: &Viewport) -> Result<(Station, StationExtras), MapIoError> {
    let id = StationId(number(node, "id")?);
    let name = text(node, "name")?.trim().to_string();
    let position = require(node, "position")?;
    let geo = GeoPosition::new(number(&position, "latitude")?, number(&position, "longitude")?);

    let mut platforms = Vec::new();
    if let Some(lines) = child(node, "lines") {
        for line in elements(&lines, "line") {
            platforms.push((LineId(attribute(&line, "id")?), attribute(&line, "platform")?));
        }
    }
    let destination = child(node, "destination")
        .map(|d| distribution(&d))
        .transpose()?;

    Ok((
        Station::at_geo(id, name, geo, viewport),
        StationExtras {
            platforms,
            destination,
        },
    ))
}

fn parse_line(
    node: &Node,
    doc: &NetworkDocument,
    platforms: &HashMap<(LineId, StationId), u32>,
) -> Result<Line, MapIoError> {
    let mut line = Line::new(LineId(number(node, "id")?));
    line.train_count = number(node, "numberOfTrain")?;

    let mut stops = Vec::new();
    if let Some(stations) = child(node, "stations") {
        for stop in elements(&stations, "station") {
            let station = StationId(attribute(&stop, "id")?);
            if doc.station(station).is_none() {
                return Err(MapIoError::UnknownReference {
                    kind: "station",
                    id: station.0,
                    offset: offset(&stop),
                });
            }
            let order: u32 = attribute(&stop, "order")?;
            stops.push((order, station));
        }
    }
    stops.sort_by_key(|(order, _)| *order);
    for (_, station) in stops {
        let platform = platforms.get(&(line.id, station)).copied().unwrap_or(1);
        line.push(station, platform);
    }
    Ok(line)
}

fn parse_area(node: &Node, viewport: &Viewport) -> Result<Area, MapIoError> {
    let id = AreaId(number(node, "id")?);
    let position = require(node, "position")?;
    let size = require(node, "size")?;
    let rect = AreaRect::new(
        attribute(&position, "posX")?,
        attribute(&position, "posY")?,
        attribute(&size, "width")?,
        attribute(&size, "height")?,
    );
    let mut area = Area::new(id, rect, viewport).map_err(|source| MapIoError::InvalidArea {
        offset: offset(node),
        source,
    })?;
    if let Some(population) = child(node, "distribution") {
        area.population = distribution::<PopulationCategory>(&population)?;
    }
    if let Some(destination) = child(node, "destination") {
        area.destination = distribution::<DestinationCategory>(&destination)?;
    }
    Ok(area)
}

fn station_ref(node: &Node, name: &'static str) -> Result<StationId, MapIoError> {
    Ok(StationId(number(node, name)?))
}

fn parse_peak(node: &Node) -> Result<Peak, MapIoError> {
    Ok(Peak {
        station: station_ref(node, "stationId")?,
        size: number(node, "size")?,
        peak: from_export(text(node, "peak")?),
    })
}

fn parse_event(node: &Node, doc: &NetworkDocument) -> Result<Event, MapIoError> {
    let kind = match node.tag_name().name() {
        "lineDelay" => EventKind::LineDelay {
            station_start: station_ref(node, "stationIdStart")?,
            station_end: station_ref(node, "stationIdEnd")?,
            delay_minutes: number(node, "delay")?,
        },
        "lineClose" => EventKind::LineClosed {
            station_start: station_ref(node, "stationIdStart")?,
            station_end: station_ref(node, "stationIdEnd")?,
        },
        "attendancePeak" => EventKind::AttendancePeak(parse_peak(node)?),
        "rampPeak" => EventKind::RampPeak(parse_peak(node)?),
        "gaussianPeak" => EventKind::GaussianPeak(parse_peak(node)?),
        "stationClosed" => EventKind::StationClosed {
            station: station_ref(node, "idStation")?,
        },
        "hour" => EventKind::TrainHour {
            line: LineId(number(node, "idLine")?),
            train_number: number(node, "trainNumber")?,
        },
        "multipleStationsClosed" => {
            let stations = require(node, "stations")?;
            let ids = elements(&stations, "station")
                .map(|s| attribute(&s, "id").map(StationId))
                .collect::<Result<Vec<_>, _>>()?;
            EventKind::MultipleStationsClosed { stations: ids }
        }
        other => {
            return Err(MapIoError::UnexpectedElement(other.to_string(), offset(node)));
        }
    };

    if let Some(missing) = kind.stations().into_iter().find(|s| doc.station(*s).is_none()) {
        return Err(MapIoError::UnknownReference {
            kind: "station",
            id: missing.0,
            offset: offset(node),
        });
    }
    if let EventKind::TrainHour { line, .. } = &kind
        && doc.line(*line).is_none()
    {
        return Err(MapIoError::UnknownReference {
            kind: "line",
            id: line.0,
            offset: offset(node),
        });
    }

    let start = from_export(text(node, "start")?);
    let end = from_export(text(node, "end")?);
    Event::new(doc.next_event_id(), &start, &end, kind).map_err(|source| MapIoError::InvalidEvent {
        offset: offset(node),
        source,
    })
}

/// Parse a map file. Without a `<viewport>` element the map is placed in
/// `fallback`.
pub fn import_map(data: &str, fallback: &Viewport) -> Result<NetworkDocument, MapIoError> {
    let parsed = xml::Document::parse(data).map_err(|e| MapIoError::Xml(e.to_string()))?;
    let root = parsed.root_element();
    if !root.has_tag_name("map") {
        return Err(MapIoError::UnexpectedElement(
            root.tag_name().name().to_string(),
            offset(&root),
        ));
    }

    let viewport = parse_viewport(&root, fallback)?;
    let mut doc = NetworkDocument::new(viewport);

    let mut platforms = HashMap::new();
    let mut station_destinations = HashMap::new();
    if let Some(stations) = child(&root, "stations") {
        for node in elements(&stations, "station") {
            let (station, extras) = parse_station(&node, &viewport)?;
            for (line, platform) in extras.platforms {
                platforms.insert((line, station.id), platform);
            }
            if let Some(destination) = extras.destination {
                station_destinations.insert(station.id, destination);
            }
            registered(doc.insert_station(station), &node)?;
        }
    }

    if let Some(lines) = child(&root, "lines") {
        for node in elements(&lines, "line") {
            let line = parse_line(&node, &doc, &platforms)?;
            registered(doc.insert_line(line), &node)?;
        }
    }

    let mut areas_without_destination = Vec::new();
    if let Some(areas) = child(&root, "areas") {
        for node in elements(&areas, "area") {
            let area = parse_area(&node, &viewport)?;
            if child(&node, "destination").is_none() {
                areas_without_destination.push(area.id);
            }
            registered(doc.insert_area(area), &node)?;
        }
    }
    doc.refresh_station_areas();

    // Older files only carry an area's destination on the stations inside it
    for area in areas_without_destination {
        let destination = doc
            .stations()
            .iter()
            .filter(|s| s.area == Some(area))
            .find_map(|s| station_destinations.get(&s.id).cloned());
        if let Some(destination) = destination {
            for (category, value) in destination.iter() {
                let _ = doc.set_area_destination(area, category, value as u32);
            }
        }
    }

    if let Some(events) = child(&root, "events") {
        for node in events.children().filter(|c| c.is_element()) {
            let event = parse_event(&node, &doc)?;
            registered(doc.insert_event(event), &node)?;
        }
    }

    Ok(doc)
}
