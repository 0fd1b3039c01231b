use bevy::prelude::IVec2;

use super::*;
use crate::events::{Event, EventKind, Peak};
use crate::geo::{GeoPosition, Viewport};
use crate::network::{
    AreaRect, DestinationCategory, EventId, LineId, NamePool, NetworkDocument, NetworkError,
    PopulationCategory, StationId,
};

struct Fixture {
    doc: NetworkDocument,
    stations: Vec<StationId>,
    line: LineId,
}

fn fixture() -> Fixture {
    let mut doc = NetworkDocument::with_names(Viewport::default(), NamePool::seeded(5));
    let area = doc.add_area(AreaRect::new(100, 100, 200, 120)).unwrap();
    doc.set_area_population(area, PopulationCategory::Businessman, 30).unwrap();
    doc.set_area_population(area, PopulationCategory::Student, 45).unwrap();
    doc.set_area_destination(area, DestinationCategory::Work, 60).unwrap();

    let stations: Vec<_> = [(150, 150), (400, 300), (600, 420)]
        .iter()
        .map(|(x, y)| doc.add_station(IVec2::new(*x, *y)).unwrap())
        .collect();
    let line = doc.create_line().unwrap();
    doc.append_to_line(line, stations[0], 1).unwrap();
    doc.append_to_line(line, stations[1], 3).unwrap();
    doc.append_to_line(line, stations[2], 2).unwrap();
    doc.set_train_count(line, 4).unwrap();

    doc.insert_event(
        Event::new(
            EventId(0),
            "2024/01/10-07:00",
            "2024/01/10-08:00",
            EventKind::LineDelay {
                station_start: stations[0],
                station_end: stations[2],
                delay_minutes: 12,
            },
        )
        .unwrap(),
    )
    .unwrap();
    doc.insert_event(
        Event::new(
            EventId(1),
            "2024/01/10-08:00",
            "2024/01/10-10:00",
            EventKind::GaussianPeak(Peak {
                station: stations[1],
                size: 250,
                peak: "2024/01/10-09:00".to_string(),
            }),
        )
        .unwrap(),
    )
    .unwrap();
    doc.insert_event(
        Event::new(
            EventId(2),
            "06:30",
            "09:15",
            EventKind::TrainHour {
                line,
                train_number: 2,
            },
        )
        .unwrap(),
    )
    .unwrap();
    doc.insert_event(
        Event::new(
            EventId(3),
            "2024/02/01-00:00",
            "2024/02/02-00:00",
            EventKind::MultipleStationsClosed {
                stations: vec![stations[1], stations[2]],
            },
        )
        .unwrap(),
    )
    .unwrap();

    Fixture {
        doc,
        stations,
        line,
    }
}

#[test]
fn test_export_uses_file_format_names() {
    let Fixture { doc, .. } = fixture();
    let xml = export_map(&doc);

    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<lineDelay>"));
    assert!(xml.contains("<gaussianPeak>"));
    assert!(xml.contains("<hour>"));
    assert!(xml.contains("<start>2024-01-10T07:00:00.000Z</start>"));
    assert!(xml.contains("<start>06:30</start>"));
    assert!(xml.contains("<peak>2024-01-10T09:00:00.000Z</peak>"));
    assert!(xml.contains("businessmann=\"30\""));
    assert!(xml.contains("<numberOfTrain>4</numberOfTrain>"));
    assert!(xml.contains("<name>A</name>"));
    assert!(xml.contains("<type>destination</type>"));
}

#[test]
fn test_every_station_carries_an_area_distribution() {
    let Fixture { doc, .. } = fixture();
    let xml = export_map(&doc);
    assert_eq!(xml.matches("<areaDistribution").count(), 3);
    assert_eq!(xml.matches("<destination work").count(), 2);
    assert!(xml.contains(
        "<areaDistribution tourist=\"0\" student=\"0\" businessmann=\"0\" worker=\"0\" child=\"0\" retired=\"0\" unemployed=\"0\"/>"
    ));
}

#[test]
fn test_roundtrip_restores_document() {
    let Fixture {
        doc,
        stations,
        line,
    } = fixture();
    let loaded = import_map(&export_map(&doc), &Viewport::default()).unwrap();

    assert_eq!(loaded.viewport, doc.viewport);
    assert_eq!(loaded.stations().len(), 3);
    for (original, restored) in doc.stations().iter().zip(loaded.stations()) {
        assert_eq!(restored.id, original.id);
        assert_eq!(restored.name, original.name);
        assert_eq!(restored.geo, original.geo);
        assert!((restored.pixel - original.pixel).abs().max_element() <= 1);
        assert_eq!(restored.area, original.area);
    }

    let restored_line = loaded.line(line).unwrap();
    assert_eq!(restored_line.stops, doc.line(line).unwrap().stops);
    assert_eq!(restored_line.train_count, 4);

    let area = &loaded.areas()[0];
    assert_eq!(area.rect, doc.areas()[0].rect);
    assert_eq!(area.population, doc.areas()[0].population);
    assert_eq!(area.destination.get(DestinationCategory::Work), 60);

    assert_eq!(loaded.events().len(), 4);
    for (original, restored) in doc.events().iter().zip(loaded.events()) {
        assert_eq!(restored.start(), original.start());
        assert_eq!(restored.end(), original.end());
        assert_eq!(restored.kind(), original.kind());
    }
    assert_eq!(loaded.stations_between(stations[0], stations[1]).len(), 2);
}

#[test]
fn test_loaded_ids_continue_after_file() {
    let Fixture { doc, .. } = fixture();
    let mut loaded = import_map(&export_map(&doc), &Viewport::default()).unwrap();

    assert_eq!(loaded.create_line().unwrap(), LineId(1));
    assert_eq!(loaded.next_event_id(), EventId(4));
    let names: Vec<_> = doc.stations().iter().map(|s| s.name.clone()).collect();
    let fresh = loaded.add_station(IVec2::new(700, 700)).unwrap();
    assert!(!names.contains(&loaded.station(fresh).unwrap().name));
}

#[test]
fn test_missing_viewport_uses_fallback() {
    let xml = r#"<map>
        <stations>
          <station><id>0</id><name>Thun</name>
            <position><latitude>46.75</latitude><longitude>7.63</longitude></position>
            <lines/>
          </station>
        </stations>
        <lines/><areas/><events/>
      </map>"#;
    let fallback = Viewport::new(GeoPosition::new(46.75, 7.63), 14);

    let doc = import_map(xml, &fallback).unwrap();

    assert_eq!(doc.viewport, fallback);
    let station = &doc.stations()[0];
    assert_eq!(station.name, "Thun");
    assert!((station.pixel.x - fallback.width / 2).abs() <= 1);
    assert!((station.pixel.y - fallback.height / 2).abs() <= 1);
}

#[test]
fn test_area_destination_falls_back_to_station() {
    let xml = r#"<map>
        <viewport latitude="46.5197" longitude="6.6323" zoom="12" width="1600" height="900"/>
        <stations>
          <station><id>0</id><name>Nyon</name>
            <position><latitude>46.5197</latitude><longitude>6.6323</longitude></position>
            <destination work="10" school="20" shopping="30" leisure="0" home="40"/>
          </station>
        </stations>
        <areas>
          <area><id>0</id><position posX="700" posY="400"/><size width="200" height="100"/>
            <type>destination</type>
            <distribution tourist="5" student="0" businessmann="0" worker="0" child="0" retired="0" unemployed="0"/>
          </area>
        </areas>
      </map>"#;

    let doc = import_map(xml, &Viewport::default()).unwrap();

    let area = &doc.areas()[0];
    assert_eq!(doc.stations()[0].area, Some(area.id));
    assert_eq!(area.destination.get(DestinationCategory::Home), 40);
    assert_eq!(area.population.get(PopulationCategory::Tourist), 5);
}

#[test]
fn test_malformed_xml_is_reported() {
    let result = import_map("<map><stations>", &Viewport::default());
    assert!(matches!(result, Err(MapIoError::Xml(_))));
}

#[test]
fn test_wrong_root_element() {
    let result = import_map("<network/>", &Viewport::default());
    assert!(matches!(result, Err(MapIoError::UnexpectedElement(name, _)) if name == "network"));
}

#[test]
fn test_missing_station_name_is_reported() {
    let xml = r#"<map><stations><station><id>0</id>
        <position><latitude>46.5</latitude><longitude>6.6</longitude></position>
        </station></stations></map>"#;
    let result = import_map(xml, &Viewport::default());
    assert!(matches!(
        result,
        Err(MapIoError::ElementMissing { element: "name", .. })
    ));
}

#[test]
fn test_bad_number_is_reported() {
    let xml = r#"<map><lines><line><id>x</id><numberOfTrain>1</numberOfTrain></line></lines></map>"#;
    let result = import_map(xml, &Viewport::default());
    assert!(matches!(
        result,
        Err(MapIoError::InvalidValue { field: "id", .. })
    ));
}

#[test]
fn test_line_referencing_unknown_station() {
    let xml = r#"<map><lines><line><id>0</id><numberOfTrain>1</numberOfTrain>
        <stations><station id="9" order="0"/></stations></line></lines></map>"#;
    let result = import_map(xml, &Viewport::default());
    assert!(matches!(
        result,
        Err(MapIoError::UnknownReference { kind: "station", id: 9, .. })
    ));
}

fn station_xml(id: &str, name: &str) -> String {
    format!(
        "<station><id>{}</id><name>{}</name>\
         <position><latitude>46.5</latitude><longitude>6.6</longitude></position></station>",
        id, name
    )
}

#[test]
fn test_duplicate_station_id_rejected() {
    let second = station_xml("3", "Sion");
    let xml = format!(
        "<map><stations>{}{}</stations></map>",
        station_xml("3", "Thun"),
        second
    );
    match import_map(&xml, &Viewport::default()) {
        Err(MapIoError::DuplicateId { kind, id, offset }) => {
            assert_eq!((kind, id), ("station", 3));
            assert_eq!(offset, xml.find(&second).unwrap());
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_duplicate_line_and_area_ids_rejected() {
    let lines = r#"<map><lines>
        <line><id>1</id><numberOfTrain>1</numberOfTrain></line>
        <line><id>1</id><numberOfTrain>2</numberOfTrain></line>
        </lines></map>"#;
    assert!(matches!(
        import_map(lines, &Viewport::default()),
        Err(MapIoError::DuplicateId { kind: "line", id: 1, .. })
    ));

    let areas = r#"<map><areas>
        <area><id>0</id><position posX="10" posY="10"/><size width="40" height="40"/></area>
        <area><id>0</id><position posX="90" posY="90"/><size width="40" height="40"/></area>
        </areas></map>"#;
    assert!(matches!(
        import_map(areas, &Viewport::default()),
        Err(MapIoError::DuplicateId { kind: "area", id: 0, .. })
    ));
}

#[test]
fn test_station_id_without_successor_rejected() {
    let xml = format!("<map><stations>{}</stations></map>", station_xml("4294967295", "Thun"));
    let result = import_map(&xml, &Viewport::default());
    assert!(matches!(
        result,
        Err(MapIoError::InvalidId {
            source: NetworkError::IdOutOfRange {
                kind: "station",
                id: u32::MAX
            },
            ..
        })
    ));
}

#[test]
fn test_line_stops_follow_order_attribute() {
    let xml = r#"<map>
        <stations>
          <station><id>0</id><name>Olten</name>
            <position><latitude>46.52</latitude><longitude>6.63</longitude></position>
            <lines><line id="0" platform="4"/></lines></station>
          <station><id>1</id><name>Brugg</name>
            <position><latitude>46.53</latitude><longitude>6.64</longitude></position>
            <lines><line id="0" platform="2"/></lines></station>
        </stations>
        <lines><line><id>0</id><name>A</name><numberOfTrain>3</numberOfTrain>
          <stations><station id="1" order="1"/><station id="0" order="0"/></stations>
        </line></lines>
      </map>"#;

    let doc = import_map(xml, &Viewport::default()).unwrap();

    let line = doc.line(LineId(0)).unwrap();
    assert_eq!(line.stations().collect::<Vec<_>>(), vec![StationId(0), StationId(1)]);
    assert_eq!(line.stops[0].platform, 4);
    assert_eq!(line.stops[1].platform, 2);
    assert_eq!(line.train_count, 3);
}

#[test]
fn test_invalid_event_window_rejected() {
    let xml = r#"<map>
        <stations>
          <station><id>0</id><name>Sion</name>
            <position><latitude>46.52</latitude><longitude>6.63</longitude></position></station>
        </stations>
        <events>
          <stationClosed><start>2024-01-10T08:00:00.000Z</start>
            <end>2024-01-10T07:00:00.000Z</end><idStation>0</idStation></stationClosed>
        </events>
      </map>"#;
    let result = import_map(xml, &Viewport::default());
    assert!(matches!(result, Err(MapIoError::InvalidEvent { .. })));
}

#[test]
fn test_unknown_event_element_rejected() {
    let xml = r#"<map><events><meteorShower/></events></map>"#;
    let result = import_map(xml, &Viewport::default());
    assert!(matches!(result, Err(MapIoError::UnexpectedElement(name, _)) if name == "meteorShower"));
}

#[test]
fn test_names_are_escaped() {
    let mut doc = NetworkDocument::with_names(
        Viewport::default(),
        NamePool::new(
            ["Bains & <Thermes>".to_string()],
            <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(0),
        ),
    );
    doc.add_station(IVec2::new(300, 300)).unwrap();

    let xml = export_map(&doc);
    assert!(xml.contains("Bains &amp; &lt;Thermes&gt;"));
    let loaded = import_map(&xml, &Viewport::default()).unwrap();
    assert_eq!(loaded.stations()[0].name, "Bains & <Thermes>");
}

#[test]
fn test_dirty_state_mark_and_clear() {
    let mut dirty = MapDirtyState::default();
    assert!(!dirty.is_dirty);
    dirty.mark();
    assert!(dirty.is_dirty);
    dirty.clear();
    assert!(!dirty.is_dirty);
}

#[test]
fn test_current_map_display_name() {
    let mut current = CurrentMapFile::default();
    assert_eq!(current.display_name(), "Untitled");
    current.path = Some(std::path::PathBuf::from("maps/lausanne.xml"));
    assert_eq!(current.display_name(), "lausanne");
}

#[test]
fn test_async_operation_busy_flags() {
    let mut op = AsyncMapOperation::default();
    assert!(!op.is_busy());
    op.is_loading = true;
    assert!(op.is_busy());
    op.finish();
    assert!(!op.is_busy());
    assert!(op.operation_description.is_none());
}
