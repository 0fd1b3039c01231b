use bevy::prelude::IVec2;

use super::*;
use crate::common::BorderSide;
use crate::events::{EventDraft, EventKindTag, PendingSelection};
use crate::geo::Viewport;

fn document() -> NetworkDocument {
    NetworkDocument::with_names(Viewport::default(), NamePool::seeded(3))
}

fn assert_within_one_pixel(a: IVec2, b: IVec2) {
    let diff = (a - b).abs();
    assert!(diff.x <= 1 && diff.y <= 1, "{:?} vs {:?}", a, b);
}

#[test]
fn test_add_station_assigns_monotonic_ids_and_unique_names() {
    let mut doc = document();
    let a = doc.add_station(IVec2::new(100, 100)).unwrap();
    let b = doc.add_station(IVec2::new(200, 100)).unwrap();

    assert_eq!(a, StationId(0));
    assert_eq!(b, StationId(1));
    assert_ne!(doc.station(a).unwrap().name, doc.station(b).unwrap().name);
}

#[test]
fn test_add_station_fails_when_names_run_out() {
    let names = NamePool::new(
        ["Ins".to_string()],
        rand::SeedableRng::seed_from_u64(0),
    );
    let mut doc = NetworkDocument::with_names(Viewport::default(), names);
    assert!(doc.add_station(IVec2::new(10, 10)).is_ok());
    assert_eq!(
        doc.add_station(IVec2::new(20, 10)),
        Err(NetworkError::NamePoolExhausted)
    );
}

#[test]
fn test_move_station_updates_geo() {
    let mut doc = document();
    let id = doc.add_station(IVec2::new(300, 300)).unwrap();

    let applied = doc.move_station(id, IVec2::new(10, 10)).unwrap();

    let station = doc.station(id).unwrap();
    assert_eq!(applied, IVec2::new(10, 10));
    assert_eq!(station.pixel, IVec2::new(310, 310));
    assert_eq!(doc.viewport.to_pixel(station.geo), station.pixel);
}

#[test]
fn test_move_station_clamped_to_window() {
    let mut doc = document();
    let id = doc.add_station(IVec2::new(5, 5)).unwrap();

    let applied = doc.move_station(id, IVec2::new(-50, -50)).unwrap();

    assert_eq!(applied, IVec2::new(-4, -4));
    assert_eq!(doc.station(id).unwrap().pixel, IVec2::new(1, 1));
}

#[test]
fn test_stations_survive_pan_and_zoom() {
    let mut doc = document();
    let id = doc.add_station(IVec2::new(640, 380)).unwrap();
    let geo = doc.station(id).unwrap().geo;

    doc.pan_all(IVec2::new(-120, 60));
    doc.zoom_by(2, IVec2::new(100, 100));
    doc.zoom_by(-2, IVec2::new(100, 100));
    doc.pan_all(IVec2::new(120, -60));

    let station = doc.station(id).unwrap();
    assert_eq!(station.geo, geo);
    assert_within_one_pixel(station.pixel, IVec2::new(640, 380));
    assert_within_one_pixel(doc.viewport.to_pixel(doc.viewport.to_geo(station.pixel)), station.pixel);
}

#[test]
fn test_pan_all_moves_stations_and_areas_together() {
    let mut doc = document();
    let station = doc.add_station(IVec2::new(400, 400)).unwrap();
    let area = doc.add_area(AreaRect::new(500, 500, 100, 60)).unwrap();

    doc.pan_all(IVec2::new(25, -15));

    assert_within_one_pixel(doc.station(station).unwrap().pixel, IVec2::new(425, 385));
    let rect = doc.area(area).unwrap().rect;
    assert_within_one_pixel(rect.top_left(), IVec2::new(525, 485));
    assert!((rect.width - 100).abs() <= 1);
}

#[test]
fn test_resize_viewport_keeps_geo() {
    let mut doc = document();
    let id = doc.add_station(IVec2::new(800, 450)).unwrap();
    let geo = doc.station(id).unwrap().geo;

    doc.resize_viewport(1000, 600);

    let station = doc.station(id).unwrap();
    assert_eq!(station.geo, geo);
    assert_within_one_pixel(station.pixel, IVec2::new(500, 300));
}

#[test]
fn test_owning_line_is_first_in_creation_order() {
    let mut doc = document();
    let s = doc.add_station(IVec2::new(100, 100)).unwrap();
    let first = doc.create_line().unwrap();
    let second = doc.create_line().unwrap();
    doc.append_to_line(second, s, 1).unwrap();
    doc.append_to_line(first, s, 2).unwrap();

    assert_eq!(doc.owning_line(s), Some(first));
    assert_eq!(doc.lines_through(s).count(), 2);
}

#[test]
fn test_append_to_unknown_line_or_station() {
    let mut doc = document();
    let s = doc.add_station(IVec2::new(100, 100)).unwrap();
    let line = doc.create_line().unwrap();

    assert_eq!(
        doc.append_to_line(LineId(9), s, 1),
        Err(NetworkError::UnknownLine(LineId(9)))
    );
    assert_eq!(
        doc.append_to_line(line, StationId(42), 1),
        Err(NetworkError::UnknownStation(StationId(42)))
    );
}

#[test]
fn test_remove_from_owning_line_keeps_station() {
    let mut doc = document();
    let a = doc.add_station(IVec2::new(100, 100)).unwrap();
    let b = doc.add_station(IVec2::new(200, 100)).unwrap();
    let line = doc.create_line().unwrap();
    doc.append_to_line(line, a, 1).unwrap();
    doc.append_to_line(line, b, 1).unwrap();

    assert_eq!(doc.remove_from_owning_line(b), Some((line, 1)));
    assert!(!doc.line(line).unwrap().contains(b));
    assert!(doc.station(b).is_some());
    assert_eq!(doc.remove_from_owning_line(b), None);
}

#[test]
fn test_stations_between_follows_line_order() {
    let mut doc = document();
    let ids: Vec<_> = (0..4)
        .map(|i| doc.add_station(IVec2::new(100 + 50 * i, 100)).unwrap())
        .collect();
    let line = doc.create_line().unwrap();
    for id in &ids {
        doc.append_to_line(line, *id, 1).unwrap();
    }

    assert_eq!(doc.stations_between(ids[3], ids[1]), vec![ids[1], ids[2], ids[3]]);
    assert!(doc.stations_between(ids[0], StationId(99)).is_empty());
}

#[test]
fn test_add_area_rejects_tiny_rect() {
    let mut doc = document();
    assert!(matches!(
        doc.add_area(AreaRect::new(10, 10, 3, 50)),
        Err(NetworkError::AreaTooSmall { .. })
    ));
    assert!(doc.areas().is_empty());
}

#[test]
fn test_station_area_is_last_containing_area() {
    let mut doc = document();
    let station = doc.add_station(IVec2::new(150, 150)).unwrap();
    assert!(doc.station(station).unwrap().area.is_none());

    let outer = doc.add_area(AreaRect::new(100, 100, 200, 200)).unwrap();
    assert_eq!(doc.station(station).unwrap().area, Some(outer));

    let inner = doc.add_area(AreaRect::new(120, 120, 60, 60)).unwrap();
    assert_eq!(doc.station(station).unwrap().area, Some(inner));

    doc.move_station(station, IVec2::new(100, 0));
    doc.refresh_station_areas();
    assert_eq!(doc.station(station).unwrap().area, Some(outer));
}

#[test]
fn test_move_area_clamps_top_left() {
    let mut doc = document();
    let area = doc.add_area(AreaRect::new(10, 10, 100, 100)).unwrap();

    let applied = doc.move_area(area, IVec2::new(-30, 5)).unwrap();

    assert_eq!(applied, IVec2::new(-9, 5));
    assert_eq!(doc.area(area).unwrap().rect, AreaRect::new(1, 15, 100, 100));
}

#[test]
fn test_extend_area_holds_opposite_edge() {
    let mut doc = document();
    let area = doc.add_area(AreaRect::new(200, 200, 100, 100)).unwrap();

    doc.extend_area(area, BorderSide::Left, IVec2::new(-20, 7)).unwrap();
    doc.extend_area(area, BorderSide::Bottom, IVec2::new(3, 40)).unwrap();

    assert_eq!(doc.area(area).unwrap().rect, AreaRect::new(180, 200, 120, 140));
}

#[test]
fn test_extend_area_rejects_collapse() {
    let mut doc = document();
    let area = doc.add_area(AreaRect::new(200, 200, 100, 100)).unwrap();

    let result = doc.extend_area(area, BorderSide::Right, IVec2::new(-98, 0));

    assert!(matches!(result, Err(NetworkError::AreaTooSmall { .. })));
    assert_eq!(doc.area(area).unwrap().rect, AreaRect::new(200, 200, 100, 100));
}

#[test]
fn test_extend_area_clamps_edge_to_window() {
    let mut doc = document();
    let area = doc.add_area(AreaRect::new(1500, 200, 90, 100)).unwrap();

    let applied = doc.extend_area(area, BorderSide::Right, IVec2::new(50, 0)).unwrap();

    assert_eq!(applied, IVec2::new(9, 0));
    assert_eq!(doc.area(area).unwrap().rect.right(), 1599);
}

#[test]
fn test_area_distribution_setters_clip() {
    let mut doc = document();
    let area = doc.add_area(AreaRect::new(0, 0, 50, 50)).unwrap();

    doc.set_area_population(area, PopulationCategory::Worker, 80).unwrap();
    assert_eq!(
        doc.set_area_population(area, PopulationCategory::Retired, 50),
        Ok(20)
    );
    assert_eq!(
        doc.set_area_destination(AreaId(9), DestinationCategory::Work, 10),
        Err(NetworkError::UnknownArea(AreaId(9)))
    );
}

#[test]
fn test_commit_draft_adds_event() {
    let mut doc = document();
    let a = doc.add_station(IVec2::new(100, 100)).unwrap();
    let b = doc.add_station(IVec2::new(200, 100)).unwrap();

    let mut draft = EventDraft {
        kind: EventKindTag::LineClosed,
        start: "2024/01/10-07:00".into(),
        end: "2024/01/10-08:00".into(),
        ..Default::default()
    };
    draft.record_station(PendingSelection::Start, a);
    draft.record_station(PendingSelection::End, b);

    let id = doc.commit_draft(&draft).unwrap();
    assert_eq!(id, EventId(0));
    assert_eq!(doc.next_event_id(), EventId(1));

    draft.end = "2024/01/10-06:00".into();
    assert!(doc.commit_draft(&draft).is_err());
    assert_eq!(doc.events().len(), 1);

    assert!(doc.remove_event(id).is_some());
    assert!(doc.events().is_empty());
}

#[test]
fn test_insert_moves_counters_past_ids() {
    let mut doc = document();
    let viewport = doc.viewport;
    doc.insert_station(Station::at_pixel(
        StationId(7),
        "Thun".into(),
        IVec2::new(10, 10),
        &viewport,
    ))
    .unwrap();
    doc.insert_line(Line::new(LineId(4))).unwrap();

    assert_eq!(doc.add_station(IVec2::new(20, 20)).unwrap(), StationId(8));
    assert_eq!(doc.create_line().unwrap(), LineId(5));
    assert!(doc.stations().iter().filter(|s| s.name == "Thun").count() == 1);
}

#[test]
fn test_insert_rejects_taken_ids() {
    let mut doc = document();
    let viewport = doc.viewport;
    let id = doc.add_station(IVec2::new(10, 10)).unwrap();

    let copy = Station::at_pixel(id, "Thun".into(), IVec2::new(50, 50), &viewport);
    assert_eq!(
        doc.insert_station(copy),
        Err(NetworkError::DuplicateId {
            kind: "station",
            id: id.0
        })
    );
    assert_eq!(doc.stations().len(), 1);

    let line = doc.create_line().unwrap();
    assert!(matches!(
        doc.insert_line(Line::new(line)),
        Err(NetworkError::DuplicateId { kind: "line", .. })
    ));
}

#[test]
fn test_ids_near_the_top_never_wrap() {
    let mut doc = document();
    let viewport = doc.viewport;
    let station = |id: u32| {
        Station::at_pixel(StationId(id), format!("S{}", id), IVec2::new(10, 10), &viewport)
    };

    assert_eq!(
        doc.insert_station(station(u32::MAX)),
        Err(NetworkError::IdOutOfRange {
            kind: "station",
            id: u32::MAX
        })
    );
    assert!(doc.stations().is_empty());

    doc.insert_station(station(u32::MAX - 2)).unwrap();
    assert_eq!(
        doc.add_station(IVec2::new(40, 40)),
        Err(NetworkError::IdOutOfRange {
            kind: "station",
            id: u32::MAX - 1
        })
    );
    assert_eq!(doc.stations().len(), 1);

    doc.insert_line(Line::new(LineId(u32::MAX - 2))).unwrap();
    assert!(matches!(
        doc.create_line(),
        Err(NetworkError::IdOutOfRange { kind: "line", .. })
    ));
}
