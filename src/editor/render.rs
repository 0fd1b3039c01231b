//! Immediate-mode drawing of the network with gizmos.

use bevy::prelude::*;

use crate::constants::STATION_RADIUS;
use crate::network::NetworkDocument;
use crate::theme;

use super::camera::pixel_to_world;
use super::session::EditorSession;
use super::tools::LineBuilder;

/// Distance between the hatching lines inside an area
const AREA_HATCH_SPACING: i32 = 12;

pub fn draw_areas(mut gizmos: Gizmos, doc: Res<NetworkDocument>, session: Res<EditorSession>) {
    let viewport = &doc.viewport;
    let active = session.gesture.state().area();
    for area in doc.areas() {
        let rect = area.rect;
        let top_left = pixel_to_world(rect.top_left(), viewport);
        let size = Vec2::new(rect.width as f32, rect.height as f32);
        let center = top_left + Vec2::new(size.x / 2.0, -size.y / 2.0);

        let mut y = rect.y + AREA_HATCH_SPACING;
        while y < rect.bottom() {
            gizmos.line_2d(
                pixel_to_world(IVec2::new(rect.x, y), viewport),
                pixel_to_world(IVec2::new(rect.right(), y), viewport),
                theme::AREA_FILL,
            );
            y += AREA_HATCH_SPACING;
        }

        let outline = if Some(area.id) == active {
            theme::STATION_ACTIVE
        } else {
            theme::AREA_OUTLINE
        };
        gizmos.rect_2d(Isometry2d::from_translation(center), size, outline);
    }
}

pub fn draw_lines(mut gizmos: Gizmos, doc: Res<NetworkDocument>, builder: Res<LineBuilder>) {
    let viewport = &doc.viewport;
    for line in doc.lines() {
        let points: Vec<Vec2> = line
            .stations()
            .filter_map(|id| doc.station(id))
            .map(|station| pixel_to_world(station.pixel, viewport))
            .collect();
        if points.len() < 2 {
            continue;
        }

        let color = theme::line_color(line.palette_index);
        gizmos.linestrip_2d(points.iter().copied(), color);

        // Double stroke marks the line under construction
        if builder.active == Some(line.id) {
            gizmos.linestrip_2d(points.iter().map(|p| *p + Vec2::new(0.0, 2.0)), color);
        }
    }
}

pub fn draw_stations(mut gizmos: Gizmos, doc: Res<NetworkDocument>, session: Res<EditorSession>) {
    let viewport = &doc.viewport;
    let highlighted = session.highlighted_stations(&doc);
    let active = session.gesture.state().station().or(session.merge.source());

    for station in doc.stations() {
        let color = if Some(station.id) == active {
            theme::STATION_ACTIVE
        } else if highlighted.contains(&station.id) {
            theme::EVENT_RANGE_HIGHLIGHT
        } else {
            theme::STATION_COLOR
        };

        gizmos.circle_2d(
            Isometry2d::from_translation(pixel_to_world(station.pixel, viewport)),
            STATION_RADIUS as f32,
            color,
        );
    }
}
