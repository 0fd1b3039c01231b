use bevy::prelude::IVec2;
use serde::{Deserialize, Serialize};

use crate::common::BorderSide;
use crate::constants::MIN_AREA_SIZE;
use crate::geo::{GeoPosition, Viewport};

use super::distribution::{DestinationCategory, Distribution, PopulationCategory};
use super::{AreaId, NetworkError};

/// Axis-aligned rectangle in window pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl AreaRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> IVec2 {
        IVec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Strictly inside the rectangle shrunk by `margin` on every side.
    pub fn interior_contains(&self, point: IVec2, margin: i32) -> bool {
        point.x > self.x + margin
            && point.x < self.right() - margin
            && point.y > self.y + margin
            && point.y < self.bottom() - margin
    }

    /// Within `margin` of one edge and within the rectangle's span on the
    /// other axis.
    pub fn near_border(&self, side: BorderSide, point: IVec2, margin: i32) -> bool {
        let within_x = point.x >= self.x && point.x <= self.right();
        let within_y = point.y >= self.y && point.y <= self.bottom();
        match side {
            BorderSide::Left => (point.x - self.x).abs() <= margin && within_y,
            BorderSide::Right => (point.x - self.right()).abs() <= margin && within_y,
            BorderSide::Top => (point.y - self.y).abs() <= margin && within_x,
            BorderSide::Bottom => (point.y - self.bottom()).abs() <= margin && within_x,
        }
    }
}

/// A rectangular catchment zone with population and destination breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub rect: AreaRect,
    pub top_left: GeoPosition,
    pub bottom_right: GeoPosition,
    pub population: Distribution<PopulationCategory>,
    pub destination: Distribution<DestinationCategory>,
}

impl Area {
    pub fn new(id: AreaId, rect: AreaRect, viewport: &Viewport) -> Result<Self, NetworkError> {
        if rect.width < MIN_AREA_SIZE || rect.height < MIN_AREA_SIZE {
            return Err(NetworkError::AreaTooSmall {
                width: rect.width,
                height: rect.height,
            });
        }

        let mut area = Self {
            id,
            rect,
            top_left: GeoPosition::default(),
            bottom_right: GeoPosition::default(),
            population: Distribution::default(),
            destination: Distribution::default(),
        };
        area.sync_geo(viewport);
        Ok(area)
    }

    /// Re-derive both geo corners from the pixel rect.
    pub fn sync_geo(&mut self, viewport: &Viewport) {
        self.top_left = viewport.to_geo(self.rect.top_left());
        self.bottom_right = viewport.to_geo(self.rect.bottom_right());
    }

    /// Re-derive the pixel rect (position and size) from the geo corners.
    pub fn sync_pixel(&mut self, viewport: &Viewport) {
        let top_left = viewport.to_pixel(self.top_left);
        let bottom_right = viewport.to_pixel(self.bottom_right);
        self.rect = AreaRect::new(
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
        );
    }

    pub fn move_by(&mut self, delta: IVec2, viewport: &Viewport) {
        self.rect.x += delta.x;
        self.rect.y += delta.y;
        self.sync_geo(viewport);
    }

    fn resize_to(&mut self, rect: AreaRect, viewport: &Viewport) -> Result<(), NetworkError> {
        if rect.width < MIN_AREA_SIZE || rect.height < MIN_AREA_SIZE {
            return Err(NetworkError::AreaTooSmall {
                width: rect.width,
                height: rect.height,
            });
        }
        self.rect = rect;
        self.sync_geo(viewport);
        Ok(())
    }

    /// Move the left edge by `dx`, keeping the right edge fixed.
    pub fn extend_left_side(&mut self, dx: i32, viewport: &Viewport) -> Result<(), NetworkError> {
        let r = self.rect;
        self.resize_to(AreaRect::new(r.x + dx, r.y, r.width - dx, r.height), viewport)
    }

    /// Move the right edge by `dx`, keeping the left edge fixed.
    pub fn extend_right_side(&mut self, dx: i32, viewport: &Viewport) -> Result<(), NetworkError> {
        let r = self.rect;
        self.resize_to(AreaRect::new(r.x, r.y, r.width + dx, r.height), viewport)
    }

    /// Move the top edge by `dy`, keeping the bottom edge fixed.
    pub fn extend_top_side(&mut self, dy: i32, viewport: &Viewport) -> Result<(), NetworkError> {
        let r = self.rect;
        self.resize_to(AreaRect::new(r.x, r.y + dy, r.width, r.height - dy), viewport)
    }

    /// Move the bottom edge by `dy`, keeping the top edge fixed.
    pub fn extend_bottom_side(&mut self, dy: i32, viewport: &Viewport) -> Result<(), NetworkError> {
        let r = self.rect;
        self.resize_to(AreaRect::new(r.x, r.y, r.width, r.height + dy), viewport)
    }

    /// Move one edge by the component of `delta` along its axis.
    pub fn extend(
        &mut self,
        side: BorderSide,
        delta: IVec2,
        viewport: &Viewport,
    ) -> Result<(), NetworkError> {
        match side {
            BorderSide::Left => self.extend_left_side(delta.x, viewport),
            BorderSide::Right => self.extend_right_side(delta.x, viewport),
            BorderSide::Top => self.extend_top_side(delta.y, viewport),
            BorderSide::Bottom => self.extend_bottom_side(delta.y, viewport),
        }
    }

    /// Pixel coordinate of one edge along its axis.
    pub fn edge(&self, side: BorderSide) -> i32 {
        match side {
            BorderSide::Left => self.rect.x,
            BorderSide::Right => self.rect.right(),
            BorderSide::Top => self.rect.y,
            BorderSide::Bottom => self.rect.bottom(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> (Area, Viewport) {
        let viewport = Viewport::default();
        let area = Area::new(AreaId(0), AreaRect::new(100, 100, 200, 120), &viewport).unwrap();
        (area, viewport)
    }

    #[test]
    fn test_new_rejects_degenerate_rect() {
        let viewport = Viewport::default();
        let result = Area::new(AreaId(0), AreaRect::new(0, 0, 1, 50), &viewport);
        assert!(matches!(result, Err(NetworkError::AreaTooSmall { width: 1, .. })));
    }

    #[test]
    fn test_new_syncs_geo_corners() {
        let (area, viewport) = area();
        assert_eq!(viewport.to_pixel(area.top_left), IVec2::new(100, 100));
        assert_eq!(viewport.to_pixel(area.bottom_right), IVec2::new(300, 220));
    }

    #[test]
    fn test_extend_left_holds_right_edge() {
        let (mut area, viewport) = area();
        area.extend_left_side(-30, &viewport).unwrap();
        assert_eq!(area.rect, AreaRect::new(70, 100, 230, 120));
        assert_eq!(area.rect.right(), 300);
    }

    #[test]
    fn test_extend_left_then_back_restores() {
        let (mut area, viewport) = area();
        let original = area.rect;
        for dx in [-40, -1, 1, 25, 90] {
            area.extend_left_side(dx, &viewport).unwrap();
            area.extend_left_side(-dx, &viewport).unwrap();
            assert_eq!(area.rect.width, original.width);
            assert_eq!(area.rect.x, original.x);
        }
    }

    #[test]
    fn test_extend_right_then_back_restores() {
        let (mut area, viewport) = area();
        let original = area.rect;
        for dx in [-40, -1, 1, 25, 90] {
            area.extend_right_side(dx, &viewport).unwrap();
            area.extend_right_side(-dx, &viewport).unwrap();
            assert_eq!(area.rect, original);
        }
    }

    #[test]
    fn test_extend_left_and_right_keep_opposite_edges() {
        let (mut area, viewport) = area();
        area.extend_left_side(15, &viewport).unwrap();
        area.extend_right_side(-15, &viewport).unwrap();
        assert_eq!(area.rect.x, 115);
        assert_eq!(area.rect.right(), 285);
        assert_eq!(area.rect.width, 170);
    }

    #[test]
    fn test_extend_top_and_bottom() {
        let (mut area, viewport) = area();
        area.extend_top_side(20, &viewport).unwrap();
        assert_eq!(area.rect, AreaRect::new(100, 120, 200, 100));
        area.extend_bottom_side(30, &viewport).unwrap();
        assert_eq!(area.rect, AreaRect::new(100, 120, 200, 130));
        assert_eq!(viewport.to_pixel(area.bottom_right), IVec2::new(300, 250));
    }

    #[test]
    fn test_extend_rejects_collapse_and_keeps_rect() {
        let (mut area, viewport) = area();
        let before = area.clone();
        assert!(area.extend_right_side(-200, &viewport).is_err());
        assert!(area.extend_top_side(500, &viewport).is_err());
        assert_eq!(area, before);
    }

    #[test]
    fn test_move_by_shifts_both_corners() {
        let (mut area, viewport) = area();
        area.move_by(IVec2::new(-20, 35), &viewport);
        assert_eq!(area.rect, AreaRect::new(80, 135, 200, 120));
        assert_eq!(viewport.to_pixel(area.top_left), IVec2::new(80, 135));
    }

    #[test]
    fn test_sync_pixel_rescales_on_zoom() {
        let (mut area, mut viewport) = area();
        viewport.zoom_by(1, IVec2::new(100, 100));
        area.sync_pixel(&viewport);

        assert!((area.rect.x - 100).abs() <= 1);
        assert!((area.rect.width - 400).abs() <= 1);
        assert!((area.rect.height - 240).abs() <= 1);
    }

    #[test]
    fn test_interior_excludes_margin() {
        let rect = AreaRect::new(0, 0, 100, 100);
        assert!(rect.interior_contains(IVec2::new(50, 50), 2));
        assert!(!rect.interior_contains(IVec2::new(2, 50), 2));
        assert!(rect.interior_contains(IVec2::new(3, 50), 2));
        assert!(!rect.interior_contains(IVec2::new(98, 50), 2));
    }

    #[test]
    fn test_near_border_requires_span() {
        let rect = AreaRect::new(10, 10, 100, 50);
        assert!(rect.near_border(BorderSide::Left, IVec2::new(12, 30), 2));
        assert!(rect.near_border(BorderSide::Left, IVec2::new(8, 30), 2));
        assert!(!rect.near_border(BorderSide::Left, IVec2::new(7, 30), 2));
        assert!(!rect.near_border(BorderSide::Left, IVec2::new(10, 70), 2));
        assert!(rect.near_border(BorderSide::Bottom, IVec2::new(50, 61), 2));
        assert!(rect.near_border(BorderSide::Right, IVec2::new(110, 10), 2));
        assert!(!rect.near_border(BorderSide::Top, IVec2::new(120, 10), 2));
    }

    #[test]
    fn test_edge_positions() {
        let (area, _) = area();
        assert_eq!(area.edge(BorderSide::Left), 100);
        assert_eq!(area.edge(BorderSide::Right), 300);
        assert_eq!(area.edge(BorderSide::Top), 100);
        assert_eq!(area.edge(BorderSide::Bottom), 220);
    }
}
