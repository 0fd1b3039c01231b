//! Projection between window pixels and geographic coordinates.
//!
//! The map underneath the network is a Web Mercator tile pyramid (256px tiles),
//! so a [`Viewport`] is fully described by the geographic point at the center of
//! the window, an integer zoom level and the window size in pixels.
//!
//! Geo is the authoritative representation across pan/zoom: after every viewport
//! change the network re-derives pixel positions through [`Viewport::to_pixel`].
//! During a drag the pixel position is authoritative and the geo position is
//! re-derived through [`Viewport::to_geo`].

use bevy::prelude::IVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

/// Edge length of one map tile in pixels
pub const TILE_SIZE: f64 = 256.0;

/// Lowest zoom level the viewport accepts
pub const MIN_ZOOM: u8 = 1;

/// Highest zoom level the viewport accepts
pub const MAX_ZOOM: u8 = 19;

/// Web Mercator cannot represent the poles
const MAX_LATITUDE: f64 = 85.051_128_78;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Default for GeoPosition {
    fn default() -> Self {
        // Lausanne
        Self::new(46.5197, 6.6323)
    }
}

fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2.0f64.powi(zoom as i32)
}

fn lon_to_world_x(lon: f64, zoom: u8) -> f64 {
    (lon + 180.0) / 360.0 * world_size(zoom)
}

fn lat_to_world_y(lat: f64, zoom: u8) -> f64 {
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * world_size(zoom)
}

fn world_x_to_lon(x: f64, zoom: u8) -> f64 {
    x / world_size(zoom) * 360.0 - 180.0
}

fn world_y_to_lat(y: f64, zoom: u8) -> f64 {
    let n = PI - 2.0 * PI * y / world_size(zoom);
    n.sinh().atan().to_degrees()
}

/// Step along one axis limited to the open interval (0, size).
pub fn clamp_step(position: i32, delta: i32, size: i32) -> i32 {
    let low = position.min(1);
    let high = position.max(size - 1);
    (position + delta).clamp(low, high) - position
}

/// The visible part of the map: center, zoom level and window size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPosition,
    pub zoom: u8,
    pub width: i32,
    pub height: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: GeoPosition::default(),
            zoom: 12,
            width: DEFAULT_WINDOW_WIDTH as i32,
            height: DEFAULT_WINDOW_HEIGHT as i32,
        }
    }
}

impl Viewport {
    pub fn new(center: GeoPosition, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            ..Default::default()
        }
    }

    fn center_world(&self) -> (f64, f64) {
        (
            lon_to_world_x(self.center.longitude, self.zoom),
            lat_to_world_y(self.center.latitude, self.zoom),
        )
    }

    fn half_size(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    fn set_center_world(&mut self, x: f64, y: f64) {
        let size = world_size(self.zoom);
        self.center = GeoPosition::new(
            world_y_to_lat(y.clamp(0.0, size), self.zoom),
            world_x_to_lon(x, self.zoom),
        );
    }

    /// Geographic position under a window pixel.
    pub fn to_geo(&self, pixel: IVec2) -> GeoPosition {
        let (cx, cy) = self.center_world();
        let (hw, hh) = self.half_size();
        let wx = cx + pixel.x as f64 - hw;
        let wy = cy + pixel.y as f64 - hh;
        GeoPosition::new(world_y_to_lat(wy, self.zoom), world_x_to_lon(wx, self.zoom))
    }

    /// Window pixel of a geographic position (rounded to the nearest pixel).
    pub fn to_pixel(&self, geo: GeoPosition) -> IVec2 {
        let (cx, cy) = self.center_world();
        let (hw, hh) = self.half_size();
        let px = lon_to_world_x(geo.longitude, self.zoom) - cx + hw;
        let py = lat_to_world_y(geo.latitude, self.zoom) - cy + hh;
        IVec2::new(px.round() as i32, py.round() as i32)
    }

    /// Whether a pixel lies strictly inside the window.
    pub fn contains(&self, pixel: IVec2) -> bool {
        pixel.x > 0 && pixel.x < self.width && pixel.y > 0 && pixel.y < self.height
    }

    /// Move the map so its content shifts by `delta` pixels on screen.
    pub fn pan_by_pixels(&mut self, delta: IVec2) {
        let (cx, cy) = self.center_world();
        self.set_center_world(cx - delta.x as f64, cy - delta.y as f64);
    }

    /// Change the zoom level by `steps`, keeping the geographic point under
    /// `anchor` at the same window pixel. Returns false if the zoom was already
    /// at the limit.
    pub fn zoom_by(&mut self, steps: i32, anchor: IVec2) -> bool {
        let new_zoom = (self.zoom as i32 + steps).clamp(MIN_ZOOM as i32, MAX_ZOOM as i32) as u8;
        if new_zoom == self.zoom {
            return false;
        }

        let anchor_geo = self.to_geo(anchor);
        self.zoom = new_zoom;

        let (hw, hh) = self.half_size();
        let ax = lon_to_world_x(anchor_geo.longitude, self.zoom);
        let ay = lat_to_world_y(anchor_geo.latitude, self.zoom);
        self.set_center_world(ax - (anchor.x as f64 - hw), ay - (anchor.y as f64 - hh));
        true
    }

    /// Recenter on `pixel` and zoom in one level.
    pub fn zoom_in_at(&mut self, pixel: IVec2) -> bool {
        if self.zoom >= MAX_ZOOM {
            return false;
        }
        self.center = self.to_geo(pixel);
        self.zoom += 1;
        true
    }

    /// Limit `delta` so that `anchor + delta` stays strictly inside the
    /// window. An anchor already outside may only move back inward.
    pub fn clamp_delta(&self, anchor: IVec2, delta: IVec2) -> IVec2 {
        IVec2::new(
            clamp_step(anchor.x, delta.x, self.width),
            clamp_step(anchor.y, delta.y, self.height),
        )
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }
}
