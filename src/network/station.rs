use bevy::prelude::IVec2;
use serde::{Deserialize, Serialize};

use crate::geo::{GeoPosition, Viewport};

use super::{AreaId, StationId};

/// A network node, positioned both on screen and on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub pixel: IVec2,
    pub geo: GeoPosition,
    /// Area the station lies in, if any (lookup only)
    pub area: Option<AreaId>,
}

impl Station {
    /// Create a station at a window pixel, deriving its geo position.
    pub fn at_pixel(id: StationId, name: String, pixel: IVec2, viewport: &Viewport) -> Self {
        Self {
            id,
            name,
            pixel,
            geo: viewport.to_geo(pixel),
            area: None,
        }
    }

    /// Create a station at a geo position, deriving its window pixel.
    pub fn at_geo(id: StationId, name: String, geo: GeoPosition, viewport: &Viewport) -> Self {
        Self {
            id,
            name,
            pixel: viewport.to_pixel(geo),
            geo,
            area: None,
        }
    }

    /// Move on screen; the pixel position is authoritative here.
    pub fn move_by(&mut self, delta: IVec2, viewport: &Viewport) {
        self.pixel += delta;
        self.geo = viewport.to_geo(self.pixel);
    }

    /// Re-derive the window pixel after a viewport change.
    pub fn sync_pixel(&mut self, viewport: &Viewport) {
        self.pixel = viewport.to_pixel(self.geo);
    }
}
