//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels (also the initial viewport width)
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels (also the initial viewport height)
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Display radius of a station circle in pixels
pub const STATION_RADIUS: i32 = 10;

/// Tolerance around area edges for border hits, and the margin that shrinks
/// the area interior for interior hits
pub const AREA_BORDER_MARGIN: i32 = 2;

/// Smallest width or height an area can be resized to
pub const MIN_AREA_SIZE: i32 = 2 * AREA_BORDER_MARGIN + 1;

/// Size of an area created with the area tool
pub const DEFAULT_AREA_WIDTH: i32 = 120;
pub const DEFAULT_AREA_HEIGHT: i32 = 80;

/// Maximum delay between two clicks to count as a double click (seconds)
pub const DOUBLE_CLICK_SECONDS: f64 = 0.35;

/// Maximum number of recent maps to remember in config
pub const MAX_RECENT_MAPS: usize = 5;

/// Maximum pointer travel between the two clicks of a double click (pixels)
pub const DOUBLE_CLICK_SLOP: i32 = 4;
