//! Global constants for the polygon editor

/// Default group assigned in the naming step
pub const DEFAULT_GROUP: &str = "1";

/// Hit tolerance for vertex selection, in image pixels
pub const VERTEX_TOLERANCE: f64 = 15.0;

/// Hit tolerance for edge insertion, in image pixels
pub const EDGE_TOLERANCE: f64 = 15.0;

/// Hit tolerance for the erase tool, in image pixels
pub const ERASE_TOLERANCE: f64 = 15.0;

/// Zoom step factor
pub const ZOOM_STEP: f64 = 1.2;

/// Minimum zoom level
pub const MIN_ZOOM: f64 = 0.5;

/// Maximum zoom level
pub const MAX_ZOOM: f64 = 5.0;

/// Default vertex marker radius, in render pixels
pub const VERTEX_RADIUS: f64 = 5.0;

/// Quiet period before a pending save fires
pub const AUTO_SAVE_DEBOUNCE_MS: u64 = 1000;

/// Interval between completion polls after a frame run
pub const POLL_INTERVAL_MS: u64 = 2000;

/// Deadline after which completion polling gives up
pub const POLL_TIMEOUT_MS: u64 = 30_000;

/// Resampling bounds for the point-density control
pub const MIN_RESAMPLE_POINTS: usize = 3;
pub const MAX_RESAMPLE_POINTS: usize = 100;

/// Point-density slider bounds
pub const MIN_POINT_DENSITY: usize = 6;
pub const MAX_POINT_DENSITY: usize = 100;
