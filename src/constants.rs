//! Global constants for the annotation editor.

/// Maximum number of snapshots kept in the undo history.
pub const HISTORY_LIMIT: usize = 50;

/// A box drag must exceed this extent (in canvas pixels) on both axes to be committed.
pub const MIN_BOX_SIZE: f32 = 10.0;

/// Minimum number of vertices required for a committed polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Touch sequences shorter than this (milliseconds) may count as a tap.
pub const TAP_MAX_DURATION_MS: u64 = 300;

/// Touch sequences moving less than this (canvas pixels) may count as a tap.
pub const TAP_MOVE_THRESHOLD: f32 = 10.0;

/// Default maximum on-screen display box for the canvas.
pub const DEFAULT_DISPLAY_MAX_WIDTH: f32 = 800.0;
pub const DEFAULT_DISPLAY_MAX_HEIGHT: f32 = 600.0;

/// Label used for annotations without one when grouping exports by category.
pub const DEFAULT_EXPORT_LABEL: &str = "object";
