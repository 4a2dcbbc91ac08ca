//! Fixed constants governing buffer sizes and pipeline timing.

use std::time::Duration;

/// Default canvas width in pixels.
pub const IMAGE_WIDTH: usize = 1280;

/// Default canvas height in pixels.
pub const IMAGE_HEIGHT: usize = 720;

/// Number of `MappedPhoton`s traced per `TraceUnit` batch. Debug builds use
/// a far smaller batch, since debug codegen makes the full batch glacial.
#[cfg(debug_assertions)]
pub const N_PATHS: usize = 1024 * 64;

#[cfg(not(debug_assertions))]
pub const N_PATHS: usize = 1024 * 512;

/// Minimum interval between tonemap/display updates.
pub const TONEMAP_INTERVAL: Duration = Duration::from_secs(10);

/// How long a worker sleeps when the scheduler has no task ready for it.
pub const SLEEP_DURATION: Duration = Duration::from_millis(100);
