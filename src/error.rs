//! The crate's error type. A `failure`-derived enum reported at the top
//! level with a name and a backtrace.

use failure::Fail;

#[derive(Debug, Fail)]
pub enum RenderError {
    #[fail(display = "failed to open the viewer window: {}", reason)]
    ViewerUnavailable { reason: String },

    #[fail(display = "a worker thread panicked: {}", reason)]
    WorkerPanicked { reason: String },
}
