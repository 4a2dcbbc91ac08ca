//! The four work-unit stages of the rendering pipeline: Trace, Plot,
//! Gather, Tonemap. Coordinated by [`crate::scheduler::TaskScheduler`].

pub mod gather_unit;
pub mod plot_unit;
pub mod tonemap_unit;
pub mod trace_unit;

pub use self::gather_unit::GatherUnit;
pub use self::plot_unit::PlotUnit;
pub use self::tonemap_unit::TonemapUnit;
pub use self::trace_unit::{MappedPhoton, TraceUnit};
