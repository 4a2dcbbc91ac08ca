//! A spectral path tracer: traces single-wavelength light paths through a
//! hard-coded demo scene, accumulates them into CIE XYZ tristimulus
//! values, and tonemaps the result into an sRGB image shown live in a
//! window.
//!
//! The rendering work is organised as a pipeline of four stages (Trace,
//! Plot, Gather, Tonemap, see [`pipeline`]) multiplexed over a pool of
//! worker threads by a single [`scheduler::TaskScheduler`]. One thread runs
//! the scheduler's main loop and owns the viewer; the rest just ask the
//! scheduler for tasks and execute them.

pub mod color;
pub mod config;
pub mod entropy;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod scene;
pub mod scheduler;
pub mod viewer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use crate::scheduler::TaskScheduler;
use crate::viewer::{MinifbViewer, NullViewer, Viewer};

/// Runtime knobs. There is no scene-selection option; the demo scene is
/// the only one built.
#[derive(Clone, Copy)]
pub struct Config {
    pub image_width: usize,
    pub image_height: usize,
    /// Number of worker threads. `None` asks for `num_cpus::get()`.
    pub num_threads: Option<usize>,
    /// Run without opening a window (used by tests and CI).
    pub headless: bool,
}

impl Config {
    pub fn new(image_width: usize, image_height: usize) -> Config {
        Config { image_width, image_height, num_threads: None, headless: false }
    }

    pub fn from_cmdline(args: &[String]) -> Config {
        let mut config = Config::new(config::IMAGE_WIDTH, config::IMAGE_HEIGHT);
        if args.iter().any(|a| a == "--headless") {
            config.headless = true;
        }
        config
    }
}

/// Builds the demo scene, starts the worker pool, and drives the scheduler
/// until the viewer is closed. Mirrors the original's `RunMain`/
/// `RunWorker`/`ExecuteTask` split: a dedicated thread runs the scheduler
/// loop and owns the viewer, while the rest just pull tasks and execute
/// them until told to stop.
pub fn run(config: Config) -> Result<(), failure::Error> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("chroma_trace", log::LevelFilter::Info)
        .init();

    let scene = scene::demo::build();
    let num_threads = config.num_threads.unwrap_or_else(num_cpus::get).max(1);
    let scheduler = TaskScheduler::new(num_threads, config.image_width, config.image_height, &scene);

    let continue_rendering = Arc::new(AtomicBool::new(true));
    let mut viewer: Box<dyn Viewer> = if config.headless {
        Box::new(NullViewer)
    } else {
        Box::new(
            MinifbViewer::new("chroma_trace", config.image_width, config.image_height)
                .map_err(failure::Error::from)?,
        )
    };

    // Whichever worker happens to draw the Tonemap task ships its bytes
    // over this channel; only the thread that owns `viewer` ever touches
    // the window, since a window handle isn't safe to share across
    // threads the way the work units are.
    let (frame_tx, frame_rx) = mpsc::channel::<Vec<u8>>();

    thread::scope(|scope| {
        for id in 0..num_threads {
            let scheduler = &scheduler;
            let continue_rendering = Arc::clone(&continue_rendering);
            let frame_tx = frame_tx.clone();
            scope.spawn(move || {
                log::trace!("worker {} starting", id);
                let mut previous = None;
                while continue_rendering.load(Ordering::Relaxed) {
                    let task = scheduler.get_new_task(previous.take());
                    if let Some(rgb) = scheduler.execute(&task) {
                        if frame_tx.send(rgb).is_err() {
                            break;
                        }
                    }
                    previous = Some(task);
                }
            });
        }
        drop(frame_tx);

        for rgb in frame_rx {
            if !viewer.display(&rgb) {
                continue_rendering.store(false, Ordering::Relaxed);
            }
        }
    });

    Ok(())
}
