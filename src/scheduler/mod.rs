//! Single-mutex task scheduler multiplexing worker threads across a pool
//! of trace/plot/gather/tonemap work units.
//!
//! The scheduler's own mutex guards only the bookkeeping queues; it is
//! released before a worker touches any work unit. Each unit is wrapped in
//! its own `parking_lot::Mutex` so that borrowing it is still safe Rust,
//! but the FIFO discipline below guarantees a unit is never claimed by two
//! tasks at once, so that per-unit lock is never contended.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::{self, TONEMAP_INTERVAL};
use crate::pipeline::{GatherUnit, PlotUnit, TonemapUnit, TraceUnit};
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Nothing was ready; the worker should back off briefly.
    Sleep,
    /// Render a batch of paths into a `TraceUnit`.
    Trace,
    /// Splat some done `TraceUnit`s into a `PlotUnit`.
    Plot,
    /// Fold some done `PlotUnit`s into the `GatherUnit`.
    Gather,
    /// Convert the `GatherUnit` into sRGB bytes.
    Tonemap,
}

/// A unit of work handed from the scheduler to a worker thread.
#[derive(Debug, Clone)]
pub struct Task {
    pub kind: TaskKind,
    /// Index of the primary unit this task operates (Trace, Plot unit
    /// used to plot into, or unused for Gather/Tonemap/Sleep).
    pub unit: usize,
    /// Dependent unit indices, e.g. the `TraceUnit`s a Plot task drains.
    pub other_units: Vec<usize>,
}

impl Task {
    fn sleep() -> Task {
        Task { kind: TaskKind::Sleep, unit: 0, other_units: Vec::new() }
    }
}

struct SchedulerState {
    available_trace: VecDeque<usize>,
    done_trace: VecDeque<usize>,
    available_plot: VecDeque<usize>,
    done_plot: VecDeque<usize>,
    gather_free: bool,
    tonemap_free: bool,
    image_changed: bool,
    last_tonemap_time: Instant,
}

pub struct TaskScheduler<'scene> {
    pub n_trace: usize,
    pub n_plot: usize,
    trace_units: Vec<Mutex<TraceUnit<'scene>>>,
    plot_units: Vec<Mutex<PlotUnit>>,
    gather_unit: Mutex<GatherUnit>,
    tonemap_unit: Mutex<TonemapUnit>,
    state: Mutex<SchedulerState>,
}

impl<'scene> TaskScheduler<'scene> {
    pub fn new(
        num_threads: usize,
        width: usize,
        height: usize,
        scene: &'scene Scene,
    ) -> TaskScheduler<'scene> {
        // More trace units than threads is sensible; fewer plot units is
        // fine, since one plot unit can drain several trace units.
        let n_trace = (num_threads * 3).max(1);
        let n_plot = (num_threads / 2).max(1);

        let mut seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);

        let mut trace_units = Vec::with_capacity(n_trace);
        for _ in 0..n_trace {
            let mut unit = TraceUnit::new(scene, seed, width, height);
            seed = unit.next_seed();
            trace_units.push(Mutex::new(unit));
        }

        let plot_units = (0..n_plot).map(|_| Mutex::new(PlotUnit::new(width, height))).collect();

        TaskScheduler {
            n_trace,
            n_plot,
            trace_units,
            plot_units,
            gather_unit: Mutex::new(GatherUnit::new(width, height)),
            tonemap_unit: Mutex::new(TonemapUnit::new(width, height)),
            state: Mutex::new(SchedulerState {
                available_trace: (0..n_trace).collect(),
                done_trace: VecDeque::new(),
                available_plot: (0..n_plot).collect(),
                done_plot: VecDeque::new(),
                gather_free: true,
                tonemap_free: true,
                image_changed: false,
                // Tonemap as soon as possible.
                last_tonemap_time: Instant::now() - TONEMAP_INTERVAL,
            }),
        }
    }

    /// Notifies the scheduler that `completed` finished (pass `None` for
    /// the very first call of a worker's loop), and returns the next task
    /// to run. Thread-safe; the critical section is short and allocation-
    /// free apart from `Task::other_units`.
    pub fn get_new_task(&self, completed: Option<Task>) -> Task {
        let mut state = self.state.lock();

        if let Some(task) = completed {
            Self::complete_task(&mut state, task);
        }

        let now = Instant::now();
        if now.duration_since(state.last_tonemap_time) > TONEMAP_INTERVAL {
            if state.image_changed {
                if state.gather_free && state.tonemap_free {
                    return Self::create_tonemap_task(&mut state);
                }
            } else if state.gather_free && !state.done_plot.is_empty() {
                return Self::create_gather_task(&mut state);
            }
        }

        if state.done_trace.len() > self.n_trace / 2 && !state.available_plot.is_empty() {
            return Self::create_plot_task(&mut state);
        }

        if !state.available_trace.is_empty() {
            return Self::create_trace_task(&mut state);
        }

        if !state.available_plot.is_empty() && !state.done_trace.is_empty() {
            return Self::create_plot_task(&mut state);
        }

        if state.gather_free && !state.done_plot.is_empty() {
            return Self::create_gather_task(&mut state);
        }

        Task::sleep()
    }

    fn create_trace_task(state: &mut SchedulerState) -> Task {
        let unit = state.available_trace.pop_front().expect("checked non-empty by caller");
        Task { kind: TaskKind::Trace, unit, other_units: Vec::new() }
    }

    fn create_plot_task(state: &mut SchedulerState) -> Task {
        let unit = state.available_plot.pop_front().expect("checked non-empty by caller");

        let done = state.done_trace.len();
        let n = done.min(((done + 1) / 2).max(1));
        let other_units = state.done_trace.drain(..n).collect();

        Task { kind: TaskKind::Plot, unit, other_units }
    }

    fn create_gather_task(state: &mut SchedulerState) -> Task {
        state.gather_free = false;
        let other_units = state.done_plot.drain(..).collect();
        Task { kind: TaskKind::Gather, unit: 0, other_units }
    }

    fn create_tonemap_task(state: &mut SchedulerState) -> Task {
        state.gather_free = false;
        state.tonemap_free = false;
        Task { kind: TaskKind::Tonemap, unit: 0, other_units: Vec::new() }
    }

    fn complete_task(state: &mut SchedulerState, task: Task) {
        match task.kind {
            TaskKind::Sleep => {}
            TaskKind::Trace => state.done_trace.push_back(task.unit),
            TaskKind::Plot => {
                state.available_trace.extend(task.other_units);
                state.done_plot.push_back(task.unit);
            }
            TaskKind::Gather => {
                state.available_plot.extend(task.other_units);
                state.gather_free = true;
                state.image_changed = true;
            }
            TaskKind::Tonemap => {
                state.gather_free = true;
                state.tonemap_free = true;
                state.image_changed = false;
                state.last_tonemap_time = Instant::now();
            }
        }
    }

    /// Executes `task` against its work units, entirely outside the
    /// scheduler's bookkeeping lock. Returns the freshly tonemapped RGB
    /// bytes when `task` was a Tonemap task, for the caller to hand to the
    /// viewer.
    pub fn execute(&self, task: &Task) -> Option<Vec<u8>> {
        match task.kind {
            TaskKind::Sleep => {
                std::thread::sleep(config::SLEEP_DURATION);
                None
            }
            TaskKind::Trace => {
                self.trace_units[task.unit].lock().render();
                None
            }
            TaskKind::Plot => {
                let mut plot_unit = self.plot_units[task.unit].lock();
                for &i in &task.other_units {
                    let trace_unit = self.trace_units[i].lock();
                    plot_unit.plot(&trace_unit);
                }
                None
            }
            TaskKind::Gather => {
                let mut gather_unit = self.gather_unit.lock();
                for &i in &task.other_units {
                    let mut plot_unit = self.plot_units[i].lock();
                    gather_unit.accumulate(&mut plot_unit);
                }
                None
            }
            TaskKind::Tonemap => {
                let gather_unit = self.gather_unit.lock();
                let mut tonemap_unit = self.tonemap_unit.lock();
                tonemap_unit.tonemap(&gather_unit);
                Some(tonemap_unit.rgb_buffer.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Quaternion, Vec3};
    use crate::scene::camera::Camera;

    fn test_scene() -> Scene {
        Scene::new(Vec::new(), |_| Camera {
            position: Vec3::zero(),
            field_of_view: 1.0,
            focal_distance: 1.0,
            depth_of_field: 1.0,
            chromatic_aberration: 0.0,
            orientation: Quaternion::identity(),
        })
    }

    #[test]
    fn unit_pool_sizes_follow_the_thread_count() {
        let scene = test_scene();
        let scheduler = TaskScheduler::new(4, 8, 8, &scene);
        assert_eq!(scheduler.n_trace, 12);
        assert_eq!(scheduler.n_plot, 2);
    }

    #[test]
    fn a_fresh_scheduler_hands_out_trace_tasks_first() {
        let scene = test_scene();
        let scheduler = TaskScheduler::new(1, 4, 4, &scene);
        let task = scheduler.get_new_task(None);
        assert_eq!(task.kind, TaskKind::Trace);
    }

    #[test]
    fn liveness_mostly_traces_and_rarely_sleeps() {
        let scene = test_scene();
        let scheduler = TaskScheduler::new(4, 4, 4, &scene);
        assert_eq!(scheduler.n_trace, 12);
        assert_eq!(scheduler.n_plot, 2);

        let mut prev: Option<Task> = None;
        let mut trace_count = 0;
        let mut sleep_count = 0;
        let total = 1000;

        for _ in 0..total {
            let task = scheduler.get_new_task(prev.take());
            match task.kind {
                TaskKind::Trace => trace_count += 1,
                TaskKind::Sleep => sleep_count += 1,
                _ => {}
            }
            // Completing the task synchronously (without running its
            // real work) is enough to exercise the state machine: the
            // scheduler only cares about which units are free, not about
            // buffer contents.
            prev = Some(task);
        }

        assert!(trace_count as f64 >= total as f64 * 0.5);
        assert!(sleep_count as f64 <= total as f64 * 0.1);
    }

    #[test]
    fn a_trace_unit_round_trips_through_trace_then_plot() {
        let scene = test_scene();
        let scheduler = TaskScheduler::new(1, 4, 4, &scene);

        let trace_task = scheduler.get_new_task(None);
        assert_eq!(trace_task.kind, TaskKind::Trace);
        scheduler.execute(&trace_task);

        // Force enough done trace units to trigger a plot task by
        // completing the trace task and asking again.
        let next = scheduler.get_new_task(Some(trace_task));
        assert!(matches!(next.kind, TaskKind::Trace | TaskKind::Plot));
    }
}
