// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake executor in tests while keeping
//! the production implementation in [`task_runner`](super::task_runner).

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationSection;
use crate::engine::{TaskReport, WorkUnit};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

use super::task_runner::{run_unit, UnitContext};

/// Future returned by [`ExecutorBackend::execute`].
pub type ExecutionFuture = Pin<Box<dyn Future<Output = Result<TaskReport>> + Send + 'static>>;

/// Trait abstracting how work units are executed.
///
/// The returned future must not borrow the backend: the runtime spawns every
/// unit of a level onto its own Tokio task.
pub trait ExecutorBackend: Send + Sync {
    fn execute(&self, unit: WorkUnit) -> ExecutionFuture;
}

/// Backend used in production: runs commands with `sh -c` in a work
/// directory, or simulates them.
#[derive(Debug, Clone)]
pub struct LocalExecutorBackend {
    fs: Arc<dyn FileSystem>,
    work_dir: PathBuf,
    simulation: SimulationSection,
    rng: Arc<Mutex<StdRng>>,
}

impl LocalExecutorBackend {
    pub fn new(work_dir: impl Into<PathBuf>, simulation: SimulationSection) -> Self {
        Self::with_file_system(Arc::new(RealFileSystem), work_dir, simulation)
    }

    /// Use `fs` to create outputs, e.g. an in-memory filesystem in tests.
    pub fn with_file_system(
        fs: Arc<dyn FileSystem>,
        work_dir: impl Into<PathBuf>,
        simulation: SimulationSection,
    ) -> Self {
        let rng = match simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            fs,
            work_dir: work_dir.into(),
            simulation,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Random simulated duration within the configured bounds.
    ///
    /// Bounds that no `Duration` can hold are clamped; a validated config
    /// never has them.
    fn simulated_duration(&self) -> Duration {
        let min = self.simulation.min_execution_time;
        let max = self.simulation.max_execution_time;
        // `gen_range` needs a non-empty, finite range.
        let secs = if min < max && (max - min).is_finite() {
            match self.rng.lock() {
                Ok(mut rng) => rng.gen_range(min..=max),
                Err(poisoned) => poisoned.into_inner().gen_range(min..=max),
            }
        } else {
            min
        };
        Duration::try_from_secs_f64(secs).unwrap_or_else(|_| {
            if secs > 0.0 {
                Duration::MAX
            } else {
                Duration::ZERO
            }
        })
    }
}

impl ExecutorBackend for LocalExecutorBackend {
    fn execute(&self, unit: WorkUnit) -> ExecutionFuture {
        let simulated_duration = unit.simulate.then(|| self.simulated_duration());
        let ctx = UnitContext {
            fs: Arc::clone(&self.fs),
            work_dir: self.work_dir.clone(),
            simulated_duration,
        };

        Box::pin(async move { Ok(run_unit(unit, ctx).await) })
    }
}
