use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wfdag::engine::{TaskOutcome, TaskReport, WorkUnit};
use wfdag::exec::{ExecutionFuture, ExecutorBackend};

/// Shared record of what a [`FakeExecutor`] did.
#[derive(Debug, Default)]
pub struct ExecutionLog {
    /// Task names in the order their units finished.
    pub finished: Mutex<Vec<String>>,
    /// Units handed to the executor, in dispatch order.
    pub dispatched: Mutex<Vec<WorkUnit>>,
    running: AtomicUsize,
    /// Highest number of units observed running at once.
    pub max_concurrent: AtomicUsize,
}

impl ExecutionLog {
    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn dispatched(&self) -> Vec<WorkUnit> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent.load(Ordering::SeqCst)
    }
}

/// A fake executor that:
/// - records which units were dispatched and when they finished
/// - sleeps for a short fixed delay, so units of one level overlap
/// - reports `Failed(1)` for tasks listed in `failing`, `Success` otherwise.
pub struct FakeExecutor {
    log: Arc<ExecutionLog>,
    failing: HashSet<String>,
    delay: Duration,
}

impl FakeExecutor {
    pub fn new(log: Arc<ExecutionLog>) -> Self {
        Self {
            log,
            failing: HashSet::new(),
            delay: Duration::from_millis(20),
        }
    }

    pub fn failing(mut self, task: &str) -> Self {
        self.failing.insert(task.to_string());
        self
    }
}

impl ExecutorBackend for FakeExecutor {
    fn execute(&self, unit: WorkUnit) -> ExecutionFuture {
        let log = Arc::clone(&self.log);
        let fails = self.failing.contains(&unit.name);
        let delay = self.delay;

        log.dispatched.lock().unwrap().push(unit.clone());

        Box::pin(async move {
            let now = log.running.fetch_add(1, Ordering::SeqCst) + 1;
            log.max_concurrent.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(delay).await;

            log.running.fetch_sub(1, Ordering::SeqCst);
            log.finished.lock().unwrap().push(unit.name.clone());

            let outcome = if fails {
                TaskOutcome::Failed(1)
            } else {
                TaskOutcome::Success
            };
            Ok(TaskReport::new(unit, outcome, delay.as_secs_f64()))
        })
    }
}
