//! Two-phase task support for components.
//!
//! A task-capable component owns a `TaskAdapter`. During the pre-solve pass
//! it calls [`TaskAdapter::queue`] once per item; during the solve pass it
//! calls [`TaskAdapter::collect`] once per item, receiving results in the
//! order they were queued. An empty queue means no pre-solve pass ran and the
//! component should compute synchronously. [`TaskAdapter::reset`] runs at
//! the start of each cycle so handles never outlive the cycle that queued them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::error::LibraryError;
use crate::evaluation::driver::{Collected, EvaluationDriver, PendingComputation};
use crate::model::forest::Forest;
use crate::model::parameters::BranchParameters;

#[derive(Debug)]
pub enum TaskOutcome {
    Ready(Arc<Forest>),
    Cancelled,
    /// The item's pre-solve could not submit; compute it synchronously.
    NotQueued,
}

pub struct TaskAdapter {
    driver: Arc<EvaluationDriver>,
    /// `None` holds the place of an item whose submit failed.
    queued: Mutex<VecDeque<Option<PendingComputation>>>,
}

impl TaskAdapter {
    pub fn new(driver: Arc<EvaluationDriver>) -> Self {
        Self {
            driver,
            queued: Mutex::new(VecDeque::new()),
        }
    }

    pub fn driver(&self) -> &Arc<EvaluationDriver> {
        &self.driver
    }

    fn queue_lock(&self) -> MutexGuard<'_, VecDeque<Option<PendingComputation>>> {
        self.queued.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit one item. On failure the item still takes its place in the
    /// queue so later items collect their own results.
    pub fn queue(&self, params: BranchParameters) -> Result<(), LibraryError> {
        match self.driver.submit(params) {
            Ok(handle) => {
                self.queue_lock().push_back(Some(handle));
                Ok(())
            }
            Err(err) => {
                self.queue_lock().push_back(None);
                Err(err.into())
            }
        }
    }

    /// Next queued result, waiting for its worker if needed. `None` when
    /// nothing is queued.
    pub fn collect(&self) -> Option<TaskOutcome> {
        let entry = self.queue_lock().pop_front()?;
        let Some(handle) = entry else {
            return Some(TaskOutcome::NotQueued);
        };
        let id = handle.id();
        match self.driver.wait(handle) {
            Collected::Ready(forest) => Some(TaskOutcome::Ready(forest)),
            Collected::Cancelled | Collected::NotReady(_) => {
                debug!("Queued computation {} produced no forest", id);
                Some(TaskOutcome::Cancelled)
            }
        }
    }

    pub fn queued(&self) -> usize {
        self.queue_lock().len()
    }

    /// Cancel every queued computation. Handles stay queued so the solve
    /// pass still lines up item by item and sees `TaskOutcome::Cancelled`.
    pub fn cancel(&self) -> usize {
        self.queue_lock()
            .iter()
            .flatten()
            .filter(|handle| self.driver.cancel(handle))
            .count()
    }

    /// Cancel and forget everything still queued. Returns how many entries
    /// were dropped.
    pub fn reset(&self) -> usize {
        let stale: Vec<_> = self.queue_lock().drain(..).collect();
        for handle in stale.iter().flatten() {
            self.driver.cancel(handle);
        }
        if !stale.is_empty() {
            debug!("Dropped {} stale queued computation(s)", stale.len());
        }
        stale.len()
    }
}
