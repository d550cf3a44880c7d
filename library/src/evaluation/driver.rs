//! Background forest evaluation with pollable handles.
//!
//! `submit` hands the parameters to a pool of worker threads and returns a
//! [`PendingComputation`] straight away. The handle is later passed to
//! `try_collect` (non-blocking) or `wait` (blocking) which either yields the
//! forest, reports that the work was cancelled, or hands the handle back
//! while the worker is still busy. Handles are not `Clone`, so a result can
//! only ever be collected once.

use std::cmp;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, mpsc};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};
use uuid::Uuid;

use super::builder::ForestBuilder;
use crate::cache::ForestCache;
use crate::model::forest::Forest;
use crate::model::parameters::BranchParameters;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComputationState {
    Submitted,
    Running,
    Completed,
    Cancelled,
}

/// Handle to one queued forest evaluation.
#[derive(Debug)]
pub struct PendingComputation {
    id: Uuid,
    params: BranchParameters,
}

impl PendingComputation {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn parameters(&self) -> &BranchParameters {
        &self.params
    }
}

/// Outcome of collecting a [`PendingComputation`].
#[derive(Debug)]
pub enum Collected {
    Ready(Arc<Forest>),
    /// Still queued or running; poll again with the returned handle.
    NotReady(PendingComputation),
    /// Cancelled before a result was collected. No forest will follow.
    Cancelled,
}

impl Collected {
    pub fn is_ready(&self) -> bool {
        matches!(self, Collected::Ready(_))
    }

    pub fn into_forest(self) -> Option<Arc<Forest>> {
        match self {
            Collected::Ready(forest) => Some(forest),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub worker_count: Option<usize>,
    pub builder: ForestBuilder,
    pub cache_capacity: usize,
    pub cache_segment_budget: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            builder: ForestBuilder::default(),
            cache_capacity: crate::cache::DEFAULT_FOREST_CACHE_SIZE,
            cache_segment_budget: crate::cache::DEFAULT_CACHE_SEGMENT_BUDGET,
        }
    }
}

impl DriverConfig {
    fn worker_count(&self) -> usize {
        if let Some(count) = self.worker_count {
            return cmp::max(1, count);
        }
        thread::available_parallelism()
            .map(|v| v.get())
            .unwrap_or(1)
    }
}

struct Slot {
    state: ComputationState,
    cancel: Arc<AtomicBool>,
    result: Option<Arc<Forest>>,
}

struct Job {
    id: Uuid,
    params: BranchParameters,
    cancel: Arc<AtomicBool>,
}

/// Pending work keyed by handle id, shared by the caller and the workers.
#[derive(Default)]
struct Registry {
    slots: Mutex<HashMap<Uuid, Slot>>,
    changed: Condvar,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mark_running(&self, id: Uuid) -> bool {
        let mut slots = self.lock();
        match slots.get_mut(&id) {
            Some(slot) if slot.state == ComputationState::Submitted => {
                slot.state = ComputationState::Running;
                true
            }
            _ => false,
        }
    }

    fn finish(&self, id: Uuid, result: Option<Arc<Forest>>) {
        let mut slots = self.lock();
        if let Some(slot) = slots.get_mut(&id) {
            if slot.state == ComputationState::Running {
                match result {
                    Some(forest) if !slot.cancel.load(Ordering::Acquire) => {
                        slot.state = ComputationState::Completed;
                        slot.result = Some(forest);
                    }
                    _ => slot.state = ComputationState::Cancelled,
                }
            }
        }
        self.changed.notify_all();
    }

    /// Raises the cancel flag. A running slot stays `Running` until its
    /// worker observes the flag; any other slot settles as `Cancelled` now.
    fn cancel_slot(slot: &mut Slot) -> bool {
        if slot.cancel.swap(true, Ordering::AcqRel) {
            return false;
        }
        if slot.state != ComputationState::Running {
            slot.state = ComputationState::Cancelled;
            slot.result = None;
        }
        true
    }

    /// Takes the slot out once it has settled. `Err` hands the handle back.
    fn take_settled(
        slots: &mut HashMap<Uuid, Slot>,
        handle: PendingComputation,
    ) -> Result<Collected, PendingComputation> {
        let state = match slots.get(&handle.id) {
            Some(slot) => slot.state,
            None => {
                warn!("Computation {} is not registered; treating it as cancelled", handle.id);
                return Ok(Collected::Cancelled);
            }
        };
        match state {
            ComputationState::Submitted | ComputationState::Running => Err(handle),
            ComputationState::Completed | ComputationState::Cancelled => {
                let slot = slots.remove(&handle.id);
                Ok(match slot.and_then(|s| s.result) {
                    Some(forest) => Collected::Ready(forest),
                    None => Collected::Cancelled,
                })
            }
        }
    }
}

struct Shared {
    registry: Registry,
    cache: ForestCache,
    builder: ForestBuilder,
}

impl Shared {
    fn compute(&self, params: &BranchParameters, cancel: Option<&AtomicBool>) -> Option<Arc<Forest>> {
        let key = params.key(self.builder.angle_unit);
        if let Some(forest) = self.cache.get(&key) {
            debug!("Forest cache hit for {:?}", params);
            return Some(forest);
        }
        let forest = match cancel {
            Some(flag) => self.builder.build_cancellable(params, flag)?,
            None => self.builder.build(params),
        };
        let forest = Arc::new(forest);
        self.cache.put(key, Arc::clone(&forest));
        Some(forest)
    }
}

pub struct EvaluationDriver {
    shared: Arc<Shared>,
    job_tx: Mutex<Option<mpsc::Sender<Job>>>,
    workers: Vec<JoinHandle<()>>,
}

impl EvaluationDriver {
    pub fn new(config: DriverConfig) -> Self {
        let shared = Arc::new(Shared {
            registry: Registry::default(),
            cache: ForestCache::new(config.cache_capacity, config.cache_segment_budget),
            builder: config.builder,
        });
        let (job_tx, workers) = Self::spawn_workers(&shared, config.worker_count());
        Self {
            shared,
            job_tx: Mutex::new(Some(job_tx)),
            workers,
        }
    }

    pub fn builder(&self) -> &ForestBuilder {
        &self.shared.builder
    }

    /// Queue a forest evaluation. Never waits for the work itself.
    pub fn submit(&self, params: BranchParameters) -> Result<PendingComputation, DriverError> {
        let job_tx = self.job_tx.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = job_tx.as_ref().ok_or(DriverError::QueueClosed)?;
        let id = Uuid::new_v4();
        let cancel = Arc::new(AtomicBool::new(false));

        self.shared.registry.lock().insert(
            id,
            Slot {
                state: ComputationState::Submitted,
                cancel: Arc::clone(&cancel),
                result: None,
            },
        );

        if sender.send(Job { id, params, cancel }).is_err() {
            self.shared.registry.lock().remove(&id);
            return Err(DriverError::SubmitFailed);
        }
        debug!("Submitted computation {} ({} iterations)", id, params.iterations());
        Ok(PendingComputation { id, params })
    }

    /// Non-blocking poll.
    pub fn try_collect(&self, handle: PendingComputation) -> Collected {
        let mut slots = self.shared.registry.lock();
        match Registry::take_settled(&mut slots, handle) {
            Ok(collected) => collected,
            Err(handle) => Collected::NotReady(handle),
        }
    }

    /// Block until the computation completes or is cancelled.
    pub fn wait(&self, handle: PendingComputation) -> Collected {
        let mut handle = handle;
        let mut slots = self.shared.registry.lock();
        loop {
            match Registry::take_settled(&mut slots, handle) {
                Ok(collected) => return collected,
                Err(pending) => {
                    handle = pending;
                    slots = self
                        .shared
                        .registry
                        .changed
                        .wait(slots)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    /// Compute on the calling thread, bypassing the queue.
    pub fn solve_synchronously(&self, params: &BranchParameters) -> Arc<Forest> {
        match self.shared.compute(params, None) {
            Some(forest) => forest,
            None => Arc::new(self.shared.builder.build(params)),
        }
    }

    /// Returns `false` if the handle was already cancelled or collected.
    pub fn cancel(&self, handle: &PendingComputation) -> bool {
        let cancelled = {
            let mut slots = self.shared.registry.lock();
            slots.get_mut(&handle.id).is_some_and(Registry::cancel_slot)
        };
        if cancelled {
            debug!("Cancelled computation {}", handle.id);
        }
        self.shared.registry.changed.notify_all();
        cancelled
    }

    pub fn cancel_all(&self) -> usize {
        let cancelled = {
            let mut slots = self.shared.registry.lock();
            slots
                .values_mut()
                .map(Registry::cancel_slot)
                .filter(|cancelled| *cancelled)
                .count()
        };
        if cancelled > 0 {
            info!("Cancelled {} pending computation(s)", cancelled);
        }
        self.shared.registry.changed.notify_all();
        cancelled
    }

    pub fn state(&self, handle: &PendingComputation) -> Option<ComputationState> {
        self.shared.registry.lock().get(&handle.id).map(|slot| slot.state)
    }

    /// Computations submitted but not yet collected.
    pub fn pending_count(&self) -> usize {
        self.shared.registry.lock().len()
    }

    pub fn cache(&self) -> &ForestCache {
        &self.shared.cache
    }

    /// Stop accepting work. Jobs already queued still run and can be
    /// collected; later `submit` calls fail with `DriverError::QueueClosed`.
    pub fn close(&self) {
        let sender = self
            .job_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if sender.is_some() {
            info!("EvaluationDriver closed to new work");
        }
    }

    pub fn finish(mut self) -> Result<(), DriverError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), DriverError> {
        self.cancel_all();
        self.close();

        for handle in self.workers.drain(..) {
            handle.join().map_err(|_| DriverError::WorkerPanicked)?;
        }
        Ok(())
    }

    fn spawn_workers(
        shared: &Arc<Shared>,
        worker_count: usize,
    ) -> (mpsc::Sender<Job>, Vec<JoinHandle<()>>) {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let job_rx = Arc::new(Mutex::new(job_rx));

        info!("EvaluationDriver starting {} worker(s)", worker_count);

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let shared = Arc::clone(shared);
            let job_rx = Arc::clone(&job_rx);

            let handle = thread::spawn(move || {
                loop {
                    let job = {
                        let receiver = job_rx.lock().unwrap_or_else(PoisonError::into_inner);
                        receiver.recv()
                    };

                    let job = match job {
                        Ok(job) => job,
                        Err(_) => break,
                    };

                    if !shared.registry.mark_running(job.id) {
                        debug!("Worker {} skipping cancelled computation {}", worker_id, job.id);
                        continue;
                    }

                    debug!("Worker {} computing {}", worker_id, job.id);
                    let result = shared.compute(&job.params, Some(job.cancel.as_ref()));
                    if result.is_none() {
                        debug!("Worker {} abandoned computation {}", worker_id, job.id);
                    }
                    shared.registry.finish(job.id, result);
                }
            });
            workers.push(handle);
        }

        (job_tx, workers)
    }
}

impl Default for EvaluationDriver {
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}

impl Drop for EvaluationDriver {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

#[derive(Debug)]
pub enum DriverError {
    QueueClosed,
    SubmitFailed,
    WorkerPanicked,
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverError::QueueClosed => write!(f, "evaluation queue already closed"),
            DriverError::SubmitFailed => write!(f, "failed to submit computation to evaluation queue"),
            DriverError::WorkerPanicked => write!(f, "evaluation worker thread panicked"),
        }
    }
}

impl std::error::Error for DriverError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn single_worker() -> EvaluationDriver {
        EvaluationDriver::new(DriverConfig {
            worker_count: Some(1),
            cache_capacity: 0,
            ..DriverConfig::default()
        })
    }

    fn poll_until_settled(driver: &EvaluationDriver, mut handle: PendingComputation) -> Collected {
        let deadline = Instant::now() + Duration::from_secs(30);
        loop {
            match driver.try_collect(handle) {
                Collected::NotReady(pending) => {
                    assert!(Instant::now() < deadline, "computation never settled");
                    handle = pending;
                    thread::sleep(Duration::from_millis(2));
                }
                settled => return settled,
            }
        }
    }

    #[test]
    fn test_collect_removes_entry() {
        let driver = single_worker();
        let handle = driver.submit(BranchParameters::new(1.0, 30.0, 0.5, 3)).unwrap();
        assert_eq!(driver.pending_count(), 1);
        assert!(driver.wait(handle).is_ready());
        assert_eq!(driver.pending_count(), 0);
    }

    #[test]
    fn test_handles_are_never_reused() {
        let driver = single_worker();
        let params = BranchParameters::new(1.0, 30.0, 0.5, 1);
        let a = driver.submit(params).unwrap();
        let b = driver.submit(params).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(driver.wait(a).into_forest(), driver.wait(b).into_forest());
    }

    #[test]
    fn test_cancel_after_completion_discards_result() {
        let driver = single_worker();
        let handle = driver.submit(BranchParameters::new(1.0, 30.0, 0.5, 2)).unwrap();
        let deadline = Instant::now() + Duration::from_secs(30);
        while driver.state(&handle) != Some(ComputationState::Completed) {
            assert!(Instant::now() < deadline);
            thread::sleep(Duration::from_millis(1));
        }
        assert!(driver.cancel(&handle));
        assert!(!driver.cancel(&handle));
        assert!(matches!(poll_until_settled(&driver, handle), Collected::Cancelled));
    }

    #[test]
    fn test_submit_after_finish_is_rejected() {
        let mut driver = single_worker();
        driver.shutdown().unwrap();
        let err = driver.submit(BranchParameters::new(1.0, 0.0, 1.0, 0)).unwrap_err();
        assert!(matches!(err, DriverError::QueueClosed));
    }

    #[test]
    fn test_running_computation_settles_when_worker_observes_flag() {
        let driver = single_worker();
        let handle = driver.submit(BranchParameters::new(1.0, 30.0, 0.99, 21)).unwrap();
        let deadline = Instant::now() + Duration::from_secs(30);
        while driver.state(&handle) == Some(ComputationState::Submitted) {
            assert!(Instant::now() < deadline);
            thread::yield_now();
        }
        assert!(driver.cancel(&handle));
        assert!(!driver.cancel(&handle));
        assert!(matches!(
            driver.state(&handle),
            Some(ComputationState::Running | ComputationState::Cancelled)
        ));
        assert!(matches!(driver.wait(handle), Collected::Cancelled));
    }

    #[test]
    fn test_close_rejects_new_work_but_finishes_queued() {
        let driver = single_worker();
        let params = BranchParameters::new(1.0, 30.0, 0.5, 3);
        let queued = driver.submit(params).unwrap();
        driver.close();
        assert!(matches!(driver.submit(params), Err(DriverError::QueueClosed)));
        assert_eq!(driver.wait(queued).into_forest().map(|f| f.count()), Some(15));
    }

    #[test]
    fn test_oversized_worker_result_is_not_cached() {
        let driver = EvaluationDriver::new(DriverConfig {
            worker_count: Some(1),
            cache_capacity: 4,
            cache_segment_budget: 10,
            ..DriverConfig::default()
        });
        let big = driver.submit(BranchParameters::new(1.0, 30.0, 0.5, 3)).unwrap();
        assert!(driver.wait(big).is_ready());
        assert!(driver.cache().is_empty());

        let small = driver.submit(BranchParameters::new(1.0, 30.0, 0.5, 2)).unwrap();
        assert!(driver.wait(small).is_ready());
        assert_eq!(driver.cache().len(), 1);
    }

    #[test]
    fn test_worker_results_fill_cache() {
        let driver = EvaluationDriver::new(DriverConfig {
            worker_count: Some(1),
            cache_capacity: 4,
            ..DriverConfig::default()
        });
        let params = BranchParameters::new(2.0, 15.0, 0.5, 4);
        let collected = driver.wait(driver.submit(params).unwrap()).into_forest().unwrap();
        assert_eq!(driver.cache().len(), 1);
        let direct = driver.solve_synchronously(&params);
        assert!(Arc::ptr_eq(&collected, &direct));
    }
}
