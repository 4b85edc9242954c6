use crate::config::Config;
use crate::model::Model;
use crate::optimizer::{Searcher, StopReason};
use crate::results::RunResult;
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{error, warn};

/// Cooperative cancellation flag, polled once per search iteration by every
/// worker. Created at orchestration start and injected per worker; an
/// external signal handler flips it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Receives every new global-best snapshot. Implementations persist it
/// durably so progress survives an interrupted process.
pub trait ProgressSink: Send + Sync {
    fn on_best(&self, worker: usize, iteration: u64, result: &RunResult) -> crate::error::DfResult<()>;
}

/// Sink that drops everything. Useful for tests and dry runs.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_best(&self, _worker: usize, _iteration: u64, _result: &RunResult) -> crate::error::DfResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct WorkerOutcome {
    pub worker: usize,
    pub score: f64,
    pub iterations: u64,
    pub stop: StopReason,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub best_score: f64,
    pub best: Option<RunResult>,
    pub workers: Vec<WorkerOutcome>,
}

struct BestSlot {
    score: f64,
    result: Option<RunResult>,
}

/// Spawns one isolated search run per worker and reduces the results into a
/// single checkpointed best.
///
/// The base model is read-only here: each worker gets its own deep copy, so
/// the only shared mutable state is the best slot and its backing checkpoint
/// store, both guarded by one mutex with a short compare-and-maybe-write
/// critical section.
pub struct Orchestrator {
    base: Model,
    config: Config,
}

impl Orchestrator {
    pub fn new(base: Model, config: Config) -> Self {
        Self { base, config }
    }

    pub fn worker_count(&self) -> usize {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        available.clamp(self.config.workers.min_workers, self.config.workers.max_workers)
    }

    /// Run every worker to termination and return the overall best. Workers
    /// are seeded `seed + index` when a seed is given, so a seeded run is
    /// reproducible regardless of scheduling order.
    pub fn run(
        &self,
        seed: Option<u64>,
        cancel: &CancelToken,
        sink: &dyn ProgressSink,
    ) -> SearchOutcome {
        let best = Mutex::new(BestSlot {
            score: f64::NEG_INFINITY,
            result: None,
        });

        let workers: Vec<WorkerOutcome> = (0..self.worker_count())
            .into_par_iter()
            .filter_map(|i| {
                let outcome =
                    catch_unwind(AssertUnwindSafe(|| self.run_worker(i, seed, cancel, &best, sink)));
                match outcome {
                    Ok(w) => Some(w),
                    Err(_) => {
                        // One worker down; the rest keep searching. Its
                        // outcome row is dropped, but any bests it already
                        // published stay in the slot.
                        error!("worker {} panicked, discarding its run", i);
                        None
                    }
                }
            })
            .collect();

        let slot = best.into_inner().unwrap_or_else(|p| p.into_inner());
        SearchOutcome {
            best_score: slot.score,
            best: slot.result,
            workers,
        }
    }

    fn run_worker(
        &self,
        worker: usize,
        seed: Option<u64>,
        cancel: &CancelToken,
        best: &Mutex<BestSlot>,
        sink: &dyn ProgressSink,
    ) -> WorkerOutcome {
        let model = self.base.clone();
        let mut searcher = Searcher::new(
            model,
            self.config.search.clone(),
            seed.map(|s| s.wrapping_add(worker as u64)),
        );

        let stop = searcher.run(cancel, |model, iteration, score| {
            self.try_publish(worker, iteration, score, model, best, sink);
        });

        // Final report, so even a zero-improvement run lands in the slot
        // when it happens to hold the best score.
        self.try_publish(
            worker,
            searcher.iterations,
            searcher.score,
            &mut searcher.model,
            best,
            sink,
        );

        WorkerOutcome {
            worker,
            score: searcher.score,
            iterations: searcher.iterations,
            stop,
        }
    }

    /// Compare-and-maybe-write against the shared best. The snapshot build
    /// and checkpoint write happen only on a strict improvement.
    fn try_publish(
        &self,
        worker: usize,
        iteration: u64,
        score: f64,
        model: &mut Model,
        best: &Mutex<BestSlot>,
        sink: &dyn ProgressSink,
    ) {
        let mut slot = best.lock().unwrap_or_else(|p| p.into_inner());
        if score > slot.score {
            let result = RunResult::from_model(model, self.config.search.method);
            if let Err(e) = sink.on_best(worker, iteration, &result) {
                warn!("failed to checkpoint best result: {}", e);
            }
            slot.score = score;
            slot.result = Some(result);
        }
    }
}
