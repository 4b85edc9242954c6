use crate::error::{DemofitError, DfResult};
use crate::similarity::Method;
use clap::Args;

/// Lower bound on the worker pool, regardless of detected parallelism.
pub const MIN_WORKERS: usize = 1;
/// Upper bound on the worker pool, regardless of detected parallelism.
pub const MAX_WORKERS: usize = 100;

#[derive(Args, Debug, Clone)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub workers: WorkerParams,
}

#[derive(Args, Debug, Clone)]
pub struct SearchParams {
    /// Hard cap on search iterations per worker
    #[arg(long, default_value_t = 500_000)]
    pub max_iterations: u64,

    /// Consecutive reverted steps before a worker is judged converged
    #[arg(long, default_value_t = 50_000)]
    pub stagnation_limit: u64,

    /// Probability that a step mutates a descriptor effect rather than a
    /// county membership
    #[arg(long, default_value_t = 0.99)]
    pub descriptor_chance: f64,

    /// Maximum change (positive or negative) to a descriptor effect from one
    /// permutation
    #[arg(long, default_value_t = 0.25)]
    pub max_change: f64,

    /// Total descriptor slots, including the fixed nation and state descriptors
    #[arg(long, default_value_t = 500)]
    pub num_descriptors: usize,

    /// Similarity metric: l1, l2, cosine, or js
    #[arg(long, default_value_t = Method::Js)]
    pub method: Method,
}

#[derive(Args, Debug, Clone)]
pub struct WorkerParams {
    #[arg(long, default_value_t = MIN_WORKERS)]
    pub min_workers: usize,

    #[arg(long, default_value_t = MAX_WORKERS)]
    pub max_workers: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_iterations: 500_000,
            stagnation_limit: 50_000,
            descriptor_chance: 0.99,
            max_change: 0.25,
            num_descriptors: 500,
            method: Method::Js,
        }
    }
}

impl Default for WorkerParams {
    fn default() -> Self {
        Self {
            min_workers: MIN_WORKERS,
            max_workers: MAX_WORKERS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchParams::default(),
            workers: WorkerParams::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> DfResult<()> {
        let s = &self.search;
        if !(0.0..=1.0).contains(&s.descriptor_chance) {
            return Err(DemofitError::Config(format!(
                "--descriptor-chance must be in [0, 1], got {}",
                s.descriptor_chance
            )));
        }
        if s.max_change <= 0.0 {
            return Err(DemofitError::Config(format!(
                "--max-change must be positive, got {}",
                s.max_change
            )));
        }
        if self.workers.min_workers == 0 || self.workers.min_workers > self.workers.max_workers {
            return Err(DemofitError::Config(format!(
                "worker bounds must satisfy 1 <= min <= max, got {}..{}",
                self.workers.min_workers, self.workers.max_workers
            )));
        }
        Ok(())
    }
}
