// ===== demofit/src/optimizer/mod.rs =====
pub mod change;
pub mod runner;

pub use self::change::PendingChange;
pub use self::runner::{
    CancelToken, NullSink, Orchestrator, ProgressSink, SearchOutcome, WorkerOutcome,
};

use crate::config::SearchParams;
use crate::model::Model;

/// Why a worker's search loop stopped. Cancellation is an expected early-out,
/// distinct from convergence and from running out of iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    IterationCap,
    Converged,
    Cancelled,
}

/// One isolated search run: stochastic coordinate ascent with strict
/// revert-on-worse over a privately owned model.
///
/// Each step proposes a single perturbation, rescores the nation, and keeps
/// the change only if the score did not drop. Ties count as improvement; a
/// worse state is never kept, even probabilistically.
pub struct Searcher {
    pub model: Model,
    pub rng: fastrand::Rng,
    params: SearchParams,
    pub score: f64,
    pub iterations: u64,
    stagnation: u64,
}

impl Searcher {
    pub fn new(model: Model, params: SearchParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        let mut searcher = Self {
            model,
            rng,
            params,
            score: 0.0,
            iterations: 0,
            stagnation: 0,
        };
        searcher.score = searcher.model.national_score(searcher.params.method);
        searcher
    }

    pub fn stagnation(&self) -> u64 {
        self.stagnation
    }

    /// Draw the next perturbation. Fixed descriptors still receive effect
    /// mutations; membership toggles are drawn from the modifiable pool only.
    fn propose(&mut self) -> PendingChange {
        if self.rng.f64() < self.params.descriptor_chance {
            let descriptor = self.rng.usize(0..self.model.descriptors.len());
            let dimension = self.rng.usize(0..self.model.dims());
            let delta = (self.rng.f64() * 2.0 - 1.0) * self.params.max_change;
            let prior = self.model.descriptors[descriptor].effect(dimension);
            PendingChange::Effect {
                descriptor,
                dimension,
                prior,
                proposed: prior + delta,
            }
        } else {
            let county = self.rng.usize(0..self.model.counties.len());
            let pick = self.rng.usize(0..self.model.modifiable.len());
            PendingChange::Toggle {
                county,
                descriptor: self.model.modifiable[pick],
            }
        }
    }

    /// Run one perturb-score-decide step. Returns true if the change was
    /// kept.
    pub fn step(&mut self) -> bool {
        let change = self.propose();
        change.apply(&mut self.model);

        let new_score = self.model.national_score(self.params.method);
        if new_score < self.score {
            change.revert(&mut self.model);
            self.stagnation += 1;
            false
        } else {
            self.score = new_score;
            self.stagnation = 0;
            true
        }
    }

    /// Iterate until the cap, convergence, or cancellation. `on_accept` fires
    /// after every kept step with the freshly scored model, the iteration
    /// count, and the new national score.
    pub fn run<F>(&mut self, cancel: &runner::CancelToken, mut on_accept: F) -> StopReason
    where
        F: FnMut(&mut Model, u64, f64),
    {
        loop {
            if cancel.is_cancelled() {
                return StopReason::Cancelled;
            }
            if self.iterations >= self.params.max_iterations {
                return StopReason::IterationCap;
            }
            self.iterations += 1;

            if self.step() {
                on_accept(&mut self.model, self.iterations, self.score);
            } else if self.stagnation > self.params.stagnation_limit {
                return StopReason::Converged;
            }
        }
    }
}
