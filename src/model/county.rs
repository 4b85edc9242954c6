use super::Descriptor;
use crate::similarity::{compare_demographics, Method};
use std::collections::BTreeSet;

/// A geographic unit with an observed target demographic vector and a set of
/// assigned descriptor indices whose effects sum to approximate it.
///
/// Membership is index-based into the model's descriptor arena, so counties
/// hold no pointers into model-owned storage and a model deep copy is a plain
/// `Clone`. Every operation that needs effect values takes the descriptor
/// slice explicitly.
///
/// Recalculation is lazy: mutations set a dirty flag, and `score` recomputes
/// the derived vector before any read can observe a stale value.
#[derive(Debug, Clone, PartialEq)]
pub struct County {
    name: String,
    fips: String,
    population: u32,
    target: Vec<f64>,
    members: BTreeSet<usize>,
    derived: Vec<f64>,
    cached_score: f64,
    dirty: bool,
}

impl County {
    pub fn new(name: impl Into<String>, fips: impl Into<String>, population: u32, target: Vec<f64>) -> Self {
        let dims = target.len();
        Self {
            name: name.into(),
            fips: fips.into(),
            population,
            target,
            members: BTreeSet::new(),
            derived: vec![0.0; dims],
            cached_score: 0.0,
            dirty: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fips(&self) -> &str {
        &self.fips
    }

    /// First two digits of the county FIPS code.
    pub fn state_fips(&self) -> &str {
        &self.fips[..self.fips.len().min(2)]
    }

    pub fn population(&self) -> u32 {
        self.population
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    pub fn members(&self) -> &BTreeSet<usize> {
        &self.members
    }

    pub fn has_descriptor(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// No-op if already a member; does not trigger recalculation in that case.
    pub fn add_descriptor(&mut self, index: usize) {
        if self.members.insert(index) {
            self.dirty = true;
        }
    }

    /// No-op if not a member; does not trigger recalculation in that case.
    pub fn remove_descriptor(&mut self, index: usize) {
        if self.members.remove(&index) {
            self.dirty = true;
        }
    }

    /// Adds if not present, removes if present. The caller must guarantee the
    /// descriptor is membership-modifiable.
    pub fn toggle_descriptor(&mut self, index: usize) {
        if !self.members.remove(&index) {
            self.members.insert(index);
        }
        self.dirty = true;
    }

    /// Marks the cached derived vector and score as stale. Called when a
    /// member descriptor's effects change out from under this county.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute `derived` as the elementwise sum of member effects.
    /// O(|members| * D).
    pub fn recalculate(&mut self, descriptors: &[Descriptor]) {
        self.derived.fill(0.0);
        for &idx in &self.members {
            for (d, e) in self.derived.iter_mut().zip(descriptors[idx].effects()) {
                *d += e;
            }
        }
    }

    /// The reconstruction vector. Valid once `recalculate` or `score` has run
    /// since the last mutation.
    pub fn derived(&self) -> &[f64] {
        &self.derived
    }

    /// Similarity between the target and derived vectors, cached until the
    /// next mutation of membership or member effects.
    pub fn score(&mut self, descriptors: &[Descriptor], method: Method) -> f64 {
        if self.dirty {
            self.recalculate(descriptors);
            self.cached_score = compare_demographics(&self.target, &self.derived, method);
            self.dirty = false;
        }
        self.cached_score
    }
}
