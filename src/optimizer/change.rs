use crate::model::Model;

/// One proposed perturbation, recorded so the reject branch can undo exactly
/// what was applied. A tagged variant rather than a captured closure keeps
/// the rollback data inspectable and testable.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange {
    /// A descriptor effect mutation. `proposed` is the raw (unclamped) new
    /// value; the clamp to non-negative happens on write. `prior` is already
    /// clamped, so reverting restores the exact previous state.
    Effect {
        descriptor: usize,
        dimension: usize,
        prior: f64,
        proposed: f64,
    },
    /// A county membership toggle; its own inverse.
    Toggle { county: usize, descriptor: usize },
}

impl PendingChange {
    pub fn apply(&self, model: &mut Model) {
        match *self {
            PendingChange::Effect {
                descriptor,
                dimension,
                proposed,
                ..
            } => {
                model.descriptors[descriptor].set_effect(dimension, proposed);
                model.mark_members_dirty(descriptor);
            }
            PendingChange::Toggle { county, descriptor } => {
                model.counties[county].toggle_descriptor(descriptor);
            }
        }
    }

    pub fn revert(&self, model: &mut Model) {
        match *self {
            PendingChange::Effect {
                descriptor,
                dimension,
                prior,
                ..
            } => {
                model.descriptors[descriptor].set_effect(dimension, prior);
                model.mark_members_dirty(descriptor);
            }
            PendingChange::Toggle { county, descriptor } => {
                model.counties[county].toggle_descriptor(descriptor);
            }
        }
    }
}
