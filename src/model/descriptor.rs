use std::collections::BTreeMap;

/// A named profile defined by an effect vector over demographic categories.
///
/// Descriptors are additive: summing the effect vectors of all descriptors
/// assigned to a county gives that county's reconstructed demographics.
/// Fixed descriptors (nation, state) can never be added to or removed from a
/// county's membership set, but their effect values stay mutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    name: String,
    effects: Vec<f64>,
    membership_modifiable: bool,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, dims: usize, membership_modifiable: bool) -> Self {
        Self {
            name: name.into(),
            effects: vec![0.0; dims],
            membership_modifiable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effects(&self) -> &[f64] {
        &self.effects
    }

    pub fn effect(&self, index: usize) -> f64 {
        self.effects[index]
    }

    /// Effects are proportions of a population; negative values are clamped
    /// away on every write.
    pub fn set_effect(&mut self, index: usize, value: f64) {
        self.effects[index] = value.max(0.0);
    }

    pub fn add_effect(&mut self, index: usize, delta: f64) {
        self.effects[index] = (self.effects[index] + delta).max(0.0);
    }

    pub fn is_membership_modifiable(&self) -> bool {
        self.membership_modifiable
    }

    /// Nonzero effects keyed by demographic category name, for result output.
    pub fn nonzero_effects<'a>(&self, names: &'a [String]) -> BTreeMap<&'a str, f64> {
        self.effects
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(|(i, &v)| (names[i].as_str(), v))
            .collect()
    }
}
