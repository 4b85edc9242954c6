// ===== demofit/src/model/mod.rs =====
pub mod county;
pub mod descriptor;

pub use self::county::County;
pub use self::descriptor::Descriptor;

use crate::error::{DemofitError, DfResult};
use crate::loader::Dataset;
use crate::similarity::Method;
use std::collections::BTreeMap;

/// Name given to the nation-level fixed descriptor (always index 0).
pub const NATION_DESCRIPTOR: &str = "USA";

/// The full optimization state: a fixed-size descriptor arena, the county
/// list, and the demographic category ordering shared by every vector.
///
/// A model is the unit of ownership for a search worker. `Clone` is the
/// worker deep copy: descriptors and counties are owned outright, and county
/// membership refers back into the arena by index only, so copies share no
/// mutable memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub descriptors: Vec<Descriptor>,
    pub counties: Vec<County>,
    pub demographic_names: Vec<String>,
    pub national_population: u64,
    /// Indices of membership-modifiable descriptors, the sampling pool for
    /// membership mutations. Fixed for the life of the model.
    pub modifiable: Vec<usize>,
}

impl Model {
    /// Build the initial state from a loaded dataset.
    ///
    /// Descriptor 0 is the fixed nation descriptor; one fixed descriptor is
    /// created per region code in file order; the remaining slots up to
    /// `num_descriptors` are free descriptors named by their index. Every
    /// county starts with exactly the nation and its own state descriptor.
    pub fn build(dataset: &Dataset, num_descriptors: usize) -> DfResult<Self> {
        let dims = dataset.demographic_names.len();

        let mut descriptors = Vec::with_capacity(num_descriptors);
        descriptors.push(Descriptor::new(NATION_DESCRIPTOR, dims, false));

        let mut state_indices: BTreeMap<&str, usize> = BTreeMap::new();
        let mut counties = Vec::with_capacity(dataset.counties.len());

        for record in &dataset.counties {
            let state_idx = match state_indices.get(record.state.as_str()) {
                Some(&idx) => idx,
                None => {
                    descriptors.push(Descriptor::new(&record.state, dims, false));
                    let idx = descriptors.len() - 1;
                    state_indices.insert(&record.state, idx);
                    idx
                }
            };

            let mut county = County::new(
                &record.name,
                &record.fips,
                record.population,
                record.target.clone(),
            );
            county.add_descriptor(0);
            county.add_descriptor(state_idx);
            counties.push(county);
        }

        let fixed = descriptors.len();
        if num_descriptors <= fixed {
            return Err(DemofitError::Config(format!(
                "num_descriptors = {} leaves no free slots: {} fixed descriptors already exist",
                num_descriptors, fixed
            )));
        }

        while descriptors.len() < num_descriptors {
            let name = descriptors.len().to_string();
            descriptors.push(Descriptor::new(name, dims, true));
        }

        let modifiable = (fixed..num_descriptors).collect();

        Ok(Self {
            descriptors,
            counties,
            demographic_names: dataset.demographic_names.clone(),
            national_population: dataset.national_population,
            modifiable,
        })
    }

    pub fn dims(&self) -> usize {
        self.demographic_names.len()
    }

    /// Mark every county containing `descriptor` as needing recalculation.
    pub fn mark_members_dirty(&mut self, descriptor: usize) {
        for county in &mut self.counties {
            if county.has_descriptor(descriptor) {
                county.mark_dirty();
            }
        }
    }

    /// Population-weighted average of all county similarity scores. Only
    /// counties dirtied since the last call are rescored.
    pub fn national_score(&mut self, method: Method) -> f64 {
        if self.national_population == 0 {
            return 0.0;
        }
        let Model {
            descriptors,
            counties,
            ..
        } = self;
        let mut weighted = 0.0;
        for county in counties.iter_mut() {
            weighted += county.score(descriptors, method) * f64::from(county.population());
        }
        weighted / self.national_population as f64
    }
}
