use crate::reports;
use clap::Args;
use demofit::config::Config;
use demofit::error::{DemofitError, DfResult};
use demofit::loader::Dataset;
use demofit::model::Model;
use demofit::results::RunResult;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub config: Config,

    /// Checkpoint to re-score; defaults to the global --out path
    #[arg(long)]
    pub result: Option<String>,
}

/// Rebuild the model state recorded in a checkpoint and score it from
/// scratch, as a consistency check on the persisted snapshot.
pub fn run(args: ScoreArgs, dataset: &Dataset, out: &Path) -> DfResult<()> {
    args.config.validate()?;

    let path = args.result.as_deref().map(Path::new).unwrap_or(out);
    info!("Re-scoring checkpoint {}", path.display());
    let saved = RunResult::load(path)?;

    let mut model = Model::build(dataset, args.config.search.num_descriptors)?;

    let descriptor_index: HashMap<String, usize> = model
        .descriptors
        .iter()
        .enumerate()
        .map(|(i, d)| (d.name().to_string(), i))
        .collect();
    let dimension_index: HashMap<String, usize> = model
        .demographic_names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.clone(), i))
        .collect();
    let county_index: HashMap<String, usize> = model
        .counties
        .iter()
        .enumerate()
        .map(|(i, c)| (c.fips().to_string(), i))
        .collect();

    for dr in &saved.descriptors {
        let &di = descriptor_index.get(&dr.name).ok_or_else(|| {
            DemofitError::Validation(format!("checkpoint names unknown descriptor '{}'", dr.name))
        })?;
        for (category, &value) in &dr.effects {
            let &dim = dimension_index.get(category).ok_or_else(|| {
                DemofitError::Validation(format!(
                    "checkpoint names unknown demographic category '{}'",
                    category
                ))
            })?;
            model.descriptors[di].set_effect(dim, value);
        }
    }

    for cr in &saved.counties {
        let &ci = county_index.get(&cr.fips).ok_or_else(|| {
            DemofitError::Validation(format!("checkpoint names unknown county FIPS '{}'", cr.fips))
        })?;
        for name in &cr.descriptors {
            let &di = descriptor_index.get(name).ok_or_else(|| {
                DemofitError::Validation(format!(
                    "county '{}' references unknown descriptor '{}'",
                    cr.fips, name
                ))
            })?;
            // The fixed nation/state members are already present; re-adding
            // them is a no-op.
            model.counties[ci].add_descriptor(di);
        }
        model.counties[ci].mark_dirty();
    }

    let recomputed = model.national_score(args.config.search.method);
    reports::print_score_check(saved.national_score, recomputed);
    reports::print_result_summary(&saved);

    Ok(())
}
