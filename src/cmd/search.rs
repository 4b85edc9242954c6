use crate::reports;
use clap::Args;
use demofit::config::Config;
use demofit::error::DfResult;
use demofit::loader::Dataset;
use demofit::model::Model;
use demofit::optimizer::{CancelToken, Orchestrator};
use demofit::results::Checkpointer;
use std::path::Path;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

pub fn run(
    args: SearchArgs,
    dataset: &Dataset,
    out: &Path,
    trace: Option<&Path>,
) -> DfResult<()> {
    args.config.validate()?;

    let model = Model::build(dataset, args.config.search.num_descriptors)?;
    info!(
        "Model: {} descriptors ({} modifiable), {} counties",
        model.descriptors.len(),
        model.modifiable.len(),
        model.counties.len()
    );

    let sink = Checkpointer::new(out, trace)?;
    let cancel = CancelToken::new();
    let orchestrator = Orchestrator::new(model, args.config.clone());

    info!("Spawning {} search workers", orchestrator.worker_count());
    let outcome = orchestrator.run(args.seed, &cancel, &sink);

    reports::print_worker_table(&outcome.workers);

    match outcome.best {
        Some(best) => {
            // Final write, on top of the per-improvement checkpoints.
            sink.write(&best)?;
            info!(
                "Best national score: {:.6} (checkpointed to {})",
                outcome.best_score,
                out.display()
            );
            reports::print_result_summary(&best);
        }
        None => warn!("no worker produced a result"),
    }

    Ok(())
}
