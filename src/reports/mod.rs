// ===== demofit/src/reports/mod.rs =====
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use demofit::optimizer::{StopReason, WorkerOutcome};
use demofit::results::RunResult;

fn stop_label(stop: StopReason) -> &'static str {
    match stop {
        StopReason::IterationCap => "iteration cap",
        StopReason::Converged => "converged",
        StopReason::Cancelled => "cancelled",
    }
}

pub fn print_worker_table(workers: &[WorkerOutcome]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    table.add_row(vec![
        Cell::new("Worker").add_attribute(Attribute::Bold),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Iterations"),
        Cell::new("Stopped"),
    ]);

    for w in workers {
        table.add_row(vec![
            Cell::new(w.worker),
            Cell::new(format!("{:.6}", w.score)).set_alignment(CellAlignment::Right),
            Cell::new(w.iterations).set_alignment(CellAlignment::Right),
            Cell::new(stop_label(w.stop)),
        ]);
    }

    println!("{table}");
}

/// Row indices for a top/bottom summary of a ranked list: the first `take`
/// and the last `take`, with the tail trimmed so no row appears twice.
fn summary_indices(len: usize, take: usize) -> Vec<usize> {
    let take = take.min(len);
    let tail_start = len.saturating_sub(take).max(take);
    (0..take).chain(tail_start..len).collect()
}

/// Best and worst reconstructed counties, plus the headline score.
pub fn print_result_summary(result: &RunResult) {
    let mut ranked: Vec<&demofit::results::CountyResult> = result.counties.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("County").add_attribute(Attribute::Bold),
        Cell::new("FIPS"),
        Cell::new("Descriptors"),
        Cell::new("Score").fg(Color::Cyan),
    ]);

    for &i in &summary_indices(ranked.len(), 5) {
        let c = ranked[i];
        table.add_row(vec![
            Cell::new(&c.name),
            Cell::new(&c.fips),
            Cell::new(c.descriptors.len()).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", c.score)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("\nNational score: {:.6}", result.national_score);
    println!("{table}");
}

pub fn print_score_check(stored: f64, recomputed: f64) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Stored").add_attribute(Attribute::Bold),
        Cell::new("Recomputed").add_attribute(Attribute::Bold),
        Cell::new("Delta"),
    ]);
    table.add_row(vec![
        Cell::new(format!("{:.6}", stored)),
        Cell::new(format!("{:.6}", recomputed)),
        Cell::new(format!("{:+.2e}", recomputed - stored)),
    ]);
    println!("{table}");
}
