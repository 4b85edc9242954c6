// ===== demofit/src/results.rs =====
use crate::error::DfResult;
use crate::model::Model;
use crate::optimizer::runner::ProgressSink;
use crate::similarity::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CountyResult {
    pub fips: String,
    pub name: String,
    /// Names of every descriptor currently assigned, fixed ones included.
    pub descriptors: Vec<String>,
    pub score: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DescriptorResult {
    pub name: String,
    /// Nonzero effect values keyed by demographic category name.
    pub effects: BTreeMap<String, f64>,
}

/// A durable snapshot of the best state found so far: enough to resume
/// analysis (or re-score it with the `score` subcommand) without the search
/// process that produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunResult {
    pub national_score: f64,
    pub counties: Vec<CountyResult>,
    pub descriptors: Vec<DescriptorResult>,
}

impl RunResult {
    pub fn from_model(model: &mut Model, method: Method) -> Self {
        let national_score = model.national_score(method);

        let counties = model
            .counties
            .iter_mut()
            .map(|county| {
                let score = county.score(&model.descriptors, method);
                CountyResult {
                    fips: county.fips().to_string(),
                    name: county.name().to_string(),
                    descriptors: county
                        .members()
                        .iter()
                        .map(|&i| model.descriptors[i].name().to_string())
                        .collect(),
                    score,
                }
            })
            .collect();

        let descriptors = model
            .descriptors
            .iter()
            .map(|d| DescriptorResult {
                name: d.name().to_string(),
                effects: d
                    .nonzero_effects(&model.demographic_names)
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            })
            .collect();

        Self {
            national_score,
            counties,
            descriptors,
        }
    }

    pub fn load(path: &Path) -> DfResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Serialize)]
struct TraceRow {
    elapsed_secs: f64,
    worker: usize,
    iteration: u64,
    score: f64,
}

/// Persists best-result snapshots as JSON and appends a row to the score
/// trace CSV on every improvement. The JSON write goes through a temp file
/// and rename so an interrupt never leaves a torn checkpoint.
pub struct Checkpointer {
    path: PathBuf,
    trace: Option<Mutex<csv::Writer<File>>>,
    started: Instant,
}

impl Checkpointer {
    pub fn new(path: &Path, trace_path: Option<&Path>) -> DfResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let trace = match trace_path {
            Some(tp) => {
                if let Some(parent) = tp.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                let file = OpenOptions::new().create(true).append(true).open(tp)?;
                let writer = csv::WriterBuilder::new()
                    .has_headers(file.metadata()?.len() == 0)
                    .from_writer(file);
                Some(Mutex::new(writer))
            }
            None => None,
        };

        Ok(Self {
            path: path.to_path_buf(),
            trace,
            started: Instant::now(),
        })
    }

    pub fn write(&self, result: &RunResult) -> DfResult<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(result)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ProgressSink for Checkpointer {
    fn on_best(&self, worker: usize, iteration: u64, result: &RunResult) -> DfResult<()> {
        self.write(result)?;

        if let Some(trace) = &self.trace {
            let mut writer = trace.lock().unwrap_or_else(|p| p.into_inner());
            writer.serialize(TraceRow {
                elapsed_secs: self.started.elapsed().as_secs_f64(),
                worker,
                iteration,
                score: result.national_score,
            })?;
            writer.flush()?;
        }
        Ok(())
    }
}
