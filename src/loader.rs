// ===== demofit/src/loader.rs =====
use crate::error::{DemofitError, DfResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Key separator used when flattening nested demographic objects.
const KEY_SEP: &str = "->";

#[derive(Debug, Deserialize)]
struct NationFile {
    population: u64,
    demographics: Value,
}

#[derive(Debug, Deserialize)]
struct CountyFile {
    #[serde(default)]
    name: String,
    #[serde(rename = "FIPS", default)]
    fips: String,
    #[serde(default)]
    population: u32,
    demographics: Value,
}

#[derive(Debug, Clone)]
pub struct CountyRecord {
    pub name: String,
    pub fips: String,
    pub state: String,
    pub population: u32,
    pub target: Vec<f64>,
}

/// Everything the model needs from disk, validated and aligned to one shared
/// demographic category ordering.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Ordered category names; index i means the same category in every
    /// vector for the whole run.
    pub demographic_names: Vec<String>,
    pub national_target: Vec<f64>,
    pub national_population: u64,
    pub counties: Vec<CountyRecord>,
}

/// Flatten a nested JSON object of numbers into sorted `parent->child` keys.
fn flatten(value: &Value, parent: &str, out: &mut BTreeMap<String, f64>) -> DfResult<()> {
    let obj = value.as_object().ok_or_else(|| {
        DemofitError::Validation(format!("expected an object at key '{}'", parent))
    })?;
    for (k, v) in obj {
        let key = if parent.is_empty() {
            k.clone()
        } else {
            format!("{}{}{}", parent, KEY_SEP, k)
        };
        match v {
            Value::Object(_) => flatten(v, &key, out)?,
            Value::Number(n) => {
                let f = n.as_f64().ok_or_else(|| {
                    DemofitError::Validation(format!("non-finite number at key '{}'", key))
                })?;
                out.insert(key, f);
            }
            _ => {
                return Err(DemofitError::Validation(format!(
                    "unsupported value type at key '{}'",
                    key
                )))
            }
        }
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> DfResult<T> {
    let text = fs::read_to_string(path).map_err(|e| {
        DemofitError::Validation(format!("could not read '{}': {}", path.display(), e))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        DemofitError::Validation(format!("malformed JSON in '{}': {}", path.display(), e))
    })
}

fn sorted_entries(dir: &Path) -> DfResult<Vec<std::path::PathBuf>> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries)
}

/// True for county data files: a digit-only stem with a `.json` extension
/// ("01001.json"). Anything else in the directory is ignored.
fn is_county_file(path: &Path) -> bool {
    let stem_ok = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()));
    let ext_ok = path.extension().and_then(|s| s.to_str()) == Some("json");
    stem_ok && ext_ok
}

/// Load the dataset from a directory laid out as:
///
/// ```text
/// data/
///   nation.json            population + nested demographics (fixes D)
///   AL/counties/01001.json one file per county
///   AK/counties/...
/// ```
///
/// Any malformed record, unreadable file, or category mismatch against the
/// nation file is a fatal startup error.
pub fn load_dataset(dir: &Path) -> DfResult<Dataset> {
    let nation: NationFile = read_json(&dir.join("nation.json"))?;
    if nation.population == 0 {
        return Err(DemofitError::Validation(
            "nation.json declares a population of 0".to_string(),
        ));
    }

    let mut flat = BTreeMap::new();
    flatten(&nation.demographics, "", &mut flat)?;
    if flat.is_empty() {
        return Err(DemofitError::Validation(
            "nation.json contains no demographic categories".to_string(),
        ));
    }
    let demographic_names: Vec<String> = flat.keys().cloned().collect();
    let national_target: Vec<f64> = flat.values().copied().collect();

    let mut counties = Vec::new();
    for state_dir in sorted_entries(dir)? {
        if !state_dir.is_dir() {
            continue;
        }
        let county_dir = state_dir.join("counties");
        if !county_dir.is_dir() {
            continue;
        }
        let state = state_dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        debug!("loading counties for {}", state);

        for file in sorted_entries(&county_dir)? {
            if !is_county_file(&file) {
                continue;
            }
            let raw: CountyFile = read_json(&file)?;

            let mut county_flat = BTreeMap::new();
            flatten(&raw.demographics, "", &mut county_flat)?;

            if county_flat.len() != demographic_names.len()
                || !county_flat.keys().eq(demographic_names.iter())
            {
                return Err(DemofitError::Validation(format!(
                    "'{}' demographic categories do not match nation.json ({} != {})",
                    file.display(),
                    county_flat.len(),
                    demographic_names.len()
                )));
            }

            counties.push(CountyRecord {
                name: raw.name,
                fips: raw.fips,
                state: state.clone(),
                population: raw.population,
                target: county_flat.into_values().collect(),
            });
        }
    }

    if counties.is_empty() {
        return Err(DemofitError::Validation(format!(
            "no county records found under '{}'",
            dir.display()
        )));
    }

    Ok(Dataset {
        demographic_names,
        national_target,
        national_population: nation.population,
        counties,
    })
}
