use demofit::error::DemofitError;
use demofit::loader::load_dataset;
use std::fs;
use std::path::Path;

fn write_nation(dir: &Path, population: u64) {
    fs::write(
        dir.join("nation.json"),
        format!(
            r#"{{
                "population": {population},
                "demographics": {{
                    "age": {{ "adult": 0.7, "child": 0.3 }},
                    "income": {{ "high": 0.2 }}
                }}
            }}"#
        ),
    )
    .unwrap();
}

fn write_county(dir: &Path, state: &str, fips: &str, body: &str) {
    let county_dir = dir.join(state).join("counties");
    fs::create_dir_all(&county_dir).unwrap();
    fs::write(county_dir.join(format!("{fips}.json")), body).unwrap();
}

fn valid_county(name: &str, fips: &str) -> String {
    format!(
        r#"{{
            "name": "{name}",
            "FIPS": "{fips}",
            "population": 1200,
            "demographics": {{
                "age": {{ "adult": 900, "child": 300 }},
                "income": {{ "high": 250 }}
            }}
        }}"#
    )
}

#[test]
fn loads_a_well_formed_dataset() {
    let dir = tempfile::tempdir().unwrap();
    write_nation(dir.path(), 5000);
    write_county(dir.path(), "AL", "01001", &valid_county("Ashton County", "01001"));
    write_county(dir.path(), "AK", "02001", &valid_county("Cedar County", "02001"));

    let dataset = load_dataset(dir.path()).unwrap();

    // Flattened keys are sorted and joined with the nesting separator.
    assert_eq!(
        dataset.demographic_names,
        vec!["age->adult", "age->child", "income->high"]
    );
    assert_eq!(dataset.national_target, vec![0.7, 0.3, 0.2]);
    assert_eq!(dataset.national_population, 5000);

    assert_eq!(dataset.counties.len(), 2);
    let first = &dataset.counties[0];
    assert_eq!(first.state, "AK"); // directory order is sorted
    assert_eq!(first.fips, "02001");
    assert_eq!(first.population, 1200);
    assert_eq!(first.target, vec![900.0, 300.0, 250.0]);
}

#[test]
fn skips_files_that_are_not_county_records() {
    let dir = tempfile::tempdir().unwrap();
    write_nation(dir.path(), 5000);
    write_county(dir.path(), "AL", "01001", &valid_county("Ashton County", "01001"));

    let county_dir = dir.path().join("AL").join("counties");
    fs::write(county_dir.join("readme.txt"), "not a record").unwrap();
    fs::write(county_dir.join("notes.json"), "{ not even json").unwrap();

    let dataset = load_dataset(dir.path()).unwrap();
    assert_eq!(dataset.counties.len(), 1);
}

#[test]
fn category_mismatch_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_nation(dir.path(), 5000);
    write_county(
        dir.path(),
        "AL",
        "01001",
        r#"{
            "name": "Ashton County",
            "FIPS": "01001",
            "population": 1200,
            "demographics": { "age": { "adult": 900, "child": 300 } }
        }"#,
    );

    let err = load_dataset(dir.path()).unwrap_err();
    assert!(matches!(err, DemofitError::Validation(_)), "{err}");
}

#[test]
fn malformed_county_json_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_nation(dir.path(), 5000);
    write_county(dir.path(), "AL", "01001", "{ broken");

    assert!(load_dataset(dir.path()).is_err());
}

#[test]
fn non_numeric_demographic_values_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_nation(dir.path(), 5000);
    write_county(
        dir.path(),
        "AL",
        "01001",
        r#"{
            "name": "Ashton County",
            "FIPS": "01001",
            "population": 1200,
            "demographics": {
                "age": { "adult": "many", "child": 300 },
                "income": { "high": 250 }
            }
        }"#,
    );

    let err = load_dataset(dir.path()).unwrap_err();
    assert!(matches!(err, DemofitError::Validation(_)), "{err}");
}

#[test]
fn missing_nation_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_dataset(dir.path()).is_err());
}

#[test]
fn zero_national_population_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_nation(dir.path(), 0);
    write_county(dir.path(), "AL", "01001", &valid_county("Ashton County", "01001"));

    let err = load_dataset(dir.path()).unwrap_err();
    assert!(matches!(err, DemofitError::Validation(_)), "{err}");
}

#[test]
fn empty_dataset_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_nation(dir.path(), 5000);

    let err = load_dataset(dir.path()).unwrap_err();
    assert!(matches!(err, DemofitError::Validation(_)), "{err}");
}
