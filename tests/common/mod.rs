#![allow(dead_code)]

use demofit::config::{Config, SearchParams, WorkerParams};
use demofit::loader::{CountyRecord, Dataset};
use demofit::model::Model;

/// Two states, four counties, three demographic categories. Populations sum
/// to the national population.
pub fn small_dataset() -> Dataset {
    Dataset {
        demographic_names: vec![
            "age->adult".to_string(),
            "age->child".to_string(),
            "income->high".to_string(),
        ],
        national_target: vec![0.5, 0.3, 0.2],
        national_population: 1000,
        counties: vec![
            CountyRecord {
                name: "Ashton County".to_string(),
                fips: "01001".to_string(),
                state: "AL".to_string(),
                population: 400,
                target: vec![0.6, 0.3, 0.1],
            },
            CountyRecord {
                name: "Briar County".to_string(),
                fips: "01003".to_string(),
                state: "AL".to_string(),
                population: 100,
                target: vec![0.2, 0.5, 0.3],
            },
            CountyRecord {
                name: "Cedar County".to_string(),
                fips: "02001".to_string(),
                state: "AK".to_string(),
                population: 300,
                target: vec![0.5, 0.25, 0.25],
            },
            CountyRecord {
                name: "Dune County".to_string(),
                fips: "02003".to_string(),
                state: "AK".to_string(),
                population: 200,
                target: vec![0.1, 0.1, 0.8],
            },
        ],
    }
}

/// One county with a [0.6, 0.4] target, for the hand-checkable scenarios.
pub fn single_county_dataset() -> Dataset {
    Dataset {
        demographic_names: vec!["a".to_string(), "b".to_string()],
        national_target: vec![0.6, 0.4],
        national_population: 10,
        counties: vec![CountyRecord {
            name: "Solo County".to_string(),
            fips: "01001".to_string(),
            state: "AL".to_string(),
            population: 10,
            target: vec![0.6, 0.4],
        }],
    }
}

pub fn small_model(num_descriptors: usize) -> Model {
    Model::build(&small_dataset(), num_descriptors).expect("small model should build")
}

pub fn quick_params() -> SearchParams {
    SearchParams {
        max_iterations: 500,
        stagnation_limit: 200,
        ..SearchParams::default()
    }
}

pub fn quick_config() -> Config {
    Config {
        search: quick_params(),
        workers: WorkerParams {
            min_workers: 1,
            max_workers: 2,
        },
    }
}
