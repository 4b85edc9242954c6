pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod optimizer;
pub mod results;
pub mod similarity;
// cmd and reports are binary modules (in main.rs); the library surface stops
// at the orchestrator and result types.
