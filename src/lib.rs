//! Coral reef forecast aggregation and figure pipeline
//!
//! Module organization:
//! - `config`: analysis configuration and output file names
//! - `forecast`: CSV ingestion, site aggregation, derived metrics, statistics
//! - `render`: the three PNG figures
//! - `pipeline`: the end-to-end run
//! - `profile`: memory and timing checkpoints

pub mod config;
pub mod forecast;
pub mod pipeline;
pub mod profile;
pub mod render;
