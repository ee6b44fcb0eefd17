pub mod activity;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod evaluation;
pub mod normalize;
pub mod output;
pub mod population;
pub mod scoring;

pub use error::ScoreError;
