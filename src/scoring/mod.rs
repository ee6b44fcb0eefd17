pub mod articles;
pub mod config;
pub mod detail;
pub mod engine;
pub mod events;
pub mod github;
pub mod validation;

pub use config::*;
pub use detail::{calculate_raw_detail, Category, RawCategoryScores};
pub use engine::{calculate_overall_raw_score, overall_breakdown, OverallBreakdown};
pub use validation::validate_scoring;
