pub mod types;

pub use types::{
    ActivityRecord, ArticleSource, Contributor, ContributorField, GitHubRepo, PopularPost, TechEvent,
};

use anyhow::{Context, Result};
use std::path::Path;

use crate::population::is_json;

/// Parse an activity record; `.json` files are read as JSON, anything else as YAML.
pub fn parse_activity(content: &str, path: &Path) -> Result<ActivityRecord> {
    let record = if is_json(path) {
        serde_json::from_str(content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(content)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?
    };
    Ok(record)
}

/// Read and parse an activity file
pub async fn load_activity(path: &Path) -> Result<ActivityRecord> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read activity file at {}", path.display()))?;
    parse_activity(&content, path)
}
