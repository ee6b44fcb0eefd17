//! Reference-population adapter.
//!
//! Holds the raw scores of a reference population in sorted order and
//! answers rank queries with two binary searches.

use anyhow::{Context, Result};
use futures::future::{self, BoxFuture};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ScoreError;
use crate::normalize::{AsyncRankLookup, RankInfo, RankLookup};

/// Raw scores of one reference population, ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferencePopulation {
    sorted: Vec<f64>,
}

impl ReferencePopulation {
    /// Build from unsorted raw scores. Non-finite scores are rejected.
    pub fn new(category: &str, mut raw_scores: Vec<f64>) -> Result<Self, ScoreError> {
        if let Some(bad) = raw_scores.iter().find(|v| !v.is_finite()) {
            return Err(ScoreError::InvalidPopulation {
                category: category.to_string(),
                reason: format!("non-finite raw score {}", bad),
            });
        }
        raw_scores.sort_by(|a, b| a.total_cmp(b));
        Ok(Self { sorted: raw_scores })
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Counts of members strictly below, strictly above and equal to `raw_score`.
    pub fn rank_of(&self, raw_score: f64) -> RankInfo {
        let below = self.sorted.partition_point(|&v| v < raw_score);
        let at_or_below = self.sorted.partition_point(|&v| v <= raw_score);
        RankInfo {
            lower_count: below as u64,
            higher_count: (self.sorted.len() - at_or_below) as u64,
            same_rank_count: (at_or_below - below) as u64,
        }
    }
}

impl RankLookup for ReferencePopulation {
    fn lookup(&self, raw_score: f64) -> RankInfo {
        self.rank_of(raw_score)
    }
}

impl AsyncRankLookup for ReferencePopulation {
    fn lookup_async(&self, raw_score: f64) -> BoxFuture<'_, RankInfo> {
        Box::pin(future::ready(self.rank_of(raw_score)))
    }
}

/// On-disk layout of a reference population file: raw scores per category.
///
/// ```yaml
/// overall:  [0.8, 1.2, 2.4]
/// github:   [3.1, 0.0, 12.9]
/// articles: [0.0, 5.2]
/// events:   [0.1, 2.1]
/// tags:     [4, 9, 15]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PopulationFile {
    #[serde(default)]
    pub overall: Vec<f64>,
    #[serde(default)]
    pub github: Vec<f64>,
    #[serde(default)]
    pub articles: Vec<f64>,
    #[serde(default)]
    pub events: Vec<f64>,
    #[serde(default)]
    pub tags: Vec<f64>,
}

/// One reference population per normalized score.
#[derive(Debug, Clone, Default)]
pub struct ReferencePopulations {
    pub overall: ReferencePopulation,
    pub github: ReferencePopulation,
    pub articles: ReferencePopulation,
    pub events: ReferencePopulation,
    pub tags: ReferencePopulation,
}

impl TryFrom<PopulationFile> for ReferencePopulations {
    type Error = ScoreError;

    fn try_from(file: PopulationFile) -> Result<Self, Self::Error> {
        Ok(Self {
            overall: ReferencePopulation::new("overall", file.overall)?,
            github: ReferencePopulation::new("github", file.github)?,
            articles: ReferencePopulation::new("articles", file.articles)?,
            events: ReferencePopulation::new("events", file.events)?,
            tags: ReferencePopulation::new("tags", file.tags)?,
        })
    }
}

impl ReferencePopulations {
    /// Parse populations from file contents; `.json` files are read as JSON,
    /// anything else as YAML.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let file: PopulationFile = if is_json(path) {
            serde_json::from_str(content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?
        } else {
            serde_saphyr::from_str(content)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?
        };
        let populations = ReferencePopulations::try_from(file)
            .with_context(|| format!("Invalid reference population in {}", path.display()))?;
        Ok(populations)
    }

    /// Read and parse a population file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read population file at {}", path.display()))?;
        Self::parse(&content, path)
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
