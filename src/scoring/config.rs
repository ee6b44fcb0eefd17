use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::detail::Category;

/// Main scoring configuration.
///
/// Each raw-score category is folded into the overall raw score as
/// `a * ln(1 + b * value)`. Every category must have a weight.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   weights:
///     github:   { a: 0.32, b: 1.17 }
///     articles: { a: 0.21, b: 0.31 }
///     events:   { a: 0.30, b: 0.27 }
///     tags:     { a: 0.10, b: 0.79 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Per-category weights, keyed by category name
    #[serde(default = "default_weights")]
    pub weights: BTreeMap<String, CategoryWeight>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: default_weights(),
        }
    }
}

impl ScoringConfig {
    pub fn weight(&self, category: Category) -> Option<CategoryWeight> {
        self.weights.get(category.key()).copied()
    }
}

fn default_weights() -> BTreeMap<String, CategoryWeight> {
    [
        (Category::Github, CategoryWeight::new(0.32, 1.17)),
        (Category::Articles, CategoryWeight::new(0.21, 0.31)),
        (Category::Events, CategoryWeight::new(0.30, 0.27)),
        (Category::Tags, CategoryWeight::new(0.10, 0.79)),
    ]
    .into_iter()
    .map(|(category, weight)| (category.key().to_string(), weight))
    .collect()
}

/// Weight of one category in the overall raw score.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryWeight {
    /// Outer multiplier
    pub a: f64,
    /// Scale applied to the raw value inside the logarithm
    pub b: f64,
}

impl CategoryWeight {
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// `a * ln(1 + b * value)`
    pub fn apply(&self, value: f64) -> f64 {
        self.a * (self.b * value).ln_1p()
    }
}
