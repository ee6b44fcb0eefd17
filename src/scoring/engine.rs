use super::config::ScoringConfig;
use super::detail::{Category, RawCategoryScores};
use crate::error::{Result, ScoreError};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryContribution {
    pub category: Category,
    pub value: f64,        // Raw category score
    pub contribution: f64, // a * ln(1 + b * value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverallBreakdown {
    pub score: f64,
    pub contributions: Vec<CategoryContribution>,
}

/// Overall raw score: sum of `a * ln(1 + b * value)` over every category.
///
/// A category without a configured weight, or without a finite value, is a
/// configuration error and aborts the computation.
pub fn calculate_overall_raw_score(
    detail: &RawCategoryScores,
    config: &ScoringConfig,
) -> Result<f64> {
    Ok(overall_breakdown(detail, config)?.score)
}

/// Same as `calculate_overall_raw_score`, keeping each category's share.
pub fn overall_breakdown(
    detail: &RawCategoryScores,
    config: &ScoringConfig,
) -> Result<OverallBreakdown> {
    let mut score = 0.0;
    let mut contributions = Vec::with_capacity(Category::ALL.len());

    for (category, value) in detail.entries() {
        let weight = config
            .weight(category)
            .ok_or(ScoreError::MissingWeight { category })?;
        if !value.is_finite() {
            return Err(ScoreError::MissingValue { category });
        }

        let contribution = weight.apply(value);
        score += contribution;
        contributions.push(CategoryContribution {
            category,
            value,
            contribution,
        });
    }

    Ok(OverallBreakdown {
        score,
        contributions,
    })
}
