use thiserror::Error;

use crate::scoring::Category;

pub type Result<T> = std::result::Result<T, ScoreError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    /// A raw-score category has no aggregation weight configured.
    #[error("no weight configured for raw score category '{category}'")]
    MissingWeight { category: Category },

    /// A raw-score category produced no usable value.
    #[error("raw score category '{category}' has no value")]
    MissingValue { category: Category },

    #[error("repository '{repo}' produced a non-finite stats score")]
    NonFiniteRepoScore { repo: String },

    #[error("invalid reference population for '{category}': {reason}")]
    InvalidPopulation { category: String, reason: String },
}

impl ScoreError {
    /// Configuration errors must abort the evaluation instead of being defaulted.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ScoreError::MissingWeight { .. } | ScoreError::MissingValue { .. }
        )
    }
}
