//! Rank-based normalization of raw scores.
//!
//! A raw score is never compared against other people's raw values, only
//! against how many reference people rank below, above, or level with it.
//! The rank is turned into a z-score with the inverse standard-normal CDF
//! and mapped onto a bounded scale centred at 3.0.

pub mod lookup;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::future::Future;

pub use lookup::{AsyncRankLookup, RankLookup};

/// Raw scores below this are noise; no normalized score is produced.
pub const MIN_RAW_SCORE: f64 = 0.12;

pub const CENTER: f64 = 3.0;
pub const SPREAD: f64 = 0.5;
pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

/// Position of a raw score within the reference population, excluding the
/// subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankInfo {
    /// Reference people with a strictly lower raw score
    pub lower_count: u64,
    /// Reference people with a strictly higher raw score
    pub higher_count: u64,
    /// Reference people with exactly the same raw score
    pub same_rank_count: u64,
}

impl RankInfo {
    pub fn new(lower_count: u64, higher_count: u64, same_rank_count: u64) -> Self {
        Self {
            lower_count,
            higher_count,
            same_rank_count,
        }
    }
}

/// A bounded score in [1.0, 5.0] and the share of the reference population
/// at or below the subject, in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedScore {
    pub score: f64,
    pub percentile: f64,
}

/// Normalize `raw_score` against the population behind `lookup`.
///
/// Returns `None` when the raw score is below `MIN_RAW_SCORE`. The lookup is
/// consulted before that check, so it sees every raw score.
pub fn normalize_score(
    raw_score: f64,
    is_reference_person: bool,
    lookup: &dyn RankLookup,
) -> Option<NormalizedScore> {
    let rank = lookup.lookup(raw_score);
    normalize_with_rank(raw_score, is_reference_person, rank)
}

/// Async counterpart of `normalize_score` for lookups that do I/O.
pub async fn normalize_score_async<F, Fut>(
    raw_score: f64,
    is_reference_person: bool,
    lookup: F,
) -> Option<NormalizedScore>
where
    F: FnOnce(f64) -> Fut,
    Fut: Future<Output = RankInfo>,
{
    let rank = lookup(raw_score).await;
    normalize_with_rank(raw_score, is_reference_person, rank)
}

/// Apply the noise floor and the self-tie correction, then normalize.
pub fn normalize_with_rank(
    raw_score: f64,
    is_reference_person: bool,
    rank: RankInfo,
) -> Option<NormalizedScore> {
    // NaN fails this comparison as well
    if !(raw_score >= MIN_RAW_SCORE) {
        return None;
    }

    // A reference person is counted among their own ties
    let same_for_score = if is_reference_person {
        rank.same_rank_count.saturating_sub(1)
    } else {
        rank.same_rank_count
    };

    let score = score_from_rank(rank.lower_count, rank.higher_count, same_for_score);
    // Percentile keeps the uncorrected tie count and its own denominator: a
    // reference person at (20, 10, 5) gets 25/36, not 25/35
    let percentile = percentile_from_rank(
        rank.lower_count,
        rank.higher_count,
        rank.same_rank_count,
    );

    Some(NormalizedScore { score, percentile })
}

/// Normalize directly from rank counts, with no floor and no self-tie
/// correction.
pub fn normalize_from_rank(
    lower_count: u64,
    higher_count: u64,
    same_rank_count: u64,
) -> NormalizedScore {
    NormalizedScore {
        score: score_from_rank(lower_count, higher_count, same_rank_count),
        percentile: percentile_from_rank(lower_count, higher_count, same_rank_count),
    }
}

/// Boundary correction `1 - 0.5 / ln(total + 1)`.
///
/// Keeps the first and last rank of a finite population away from the
/// infinite tails of the normal distribution.
pub fn adjustment_factor(total: f64) -> f64 {
    1.0 - 0.5 / (total + 1.0).ln()
}

/// `lower + higher + same + 1`, summed in f64 so huge counts cannot overflow.
fn rank_total(lower_count: u64, higher_count: u64, same_rank_count: u64) -> f64 {
    lower_count as f64 + higher_count as f64 + same_rank_count as f64 + 1.0
}

/// Bounded score from rank counts (`same_rank_count` excludes the subject).
pub fn score_from_rank(lower_count: u64, higher_count: u64, same_rank_count: u64) -> f64 {
    let epsilon = adjustment_factor(rank_total(lower_count, higher_count, same_rank_count));

    // Ties are split evenly above and below
    let half_tie = 0.5 * same_rank_count as f64;
    let lower = lower_count as f64 + half_tie + epsilon;
    let higher = higher_count as f64 + half_tie + epsilon;

    let z = signum(higher - lower) * inverse_normal_cdf(lower.min(higher) / (lower + higher));

    (z * SPREAD + CENTER).clamp(MIN_SCORE, MAX_SCORE)
}

/// `100 * (lower + same) / (lower + higher + same + 1)`
pub fn percentile_from_rank(lower_count: u64, higher_count: u64, same_rank_count: u64) -> f64 {
    let total = rank_total(lower_count, higher_count, same_rank_count);
    100.0 * (lower_count as f64 + same_rank_count as f64) / total
}

/// Sign with an exact zero for ties, unlike `f64::signum`.
fn signum(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Standard-normal quantile. Only called with `p` in (0, 0.5], where the
/// lower tail keeps full precision.
fn inverse_normal_cdf(p: f64) -> f64 {
    Normal::standard().inverse_cdf(p)
}
