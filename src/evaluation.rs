use serde::{Deserialize, Serialize};

use crate::activity::ActivityRecord;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::normalize::{normalize_score, AsyncRankLookup, NormalizedScore, RankLookup};
use crate::scoring::{calculate_overall_raw_score, calculate_raw_detail, RawCategoryScores, ScoringConfig};

/// Overall and per-category raw scores of one person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RawScores {
    pub overall: f64,
    #[serde(flatten)]
    pub detail: RawCategoryScores,
}

/// Per-evaluation facts about the subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationContext {
    /// The subject is a member of the reference population
    pub is_reference_person: bool,
}

/// One rank lookup per normalized score.
pub struct RankLookups<'a> {
    pub overall: &'a dyn RankLookup,
    pub github: &'a dyn RankLookup,
    pub articles: &'a dyn RankLookup,
    pub events: &'a dyn RankLookup,
    pub tags: &'a dyn RankLookup,
}

/// Async counterpart of `RankLookups`.
pub struct AsyncRankLookups<'a> {
    pub overall: &'a dyn AsyncRankLookup,
    pub github: &'a dyn AsyncRankLookup,
    pub articles: &'a dyn AsyncRankLookup,
    pub events: &'a dyn AsyncRankLookup,
    pub tags: &'a dyn AsyncRankLookup,
}

/// Normalized results. `None` means the raw score was too low to rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall: Option<NormalizedScore>,
    pub github: Option<NormalizedScore>,
    pub articles: Option<NormalizedScore>,
    pub events: Option<NormalizedScore>,
    pub tags: Option<NormalizedScore>,
}

impl ScoreReport {
    /// Rows in display order
    pub fn rows(&self) -> [(&'static str, Option<NormalizedScore>); 5] {
        [
            ("overall", self.overall),
            ("github", self.github),
            ("articles", self.articles),
            ("events", self.events),
            ("tags", self.tags),
        ]
    }
}

/// Raw Score Aggregator: category raw scores plus the weighted overall score.
pub fn calculate_raw_scores(
    record: &ActivityRecord,
    config: &ScoringConfig,
    sink: &dyn DiagnosticSink,
) -> Result<RawScores> {
    let detail = calculate_raw_detail(record, sink)?;
    let overall = calculate_overall_raw_score(&detail, config)?;
    Ok(RawScores { overall, detail })
}

/// Normalize the overall score and each category score independently.
pub fn evaluate(raw: &RawScores, lookups: &RankLookups<'_>, ctx: EvaluationContext) -> ScoreReport {
    let is_ref = ctx.is_reference_person;
    ScoreReport {
        overall: normalize_score(raw.overall, is_ref, lookups.overall),
        github: normalize_score(raw.detail.github, is_ref, lookups.github),
        articles: normalize_score(raw.detail.articles, is_ref, lookups.articles),
        events: normalize_score(raw.detail.events, is_ref, lookups.events),
        tags: normalize_score(raw.detail.tags, is_ref, lookups.tags),
    }
}

/// Like `evaluate`, with the five lookups awaited concurrently.
pub async fn evaluate_async(
    raw: &RawScores,
    lookups: &AsyncRankLookups<'_>,
    ctx: EvaluationContext,
) -> ScoreReport {
    use crate::normalize::normalize_score_async;

    let is_ref = ctx.is_reference_person;
    let (overall, github, articles, events, tags) = futures::join!(
        normalize_score_async(raw.overall, is_ref, |r| lookups.overall.lookup_async(r)),
        normalize_score_async(raw.detail.github, is_ref, |r| lookups.github.lookup_async(r)),
        normalize_score_async(raw.detail.articles, is_ref, |r| lookups.articles.lookup_async(r)),
        normalize_score_async(raw.detail.events, is_ref, |r| lookups.events.lookup_async(r)),
        normalize_score_async(raw.detail.tags, is_ref, |r| lookups.tags.lookup_async(r)),
    );

    ScoreReport {
        overall,
        github,
        articles,
        events,
        tags,
    }
}

/// Full pipeline for one person: aggregate, then normalize.
pub fn score_person(
    record: &ActivityRecord,
    config: &ScoringConfig,
    sink: &dyn DiagnosticSink,
    lookups: &RankLookups<'_>,
    ctx: EvaluationContext,
) -> Result<(RawScores, ScoreReport)> {
    let raw = calculate_raw_scores(record, config, sink)?;
    let report = evaluate(&raw, lookups, ctx);
    Ok((raw, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::TechEvent;
    use crate::diagnostics::NoopSink;
    use crate::normalize::{score_from_rank, RankInfo};
    use crate::population::ReferencePopulation;
    use crate::ScoreError;

    fn fixed(lower: u64, higher: u64, same: u64) -> impl Fn(f64) -> RankInfo {
        move |_| RankInfo::new(lower, higher, same)
    }

    fn sample_raw() -> RawScores {
        RawScores {
            overall: 100.0,
            detail: RawCategoryScores {
                github: 100.0,
                articles: 50.0,
                events: 0.0,
                tags: 20.0,
            },
        }
    }

    #[test]
    fn test_evaluate_each_category_independent() {
        let above = fixed(10, 20, 5);
        let below = fixed(20, 10, 5);
        let lookups = RankLookups {
            overall: &above,
            github: &below,
            articles: &above,
            events: &above,
            tags: &below,
        };
        let report = evaluate(&sample_raw(), &lookups, EvaluationContext::default());

        assert!(report.overall.unwrap().score < 3.0);
        assert!(report.github.unwrap().score > 3.0);
        // Zero raw event score cannot be ranked
        assert!(report.events.is_none());
        assert_eq!(report.articles, report.overall);
    }

    #[test]
    fn test_reference_flag_applies_to_all_calls() {
        let rank = fixed(10, 20, 5);
        let lookups = RankLookups {
            overall: &rank,
            github: &rank,
            articles: &rank,
            events: &rank,
            tags: &rank,
        };
        let ctx = EvaluationContext { is_reference_person: true };
        let report = evaluate(&sample_raw(), &lookups, ctx);

        let expected = score_from_rank(10, 20, 4);
        for (name, result) in report.rows() {
            if name == "events" {
                assert!(result.is_none());
            } else {
                assert_eq!(result.unwrap().score, expected, "{}", name);
            }
        }
    }

    #[tokio::test]
    async fn test_async_matches_sync() {
        let pop = ReferencePopulation::new("all", vec![1.0, 5.0, 20.0, 100.0, 250.0]).unwrap();
        let sync_lookups = RankLookups {
            overall: &pop,
            github: &pop,
            articles: &pop,
            events: &pop,
            tags: &pop,
        };
        let async_lookups = AsyncRankLookups {
            overall: &pop,
            github: &pop,
            articles: &pop,
            events: &pop,
            tags: &pop,
        };
        let ctx = EvaluationContext { is_reference_person: true };

        let sync = evaluate(&sample_raw(), &sync_lookups, ctx);
        let async_report = evaluate_async(&sample_raw(), &async_lookups, ctx).await;
        assert_eq!(sync, async_report);
    }

    #[test]
    fn test_score_person_end_to_end() {
        let record = ActivityRecord {
            github_identifier: "someone".to_string(),
            events: vec![TechEvent { is_tech_event: true, is_presenter: true }],
            tag_count: 5.0,
            ..Default::default()
        };
        let middle = fixed(3, 3, 0);
        let lookups = RankLookups {
            overall: &middle,
            github: &middle,
            articles: &middle,
            events: &middle,
            tags: &middle,
        };
        let (raw, report) = score_person(
            &record,
            &ScoringConfig::default(),
            &NoopSink,
            &lookups,
            EvaluationContext::default(),
        )
        .unwrap();

        assert_eq!(raw.detail.events, 2.0);
        assert!(report.github.is_none());
        assert!(report.articles.is_none());
        assert!((report.events.unwrap().score - 3.0).abs() < 1e-12);
        assert!((report.tags.unwrap().percentile - 300.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_score_person_missing_weight() {
        let mut config = ScoringConfig::default();
        config.weights.remove("github");
        let rank = fixed(1, 1, 0);
        let lookups = RankLookups {
            overall: &rank,
            github: &rank,
            articles: &rank,
            events: &rank,
            tags: &rank,
        };
        let err = score_person(
            &ActivityRecord::default(),
            &config,
            &NoopSink,
            &lookups,
            EvaluationContext::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ScoreError::MissingWeight { .. }));
    }

    #[test]
    fn test_raw_scores_serialize_flat() {
        let json = serde_json::to_value(sample_raw()).unwrap();
        assert_eq!(json["overall"], 100.0);
        assert_eq!(json["github"], 100.0);
    }
}
