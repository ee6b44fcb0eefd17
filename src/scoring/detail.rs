use serde::{Deserialize, Serialize};
use std::fmt;

use super::articles::article_value;
use super::events::{event_value, tag_value};
use super::github::github_value;
use crate::activity::ActivityRecord;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;

/// Raw-score categories that feed the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Github,
    Articles,
    Events,
    Tags,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Github,
        Category::Articles,
        Category::Events,
        Category::Tags,
    ];

    /// Key used in config files and reports
    pub fn key(&self) -> &'static str {
        match self {
            Category::Github => "github",
            Category::Articles => "articles",
            Category::Events => "events",
            Category::Tags => "tags",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw score of each category for one person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCategoryScores {
    pub github: f64,
    pub articles: f64,
    pub events: f64,
    pub tags: f64,
}

impl RawCategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Github => self.github,
            Category::Articles => self.articles,
            Category::Events => self.events,
            Category::Tags => self.tags,
        }
    }

    /// Every category with its value. New fields must be listed here.
    pub fn entries(&self) -> [(Category, f64); 4] {
        Category::ALL.map(|category| (category, self.get(category)))
    }
}

/// Compute all four category raw scores from an activity record.
///
/// Contributor data problems are reported to `sink` and scored as zero;
/// only a non-finite repository score is returned as an error.
pub fn calculate_raw_detail(
    record: &ActivityRecord,
    sink: &dyn DiagnosticSink,
) -> Result<RawCategoryScores> {
    let github = github_value(
        &record.contribution_counts,
        &record.repos,
        &record.github_identifier,
        sink,
    )?;
    let articles = article_value(
        &record.qiita_posts,
        &record.zenn_articles,
        &record.ai_reviews,
        sink,
    );
    let events = event_value(&record.events);
    let tags = tag_value(record.tag_count);

    sink.debug(&format!(
        "raw detail for {}: github={:.4} articles={:.4} events={:.4} tags={:.4}",
        record.github_identifier, github, articles, events, tags
    ));

    Ok(RawCategoryScores {
        github,
        articles,
        events,
        tags,
    })
}
