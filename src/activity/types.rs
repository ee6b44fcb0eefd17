use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Everything known about one person's activity, already shaped by whatever
/// collected it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ActivityRecord {
    /// Login used to find the person in repository contributor lists
    pub github_identifier: String,

    /// Contribution counts, one per period (e.g. per day)
    #[serde(default)]
    pub contribution_counts: Vec<u64>,

    #[serde(default)]
    pub repos: Vec<GitHubRepo>,

    /// Most-stocked posts from the first article source
    #[serde(default)]
    pub qiita_posts: Vec<PopularPost>,

    /// Most-liked articles from the second article source
    #[serde(default)]
    pub zenn_articles: Vec<PopularPost>,

    #[serde(default)]
    pub events: Vec<TechEvent>,

    #[serde(default)]
    pub tag_count: f64,

    /// Peer/AI review scores for the person's articles
    #[serde(default)]
    pub ai_reviews: Vec<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GitHubRepo {
    /// "owner/repo", only used in diagnostics
    #[serde(default)]
    pub name: Option<String>,
    pub contributors_count: u64,
    pub stargazers_count: u64,
    #[serde(default)]
    pub is_fork: bool,
    /// Person's contributions to the parent repository (forks only)
    #[serde(default)]
    pub parent_repo_contributions: u64,
    #[serde(default)]
    pub parent_stargazers_count: u64,
    /// Contributors as reported by the contributors endpoint
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    /// Contributors derived from commit history
    #[serde(default)]
    pub contributors_from_commits: Vec<Contributor>,
}

impl GitHubRepo {
    /// Name to use in log messages
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    /// Contributor entries from both sources, API list first
    pub fn all_contributors(&self) -> impl Iterator<Item = &Contributor> {
        self.contributors
            .iter()
            .chain(self.contributors_from_commits.iter())
    }
}

/// A contributor entry. Either field may be missing or mistyped in upstream
/// data; both cases are kept so scoring can report them and move on.
///
/// Unknown keys are accepted: contributor payloads carry many more
/// attributes than the two scored here.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Contributor {
    #[serde(default, deserialize_with = "login_field")]
    pub login: ContributorField<String>,
    #[serde(default, deserialize_with = "count_field")]
    pub contributions: ContributorField<i64>,
}

impl Contributor {
    pub fn new(login: &str, contributions: i64) -> Self {
        Self {
            login: ContributorField::Valid(login.to_string()),
            contributions: ContributorField::Valid(contributions),
        }
    }
}

/// One contributor attribute as found in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContributorField<T> {
    /// Absent or null
    Missing,
    Valid(T),
    /// Present with the wrong type; the raw value is kept for diagnostics
    Malformed(Value),
}

impl<T> Default for ContributorField<T> {
    fn default() -> Self {
        ContributorField::Missing
    }
}

impl<T> ContributorField<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            ContributorField::Valid(value) => Some(value),
            _ => None,
        }
    }
}

fn login_field<'de, D>(deserializer: D) -> Result<ContributorField<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => ContributorField::Missing,
        Value::String(login) => ContributorField::Valid(login),
        other => ContributorField::Malformed(other),
    })
}

/// Integers, and floats with no fractional part, are counts. Anything else
/// is malformed.
fn count_field<'de, D>(deserializer: D) -> Result<ContributorField<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => ContributorField::Missing,
        Value::Number(number) => {
            let count = number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            });
            match count {
                Some(count) => ContributorField::Valid(count),
                None => ContributorField::Malformed(Value::Number(number)),
            }
        }
        other => ContributorField::Malformed(other),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleSource {
    Qiita,
    Zenn,
}

/// A popular article and its like/stock count.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PopularPost {
    /// Stocks (Qiita) or likes (Zenn)
    pub count: u64,
}

impl PopularPost {
    pub fn new(count: u64) -> Self {
        Self { count }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TechEvent {
    pub is_tech_event: bool,
    #[serde(default)]
    pub is_presenter: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_record() {
        let yaml = "github_identifier: octocat\n";
        let record: ActivityRecord = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(record.github_identifier, "octocat");
        assert!(record.repos.is_empty());
        assert!(record.ai_reviews.is_empty());
        assert_eq!(record.tag_count, 0.0);
    }

    #[test]
    fn test_parse_full_record() {
        let yaml = r#"
github_identifier: octocat
contribution_counts: [10, 20, 30]
repos:
  - name: octocat/hello
    contributors_count: 5
    stargazers_count: 100
    contributors:
      - { login: octocat, contributions: 42 }
      - { login: null, contributions: 3 }
  - contributors_count: 2
    stargazers_count: 0
    is_fork: true
    parent_repo_contributions: 12
    parent_stargazers_count: 900
qiita_posts:
  - count: 100
zenn_articles:
  - count: 7
events:
  - { is_tech_event: true, is_presenter: true }
  - { is_tech_event: false }
tag_count: 10
ai_reviews: [4.0, 1.5]
"#;
        let record: ActivityRecord = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(record.contribution_counts, vec![10, 20, 30]);
        assert_eq!(record.repos.len(), 2);
        assert_eq!(record.repos[0].contributors[0], Contributor::new("octocat", 42));
        assert_eq!(record.repos[0].contributors[1].login, ContributorField::Missing);
        assert!(record.repos[1].is_fork);
        assert_eq!(record.repos[1].display_name(), "(unnamed)");
        assert_eq!(record.events.len(), 2);
        assert!(!record.events[1].is_presenter);
        assert_eq!(record.tag_count, 10.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "github_identifier: octocat\nfollowers: 10\n";
        let result: Result<ActivityRecord, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_all_contributors_order() {
        let repo = GitHubRepo {
            contributors: vec![Contributor::new("a", 1)],
            contributors_from_commits: vec![Contributor::new("b", 2)],
            ..Default::default()
        };
        let logins: Vec<_> = repo
            .all_contributors()
            .filter_map(|c| c.login.valid().map(String::as_str))
            .collect();
        assert_eq!(logins, vec!["a", "b"]);
    }

    #[test]
    fn test_mistyped_contributor_fields_kept() {
        let yaml = r#"
github_identifier: octocat
repos:
  - contributors_count: 1
    stargazers_count: 0
    contributors:
      - { login: octocat, contributions: lots }
      - { login: 42, contributions: 7 }
      - { login: hubot, contributions: 12.0, avatar_url: "x" }
      - { login: monalisa, contributions: 2.5 }
"#;
        let record: ActivityRecord = serde_saphyr::from_str(yaml).unwrap();
        let contributors = &record.repos[0].contributors;
        assert_eq!(
            contributors[0].contributions,
            ContributorField::Malformed(Value::String("lots".to_string()))
        );
        assert!(matches!(contributors[1].login, ContributorField::Malformed(_)));
        assert_eq!(contributors[1].contributions, ContributorField::Valid(7));
        assert_eq!(contributors[2], Contributor::new("hubot", 12));
        assert!(matches!(contributors[3].contributions, ContributorField::Malformed(_)));
    }

    #[test]
    fn test_mistyped_contributor_fields_json() {
        let json = r#"{"contributors_count": 1, "stargazers_count": 0,
            "contributors": [{"login": "octocat", "contributions": 12.0},
                             {"login": null, "contributions": [1]}]}"#;
        let repo: GitHubRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.contributors[0], Contributor::new("octocat", 12));
        assert_eq!(repo.contributors[1].login, ContributorField::Missing);
        assert!(matches!(repo.contributors[1].contributions, ContributorField::Malformed(_)));
    }
}
