use crate::activity::{ContributorField, GitHubRepo};
use crate::diagnostics::DiagnosticSink;
use crate::error::{Result, ScoreError};

/// Weight of the contribution series relative to the repository term
pub const CONTRIBUTION_WEIGHT: f64 = 0.1;

/// Contribution and star counts are capped here before scoring
const COUNT_CAP: u64 = 300;

/// Forks where the person has fewer contributions than this are drive-by forks
pub const MIN_FORK_CONTRIBUTIONS: u64 = 3;

/// Only the strongest repositories count
pub const TOP_REPOS: usize = 3;

/// Code-hosting raw score: `0.1 * contribution_component + repository_component`.
pub fn github_value(
    contribution_counts: &[u64],
    repos: &[GitHubRepo],
    github_identifier: &str,
    sink: &dyn DiagnosticSink,
) -> Result<f64> {
    let contribution = contribution_component(contribution_counts);
    let repository = repository_component(repos, github_identifier, sink)?;
    Ok(contribution * CONTRIBUTION_WEIGHT + repository)
}

/// Sum of `ln(1 + count)` over the per-period contribution counts.
pub fn contribution_component(contribution_counts: &[u64]) -> f64 {
    contribution_counts
        .iter()
        .map(|&count| (count as f64).ln_1p())
        .sum()
}

/// Stats score of a single repository.
///
/// `log10(contributors + 2) * (ln(min(c,300)^1.2 + 10)^1.7 * log10((min(s,300)/4)^1.3 + 2))^1.2`
pub fn repo_stats_score(contributors_count: u64, contributions: u64, stars: u64) -> f64 {
    let contributors = (contributors_count as f64 + 2.0).log10();
    let contributions = contributions.min(COUNT_CAP) as f64;
    let stars = stars.min(COUNT_CAP) as f64;

    let contribution_term = (contributions.powf(1.2) + 10.0).ln().powf(1.7);
    let star_term = ((stars / 4.0).powf(1.3) + 2.0).log10();

    contributors * (contribution_term * star_term).powf(1.2)
}

/// The person's contribution count in `repo`.
///
/// Contributor entries from the API come first, then the commit-derived ones;
/// the first case-insensitive login match wins. Malformed entries are
/// reported and never abort the scan.
pub fn contributions_for(
    repo: &GitHubRepo,
    github_identifier: &str,
    sink: &dyn DiagnosticSink,
) -> u64 {
    let wanted = github_identifier.to_lowercase();

    for contributor in repo.all_contributors() {
        let login = match &contributor.login {
            ContributorField::Valid(login) => login,
            ContributorField::Missing => {
                sink.error(&format!(
                    "repository {}: contributor entry without login, skipped",
                    repo.display_name()
                ));
                continue;
            }
            ContributorField::Malformed(value) => {
                sink.error(&format!(
                    "repository {}: contributor login {} is not a string, skipped",
                    repo.display_name(),
                    value
                ));
                continue;
            }
        };
        if login.to_lowercase() != wanted {
            continue;
        }
        return match &contributor.contributions {
            ContributorField::Valid(count) if *count >= 0 => *count as u64,
            ContributorField::Valid(count) => {
                sink.error(&format!(
                    "repository {}: negative contribution count {} for {}, counted as 0",
                    repo.display_name(),
                    count,
                    login
                ));
                0
            }
            ContributorField::Missing => {
                sink.error(&format!(
                    "repository {}: contributor {} has no contribution count, counted as 0",
                    repo.display_name(),
                    login
                ));
                0
            }
            ContributorField::Malformed(value) => {
                sink.error(&format!(
                    "repository {}: contribution count {} for {} is not an integer, counted as 0",
                    repo.display_name(),
                    value,
                    login
                ));
                0
            }
        };
    }

    0
}

/// Stats score of `repo` for the person, crediting a fork with its parent's
/// numbers when those score higher.
fn score_repo(repo: &GitHubRepo, contributions: u64, sink: &dyn DiagnosticSink) -> Result<f64> {
    let local = repo_stats_score(repo.contributors_count, contributions, repo.stargazers_count);

    let parent = if repo.is_fork && repo.parent_repo_contributions > 0 {
        repo_stats_score(
            repo.contributors_count,
            repo.parent_repo_contributions,
            repo.parent_stargazers_count,
        )
    } else {
        0.0
    };

    let score = local.max(parent);
    if !score.is_finite() {
        sink.error(&format!(
            "repository {}: stats score is not finite (local {}, parent {})",
            repo.display_name(),
            local,
            parent
        ));
        return Err(ScoreError::NonFiniteRepoScore {
            repo: repo.display_name().to_string(),
        });
    }
    Ok(score)
}

/// Product of `ln(1 + score)` over the top three qualifying repositories.
///
/// Drive-by forks are dropped first. With no qualifying repository the
/// component is 0.
pub fn repository_component(
    repos: &[GitHubRepo],
    github_identifier: &str,
    sink: &dyn DiagnosticSink,
) -> Result<f64> {
    let mut scores = Vec::with_capacity(repos.len());

    for repo in repos {
        let contributions = contributions_for(repo, github_identifier, sink);
        if repo.is_fork && contributions < MIN_FORK_CONTRIBUTIONS {
            sink.debug(&format!(
                "repository {}: fork with {} contributions, ignored",
                repo.display_name(),
                contributions
            ));
            continue;
        }
        scores.push(score_repo(repo, contributions, sink)?);
    }

    if scores.is_empty() {
        return Ok(0.0);
    }

    // Stable: equal scores keep their input order
    scores.sort_by(|a, b| b.total_cmp(a));

    Ok(scores
        .iter()
        .take(TOP_REPOS)
        .map(|score| score.ln_1p())
        .product())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::Contributor;
    use crate::diagnostics::{BufferedSink, NoopSink, Severity};

    fn repo(contributors_count: u64, stars: u64, login: &str, contributions: i64) -> GitHubRepo {
        GitHubRepo {
            name: Some(format!("owner/{}", login)),
            contributors_count,
            stargazers_count: stars,
            contributors: vec![Contributor::new(login, contributions)],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let value = github_value(&[], &[], "octocat", &NoopSink).unwrap();
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_contribution_component() {
        let value = contribution_component(&[0, 1, 9]);
        let expected = 0.0 + 2f64.ln() + 10f64.ln();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_contributions_only() {
        let value = github_value(&[10, 20, 30], &[], "octocat", &NoopSink).unwrap();
        let expected = 0.1 * (11f64.ln() + 21f64.ln() + 31f64.ln());
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_repo_stats_score_known_value() {
        // contributors 8, contributions 1, stars 4:
        // log10(10) * (ln(11)^1.7 * log10(3))^1.2
        let expected = (11f64.ln().powf(1.7) * 3f64.log10()).powf(1.2);
        let value = repo_stats_score(8, 1, 4);
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_repo_stats_score_caps_at_300() {
        assert_eq!(repo_stats_score(5, 300, 300), repo_stats_score(5, 5000, 100_000));
        assert!(repo_stats_score(5, 299, 300) < repo_stats_score(5, 300, 300));
    }

    #[test]
    fn test_contributions_case_insensitive() {
        let r = repo(3, 10, "OctoCat", 17);
        assert_eq!(contributions_for(&r, "octocat", &NoopSink), 17);
    }

    #[test]
    fn test_contributions_first_match_wins() {
        let r = GitHubRepo {
            contributors: vec![Contributor::new("octocat", 5)],
            contributors_from_commits: vec![Contributor::new("octocat", 50)],
            ..Default::default()
        };
        assert_eq!(contributions_for(&r, "octocat", &NoopSink), 5);
    }

    #[test]
    fn test_contributions_from_commit_list() {
        let r = GitHubRepo {
            contributors: vec![Contributor::new("someone", 5)],
            contributors_from_commits: vec![Contributor::new("octocat", 8)],
            ..Default::default()
        };
        assert_eq!(contributions_for(&r, "octocat", &NoopSink), 8);
    }

    #[test]
    fn test_malformed_contributors_logged_not_raised() {
        let r = GitHubRepo {
            name: Some("owner/broken".to_string()),
            contributors: vec![
                Contributor {
                    login: ContributorField::Missing,
                    contributions: ContributorField::Valid(3),
                },
                Contributor {
                    login: ContributorField::Valid("octocat".to_string()),
                    contributions: ContributorField::Missing,
                },
            ],
            ..Default::default()
        };
        let sink = BufferedSink::new();
        assert_eq!(contributions_for(&r, "octocat", &sink), 0);

        let entries = sink.drain();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|(s, _)| *s == Severity::Error));
        assert!(entries[0].1.contains("owner/broken"));
    }

    #[test]
    fn test_missing_login_does_not_stop_scan() {
        let r = GitHubRepo {
            contributors: vec![
                Contributor::default(),
                Contributor::new("octocat", 9),
            ],
            ..Default::default()
        };
        assert_eq!(contributions_for(&r, "octocat", &BufferedSink::new()), 9);
    }

    #[test]
    fn test_mistyped_count_logged_and_counts_zero() {
        let yaml = r#"
name: owner/typed
contributors_count: 2
stargazers_count: 40
contributors:
  - { login: 7, contributions: 50 }
  - { login: OctoCat, contributions: lots }
contributors_from_commits:
  - { login: octocat, contributions: 30 }
"#;
        let r: GitHubRepo = serde_saphyr::from_str(yaml).unwrap();
        let sink = BufferedSink::new();
        assert_eq!(contributions_for(&r, "octocat", &sink), 0);

        let entries = sink.drain();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|(s, _)| *s == Severity::Error));
        assert!(entries[0].1.contains("not a string"));
        assert!(entries[1].1.contains("\"lots\""));
        assert!(entries[1].1.contains("owner/typed"));
    }

    #[test]
    fn test_absent_person_counts_zero() {
        let r = repo(3, 10, "someone", 17);
        assert_eq!(contributions_for(&r, "octocat", &NoopSink), 0);
    }

    #[test]
    fn test_drive_by_fork_filtered() {
        let mut fork = repo(4, 200, "octocat", 2);
        fork.is_fork = true;
        fork.parent_repo_contributions = 100;
        fork.parent_stargazers_count = 300;

        let value = repository_component(&[fork], "octocat", &NoopSink).unwrap();
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_fork_takes_parent_score_when_higher() {
        let mut fork = repo(4, 0, "octocat", 3);
        fork.is_fork = true;
        fork.parent_repo_contributions = 120;
        fork.parent_stargazers_count = 250;

        let value = repository_component(&[fork], "octocat", &NoopSink).unwrap();
        let expected = repo_stats_score(4, 120, 250).ln_1p();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fork_keeps_local_score_when_higher() {
        let mut fork = repo(4, 300, "octocat", 300);
        fork.is_fork = true;
        fork.parent_repo_contributions = 1;
        fork.parent_stargazers_count = 0;

        let value = repository_component(&[fork], "octocat", &NoopSink).unwrap();
        let expected = repo_stats_score(4, 300, 300).ln_1p();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_parent_numbers_ignored_for_non_fork() {
        let mut r = repo(4, 0, "octocat", 3);
        r.parent_repo_contributions = 120;
        r.parent_stargazers_count = 250;

        let value = repository_component(&[r], "octocat", &NoopSink).unwrap();
        let expected = repo_stats_score(4, 3, 0).ln_1p();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_top_three_product() {
        let repos = vec![
            repo(1, 1, "octocat", 1),
            repo(10, 300, "octocat", 300),
            repo(5, 50, "octocat", 40),
            repo(3, 10, "octocat", 10),
        ];
        let value = repository_component(&repos, "octocat", &NoopSink).unwrap();

        let mut scores: Vec<f64> = vec![
            repo_stats_score(1, 1, 1),
            repo_stats_score(10, 300, 300),
            repo_stats_score(5, 40, 50),
            repo_stats_score(3, 10, 10),
        ];
        scores.sort_by(|a, b| b.partial_cmp(a).unwrap());
        let expected: f64 = scores[..3].iter().map(|s| s.ln_1p()).product();
        assert!((value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_single_repo_is_not_squared() {
        let r = repo(10, 300, "octocat", 300);
        let value = repository_component(&[r], "octocat", &NoopSink).unwrap();
        assert!((value - repo_stats_score(10, 300, 300).ln_1p()).abs() < 1e-12);
    }
}
