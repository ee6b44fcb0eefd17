use crate::activity::{ArticleSource, PopularPost};
use crate::diagnostics::DiagnosticSink;

/// Posts taken from each source, and from the merged list
pub const TOP_POSTS: usize = 3;

/// Reviews at or below this contribute nothing beyond the count floor
pub const REVIEW_THRESHOLD: f64 = 3.0;

/// Sharpness of the review soft maximum
pub const REVIEW_SHARPNESS: f64 = 5.0;

/// Weight of the review component in the article score
pub const REVIEW_WEIGHT: f64 = 10.0;

/// Article raw score: `popularity_component + 10 * ai_review_component`.
pub fn article_value(
    qiita_posts: &[PopularPost],
    zenn_articles: &[PopularPost],
    ai_reviews: &[f64],
    sink: &dyn DiagnosticSink,
) -> f64 {
    let popularity = popularity_component(qiita_posts, zenn_articles, sink);
    let review = ai_review_component(ai_reviews);
    popularity + REVIEW_WEIGHT * review
}

fn top_counts(source: ArticleSource, posts: &[PopularPost], sink: &dyn DiagnosticSink) -> Vec<u64> {
    let mut counts: Vec<u64> = posts.iter().map(|post| post.count).collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));
    counts.truncate(TOP_POSTS);
    sink.debug(&format!("{:?}: top counts {:?}", source, counts));
    counts
}

/// Product of `ln(1 + count)` over the three most popular posts across both
/// sources, ignoring posts nobody liked. Empty input scores 0.
pub fn popularity_component(
    qiita_posts: &[PopularPost],
    zenn_articles: &[PopularPost],
    sink: &dyn DiagnosticSink,
) -> f64 {
    let mut counts = top_counts(ArticleSource::Qiita, qiita_posts, sink);
    counts.extend(top_counts(ArticleSource::Zenn, zenn_articles, sink));
    counts.sort_unstable_by(|a, b| b.cmp(a));

    let selected: Vec<u64> = counts
        .into_iter()
        .take(TOP_POSTS)
        .filter(|&count| count > 0)
        .collect();

    if selected.is_empty() {
        return 0.0;
    }

    selected.iter().map(|&count| (count as f64).ln_1p()).product()
}

/// Soft maximum of review excess over the threshold:
/// `(1/t) * ln(sum(exp(t * max(score - 3.0, 0))))` with `t = 5`.
///
/// Every review at or below the threshold still adds `exp(0) = 1` to the
/// sum, so `n` unremarkable reviews yield `ln(n) / t`. No reviews score 0.
pub fn ai_review_component(reviews: &[f64]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }

    let excess: Vec<f64> = reviews
        .iter()
        .map(|&score| REVIEW_SHARPNESS * (score - REVIEW_THRESHOLD).max(0.0))
        .collect();

    // Shift by the largest term so exp() cannot overflow
    let peak = excess.iter().copied().fold(0.0_f64, f64::max);
    let sum: f64 = excess.iter().map(|&x| (x - peak).exp()).sum();

    (peak + sum.ln()) / REVIEW_SHARPNESS
}
