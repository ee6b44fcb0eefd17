use futures::future::BoxFuture;
use std::future::Future;

use super::RankInfo;

/// Answers where a raw score ranks within a reference population.
pub trait RankLookup {
    fn lookup(&self, raw_score: f64) -> RankInfo;
}

impl<F> RankLookup for F
where
    F: Fn(f64) -> RankInfo,
{
    fn lookup(&self, raw_score: f64) -> RankInfo {
        self(raw_score)
    }
}

/// Rank lookup backed by something that has to be awaited, such as a
/// database query.
pub trait AsyncRankLookup: Send + Sync {
    fn lookup_async(&self, raw_score: f64) -> BoxFuture<'_, RankInfo>;
}

impl<F, Fut> AsyncRankLookup for F
where
    F: Fn(f64) -> Fut + Send + Sync,
    Fut: Future<Output = RankInfo> + Send + 'static,
{
    fn lookup_async(&self, raw_score: f64) -> BoxFuture<'_, RankInfo> {
        Box::pin(self(raw_score))
    }
}
