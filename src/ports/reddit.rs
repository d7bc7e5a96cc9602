use crate::reddit_rs::{RedditError, TimeWindow};

/// One feed item. Only the title is used for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub score: i64,
}

/// Port trait wrapping the Reddit listing capability used by business logic.
///
/// Implementations live in `services::reddit::client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RedditClient: Send + Sync {
    async fn top_submissions(
        &self,
        subreddit: &str,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Vec<Submission>, RedditError>;
}
