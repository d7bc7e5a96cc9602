use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};

use crate::ports::reddit::{RedditClient, Submission};
use crate::reddit_rs::TimeWindow;

/// How long to wait after Reddit answers with a rate limit or a 5xx.
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(60);

pub struct FeedFetcher<C: RedditClient> {
    client: C,
    backoff: Duration,
}

impl<C: RedditClient> FeedFetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            backoff: RATE_LIMIT_BACKOFF,
        }
    }

    /// Fetch the top submissions of `subreddit` over `window`.
    ///
    /// A transient failure (429 or 5xx) sleeps once and makes exactly one more
    /// attempt, whose outcome is final. Any other failure is returned as is.
    /// Each call issues fresh requests; nothing is cached.
    pub async fn fetch(
        &self,
        subreddit: &str,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Vec<Submission>> {
        tracing::info!("Fetching top {} posts of r/{} ({})", limit, subreddit, window);

        let submissions = match self.client.top_submissions(subreddit, window, limit).await {
            Ok(submissions) => submissions,
            Err(error) if error.is_transient() => {
                tracing::warn!(
                    "Reddit is down (error {}), sleeping {}s...",
                    error.status().unwrap_or_default(),
                    self.backoff.as_secs()
                );
                tokio::time::sleep(self.backoff).await;

                self.client
                    .top_submissions(subreddit, window, limit)
                    .await
                    .wrap_err_with(|| {
                        format!("Failed to fetch r/{} after waiting out an outage", subreddit)
                    })?
            }
            Err(error) => {
                return Err(error).wrap_err_with(|| format!("Failed to fetch r/{}", subreddit));
            }
        };

        tracing::info!("Fetched {} submissions", submissions.len());
        Ok(submissions)
    }
}
