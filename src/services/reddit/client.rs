use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;

use crate::config::RedditCredentials;
use crate::ports::reddit::{RedditClient, Submission};
use crate::reddit_rs::{RedditError, RedditPost, TimeWindow, get_top_posts, request_app_token};

/// Reddit listing adapter holding an application-only token for the whole run.
pub struct RedditHttpAdapter {
    client: Client,
    access_token: String,
    user_agent: String,
}

impl RedditHttpAdapter {
    pub async fn connect(client: Client, credentials: &RedditCredentials) -> Result<Self> {
        let token = request_app_token(
            &client,
            &credentials.client_id,
            &credentials.client_secret,
            &credentials.user_agent,
        )
        .await
        .wrap_err("Failed to authenticate with Reddit")?;

        Ok(Self {
            client,
            access_token: token.access_token,
            user_agent: credentials.user_agent.clone(),
        })
    }
}

impl From<RedditPost> for Submission {
    fn from(post: RedditPost) -> Self {
        Self {
            title: post.title,
            score: post.score,
        }
    }
}

#[async_trait::async_trait]
impl RedditClient for RedditHttpAdapter {
    async fn top_submissions(
        &self,
        subreddit: &str,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Vec<Submission>, RedditError> {
        let posts = get_top_posts(
            &self.client,
            &self.access_token,
            &self.user_agent,
            subreddit,
            window,
            limit,
        )
        .await?;

        Ok(posts.into_iter().map(Submission::from).collect())
    }
}
