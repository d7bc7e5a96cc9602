use reqwest::Client;

use crate::reddit_rs::types::RedditToken;
use crate::reddit_rs::{RedditError, check_status};

const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Obtain an application-only token (no user context) for read-only listing access.
///
/// Reddit expects the client id and secret as HTTP basic auth and rejects
/// requests without a descriptive user agent.
pub async fn request_app_token(
    client: &Client,
    client_id: &str,
    client_secret: &str,
    user_agent: &str,
) -> Result<RedditToken, RedditError> {
    let response = client
        .post(REDDIT_TOKEN_URL)
        .basic_auth(client_id, Some(client_secret))
        .header(reqwest::header::USER_AGENT, user_agent)
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(RedditError::FailedToSendRequest)?;

    let token: RedditToken = check_status(response)
        .await?
        .json()
        .await
        .map_err(RedditError::FailedToParseResponse)?;

    tracing::debug!(
        "Obtained Reddit app token (expires in {}s)",
        token.expires_in
    );

    Ok(token)
}
