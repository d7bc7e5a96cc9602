use reqwest::Client;
use url::Url;

use crate::reddit_rs::types::{LINK_KIND, Listing, RedditPost, TimeWindow};
use crate::reddit_rs::{RedditError, check_status};

const REDDIT_OAUTH_BASE: &str = "https://oauth.reddit.com";

pub(crate) fn top_posts_url(
    subreddit: &str,
    window: TimeWindow,
    limit: u32,
) -> Result<Url, url::ParseError> {
    let limit = limit.to_string();
    Url::parse_with_params(
        &format!(
            "{}/r/{}/top",
            REDDIT_OAUTH_BASE,
            urlencoding::encode(subreddit)
        ),
        &[
            ("t", window.as_str()),
            ("limit", limit.as_str()),
            ("raw_json", "1"),
        ],
    )
}

/// Fetch one page of a subreddit's top listing for the given window.
///
/// Only the first page is requested; Reddit caps `limit` at 100.
pub async fn get_top_posts(
    client: &Client,
    access_token: &str,
    user_agent: &str,
    subreddit: &str,
    window: TimeWindow,
    limit: u32,
) -> Result<Vec<RedditPost>, RedditError> {
    let url = top_posts_url(subreddit, window, limit)?;
    tracing::debug!("Requesting {}", url);

    let response = client
        .get(url)
        .bearer_auth(access_token)
        .header(reqwest::header::USER_AGENT, user_agent)
        .send()
        .await
        .map_err(RedditError::FailedToSendRequest)?;

    let listing: Listing<RedditPost> = check_status(response)
        .await?
        .json()
        .await
        .map_err(RedditError::FailedToParseResponse)?;

    posts_from_listing(listing)
}

/// Unwrap the submissions of a listing, refusing anything that isn't a link.
pub(crate) fn posts_from_listing(
    listing: Listing<RedditPost>,
) -> Result<Vec<RedditPost>, RedditError> {
    listing
        .data
        .children
        .into_iter()
        .map(|thing| {
            if thing.kind == LINK_KIND {
                Ok(thing.data)
            } else {
                Err(RedditError::UnexpectedKind { kind: thing.kind })
            }
        })
        .collect()
}
