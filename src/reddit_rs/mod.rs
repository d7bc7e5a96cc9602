pub mod auth;
pub mod listing;
pub mod types;

pub use auth::request_app_token;
pub use listing::get_top_posts;
pub use types::{RedditPost, TimeWindow};

/// HTTP statuses Reddit answers with when it is rate limiting or overloaded.
const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Docs:
/// https://github.com/reddit-archive/reddit/wiki/OAuth2
#[derive(Debug, thiserror::Error)]
pub enum RedditError {
    #[error("Reddit returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to send http request: {0}")]
    FailedToSendRequest(reqwest::Error),
    #[error("Failed to parse response: {0}")]
    FailedToParseResponse(reqwest::Error),
    #[error("Invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Expected a listing of submissions, got a `{kind}` entry")]
    UnexpectedKind { kind: String },
}

impl RedditError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RedditError::Status { status, .. } => Some(*status),
            RedditError::FailedToSendRequest(error) | RedditError::FailedToParseResponse(error) => {
                error.status().map(|status| status.as_u16())
            }
            RedditError::InvalidUrl(_) | RedditError::UnexpectedKind { .. } => None,
        }
    }

    /// Rate limiting and 5xx responses are worth one more attempt, nothing else is.
    pub fn is_transient(&self) -> bool {
        self.status()
            .is_some_and(|status| TRANSIENT_STATUSES.contains(&status))
    }
}

/// HTTP client for Reddit calls.
///
/// Redirects are not followed: Reddit answers an unknown subreddit with a 302 to
/// its subreddit search, which must surface as an error instead of a listing.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// Turn a non-success response into a `RedditError::Status`, keeping the body for the report.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, RedditError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(RedditError::Status {
        status: status.as_u16(),
        body: response
            .text()
            .await
            .unwrap_or("Failed to get error text".to_string()),
    })
}
