use std::collections::HashMap;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};
use url::Url;

use crate::spotify_rs::types::{OAuthSession, SpotifyAuthResponse, SpotifyTokenResponse};

const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Creating and filling a private playlist needs nothing broader.
pub const SPOTIFY_SCOPES: [&str; 1] = ["playlist-modify-private"];

/// Generate a cryptographically secure random string for PKCE
fn generate_random_string(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            const CHARSET: &[u8] =
                b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";
            CHARSET[rng.random_range(0..CHARSET.len())] as char
        })
        .collect()
}

/// Generate PKCE code verifier (43-128 characters)
fn generate_code_verifier() -> String {
    generate_random_string(128)
}

/// Generate PKCE code challenge from verifier using S256 method
fn generate_code_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    let hash = hasher.finalize();
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generate a random state parameter for CSRF protection
fn generate_state() -> String {
    generate_random_string(16)
}

/// Initiate Spotify OAuth flow with PKCE
/// Returns the authorization URL and creates an OAuth session
pub fn initiate_oauth(client_id: &str, redirect_uri: &str) -> (SpotifyAuthResponse, OAuthSession) {
    let code_verifier = generate_code_verifier();
    let code_challenge = generate_code_challenge(&code_verifier);
    let state = generate_state();

    let scope = SPOTIFY_SCOPES.join(" ");

    let auth_url = format!(
        "{}?client_id={}&response_type=code&redirect_uri={}&state={}&scope={}&code_challenge_method=S256&code_challenge={}",
        SPOTIFY_AUTH_URL,
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(&state),
        urlencoding::encode(&scope),
        urlencoding::encode(&code_challenge),
    );

    let session = OAuthSession {
        code_verifier,
        state: state.clone(),
    };

    let response = SpotifyAuthResponse { auth_url, state };

    (response, session)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RedirectUrlError {
    #[error("Could not parse redirect url: {0}")]
    Malformed(String),
    #[error("Authorization was denied: {0}")]
    Denied(String),
    #[error("Redirect url state does not match the authorization request")]
    StateMismatch,
    #[error("Redirect url has no authorization code")]
    MissingCode,
}

/// Pull the authorization code out of the url the browser was redirected to.
pub fn extract_authorization_code(
    redirect_url: &str,
    expected_state: &str,
) -> Result<String, RedirectUrlError> {
    let url = Url::parse(redirect_url.trim())
        .map_err(|error| RedirectUrlError::Malformed(error.to_string()))?;
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    if let Some(error) = params.get("error") {
        return Err(RedirectUrlError::Denied(error.clone()));
    }

    if params.get("state").map(String::as_str) != Some(expected_state) {
        return Err(RedirectUrlError::StateMismatch);
    }

    params
        .get("code")
        .filter(|code| !code.is_empty())
        .cloned()
        .ok_or(RedirectUrlError::MissingCode)
}

#[derive(Debug, thiserror::Error)]
pub enum ExchangeCodeForTokenError {
    #[error("Invalid code: {reason}")]
    InvalidCode { reason: String },
    #[error("Failed to send http request: {0}")]
    FailedToSendRequest(reqwest::Error),
    #[error("Failed to parse response")]
    FailedToParseResponse(reqwest::Error),
}

/// Exchange authorization code for access token
/// https://developer.spotify.com/documentation/web-api/tutorials/code-pkce-flow
pub async fn exchange_code_for_token(
    client: &reqwest::Client,
    client_id: &str,
    client_secret: &str,
    code: &str,
    // Must be the exact redirect URI used to initiate the flow
    redirect_uri: &str,
    code_verifier: &str,
) -> Result<SpotifyTokenResponse, ExchangeCodeForTokenError> {
    let mut params = HashMap::new();
    params.insert("grant_type", "authorization_code");
    params.insert("code", code);
    params.insert("redirect_uri", redirect_uri);
    params.insert("client_id", client_id);
    params.insert("code_verifier", code_verifier);

    let response = client
        .post(SPOTIFY_TOKEN_URL)
        // Serialized as x-www-form-urlencoded, as required by spotify
        .form(&params)
        .basic_auth(client_id, Some(client_secret))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(ExchangeCodeForTokenError::FailedToSendRequest)?;

    if !response.status().is_success() {
        return Err(ExchangeCodeForTokenError::InvalidCode {
            reason: response
                .text()
                .await
                .unwrap_or("Failed to get error text".to_string()),
        });
    }

    let token_response: SpotifyTokenResponse = response
        .json()
        .await
        .map_err(ExchangeCodeForTokenError::FailedToParseResponse)?;

    Ok(token_response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_verifier() {
        let verifier = generate_code_verifier();
        assert_eq!(verifier.len(), 128);
        // Verify it only contains allowed characters
        assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()
            || c == '-'
            || c == '.'
            || c == '_'
            || c == '~'));
    }

    #[test]
    fn test_generate_code_challenge() {
        // RFC 7636 appendix B
        let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn test_generate_state() {
        let state = generate_state();
        assert_eq!(state.len(), 16);
    }

    #[test]
    fn test_initiate_oauth() {
        let client_id = "test_client_id";
        let redirect_uri = "http://localhost:3000/callback";
        let (response, session) = initiate_oauth(client_id, redirect_uri);

        assert!(response.auth_url.starts_with(SPOTIFY_AUTH_URL));
        assert!(response.auth_url.contains(client_id));
        assert!(response.auth_url.contains("code_challenge_method=S256"));
        assert!(response.auth_url.contains("scope=playlist-modify-private"));
        assert!(
            response
                .auth_url
                .contains(&generate_code_challenge(&session.code_verifier))
        );
        assert_eq!(response.state, session.state);
        assert_eq!(session.code_verifier.len(), 128);
    }

    #[test]
    fn test_extract_authorization_code() {
        let code = extract_authorization_code(
            "http://localhost:3000/callback?code=AQD-xyz&state=abc123\n",
            "abc123",
        );
        assert_eq!(code, Ok("AQD-xyz".to_string()));
    }

    #[test]
    fn test_extract_authorization_code_state_mismatch() {
        let code = extract_authorization_code(
            "http://localhost:3000/callback?code=AQD-xyz&state=other",
            "abc123",
        );
        assert_eq!(code, Err(RedirectUrlError::StateMismatch));
    }

    #[test]
    fn test_extract_authorization_code_denied() {
        let code = extract_authorization_code(
            "http://localhost:3000/callback?error=access_denied&state=abc123",
            "abc123",
        );
        assert_eq!(
            code,
            Err(RedirectUrlError::Denied("access_denied".to_string()))
        );
    }

    #[test]
    fn test_extract_authorization_code_missing_code() {
        let code =
            extract_authorization_code("http://localhost:3000/callback?state=abc123", "abc123");
        assert_eq!(code, Err(RedirectUrlError::MissingCode));
    }

    #[test]
    fn test_extract_authorization_code_garbage() {
        assert!(matches!(
            extract_authorization_code("not a url", "abc123"),
            Err(RedirectUrlError::Malformed(_))
        ));
    }
}
