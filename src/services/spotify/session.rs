use std::io::Write;

use color_eyre::eyre::{Result, WrapErr, bail};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::SpotifyCredentials;
use crate::ports::credentials::CredentialProvider;
use crate::services::spotify::client::SpotifyHttpAdapter;
use crate::spotify_rs::auth::{exchange_code_for_token, extract_authorization_code, initiate_oauth};
use crate::spotify_rs::client::SpotifyClient as SpotifyApi;
use crate::spotify_rs::types::OAuthSession;

/// Asks the user on the terminal to open the authorize url and paste back
/// the url Spotify redirected them to.
pub struct StdinCredentialProvider;

#[async_trait::async_trait]
impl CredentialProvider for StdinCredentialProvider {
    async fn redirect_url(&self, authorize_url: &str) -> Result<String> {
        println!("Open this url in your browser and approve access:\n\n    {authorize_url}\n");
        print!("Paste the url you were redirected to: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .wrap_err("Failed to read redirect url from stdin")?;

        if line.trim().is_empty() {
            bail!("No redirect url was entered");
        }
        Ok(line)
    }
}

/// Run the user-facing half of the authorization-code flow: build the
/// authorize url, hand it to the provider and validate what comes back.
pub async fn request_authorization_code(
    credentials: &SpotifyCredentials,
    provider: &impl CredentialProvider,
) -> Result<(String, OAuthSession)> {
    let (auth, session) = initiate_oauth(&credentials.client_id, credentials.redirect_uri.as_str());
    tracing::debug!("Starting Spotify authorization (state {})", auth.state);

    let redirect_url = provider.redirect_url(&auth.auth_url).await?;
    let code = extract_authorization_code(&redirect_url, &session.state)?;

    Ok((code, session))
}

/// Authorize against Spotify and return a client bound to the user's token.
pub async fn connect(
    client: reqwest::Client,
    credentials: &SpotifyCredentials,
    provider: &impl CredentialProvider,
) -> Result<SpotifyHttpAdapter> {
    let (code, session) = request_authorization_code(credentials, provider).await?;

    let token = exchange_code_for_token(
        &client,
        &credentials.client_id,
        &credentials.client_secret,
        &code,
        credentials.redirect_uri.as_str(),
        &session.code_verifier,
    )
    .await
    .wrap_err("Failed to exchange Spotify authorization code")?;

    tracing::info!("Authorized with Spotify (scope: {})", token.scope);

    Ok(SpotifyHttpAdapter::new(SpotifyApi::new(
        client,
        token.access_token,
    )))
}
