use color_eyre::eyre::Result;

/// Supplies the one piece of user input the OAuth flow needs: the url the
/// browser was redirected to after the user approved access.
///
/// The stdin implementation lives in `services::spotify::session`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn redirect_url(&self, authorize_url: &str) -> Result<String>;
}
