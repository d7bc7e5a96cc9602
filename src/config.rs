use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "rust:spotty:v0.1.0 (subreddit playlist builder)";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub spotify: SpotifyConfig,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

/// Validated credentials for both upstream services.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub reddit: RedditCredentials,
    pub spotify: SpotifyCredentials,
}

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Url,
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err(format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .wrap_err(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("spotty").join("config.toml"))
    }

    /// Load the default config file, or an empty config if there is none.
    /// Everything can also be supplied through flags and environment variables.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Layer values from the command line (and their env fallbacks) over the file.
    pub fn merge(mut self, overrides: Config) -> Self {
        fn pick(current: &mut Option<String>, incoming: Option<String>) {
            if incoming.is_some() {
                *current = incoming;
            }
        }

        pick(&mut self.reddit.client_id, overrides.reddit.client_id);
        pick(&mut self.reddit.client_secret, overrides.reddit.client_secret);
        pick(&mut self.reddit.user_agent, overrides.reddit.user_agent);
        pick(&mut self.spotify.client_id, overrides.spotify.client_id);
        pick(&mut self.spotify.client_secret, overrides.spotify.client_secret);
        pick(&mut self.spotify.redirect_uri, overrides.spotify.redirect_uri);
        self
    }

    /// Check that every required field is present before anything touches the network.
    pub fn validate(self) -> Result<Credentials> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| {
            match value.filter(|value| !value.trim().is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let reddit_client_id = require(self.reddit.client_id, "reddit.client_id (REDDIT_CLIENT_ID)");
        let reddit_client_secret = require(
            self.reddit.client_secret,
            "reddit.client_secret (REDDIT_CLIENT_SECRET)",
        );
        let spotify_client_id =
            require(self.spotify.client_id, "spotify.client_id (SPOTIFY_CLIENT_ID)");
        let spotify_client_secret = require(
            self.spotify.client_secret,
            "spotify.client_secret (SPOTIFY_CLIENT_SECRET)",
        );
        let redirect_uri = require(
            self.spotify.redirect_uri,
            "spotify.redirect_uri (SPOTIFY_REDIRECT_URI)",
        );

        if !missing.is_empty() {
            return Err(eyre!(
                "Missing required configuration: {}",
                missing.join(", ")
            ));
        }

        let redirect_uri = Url::parse(&redirect_uri)
            .wrap_err(format!("Invalid spotify.redirect_uri: {}", redirect_uri))?;

        Ok(Credentials {
            reddit: RedditCredentials {
                client_id: reddit_client_id,
                client_secret: reddit_client_secret,
                user_agent: self
                    .reddit
                    .user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            },
            spotify: SpotifyCredentials {
                client_id: spotify_client_id,
                client_secret: spotify_client_secret,
                redirect_uri,
            },
        })
    }
}
