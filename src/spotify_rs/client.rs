use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use url::Url;

use crate::spotify_rs::types::{
    AddTracksRequest, CreatePlaylistRequest, SearchResponse, SnapshotResponse, SpotifyPlaylist,
    SpotifyTrack, SpotifyUser,
};

const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// Spotify caps `POST /playlists/{id}/tracks` at 100 uris per request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

pub(crate) fn search_url(query: &str) -> Result<Url> {
    Url::parse_with_params(
        &format!("{}/search", SPOTIFY_API_BASE),
        &[("q", query), ("type", "track")],
    )
    .wrap_err("Failed to build spotify search url")
}

/// Spotify API client
pub struct SpotifyClient {
    access_token: String,
    client: reqwest::Client,
}

impl SpotifyClient {
    pub fn new(client: reqwest::Client, access_token: String) -> Self {
        Self {
            access_token,
            client,
        }
    }

    /// Get the current user's profile
    pub async fn get_current_user(&self) -> Result<SpotifyUser> {
        let response = self
            .client
            .get(format!("{}/me", SPOTIFY_API_BASE))
            .bearer_auth(&self.access_token)
            .timeout(Duration::from_secs(10))
            .send()
            .await?
            .error_for_status()?;

        let user: SpotifyUser = response.json().await?;
        Ok(user)
    }

    /// Free-text track search, first page only
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<SpotifyTrack>> {
        let response = self
            .client
            .get(search_url(query)?)
            .bearer_auth(&self.access_token)
            .timeout(Duration::from_secs(10))
            .send()
            .await?
            .error_for_status()?;

        let page: SearchResponse = response
            .json()
            .await
            .wrap_err("Failed to deserialize spotify search response")?;
        Ok(page.tracks.items)
    }

    /// Create an empty playlist owned by `user_id`
    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<SpotifyPlaylist> {
        let response = self
            .client
            .post(format!(
                "{}/users/{}/playlists",
                SPOTIFY_API_BASE,
                urlencoding::encode(user_id)
            ))
            .bearer_auth(&self.access_token)
            .timeout(Duration::from_secs(10))
            .json(&CreatePlaylistRequest {
                name,
                public,
                description,
            })
            .send()
            .await?
            .error_for_status()?;

        let playlist: SpotifyPlaylist = response.json().await?;
        Ok(playlist)
    }

    /// Append tracks to the end of a playlist, in order.
    /// Returns the snapshot id after the last request.
    pub async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<Option<String>> {
        let mut snapshot_id = None;

        for chunk in track_ids.chunks(MAX_TRACKS_PER_REQUEST) {
            let response = self
                .client
                .post(format!(
                    "{}/playlists/{}/tracks",
                    SPOTIFY_API_BASE,
                    urlencoding::encode(playlist_id)
                ))
                .bearer_auth(&self.access_token)
                .timeout(Duration::from_secs(10))
                .json(&AddTracksRequest {
                    uris: chunk.iter().map(|id| track_uri(id)).collect(),
                })
                .send()
                .await?
                .error_for_status()?;

            let snapshot: SnapshotResponse = response.json().await?;
            snapshot_id = Some(snapshot.snapshot_id);
        }

        Ok(snapshot_id)
    }
}
