use color_eyre::eyre::Result;

use crate::ports::spotify::{SpotifyApiPlaylist, SpotifyApiTrack, SpotifyApiUser, SpotifyClient};
use crate::spotify_rs::client::SpotifyClient as SpotifyApi;
use crate::spotify_rs::types::{SpotifyPlaylist, SpotifyTrack, SpotifyUser};

pub struct SpotifyHttpAdapter {
    api: SpotifyApi,
}

impl SpotifyHttpAdapter {
    pub fn new(api: SpotifyApi) -> Self {
        Self { api }
    }
}

impl From<SpotifyUser> for SpotifyApiUser {
    fn from(user: SpotifyUser) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
        }
    }
}

impl From<SpotifyTrack> for SpotifyApiTrack {
    fn from(track: SpotifyTrack) -> Self {
        Self {
            id: track.id,
            name: track.name,
            artists: track.artists.into_iter().map(|artist| artist.name).collect(),
        }
    }
}

impl From<SpotifyPlaylist> for SpotifyApiPlaylist {
    fn from(playlist: SpotifyPlaylist) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
        }
    }
}

#[async_trait::async_trait]
impl SpotifyClient for SpotifyHttpAdapter {
    async fn current_user(&self) -> Result<SpotifyApiUser> {
        Ok(self.api.get_current_user().await?.into())
    }

    async fn search_tracks(&self, query: &str) -> Result<Vec<SpotifyApiTrack>> {
        let tracks = self.api.search_tracks(query).await?;
        Ok(tracks.into_iter().map(SpotifyApiTrack::from).collect())
    }

    async fn create_private_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<SpotifyApiPlaylist> {
        Ok(self
            .api
            .create_playlist(user_id, name, description, false)
            .await?
            .into())
    }

    async fn add_tracks_to_playlist(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        self.api.add_tracks_to_playlist(playlist_id, track_ids).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify_rs::types::{SpotifyAlbum, SpotifyArtist};

    #[test]
    fn test_track_conversion_keeps_artist_order() {
        let track = SpotifyTrack {
            id: "abc123".into(),
            name: "Another Tune".into(),
            artists: vec![
                SpotifyArtist {
                    id: "a1".into(),
                    name: "Other Artist".into(),
                },
                SpotifyArtist {
                    id: "a2".into(),
                    name: "Guest".into(),
                },
            ],
            album: SpotifyAlbum {
                id: "al1".into(),
                name: "Live".into(),
            },
            duration_ms: Some(1000),
        };

        let converted = SpotifyApiTrack::from(track);
        assert_eq!(converted.artists, vec!["Other Artist", "Guest"]);
    }
}
