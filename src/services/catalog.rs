use chrono::NaiveDate;
use color_eyre::eyre::{Result, WrapErr};

use crate::ports::spotify::{SpotifyApiTrack, SpotifyApiUser, SpotifyClient};
use crate::services::title_parser::Candidate;

/// The first search result for a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub track_id: String,
    pub track_name: String,
    pub artist_name: String,
}

impl From<SpotifyApiTrack> for SearchHit {
    fn from(track: SpotifyApiTrack) -> Self {
        Self {
            track_id: track.id,
            track_name: track.name,
            artist_name: track.artists.into_iter().next().unwrap_or_default(),
        }
    }
}

/// Remote handle of a playlist this run created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistHandle {
    pub id: String,
    pub name: String,
    pub track_count: usize,
}

/// `"<community> - <YYYY-MM-DD>"`
pub fn playlist_name(community: &str, date: NaiveDate) -> String {
    format!("{} - {}", community, date.format("%Y-%m-%d"))
}

/// Field-filtered search for a track by this artist with this title.
/// Double quotes inside the fields would end the phrase early, so they are dropped.
pub fn search_query(candidate: &Candidate) -> String {
    format!(
        r#"artist:"{}" track:"{}""#,
        candidate.artist.replace('"', ""),
        candidate.title.replace('"', "")
    )
}

pub struct CatalogPlaylistService<C: SpotifyClient> {
    client: C,
}

impl<C: SpotifyClient> CatalogPlaylistService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn current_user(&self) -> Result<SpotifyApiUser> {
        self.client
            .current_user()
            .await
            .wrap_err("Failed to fetch the current Spotify user")
    }

    /// Search for one candidate and keep the top hit. A failed search is
    /// logged and counts as no hit.
    pub async fn resolve_one(&self, candidate: &Candidate) -> Option<SearchHit> {
        let query = search_query(candidate);

        match self.client.search_tracks(&query).await {
            Ok(tracks) => {
                let hit = tracks.into_iter().next().map(SearchHit::from);
                if hit.is_none() {
                    tracing::debug!("No match for {} - {}", candidate.artist, candidate.title);
                }
                hit
            }
            Err(error) => {
                tracing::warn!(
                    "Search failed for {} - {}: {:#}",
                    candidate.artist,
                    candidate.title,
                    error
                );
                None
            }
        }
    }

    /// Resolve candidates one at a time, in order, keeping only those with a hit.
    pub async fn resolve<I>(&self, candidates: I) -> Vec<SearchHit>
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut hits = Vec::new();
        for candidate in candidates {
            if let Some(hit) = self.resolve_one(&candidate).await {
                tracing::info!("Matched {} - {}", hit.track_name, hit.artist_name);
                hits.push(hit);
            }
        }
        hits
    }

    /// Create a private playlist for `owner_id` and append every hit in order.
    ///
    /// When nothing resolved, no playlist is created and `None` is returned.
    /// Failing to create or fill the playlist is fatal.
    pub async fn build(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
        hits: &[SearchHit],
    ) -> Result<Option<PlaylistHandle>> {
        if hits.is_empty() {
            tracing::warn!("No tracks resolved, not creating playlist '{}'", name);
            return Ok(None);
        }

        let playlist = self
            .client
            .create_private_playlist(owner_id, name, description)
            .await
            .wrap_err_with(|| format!("Failed to create playlist '{}'", name))?;

        let track_ids: Vec<String> = hits.iter().map(|hit| hit.track_id.clone()).collect();
        self.client
            .add_tracks_to_playlist(&playlist.id, &track_ids)
            .await
            .wrap_err_with(|| format!("Failed to add tracks to playlist '{}'", name))?;

        tracing::info!(
            "Created playlist '{}' ({}) with {} tracks",
            playlist.name,
            playlist.id,
            track_ids.len()
        );

        Ok(Some(PlaylistHandle {
            id: playlist.id,
            name: playlist.name,
            track_count: track_ids.len(),
        }))
    }

    pub async fn resolve_and_build<I>(
        &self,
        candidates: I,
        owner_id: &str,
        name: &str,
        description: &str,
    ) -> Result<(Vec<SearchHit>, Option<PlaylistHandle>)>
    where
        I: IntoIterator<Item = Candidate>,
    {
        let hits = self.resolve(candidates).await;
        let playlist = self.build(owner_id, name, description, &hits).await?;
        Ok((hits, playlist))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::spotify::{MockSpotifyClient, SpotifyApiPlaylist};
    use color_eyre::eyre::eyre;

    fn candidate(artist: &str, title: &str) -> Candidate {
        Candidate {
            artist: artist.into(),
            title: title.into(),
        }
    }

    fn track(id: &str, name: &str, artist: &str) -> SpotifyApiTrack {
        SpotifyApiTrack {
            id: id.into(),
            name: name.into(),
            artists: vec![artist.into(), "Featured Guest".into()],
        }
    }

    fn hit(id: &str) -> SearchHit {
        SearchHit {
            track_id: id.into(),
            track_name: format!("Track {}", id),
            artist_name: "Artist".into(),
        }
    }

    /// Zero hits for "The Band", one hit for anything else.
    fn mock_search(client: &mut MockSpotifyClient) {
        client.expect_search_tracks().returning(|query| {
            if query.contains("The Band") {
                Ok(vec![])
            } else {
                Ok(vec![
                    track("abc123", "Another Tune", "Other Artist"),
                    track("zzz999", "Another Tune (Remix)", "Other Artist"),
                ])
            }
        });
    }

    #[test]
    fn test_playlist_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            playlist_name("listentothis", date),
            "listentothis - 2024-01-15"
        );
    }

    #[test]
    fn test_search_query() {
        assert_eq!(
            search_query(&candidate("The Band", "A \"Song\"")),
            r#"artist:"The Band" track:"A Song""#
        );
    }

    #[test]
    fn test_search_hit_uses_primary_artist() {
        let hit = SearchHit::from(track("abc123", "Another Tune", "Other Artist"));
        assert_eq!(hit.artist_name, "Other Artist");

        let orphan = SearchHit::from(SpotifyApiTrack {
            artists: vec![],
            ..track("x", "y", "z")
        });
        assert_eq!(orphan.artist_name, "");
    }

    #[tokio::test]
    async fn test_resolve_skips_candidates_without_hits() {
        let mut client = MockSpotifyClient::new();
        mock_search(&mut client);
        let service = CatalogPlaylistService::new(client);

        let hits = service
            .resolve(vec![
                candidate("The Band", "A Song"),
                candidate("Other Artist", "Another Tune"),
            ])
            .await;

        let ids: Vec<&str> = hits.iter().map(|hit| hit.track_id.as_str()).collect();
        assert_eq!(ids, vec!["abc123"]);
        assert_eq!(hits[0].track_name, "Another Tune");
        assert_eq!(hits[0].artist_name, "Other Artist");
    }

    #[tokio::test]
    async fn test_resolve_is_repeatable() {
        let mut client = MockSpotifyClient::new();
        mock_search(&mut client);
        let service = CatalogPlaylistService::new(client);
        let candidates = vec![
            candidate("Other Artist", "Another Tune"),
            candidate("The Band", "A Song"),
            candidate("Other Artist", "Another Tune"),
        ];

        let first = service.resolve(candidates.clone()).await;
        let second = service.resolve(candidates).await;

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_resolve_survives_search_errors() {
        let mut client = MockSpotifyClient::new();
        client.expect_search_tracks().returning(|query| {
            if query.contains("Broken") {
                Err(eyre!("HTTP status server error (502 Bad Gateway)"))
            } else {
                Ok(vec![track("ok1", "Fine", "Working")])
            }
        });
        let service = CatalogPlaylistService::new(client);

        let hits = service
            .resolve(vec![
                candidate("Broken", "Thing"),
                candidate("Working", "Fine"),
            ])
            .await;

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].track_id, "ok1");
    }

    #[tokio::test]
    async fn test_build_creates_playlist_then_adds_tracks_in_order() {
        let mut client = MockSpotifyClient::new();
        client
            .expect_create_private_playlist()
            .withf(|owner, name, _| owner == "someone" && name == "listentothis - 2024-01-15")
            .times(1)
            .returning(|_, name, _| {
                Ok(SpotifyApiPlaylist {
                    id: "pl1".into(),
                    name: name.to_string(),
                })
            });
        client
            .expect_add_tracks_to_playlist()
            .withf(|playlist_id, track_ids| {
                playlist_id == "pl1" && track_ids == ["b".to_string(), "a".to_string()]
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let service = CatalogPlaylistService::new(client);

        let handle = service
            .build(
                "someone",
                "listentothis - 2024-01-15",
                "desc",
                &[hit("b"), hit("a")],
            )
            .await
            .unwrap();

        assert_eq!(
            handle,
            Some(PlaylistHandle {
                id: "pl1".into(),
                name: "listentothis - 2024-01-15".into(),
                track_count: 2,
            })
        );
    }

    #[tokio::test]
    async fn test_build_skips_empty_playlist() {
        let mut client = MockSpotifyClient::new();
        client.expect_create_private_playlist().never();
        client.expect_add_tracks_to_playlist().never();
        let service = CatalogPlaylistService::new(client);

        let handle = service.build("someone", "name", "desc", &[]).await.unwrap();
        assert!(handle.is_none());
    }

    #[tokio::test]
    async fn test_build_create_failure_is_fatal() {
        let mut client = MockSpotifyClient::new();
        client
            .expect_create_private_playlist()
            .returning(|_, _, _| Err(eyre!("403 Forbidden")));
        client.expect_add_tracks_to_playlist().never();
        let service = CatalogPlaylistService::new(client);

        let error = service
            .build("someone", "name", "desc", &[hit("a")])
            .await
            .unwrap_err();
        assert!(error.to_string().contains("Failed to create playlist"));
    }

    #[tokio::test]
    async fn test_build_add_failure_is_fatal() {
        let mut client = MockSpotifyClient::new();
        client.expect_create_private_playlist().returning(|_, _, _| {
            Ok(SpotifyApiPlaylist {
                id: "pl1".into(),
                name: "name".into(),
            })
        });
        client
            .expect_add_tracks_to_playlist()
            .returning(|_, _| Err(eyre!("500 Internal Server Error")));
        let service = CatalogPlaylistService::new(client);

        let result = service.build("someone", "name", "desc", &[hit("a")]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_resolve_and_build_hands_only_hits_to_playlist() {
        let mut client = MockSpotifyClient::new();
        mock_search(&mut client);
        client.expect_create_private_playlist().returning(|_, name, _| {
            Ok(SpotifyApiPlaylist {
                id: "pl1".into(),
                name: name.to_string(),
            })
        });
        client
            .expect_add_tracks_to_playlist()
            .withf(|_, track_ids| track_ids == ["abc123".to_string()])
            .times(1)
            .returning(|_, _| Ok(()));
        let service = CatalogPlaylistService::new(client);

        let (hits, playlist) = service
            .resolve_and_build(
                vec![
                    candidate("The Band", "A Song"),
                    candidate("Other Artist", "Another Tune"),
                ],
                "someone",
                "listentothis - 2024-01-15",
                "desc",
            )
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(playlist.unwrap().track_count, 1);
    }
}
