use chrono::NaiveDate;
use color_eyre::eyre::{Result, bail};

use crate::ports::reddit::RedditClient;
use crate::ports::spotify::SpotifyClient;
use crate::reddit_rs::TimeWindow;
use crate::services::catalog::{CatalogPlaylistService, PlaylistHandle, SearchHit, playlist_name};
use crate::services::feed::FeedFetcher;
use crate::services::title_parser::candidates;

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub subreddit: String,
    pub window: TimeWindow,
    pub limit: u32,
    /// Spotify user id the playlist must be created for.
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub playlist_name: String,
    pub submissions: usize,
    pub candidates: usize,
    pub tracks: Vec<SearchHit>,
    pub playlist: Option<PlaylistHandle>,
}

/// Scrape, parse, resolve and build, strictly in that order.
pub struct Pipeline<R: RedditClient, S: SpotifyClient> {
    feed: FeedFetcher<R>,
    catalog: CatalogPlaylistService<S>,
}

impl<R: RedditClient, S: SpotifyClient> Pipeline<R, S> {
    pub fn new(feed: FeedFetcher<R>, catalog: CatalogPlaylistService<S>) -> Self {
        Self { feed, catalog }
    }

    pub async fn run(&self, request: &RunRequest, today: NaiveDate) -> Result<RunSummary> {
        let user = self.catalog.current_user().await?;
        tracing::info!(
            "Logged in to Spotify as {}",
            user.display_name.as_deref().unwrap_or(&user.id)
        );
        if user.id != request.username {
            bail!(
                "Logged in to Spotify as '{}' but the playlist was requested for '{}'",
                user.id,
                request.username
            );
        }

        let submissions = self
            .feed
            .fetch(&request.subreddit, request.window, request.limit)
            .await?;
        let submission_count = submissions.len();

        let name = playlist_name(&request.subreddit, today);
        let description = format!(
            "Top posts of r/{} ({}), built by spotty",
            request.subreddit, request.window
        );

        let mut candidate_count = 0;
        let parsed = candidates(submissions).inspect(|_| candidate_count += 1);
        let (tracks, playlist) = self
            .catalog
            .resolve_and_build(parsed, &user.id, &name, &description)
            .await?;

        tracing::info!(
            "{} submissions, {} candidates, {} tracks found",
            submission_count,
            candidate_count,
            tracks.len()
        );

        Ok(RunSummary {
            playlist_name: name,
            submissions: submission_count,
            candidates: candidate_count,
            tracks,
            playlist,
        })
    }
}
