mod config;
mod logging;
mod ports;
mod reddit_rs;
mod services;
mod spotify_rs;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::{Result, eyre::Context};

use crate::{
    config::{Config, RedditConfig, SpotifyConfig},
    logging::{SERVICE_NAME, init_tracing},
    reddit_rs::TimeWindow,
    services::{
        catalog::CatalogPlaylistService,
        feed::FeedFetcher,
        pipeline::{Pipeline, RunRequest, RunSummary},
        reddit::client::RedditHttpAdapter,
        spotify::session::{StdinCredentialProvider, connect},
    },
};

const BANNER: &str = r#"
   ____              __   __
  / __/__  ___  ____/ /_ / /___ __
 _\ \/ _ \/ _ \/ __/ __// __/ // /
/___/ .__/\___/\__/\__/ \__/\_, /
   /_/                     /___/

  Scrape a subreddit, build a Spotify playlist.
"#;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Spotify username (user id) the playlist is created for
    username: String,

    /// Subreddit to scrape
    #[arg(short, long, default_value = "listentothis")]
    subreddit: String,

    /// Ranking window of the top listing
    #[arg(short, long, value_enum, default_value_t = TimeWindow::Week)]
    window: TimeWindow,

    /// Number of submissions to request
    #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=100))]
    limit: u32,

    /// The config file to use
    #[arg(short, long, env = "SPOTTY_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `spotty=debug`
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// OTLP gRPC endpoint to export traces to
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    #[arg(long, env = "REDDIT_CLIENT_ID", hide_env_values = true)]
    reddit_client_id: Option<String>,

    #[arg(long, env = "REDDIT_CLIENT_SECRET", hide_env_values = true)]
    reddit_client_secret: Option<String>,

    /// Descriptive user agent sent to Reddit
    #[arg(long, env = "REDDIT_USER_AGENT")]
    reddit_user_agent: Option<String>,

    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    spotify_client_id: Option<String>,

    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    spotify_client_secret: Option<String>,

    /// Redirect URI registered for the Spotify app
    #[arg(long, env = "SPOTIFY_REDIRECT_URI")]
    spotify_redirect_uri: Option<String>,
}

impl Args {
    fn config_overrides(&self) -> Config {
        Config {
            reddit: RedditConfig {
                client_id: self.reddit_client_id.clone(),
                client_secret: self.reddit_client_secret.clone(),
                user_agent: self.reddit_user_agent.clone(),
            },
            spotify: SpotifyConfig {
                client_id: self.spotify_client_id.clone(),
                client_secret: self.spotify_client_secret.clone(),
                redirect_uri: self.spotify_redirect_uri.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let tracer_provider = init_tracing(
        SERVICE_NAME,
        args.otlp_endpoint.as_deref(),
        &args.log_level,
    )?;

    println!("{}", BANNER);
    let result = run(args).await;

    if let Some(tracer_provider) = tracer_provider
        && let Err(error) = tracer_provider.shutdown()
    {
        eprintln!("Failed to flush traces: {}", error);
    }

    result
}

async fn run(args: Args) -> Result<()> {
    tracing::debug!("Loading configuration");
    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .wrap_err("Failed to load spotty config")?;

    let credentials = config.merge(args.config_overrides()).validate()?;

    let spotify = connect(
        reqwest::Client::new(),
        &credentials.spotify,
        &StdinCredentialProvider,
    )
    .await?;
    let reddit_http = reddit_rs::http_client().wrap_err("Failed to create Reddit http client")?;
    let reddit = RedditHttpAdapter::connect(reddit_http, &credentials.reddit).await?;

    let pipeline = Pipeline::new(
        FeedFetcher::new(reddit),
        CatalogPlaylistService::new(spotify),
    );
    let request = RunRequest {
        subreddit: args.subreddit,
        window: args.window,
        limit: args.limit,
        username: args.username,
    };

    let summary = pipeline
        .run(&request, chrono::Local::now().date_naive())
        .await?;
    report(&summary);

    Ok(())
}

fn report(summary: &RunSummary) {
    println!();
    for hit in &summary.tracks {
        println!("{} - {}", hit.track_name, hit.artist_name);
    }
    println!();

    match &summary.playlist {
        Some(playlist) => println!(
            "Added {} tracks to playlist '{}' (spotify:playlist:{}). Now go and rock out to your brand new playlist!",
            playlist.track_count, playlist.name, playlist.id
        ),
        None => println!(
            "None of the {} candidates from {} submissions matched a track, so no playlist '{}' was created.",
            summary.candidates, summary.submissions, summary.playlist_name
        ),
    }
}
