use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use model::{GenreTable, Movie, MovieListing};
use pipeline::Page;
use server::config::{
    DEFAULT_CAST_URL, DEFAULT_DETAILS_URL, DEFAULT_INDEX_URL, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use server::{MovieAggregator, MoviesResponse, UpstreamEndpoints};
use upstream::{HttpUpstream, RetryPolicy};

/// Movie aggregator - browse movies composed from the index, details and cast services
#[derive(Parser)]
#[command(name = "movie-aggregator")]
#[command(about = "Aggregate movie details and casts from upstream services", long_about = None)]
struct Cli {
    #[command(flatten)]
    upstreams: UpstreamArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Where the upstreams live and how hard to retry them
#[derive(Args)]
struct UpstreamArgs {
    /// Movie index service (ids per genre)
    #[arg(long, global = true, env = "MOVIE_INDEX_URL", default_value = DEFAULT_INDEX_URL)]
    index_url: String,

    /// Movie details service
    #[arg(long, global = true, env = "MOVIE_DETAILS_URL", default_value = DEFAULT_DETAILS_URL)]
    details_url: String,

    /// Cast details service
    #[arg(long, global = true, env = "CAST_DETAILS_URL", default_value = DEFAULT_CAST_URL)]
    cast_url: String,

    /// Give up on the index/details services after this many attempts (default: retry forever)
    #[arg(long, global = true, env = "RETRY_MAX_ATTEMPTS", value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: Option<u32>,

    /// Initial delay between retries, doubled on every attempt
    #[arg(long, global = true, env = "RETRY_BACKOFF_MS", default_value = "0")]
    backoff_ms: u64,

    /// Upper bound for the retry delay
    #[arg(long, global = true, env = "RETRY_MAX_BACKOFF_MS", default_value = "0")]
    max_backoff_ms: u64,

    /// Overall time budget for one index/details fetch
    #[arg(long, global = true, env = "RETRY_DEADLINE_SECS")]
    deadline_secs: Option<u64>,

    /// Timeout of a single upstream call
    #[arg(long, global = true, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List movies, optionally for one genre
    List {
        /// Genre name, e.g. "Action" or "Science Fiction"
        #[arg(long)]
        genre: Option<String>,

        /// Number of movies to skip
        #[arg(long)]
        offset: Option<usize>,

        /// Maximum number of movies to show
        #[arg(long)]
        limit: Option<usize>,

        /// Print the JSON envelope served by `GET /movies`
        #[arg(long)]
        json: bool,
    },

    /// Show the genre table
    Genres,
}

impl UpstreamArgs {
    fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::unbounded().with_backoff(
            Duration::from_millis(self.backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        );
        policy.max_attempts = self.max_attempts;
        policy.deadline = self.deadline_secs.map(Duration::from_secs);
        policy
    }

    fn aggregator(&self, genres: Arc<GenreTable>) -> Result<MovieAggregator> {
        let upstream = HttpUpstream::new(Duration::from_secs(self.timeout_secs))
            .context("Failed to build HTTP client")?;
        let endpoints = UpstreamEndpoints {
            index: self.index_url.clone(),
            details: self.details_url.clone(),
            cast: self.cast_url.clone(),
        };

        Ok(MovieAggregator::new(
            Arc::new(upstream),
            endpoints,
            genres,
            self.retry_policy(),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let genres = Arc::new(GenreTable::tmdb());

    match cli.command {
        Commands::List {
            genre,
            offset,
            limit,
            json,
        } => {
            if cli.upstreams.retry_policy().is_unbounded() {
                eprintln!(
                    "{} retries are unbounded, pass --max-attempts or --deadline-secs to give up on a down service",
                    "note:".yellow()
                );
            }
            let aggregator = cli.upstreams.aggregator(genres)?;
            handle_list(&aggregator, genre, Page::new(offset, limit), json).await?
        }
        Commands::Genres => handle_genres(&genres),
    }

    Ok(())
}

/// Handle the 'list' command
async fn handle_list(
    aggregator: &MovieAggregator,
    genre: Option<String>,
    page: Page,
    json: bool,
) -> Result<()> {
    let genre = aggregator.genre_filter(genre.as_deref());

    let start = Instant::now();
    let listing = aggregator
        .list(genre, page)
        .await
        .context("Failed to list movies")?;
    let elapsed = start.elapsed();
    info!(
        movies = listing.movies.len(),
        total = listing.total,
        errors = listing.errors.as_ref().map_or(0, Vec::len),
        "Listing done in {:?}",
        elapsed
    );

    if json {
        let response = MoviesResponse::new(listing, page);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print_listing(&listing, genre.map(|g| g.name.as_str()), page);
    println!("{} Aggregated in {:?}", "✓".green(), elapsed);
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres(genres: &GenreTable) {
    println!("{}", "Genres:".bold().blue());
    for genre in genres.iter() {
        println!("  {:>6}  {}", genre.id.to_string().green(), genre.name);
    }
}

/// Helper function to format and print a listing
fn print_listing(listing: &MovieListing, genre: Option<&str>, page: Page) {
    let heading = match genre {
        Some(name) => format!("{} movies:", name),
        None => "Movies:".to_string(),
    };
    println!("{}", heading.bold().blue());

    let first_rank = page.offset.unwrap_or(0) + 1;
    for (i, movie) in listing.movies.iter().enumerate() {
        print_movie(first_rank + i, movie);
    }

    println!(
        "{} of {} movies",
        listing.movies.len().to_string().bold(),
        listing.total
    );

    if let Some(errors) = &listing.errors {
        println!("{}", format!("{} errors:", errors.len()).red().bold());
        for error in errors {
            println!("  [{}] {}", error.error_code.to_string().red(), error.message);
        }
    }
}

fn print_movie(rank: usize, movie: &Movie) {
    let Some(title) = &movie.title else {
        println!(
            "{}. #{} {}",
            rank.to_string().green(),
            movie.id,
            "(details unavailable)".yellow()
        );
        return;
    };

    let year = movie
        .release_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "????".to_string());
    println!(
        "{}. {} ({}) #{}",
        rank.to_string().green(),
        title.bold(),
        year,
        movie.id
    );

    if let Some(revenue) = &movie.revenue {
        println!("   Revenue: {}", revenue);
    }
    if let Some(genres) = movie.genres.as_ref().filter(|g| !g.is_empty()) {
        println!("   Genres: {}", genres.join(", "));
    }
    match &movie.cast {
        Some(cast) => {
            let names = cast
                .iter()
                .map(|member| member.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            println!("   Cast: {}", names);
        }
        None => println!("   Cast: {}", "unavailable".yellow()),
    }
}
