pub mod api;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod query;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use clients::youtube::YoutubeClient;
pub use config::Config;
use services::VideoLookupService;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    // .env is optional; real deployments set the key variables directly.
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let mut builder = tracing_loki::builder();
        for (key, value) in &config.observability.loki_labels {
            builder = builder.label(key, value)?;
        }

        let (layer, task) = builder.build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "daemon" | "-d" | "--daemon" => run_daemon(config, prometheus_handle).await,

        "search" | "s" => {
            if args.len() < 3 {
                println!("Usage: caritahu search <query>");
                println!("Example: caritahu search \"laskar pelangi\"");
                return Ok(());
            }
            let query = args[2..].join(" ");
            cmd_search(&config, &query).await
        }

        "trailers" | "t" => {
            if args.len() < 3 {
                println!("Usage: caritahu trailers <title> [year]");
                println!("Example: caritahu trailers \"The Matrix\" 1999");
                return Ok(());
            }
            let (title, year) = split_title_and_year(&args[2..]);
            cmd_trailers(&config, &title, year.as_deref()).await
        }

        "reviews" | "rv" => {
            if args.len() < 3 {
                println!("Usage: caritahu reviews <title> [year]");
                println!("Example: caritahu reviews \"Parasite\" 2019");
                return Ok(());
            }
            let (title, year) = split_title_and_year(&args[2..]);
            cmd_reviews(&config, &title, year.as_deref()).await
        }

        "init" | "--init" => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        _ => {
            println!("Unknown command: {}", args[1]);
            println!();
            print_help();
            Ok(())
        }
    }
}

/// A trailing all-digit 4-char argument is treated as a release year,
/// everything before it as the title.
fn split_title_and_year(args: &[String]) -> (String, Option<String>) {
    if args.len() > 1 {
        let last = &args[args.len() - 1];
        if last.len() == 4 && last.chars().all(|c| c.is_ascii_digit()) {
            return (args[..args.len() - 1].join(" "), Some(last.clone()));
        }
    }
    (args.join(" "), None)
}

fn print_help() {
    println!("CariTahu - Movie Discovery Backend");
    println!("Search, trailer and review lookup for Indonesian movie fans");
    println!();
    println!("USAGE:");
    println!("  caritahu <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  search <query>          Search movies (cached)");
    println!("  trailers <title> [year] Find trailer videos for a movie");
    println!("  reviews <title> [year]  Find review videos for a movie");
    println!("  daemon                  Run the web API server");
    println!("  init                    Create default config file");
    println!("  help                    Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  caritahu search \"laskar pelangi\"");
    println!("  caritahu trailers \"The Matrix\" 1999");
    println!("  caritahu reviews \"Parasite\" 2019");
    println!("  caritahu daemon");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml, or set TMDB_API_KEY / YOUTUBE_API_KEY in the");
    println!("  environment (a .env file in the working directory also works).");
}

async fn cmd_search(config: &Config, query: &str) -> anyhow::Result<()> {
    config.validate()?;

    let shared = SharedState::new(config.clone()).await?;

    println!("Searching for: {}", query);
    let page = shared.search_service.search(query).await?;

    if page.results.is_empty() {
        println!("No movies found matching '{}'", query);
        return Ok(());
    }

    println!();
    println!(
        "Results (page {} of {}, {} total):",
        page.page, page.total_pages, page.total_results
    );
    println!("{:-<60}", "");

    for movie in page.results.iter().take(10) {
        let year = movie.release_year().unwrap_or("????");
        println!("• {} ({})", movie.title, year);
        println!(
            "  Rating: {:.1}/10 | ID: {}",
            movie.vote_average, movie.id
        );
    }

    if page.results.len() > 10 {
        println!("  ... and {} more on this page", page.results.len() - 10);
    }

    Ok(())
}

fn standalone_video_service(config: &Config) -> anyhow::Result<VideoLookupService> {
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(
            config.general.request_timeout_seconds.into(),
        ))
        .build()
        .context("Failed to build HTTP client")?;

    let youtube = Arc::new(YoutubeClient::new(http, config.youtube.clone()));
    Ok(VideoLookupService::new(youtube))
}

async fn cmd_trailers(config: &Config, title: &str, year: Option<&str>) -> anyhow::Result<()> {
    config.validate()?;

    let service = standalone_video_service(config)?;

    println!("Looking up trailers for: {}", title);
    let response = service.find_trailers(title, year).await;

    if response.items.is_empty() {
        println!("No trailers found for '{}'", title);
        return Ok(());
    }

    println!();
    for item in &response.items {
        println!("• {}", item.snippet.title);
        println!("  {}", YoutubeClient::watch_url(&item.id.video_id));
    }

    Ok(())
}

async fn cmd_reviews(config: &Config, title: &str, year: Option<&str>) -> anyhow::Result<()> {
    config.validate()?;

    let service = standalone_video_service(config)?;

    println!("Looking up review videos for: {}", title);
    let response = service.find_reviews(title, year).await;

    if response.items.is_empty() {
        println!("No review videos found for '{}'", title);
        return Ok(());
    }

    println!();
    for item in &response.items {
        println!("• {} ({})", item.snippet.title, item.snippet.channel_title);
        println!("  {}", YoutubeClient::watch_url(&item.id.video_id));
    }

    Ok(())
}

async fn run_daemon(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    config.validate()?;

    info!(
        "CariTahu v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    if !config.server.enabled {
        anyhow::bail!("Web server is disabled in config ([server].enabled = false)");
    }

    let port = config.server.port;
    let state = api::create_app_state_from_config(config, prometheus_handle).await?;

    let app = api::router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Web Server running at http://0.0.0.0:{}", port);
    info!("Daemon running. Press Ctrl+C to stop.");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Web server error: {}", e);
        }
    });

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    server.abort();
    info!("Daemon stopped");

    Ok(())
}
