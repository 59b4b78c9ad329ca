use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod state;

use cli::{Cli, Command};
use ragsearch_backend::config::{self, AppConfig};
use ragsearch_backend::search::{CacheSnapshot, DocumentScanner};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ragsearch_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration / 加载配置
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let mut app_config = config::load_config(&config_path).map_err(anyhow::Error::msg)?;
    app_config.apply_env();

    match cli.command.unwrap_or(Command::Serve { search_only: false }) {
        Command::Serve { search_only } => serve(app_config, search_only).await,
        Command::Scan {
            query,
            content_dir,
            output,
            context_length,
        } => run_scan(&app_config, &query, content_dir, &output, context_length),
    }
}

async fn serve(app_config: AppConfig, search_only: bool) -> anyhow::Result<()> {
    let bind_addr = if search_only {
        app_config.get_search_bind_address()
    } else {
        app_config.get_bind_address()
    };

    let state = Arc::new(AppState::init(app_config));
    tracing::info!(
        "Cache entries: {}, matcher: {}",
        state.search.cache_entries(),
        if state.search.matcher_available() { "available" } else { "unavailable" }
    );
    if !search_only {
        tracing::info!("Llama server: {}", state.config.llama.server_url);
    }

    let app = if search_only {
        api::search_router(state)
    } else {
        api::unified_router(state)
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Offline batch scan producing the cache snapshot / 离线扫描并生成缓存快照
fn run_scan(
    app_config: &AppConfig,
    query: &str,
    content_dir: Option<PathBuf>,
    output: &Path,
    context_length: Option<usize>,
) -> anyhow::Result<()> {
    if query.is_empty() {
        anyhow::bail!("search string must not be empty");
    }

    // 优先使用content，如果不存在则尝试@content
    let content_dir = content_dir.unwrap_or_else(|| {
        if Path::new("content").exists() {
            PathBuf::from("content")
        } else {
            PathBuf::from("@content")
        }
    });

    let scanner = DocumentScanner::new(
        content_dir,
        context_length.unwrap_or(app_config.search.context_length),
    )
    .with_extensions(app_config.search.extensions.clone());

    let results = scanner.scan(query)?;
    if results.is_empty() {
        println!("No matches found");
        return Ok(());
    }

    let snapshot = CacheSnapshot::flatten(&results);
    println!("{}", snapshot.to_json_pretty()?);
    snapshot.save(output)?;
    println!(
        "{} matches in {} files saved to {}",
        results.total_matches(),
        results.file_count(),
        output.display()
    );

    Ok(())
}
