//! PageSend: local relay and CLI for sending pages to AI chat providers.

use std::path::PathBuf;
use std::sync::Arc;

use pagesend_core::{AppConfig, SettingsFile};
use pagesend_server::cli::{cli_handler, parse_trigger_args, USAGE};
use pagesend_server::opener::SystemBrowserOpener;
use pagesend_server::relay::DeferredOpener;
use pagesend_server::{build_router, AppState};
use pagesend_trigger::{ensure_settings, TriggerOutcome};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("PAGESEND_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn print_help() {
    println!("PageSend: send the current page to an AI chat provider");
    println!();
    println!("Usage: pagesend [command] [flags]");
    println!();
    println!("Commands:");
    println!("  (none)                   Start the relay server");
    println!("  preview [flags]          Print the payload and URL for a trigger");
    println!("  open [flags]             Open the provider in the system browser");
    println!("  help                     Show this help message");
    println!();
    println!("{}", USAGE);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let data_dir = resolve_data_dir();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "preview" | "open" => {
                let parsed = match parse_trigger_args(&args[2..]) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        eprintln!("{}", e);
                        eprintln!("{}", USAGE);
                        std::process::exit(2);
                    }
                };
                let config = AppConfig::from_env(&data_dir)?;
                let settings = Arc::new(SettingsFile::new(&config.settings_file));

                if args[1] == "preview" {
                    let handler = cli_handler(settings, parsed.snapshot, Arc::new(DeferredOpener));
                    let preview = handler.preview(&parsed.trigger).await;
                    println!("{}", serde_json::to_string_pretty(&preview)?);
                    std::process::exit(if preview.payload.is_some() { 0 } else { 1 });
                }

                let handler =
                    cli_handler(settings, parsed.snapshot, Arc::new(SystemBrowserOpener));
                let outcome = handler.handle(&parsed.trigger).await;
                if let TriggerOutcome::Opened { request } = &outcome {
                    println!("{}", request.url);
                }
                std::process::exit(if outcome.is_opened() { 0 } else { 1 });
            }
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'pagesend help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Normal relay startup
    info!("Data directory: {}", data_dir.display());

    let config = AppConfig::from_env(&data_dir)?;
    let port = config.port;
    let state = Arc::new(AppState::new(config));

    let settings = ensure_settings(state.settings.as_ref()).await;
    if let Err(e) = state.menus.register(&settings).await {
        warn!("Initial context menu registration failed: {}", e);
    }

    let app = build_router(state.clone());

    // Start server (loopback only)
    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("PageSend relay listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
