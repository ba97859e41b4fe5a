use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lavanderia_lib::AppState;
use lavanderia_lib::application::services::BatchPreview;
use lavanderia_lib::presentation::dto::queue_dto::DeleteRequest;
use lavanderia_lib::presentation::dto::sync_dto::{SettingsView, UpdateSettingsRequest};
use lavanderia_lib::presentation::http::asset_shell;
use lavanderia_lib::shared::{AppConfig, logging};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "lavanderia")]
#[command(about = "Offline data-entry queue for laundry operations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database URL
    #[arg(long, env = "LAVANDERIA_DATABASE_URL")]
    database_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", env = "LAVANDERIA_LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "LAVANDERIA_JSON_LOGS")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Queue the rows produced by a filled-in form (JSON file)
    Save { form: PathBuf },
    /// Show totals for a form and whether it would be accepted
    Preview { form: PathBuf },
    /// Queue size, last send and verification state
    Status,
    /// Rows queued today, newest first
    History,
    /// Send queued rows to the collection endpoint (rows stay queued)
    Sync,
    /// Mark the last send as checked on the destination sheet
    Verify,
    /// Remove every queued row
    Clear {
        /// Confirm the data reached the destination
        #[arg(long)]
        yes: bool,
    },
    /// Remove specific queued rows by local key
    Delete {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Write queued rows to a JSON file
    Export {
        /// Output file or directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Endpoint settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Serve the app shell with an offline asset cache
    Serve {
        #[arg(long, env = "LAVANDERIA_BIND")]
        bind: Option<String>,
        /// Origin the shell assets are fetched from
        #[arg(long, env = "LAVANDERIA_ASSET_ORIGIN")]
        origin: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    Set {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, cli.json_logs)?;

    let mut config = AppConfig::from_env();
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    if let Commands::Serve { bind, origin } = &cli.command {
        if let Some(bind) = bind {
            config.server.bind = bind.clone();
        }
        if let Some(origin) = origin {
            config.asset_cache.origin = Some(origin.trim_end_matches('/').to_string());
        }
    }

    info!("Starting lavanderia v{}", env!("CARGO_PKG_VERSION"));
    let state = AppState::new(config).await?;
    let result = run(&state, cli.command).await;
    state.shutdown().await;
    result
}

async fn run(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Save { form } => {
            let saved = state.queue_handler.save_from_file(&form).await?;
            if saved.rows == 0 {
                println!("Nothing to save: the form has no entries.");
            } else {
                println!("Saved {} rows (batch {}).", saved.rows, saved.batch_id);
            }
        }
        Commands::Preview { form } => {
            let preview = state.queue_handler.preview_from_file(&form).await?;
            print_preview(&preview);
        }
        Commands::Status => {
            let status = state.queue_handler.status().await?;
            println!("{}", status);
            if status.needs_verification() {
                println!("Warning: the last send has not been verified on the sheet.");
            }
        }
        Commands::History => {
            let rows = state.queue_handler.history().await?;
            if rows.is_empty() {
                println!("No rows queued today.");
            }
            for row in rows {
                println!("{}", row);
            }
        }
        Commands::Sync => {
            let report = state.sync_handler.sync().await?;
            println!("{}", report.message);
        }
        Commands::Verify => {
            state.queue_handler.verify().await?;
            println!("Last send marked as verified.");
        }
        Commands::Clear { yes } => {
            let removed = state.queue_handler.clear(yes).await?;
            println!("Queue cleared ({} rows removed).", removed);
        }
        Commands::Delete { keys } => {
            let removed = state.queue_handler.delete(DeleteRequest { keys }).await?;
            println!("{} rows removed.", removed);
        }
        Commands::Export { out } => {
            let (path, rows) = state.queue_handler.export(out.as_deref()).await?;
            println!("Exported {} rows to {}.", rows, path.display());
        }
        Commands::Config { action } => {
            let view = match action {
                ConfigAction::Show => state.settings_handler.show().await?,
                ConfigAction::Set { url, token } => {
                    state
                        .settings_handler
                        .update(UpdateSettingsRequest { url, token })
                        .await?
                }
            };
            print_settings(&view);
        }
        Commands::Serve { .. } => {
            let addr: SocketAddr = state
                .config
                .server
                .bind
                .parse()
                .with_context(|| format!("invalid bind address {}", state.config.server.bind))?;
            let service = state.asset_cache_service()?;
            asset_shell::prepare(&service).await;
            asset_shell::serve(addr, asset_shell::router(service)).await?;
        }
    }
    Ok(())
}

fn print_preview(preview: &BatchPreview) {
    let cages = preview.totals.cages;
    let wash = preview.totals.wash;
    println!(
        "Cages:  SÁBANAS {:.1} kg | other {:.1} kg | total {:.1} kg",
        cages.sheets_kg, cages.other_kg, cages.total_kg
    );
    println!(
        "Wash:   BLANCA {:.1} kg | PISCINA {:.1} kg | VARIOS {:.1} kg | hotel {:.1} kg",
        wash.blanca_kg, wash.piscina_kg, wash.varios_kg, wash.hotel_kg
    );
    match &preview.rejection {
        Some(reason) => println!("Not ready: {}", reason),
        None => println!("Ready: {} rows would be queued.", preview.rows),
    }
}

fn print_settings(view: &SettingsView) {
    println!("URL:    {}", if view.url.is_empty() { "-" } else { view.url.as_str() });
    println!("Token:  {}", if view.token.is_empty() { "-" } else { view.token.as_str() });
    if !view.complete {
        println!("Sync is disabled until both URL and token are set.");
    }
}
