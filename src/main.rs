//! lobbymon - lobby browser for game servers

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};

use lobbymon::api::LobbyClient;
use lobbymon::display;
use lobbymon::models::LobbyConfig;
use lobbymon::tui;
use lobbymon::view::{reconcile, region_options, SortOrder, ViewQuery};

#[derive(Parser)]
#[command(name = "lobbymon")]
#[command(about = "Lobby browser for game servers", long_about = None)]
#[command(version)]
struct Cli {
    /// Override the lobby listing endpoint URL
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List lobbies
    List {
        /// Filter by text over ip, port, and Steam ID
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by region (case-insensitive)
        #[arg(short, long)]
        region: Option<String>,

        /// Sort order: players_desc, players_asc, or unordered
        #[arg(long, value_name = "ORDER")]
        sort: Option<String>,

        /// Page to show (1-based, clamped to the available pages)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Watch mode: refresh every N seconds
        #[arg(short, long, value_name = "SECONDS", default_value = "0")]
        watch: f64,
    },

    /// List the regions present in the current lobby set
    Regions,

    /// Launch interactive TUI mode (default)
    #[command(alias = "ui")]
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let (mut config, warnings) = LobbyConfig::load();
    if let Some(endpoint) = cli.endpoint {
        config.server.endpoint = endpoint;
    }

    match cli.command {
        Some(Commands::List {
            search,
            region,
            sort,
            page,
            watch,
        }) => {
            print_warnings(&warnings);

            let rt = tokio::runtime::Runtime::new()?;
            let client = new_client(&config)?;
            let sort = SortOrder::from_key(sort.as_deref().unwrap_or(&config.display.default_sort));
            let query = ViewQuery {
                search: search.unwrap_or_default(),
                region,
                sort,
            };
            let page_size = config.display.page_size;

            if watch > 0.0 {
                watch_loop(watch, || {
                    handle_list_command(&rt, &client, &query, page, page_size)
                })?;
            } else {
                let output = handle_list_command(&rt, &client, &query, page, page_size)?;
                println!("{}", output);
            }
        }
        Some(Commands::Regions) => {
            print_warnings(&warnings);

            let rt = tokio::runtime::Runtime::new()?;
            let client = new_client(&config)?;
            let output = handle_regions_command(&rt, &client)?;
            println!("{}", output);
        }
        Some(Commands::Tui) | None => {
            tui::run(config, warnings)?;
        }
    }

    Ok(())
}

fn new_client(config: &LobbyConfig) -> Result<LobbyClient> {
    LobbyClient::new(
        &config.server.endpoint,
        Duration::from_secs(config.server.timeout_secs),
    )
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}

/// Log to a file when LOBBYMON_LOG is set; stdout belongs to the UI.
fn init_logging() {
    let Ok(path) = std::env::var("LOBBYMON_LOG") else {
        return;
    };
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    else {
        eprintln!("Warning: could not open log file '{}'", path);
        return;
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn handle_list_command(
    rt: &tokio::runtime::Runtime,
    client: &LobbyClient,
    query: &ViewQuery,
    page: usize,
    page_size: usize,
) -> Result<String> {
    let items = rt.block_on(client.fetch_lobbies())?;
    let snapshot = reconcile(&items, query, page, page_size);
    Ok(display::format_lobbies(&items, &snapshot))
}

fn handle_regions_command(rt: &tokio::runtime::Runtime, client: &LobbyClient) -> Result<String> {
    let items = rt.block_on(client.fetch_lobbies())?;
    let (regions, _) = region_options(&items, None);
    Ok(display::format_regions(&regions))
}

/// Watch loop that repeatedly executes a command with flicker-free updates
fn watch_loop<F>(interval: f64, command: F) -> Result<()>
where
    F: Fn() -> Result<String>,
{
    // Set up Ctrl+C handler
    let running = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, std::sync::atomic::Ordering::SeqCst);
    })?;

    // Enter alternate screen buffer and hide cursor for clean display
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    // Ensure we clean up on exit
    let cleanup = || -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Show, LeaveAlternateScreen)?;
        Ok(())
    };

    let result = (|| -> Result<()> {
        while running.load(std::sync::atomic::Ordering::SeqCst) {
            let now = chrono::Local::now();
            let timestamp = now.format("%Y-%m-%d %H:%M:%S");

            // A failed refresh shows the error in place of the list and the
            // loop keeps going; the next interval may succeed
            let output = match command() {
                Ok(s) => s,
                Err(e) => format!("Error: {}", e),
            };

            let screen_content = format!(
                "{}\n\nLast updated: {} | Refreshing every {}s | Press Ctrl+C to exit",
                output, timestamp, interval
            );

            // Write everything at once with synchronized update (DEC private mode)
            // so the terminal does not render a partially drawn frame
            write!(stdout, "\x1B[?2026h")?;
            write!(stdout, "\x1B[H{}\x1B[J", screen_content)?;
            write!(stdout, "\x1B[?2026l")?;
            stdout.flush()?;

            thread::sleep(Duration::from_secs_f64(interval));
        }
        Ok(())
    })();

    // Always clean up terminal state
    cleanup()?;

    println!("Watch mode stopped.");

    result
}
