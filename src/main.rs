use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{poll as event_poll, read as event_read, Event as CrosstermEvent};
use ratatui::{backend::CrosstermBackend, Terminal};
use rust_decimal::Decimal;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use triplog::app::{Command, Services, Session, SessionEvent, SessionSettings};
use triplog::config::Config;
use triplog::input::keymap;
use triplog::services::distance::DistanceMatrixClient;
use triplog::services::log_dirs;
use triplog::services::storage::JsonFileStorage;
use triplog::services::terminal_modes::{self, TerminalModes};
use triplog::services::time_source::RealTimeSource;
use triplog::services::tracing_setup;
use triplog::view::{compose, render, Screen};

/// Log trips and expenses and review weekly mileage reimbursement
#[derive(Parser, Debug)]
#[command(name = "triplog")]
#[command(about = "Log trips and expenses and review weekly mileage reimbursement", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Data file to load and save (overrides the config file)
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Reimbursement per mile, e.g. 0.67
    #[arg(long, value_name = "AMOUNT")]
    rate: Option<Decimal>,

    /// Rows per page on list tabs
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Path to log file for diagnostics
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// API key for the distance service
    #[arg(long, env = "TRIPLOG_MAPS_API_KEY", hide_env_values = true)]
    maps_api_key: Option<String>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the files and directories used by triplog and exit
    #[arg(long)]
    show_paths: bool,
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Config file, then command line flags on top
fn effective_config(args: &Args) -> AnyhowResult<Config> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = &args.data_file {
        config.data_file = Some(path.clone());
    }
    if let Some(rate) = args.rate {
        config.rate_per_mile = rate;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(key) = &args.maps_api_key {
        config.distance.api_key = Some(key.clone());
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_paths(config: &Config, log_file: &std::path::Path) {
    let config_path = Config::default_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unavailable)".to_string());
    println!("config:   {}", config_path);
    println!("data:     {}", config.data_file_path().display());
    println!("logs:     {}", log_dirs::log_dir().display());
    println!("this log: {}", log_file.display());
}

fn draw(terminal: &mut Tui, screen: &Screen, cursor_on: bool) -> AnyhowResult<()> {
    terminal
        .draw(|frame| render::draw(frame, screen, cursor_on))
        .context("Failed to draw")?;
    Ok(())
}

/// One event at a time: handle it fully, compose, draw. Poll timeouts only
/// toggle the cursor and redraw the screen already composed.
fn run(
    terminal: &mut Tui,
    session: &mut Session,
    services: &mut Services<'_>,
    blink: Duration,
) -> AnyhowResult<()> {
    let mut screen = compose::compose(session);
    session.mark_rendered();
    let mut cursor_on = true;
    draw(terminal, &screen, cursor_on)?;

    loop {
        if !event_poll(blink).context("Failed to poll terminal events")? {
            cursor_on = !cursor_on;
            draw(terminal, &screen, cursor_on)?;
            continue;
        }

        let event = match event_read().context("Failed to read terminal event")? {
            CrosstermEvent::Key(key) => keymap::translate(key),
            CrosstermEvent::Paste(text) => Some(SessionEvent::Paste(text)),
            CrosstermEvent::Resize(_, _) => {
                draw(terminal, &screen, cursor_on)?;
                None
            }
            _ => None,
        };
        let Some(event) = event else { continue };

        if session.handle_event(event, services) == Command::Quit {
            tracing::info!("Quit requested");
            return Ok(());
        }
        screen = compose::compose(session);
        session.mark_rendered();
        cursor_on = true;
        draw(terminal, &screen, cursor_on)?;
    }
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    let log_file = args.log_file.clone().unwrap_or_else(log_dirs::main_log_path);

    if args.show_paths {
        let config = effective_config(&args)?;
        print_paths(&config, &log_file);
        return Ok(());
    }

    if args.dump_config {
        let config = effective_config(&args)?;
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    if !tracing_setup::init_global(&log_file) {
        eprintln!("Warning: could not open log file {}", log_file.display());
    }
    log_dirs::cleanup_stale_logs();
    tracing::info!("triplog starting");

    let config = effective_config(&args)?;
    let mut storage = JsonFileStorage::new(config.data_file_path());
    let distance = DistanceMatrixClient::new(
        config.distance.api_key.clone(),
        config.distance.endpoint.clone(),
        Duration::from_secs(config.distance.timeout_secs),
    );
    if !distance.is_configured() {
        tracing::info!("No distance API key; only known routes can be logged");
    }
    let clock = RealTimeSource::new();

    let mut session = Session::open(SessionSettings::from(&config), &mut storage, &clock)
        .with_context(|| format!("Failed to open {}", storage.path().display()))?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let mut terminal_modes = TerminalModes::enable().context("Failed to set up terminal")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout())).context("Failed to create terminal")?;
    terminal.clear().context("Failed to clear terminal")?;

    let mut services = Services {
        storage: &mut storage,
        distance: &distance,
        clock: &clock,
    };
    let blink = Duration::from_millis(config.cursor_blink_ms.max(100));
    let result = run(&mut terminal, &mut session, &mut services, blink);

    terminal_modes.undo();
    tracing::info!("triplog exiting");
    result.context("Event loop returned an error")
}
