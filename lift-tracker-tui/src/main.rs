// lift-tracker-tui/src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lift_tracker_lib::{AppService, ConnectionOverrides};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, time::Duration};
use tracing::{error, info};

// Declare modules
mod app;
mod logging;
mod ui;

use crate::app::App;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal UI for the lift tracker")]
struct Args {
    /// Write debug-level logs
    #[arg(long)]
    debug: bool,

    /// Server URL for this session (not saved)
    #[arg(long)]
    server: Option<String>,

    /// User id for this session (not saved)
    #[arg(long)]
    user: Option<i64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_path = logging::init_logging(args.debug);

    let overrides = ConnectionOverrides {
        server_url: args.server,
        user_id: args.user,
    };
    let app_service =
        AppService::initialize_with(&overrides).context("Failed to initialize AppService")?;
    info!("Starting TUI, logging to {:?}", log_path);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(app_service);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("TUI exited with error: {:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.refresh_data_for_active_tab();

        terminal.draw(|f| ui::render_ui(f, app))?;

        // The timeout keeps deadlines (editor auto-close, status expiry) ticking
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
