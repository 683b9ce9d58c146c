use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use pishti::tui::{app::AppState, controller};
use ratatui::prelude::*;
use std::fs::File;
use std::io::{self, IsTerminal, Stdout};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

/// Logs go to a file because the terminal belongs to the UI.
/// Level: PISHTI_LOG -> RUST_LOG -> "warn"; file: PISHTI_LOG_FILE -> pishti.log.
fn init_logging() {
    let filter = std::env::var("PISHTI_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let path = std::env::var("PISHTI_LOG_FILE").unwrap_or_else(|_| String::from("pishti.log"));
    let Ok(file) = File::create(&path) else {
        return;
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok();
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> io::Result<()> {
    if !io::stdout().is_terminal() {
        println!(
            "pishti TUI requires a real terminal (TTY).\nRun in Terminal and press q to quit. Version: {}",
            pishti::VERSION
        );
        return Ok(());
    }
    init_logging();
    tracing::info!(version = pishti::VERSION, "starting");
    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(100);
    let mut app = AppState::default();

    let res = controller::run(&mut terminal, &mut app, tick_rate);

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    res
}
