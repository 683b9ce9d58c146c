use crate::tui::app::{AppState, InputAction, Scene};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.drive();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Map a key to an action. Returns true to quit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    if app.confirm_new_open() {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let _ = app.handle_input(InputAction::ConfirmNewGame);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                let _ = app.handle_input(InputAction::CancelNewGame);
            }
            _ => {}
        }
        return false;
    }
    if matches!(code, KeyCode::Char('?')) {
        let _ = app.handle_input(InputAction::ToggleHelp);
        return false;
    }
    if app.help_open() {
        if matches!(code, KeyCode::Esc) {
            let _ = app.handle_input(InputAction::ToggleHelp);
        }
        return false;
    }

    match app.scene {
        Scene::Menu => match code {
            KeyCode::Up => {
                let _ = app.handle_input(InputAction::MenuPrev);
            }
            KeyCode::Down => {
                let _ = app.handle_input(InputAction::MenuNext);
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
                let _ = app.handle_input(InputAction::MenuInc);
            }
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Left => {
                let _ = app.handle_input(InputAction::MenuDec);
            }
            KeyCode::Enter => {
                let _ = app.handle_input(InputAction::MenuApply);
            }
            KeyCode::Esc => {
                let _ = app.handle_input(InputAction::MenuCancel);
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                let _ = app.handle_input(InputAction::ToggleMenu);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            _ => {}
        },
        Scene::Table => match code {
            KeyCode::Char(c @ '1'..='4') => {
                let slot = (c as u8 - b'1') as usize;
                if app.handle_input(InputAction::PlaySlot(slot)) {
                    app.drive();
                }
            }
            KeyCode::Char('u') | KeyCode::Char('U') => {
                let _ = app.handle_input(InputAction::Undo);
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                let _ = app.handle_input(InputAction::NewGame);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let _ = app.handle_input(InputAction::Reset);
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                let _ = app.handle_input(InputAction::ToggleMenu);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            _ => {}
        },
    }
    false
}
