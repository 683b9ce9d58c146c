use crate::agents::Difficulty;
use crate::engine::Engine;
use crate::game::{GameConfig, GameState, GameView, HandProgress};
use crate::sound::TraceSink;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    PlaySlot(usize),
    Undo,
    NewGame,
    ConfirmNewGame,
    CancelNewGame,
    Reset,
}

/// Driver step waiting for its delay to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    ComputerMove,
    FinalizeCapture,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub started: Instant,
    pub engine: Engine,
    // Menu config being edited
    pub menu_index: usize,
    pub cfg_difficulty: Difficulty,
    pub cfg_cpu_delay_ms: u64,
    pub cfg_capture_pause_ms: u64,
    /// 0 means a fresh random seed per session.
    pub cfg_seed: u64,
    pub difficulty: Difficulty,
    pub cpu_delay_ms: u64,
    pub capture_pause_ms: u64,
    pub seed: u64,
    help_open: bool,
    confirm_new: bool,
    pending: Option<(Pending, Instant)>,
    action_error: Option<String>,
    action_error_at: Option<Instant>,
}

impl Default for AppState {
    fn default() -> Self {
        let default_delay = 700;
        let default_pause = 1200;
        let default_difficulty = Difficulty::Intermediate;
        Self {
            scene: Scene::Menu,
            started: Instant::now(),
            engine: Engine::new(GameConfig::default(), TraceSink),
            menu_index: 0,
            cfg_difficulty: default_difficulty,
            cfg_cpu_delay_ms: default_delay,
            cfg_capture_pause_ms: default_pause,
            cfg_seed: 0,
            difficulty: default_difficulty,
            cpu_delay_ms: default_delay,
            capture_pause_ms: default_pause,
            seed: 0,
            help_open: false,
            confirm_new: false,
            pending: None,
            action_error: None,
            action_error_at: None,
        }
    }
}

impl AppState {
    const ACTION_ERROR_TTL: Duration = Duration::from_secs(3);

    pub fn view(&self) -> GameView {
        self.engine.view()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    fn set_action_error(&mut self, err: impl ToString) {
        self.action_error = Some(err.to_string());
        self.action_error_at = Some(Instant::now());
    }

    fn clear_action_error(&mut self) {
        self.action_error = None;
        self.action_error_at = None;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn confirm_new_open(&self) -> bool {
        self.confirm_new
    }

    pub(crate) fn close_overlays(&mut self) {
        self.help_open = false;
        self.confirm_new = false;
    }

    /// Returns true when a card was played and the driver should run now.
    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    self.confirm_new = false;
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::PlaySlot(slot) => self.play_slot(slot),
            InputAction::Undo => {
                if self.scene == Scene::Table {
                    self.undo();
                }
                false
            }
            InputAction::NewGame => {
                if self.scene == Scene::Table {
                    self.request_new_game();
                }
                false
            }
            InputAction::ConfirmNewGame => {
                if self.scene == Scene::Table && self.confirm_new {
                    self.confirm_new = false;
                    self.new_game();
                }
                false
            }
            InputAction::CancelNewGame => {
                self.confirm_new = false;
                false
            }
            InputAction::Reset => {
                if self.scene == Scene::Table {
                    self.engine.reset_game();
                    self.pending = None;
                    self.clear_action_error();
                }
                false
            }
        }
    }

    fn play_slot(&mut self, slot: usize) -> bool {
        if self.scene != Scene::Table || self.help_open || self.confirm_new {
            return false;
        }
        match self.engine.player_plays(slot) {
            Ok(_) => {
                self.clear_action_error();
                true
            }
            Err(err) => {
                self.set_action_error(err);
                false
            }
        }
    }

    fn undo(&mut self) {
        if self.engine.undo() {
            self.pending = None;
            self.clear_action_error();
        } else {
            self.set_action_error("Nothing to undo");
        }
    }

    /// New game right away when none is running; otherwise ask first.
    pub fn request_new_game(&mut self) {
        if self.view().state.in_progress() {
            self.help_open = false;
            self.confirm_new = true;
        } else {
            self.new_game();
        }
    }

    pub fn new_game(&mut self) {
        // a reset clears the level; harmless while one is set
        let _ = self.engine.set_level(self.difficulty);
        if !self.engine.start_game() {
            self.set_action_error("Select a level first");
            return;
        }
        self.pending = None;
        self.clear_action_error();
    }

    fn schedule(&mut self, step: Pending, delay_ms: u64, now: Instant) -> bool {
        let due = match self.pending {
            Some((pending, due)) if pending == step => due,
            _ => {
                let due = now + Duration::from_millis(delay_ms);
                self.pending = Some((step, due));
                due
            }
        };
        now >= due
    }

    /// Advance the computer side: its move after `cpu_delay_ms`, the capture
    /// pause after `capture_pause_ms`, and dealing once both hands are empty.
    pub fn drive(&mut self) {
        self.drive_at(Instant::now());
    }

    pub fn drive_at(&mut self, now: Instant) {
        if self.scene != Scene::Table {
            return;
        }
        if let Some(at) = self.action_error_at {
            if now.saturating_duration_since(at) >= Self::ACTION_ERROR_TTL {
                self.clear_action_error();
            }
        }
        match self.view().state {
            GameState::CpuTurn => {
                if self.schedule(Pending::ComputerMove, self.cpu_delay_ms, now) {
                    self.pending = None;
                    if let Err(err) = self.engine.computer_plays() {
                        self.set_action_error(err);
                    }
                    self.end_of_hand();
                }
            }
            GameState::PileCaptured => {
                if self.schedule(Pending::FinalizeCapture, self.capture_pause_ms, now) {
                    self.pending = None;
                    if let Err(err) = self.engine.finalize_capture() {
                        self.set_action_error(err);
                    }
                }
            }
            GameState::PlayerTurn => {
                self.pending = None;
                self.end_of_hand();
            }
            _ => self.pending = None,
        }
    }

    fn end_of_hand(&mut self) {
        if !self.engine.is_hand_finished() {
            return;
        }
        match self.engine.check_end_of_hand() {
            Ok(HandProgress::GameOver) => self.pending = None,
            Ok(_) => {}
            Err(err) => self.set_action_error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_ignored_on_menu() {
        let mut app = AppState::default();
        assert!(!app.handle_input(InputAction::PlaySlot(0)));
        assert_eq!(app.view().state, GameState::NotStarted);
    }

    #[test]
    fn computer_waits_for_its_delay() {
        let mut app = AppState::default();
        app.cfg_seed = 5;
        app.apply_menu();
        let view = app.view();
        let slot = view.player_hand.first_occupied().unwrap();
        assert!(app.handle_input(InputAction::PlaySlot(slot)));
        let state = app.view().state;
        if state == GameState::CpuTurn {
            let now = Instant::now();
            app.drive_at(now);
            assert_eq!(app.view().state, GameState::CpuTurn);
            app.drive_at(now + Duration::from_millis(app.cpu_delay_ms));
            assert_ne!(app.view().state, GameState::CpuTurn);
        }
    }
}
