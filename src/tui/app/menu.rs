use crate::engine::Engine;
use crate::game::GameConfig;
use crate::sound::TraceSink;

use super::AppState;

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Difficulty,
    CpuDelayMs,
    CapturePauseMs,
    Seed,
}

const MENU_ITEMS: [MenuItem; 4] =
    [MenuItem::Difficulty, MenuItem::CpuDelayMs, MenuItem::CapturePauseMs, MenuItem::Seed];

const DELAY_STEP_MS: u64 = 100;
const MAX_DELAY_MS: u64 = 5000;

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        match self {
            MenuItem::Difficulty => format!("Difficulty: {}", app.cfg_difficulty),
            MenuItem::CpuDelayMs => format!("CPU Delay (ms): {}", app.cfg_cpu_delay_ms),
            MenuItem::CapturePauseMs => {
                format!("Capture Pause (ms): {}", app.cfg_capture_pause_ms)
            }
            MenuItem::Seed => match app.cfg_seed {
                0 => String::from("Seed: random"),
                seed => format!("Seed: {seed}"),
            },
        }
    }

    fn inc(self, app: &mut AppState) {
        match self {
            MenuItem::Difficulty => app.cfg_difficulty = app.cfg_difficulty.next(),
            MenuItem::CpuDelayMs => {
                app.cfg_cpu_delay_ms = (app.cfg_cpu_delay_ms + DELAY_STEP_MS).min(MAX_DELAY_MS);
            }
            MenuItem::CapturePauseMs => {
                app.cfg_capture_pause_ms =
                    (app.cfg_capture_pause_ms + DELAY_STEP_MS).min(MAX_DELAY_MS);
            }
            MenuItem::Seed => app.cfg_seed = app.cfg_seed.saturating_add(1),
        }
    }

    fn dec(self, app: &mut AppState) {
        match self {
            MenuItem::Difficulty => app.cfg_difficulty = app.cfg_difficulty.prev(),
            MenuItem::CpuDelayMs => {
                app.cfg_cpu_delay_ms = app.cfg_cpu_delay_ms.saturating_sub(DELAY_STEP_MS);
            }
            MenuItem::CapturePauseMs => {
                app.cfg_capture_pause_ms = app.cfg_capture_pause_ms.saturating_sub(DELAY_STEP_MS);
            }
            MenuItem::Seed => app.cfg_seed = app.cfg_seed.saturating_sub(1),
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_overlays();
        self.scene = match self.scene {
            super::Scene::Menu => super::Scene::Table,
            _ => {
                self.open_menu();
                super::Scene::Menu
            }
        };
    }

    // --- Menu operations ---
    pub fn open_menu(&mut self) {
        self.close_overlays();
        self.menu_index = 0;
        self.cfg_difficulty = self.difficulty;
        self.cfg_cpu_delay_ms = self.cpu_delay_ms;
        self.cfg_capture_pause_ms = self.capture_pause_ms;
        self.cfg_seed = self.seed;
        self.scene = super::Scene::Menu;
    }

    /// Rebuild the engine with the edited settings and deal a new game.
    pub fn apply_menu(&mut self) {
        self.difficulty = self.cfg_difficulty;
        self.cpu_delay_ms = self.cfg_cpu_delay_ms;
        self.capture_pause_ms = self.cfg_capture_pause_ms;
        self.seed = self.cfg_seed;
        let mut config = GameConfig::default();
        if self.seed != 0 {
            config = config.with_seed(self.seed);
        }
        self.engine = Engine::new(config, TraceSink);
        self.scene = super::Scene::Table;
        self.new_game();
    }

    pub fn cancel_menu(&mut self) {
        self.scene = super::Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.inc(self);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.dec(self);
    }
}
