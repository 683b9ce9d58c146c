// Thread-safe driver boundary. `Engine` owns one `Game` behind a mutex so a
// UI thread and a timer thread can both drive it; every call holds the lock
// for exactly one operation and releases it on every path.

use crate::agents::Difficulty;
use crate::deck::Deck;
use crate::game::{ActionError, Game, GameConfig, GameView, HandProgress, Play};
use crate::sound::{NullSink, SoundSink};
use rand::RngCore;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
pub struct Engine {
    game: Mutex<Game>,
}

impl Engine {
    pub fn new<S: SoundSink + 'static>(config: GameConfig, sink: S) -> Self {
        let mut game = Game::new(config);
        game.set_sink(sink);
        Self::from_game(game)
    }

    /// Engine with an injected random source, for reproducible play.
    pub fn with_rng<R, S>(rng: R, sink: S) -> Self
    where
        R: RngCore + Send + 'static,
        S: SoundSink + 'static,
    {
        Self::from_game(Game::with_rng(rng, sink))
    }

    pub fn from_game(game: Game) -> Self {
        Self { game: Mutex::new(game) }
    }

    /// Silent engine seeded for tests and benches.
    pub fn seeded(seed: u64) -> Self {
        Self::new(GameConfig::default().with_seed(seed), NullSink)
    }

    // A panicking sink must not wedge the game.
    fn lock(&self) -> MutexGuard<'_, Game> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the game under the lock.
    pub fn with_game<T>(&self, f: impl FnOnce(&Game) -> T) -> T {
        f(&self.lock())
    }

    pub fn set_level(&self, level: Difficulty) -> bool {
        self.lock().set_level(level).is_ok()
    }

    /// Start a fresh game. Returns false when no level is selected.
    pub fn start_game(&self) -> bool {
        match self.lock().start_game() {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "start rejected");
                false
            }
        }
    }

    pub fn start_with_deck(&self, deck: Deck) -> bool {
        self.lock().start_with_deck(deck).is_ok()
    }

    pub fn reset_game(&self) {
        self.lock().reset_game();
    }

    pub fn player_plays(&self, slot: usize) -> Result<Play, ActionError> {
        let res = self.lock().player_plays(slot);
        if let Err(err) = &res {
            debug!(slot, %err, "player move rejected");
        }
        res
    }

    pub fn computer_plays(&self) -> Result<Play, ActionError> {
        let res = self.lock().computer_plays();
        if let Err(err) = &res {
            debug!(%err, "computer move rejected");
        }
        res
    }

    pub fn is_hand_finished(&self) -> bool {
        self.lock().is_hand_finished()
    }

    pub fn check_end_of_hand(&self) -> Result<HandProgress, ActionError> {
        self.lock().check_end_of_hand()
    }

    pub fn finalize_capture(&self) -> Result<HandProgress, ActionError> {
        self.lock().finalize_capture()
    }

    /// Roll back the last human move. Returns false when nothing happened.
    pub fn undo(&self) -> bool {
        match self.lock().undo() {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "undo rejected");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.lock().can_undo()
    }

    pub fn view(&self) -> GameView {
        self.lock().view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;

    #[test]
    fn start_without_level_is_a_no_op() {
        let e = Engine::seeded(1);
        assert!(!e.start_game());
        assert_eq!(e.view().state, GameState::NotStarted);
        assert!(e.set_level(Difficulty::Intermediate));
        assert!(e.start_game());
        assert_eq!(e.view().state, GameState::PlayerTurn);
        assert!(!e.set_level(Difficulty::Advanced));
    }

    #[test]
    fn survives_a_poisoned_lock() {
        let e = std::sync::Arc::new(Engine::seeded(2));
        e.set_level(Difficulty::Beginner);
        let e2 = e.clone();
        let _ = std::thread::spawn(move || {
            e2.with_game(|_| panic!("boom"));
        })
        .join();
        assert!(e.start_game());
        assert_eq!(e.view().deck_remaining, 40);
    }
}
