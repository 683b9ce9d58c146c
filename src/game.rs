use crate::agents::{self, Difficulty, TurnView};
use crate::cards::Card;
use crate::deck::Deck;
use crate::hand::{Hand, Memory, HAND_SIZE};
use crate::scoring::{self, Capture, CaptureKind};
use crate::sound::{NullSink, SoundEffect, SoundSink};
use crate::undo::{Snapshot, UndoSlot};
use core::fmt;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum GameState {
    NotStarted,
    PlayerTurn,
    CpuTurn,
    /// A capture was scored; the pile stays visible until `finalize_capture`.
    PileCaptured,
    GameOver,
}

impl GameState {
    /// Whether a game is underway (dealt and not finished).
    pub fn in_progress(self) -> bool {
        matches!(self, GameState::PlayerTurn | GameState::CpuTurn | GameState::PileCaptured)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Computer,
            Side::Computer => Side::Player,
        }
    }

    fn turn(self) -> GameState {
        match self {
            Side::Player => GameState::PlayerTurn,
            Side::Computer => GameState::CpuTurn,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("Player"),
            Side::Computer => f.write_str("CPU"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Outcome {
    PlayerWins,
    CpuWins,
    Tie,
}

/// Points and physically collected cards for one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub points: u32,
    pub collected: usize,
}

/// Whether human moves can be taken back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum UndoPolicy {
    /// One level of undo, except at the Advanced tier.
    #[default]
    Standard,
    Disabled,
}

/// Construction-time settings for a [`Game`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct GameConfig {
    /// Seed for shuffles and computer randomness; `None` draws from entropy.
    pub seed: Option<u64>,
    pub undo: UndoPolicy,
}

impl GameConfig {
    /// Set a deterministic RNG seed for reproducible games.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_undo(mut self, undo: UndoPolicy) -> Self {
        self.undo = undo;
        self
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("no difficulty level selected")]
    LevelNotSelected,
    #[error("cannot change level while a game is in progress")]
    GameInProgress,
    #[error("no game has been started")]
    NotStarted,
    #[error("expected state {expected:?}, found {actual:?}")]
    WrongState { expected: GameState, actual: GameState },
    #[error("hand slot {0} does not exist")]
    SlotOutOfRange(usize),
    #[error("hand slot {0} is empty")]
    EmptySlot(usize),
    #[error("no card left to play")]
    EmptyHand,
    #[error("nothing to undo")]
    UndoUnavailable,
}

/// One card placed on the pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub side: Side,
    pub slot: usize,
    pub card: Card,
    pub capture: Option<Capture>,
}

/// The most recent capture, kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    pub side: Side,
    pub capture: Capture,
    /// The captured pile, bottom first.
    pub cards: Vec<Card>,
}

/// What an end-of-hand check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandProgress {
    /// Cards remain in hand (or a capture is still pending).
    InProgress,
    NewHand,
    GameOver,
}

/// Owned game aggregate. Every mutating method takes `&mut self`; wrap it in
/// [`crate::engine::Engine`] to share it between threads.
#[non_exhaustive]
pub struct Game {
    pub(crate) level: Option<Difficulty>,
    pub(crate) state: GameState,
    pub(crate) undo_policy: UndoPolicy,

    pub(crate) deck: Deck,
    pub(crate) player_hand: Hand,
    pub(crate) cpu_hand: Hand,
    /// Cards played since the last capture, bottom first.
    pub(crate) pile: Vec<Card>,

    pub(crate) player: Score,
    pub(crate) cpu: Score,
    pub(crate) last_scorer: Option<Side>,

    /// The three face-down cards dealt to the table, until the first capture.
    pub(crate) hidden: Option<[Card; 3]>,
    /// Card the player exposed by capturing with a Jack.
    pub(crate) safe_discard: Option<Card>,
    /// True until the player's first move of the game.
    pub(crate) initial_pile: bool,
    pub(crate) hand_memory: Memory,
    pub(crate) game_memory: Memory,

    pub(crate) undo: UndoSlot,
    pub(crate) message: Option<String>,
    pub(crate) last_capture: Option<CaptureRecord>,
    pub(crate) player_last_slot: Option<usize>,
    pub(crate) cpu_last_slot: Option<usize>,

    rng: Box<dyn RngCore + Send>,
    sink: Box<dyn SoundSink>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("level", &self.level)
            .field("state", &self.state)
            .field("cursor", &self.deck.cursor())
            .field("player_hand", &self.player_hand)
            .field("cpu_hand", &self.cpu_hand)
            .field("pile", &self.pile)
            .field("player", &self.player)
            .field("cpu", &self.cpu)
            .finish_non_exhaustive()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let mut game = Self::with_rng(rng, NullSink);
        game.undo_policy = config.undo;
        game
    }

    /// Build a game around an injected random source and sound sink.
    pub fn with_rng<R, S>(rng: R, sink: S) -> Self
    where
        R: RngCore + Send + 'static,
        S: SoundSink + 'static,
    {
        Self {
            level: None,
            state: GameState::NotStarted,
            undo_policy: UndoPolicy::Standard,
            deck: Deck::standard(),
            player_hand: Hand::empty(),
            cpu_hand: Hand::empty(),
            pile: Vec::with_capacity(crate::deck::DECK_SIZE),
            player: Score::default(),
            cpu: Score::default(),
            last_scorer: None,
            hidden: None,
            safe_discard: None,
            initial_pile: false,
            hand_memory: Memory::new(),
            game_memory: Memory::new(),
            undo: UndoSlot::default(),
            message: None,
            last_capture: None,
            player_last_slot: None,
            cpu_last_slot: None,
            rng: Box::new(rng),
            sink: Box::new(sink),
        }
    }

    /// Replace the sound sink.
    pub fn set_sink<S: SoundSink + 'static>(&mut self, sink: S) {
        self.sink = Box::new(sink);
    }

    pub fn set_undo_policy(&mut self, policy: UndoPolicy) {
        self.undo_policy = policy;
    }

    // --- Queries ---

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn level(&self) -> Option<Difficulty> {
        self.level
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player_hand
    }

    pub fn cpu_hand(&self) -> &Hand {
        &self.cpu_hand
    }

    /// Table pile, bottom first.
    pub fn pile(&self) -> &[Card] {
        &self.pile
    }

    pub fn score(&self, side: Side) -> Score {
        match side {
            Side::Player => self.player,
            Side::Computer => self.cpu,
        }
    }

    pub fn last_scorer(&self) -> Option<Side> {
        self.last_scorer
    }

    pub fn hidden_cards(&self) -> Option<[Card; 3]> {
        self.hidden
    }

    pub fn safe_discard(&self) -> Option<Card> {
        self.safe_discard
    }

    pub fn is_initial_pile(&self) -> bool {
        self.initial_pile
    }

    pub fn hand_memory(&self) -> &Memory {
        &self.hand_memory
    }

    pub fn game_memory(&self) -> &Memory {
        &self.game_memory
    }

    /// One-shot message for the display (hidden cards captured).
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn last_capture(&self) -> Option<&CaptureRecord> {
        self.last_capture.as_ref()
    }

    /// Slot each side played last, `(player, computer)`.
    pub fn last_slots(&self) -> (Option<usize>, Option<usize>) {
        (self.player_last_slot, self.cpu_last_slot)
    }

    /// Whether undo is permitted for the current level and policy.
    pub fn undo_enabled(&self) -> bool {
        self.undo_policy == UndoPolicy::Standard
            && self.level.is_some_and(|l| l != Difficulty::Advanced)
    }

    /// Whether an `undo` call would succeed right now.
    pub fn can_undo(&self) -> bool {
        self.undo_enabled() && self.state.in_progress() && self.undo.is_armed()
    }

    /// Both hands played out.
    pub fn is_hand_finished(&self) -> bool {
        self.player_hand.is_empty() && self.cpu_hand.is_empty()
    }

    /// Cards still in the deck, both hands, on the table, and collected by
    /// either side. Always 52 once a game has started.
    pub fn cards_accounted(&self) -> usize {
        self.deck.remaining()
            + self.player_hand.len()
            + self.cpu_hand.len()
            + self.pile.len()
            + self.player.collected
            + self.cpu.collected
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if self.state != GameState::GameOver {
            return None;
        }
        Some(match self.player.points.cmp(&self.cpu.points) {
            std::cmp::Ordering::Greater => Outcome::PlayerWins,
            std::cmp::Ordering::Less => Outcome::CpuWins,
            std::cmp::Ordering::Equal => Outcome::Tie,
        })
    }

    // --- Lifecycle ---

    /// Choose the computer's tier. Only allowed between games.
    pub fn set_level(&mut self, level: Difficulty) -> Result<(), ActionError> {
        if self.state.in_progress() {
            debug!(?level, state = ?self.state, "level change rejected");
            return Err(ActionError::GameInProgress);
        }
        self.level = Some(level);
        Ok(())
    }

    /// Shuffle and deal a new game, discarding any game in progress.
    pub fn start_game(&mut self) -> Result<(), ActionError> {
        let level = self.level.ok_or(ActionError::LevelNotSelected)?;
        self.deck.shuffle_with(&mut *self.rng);
        self.begin(level);
        Ok(())
    }

    /// Deal a new game from a pre-arranged deck without shuffling.
    pub fn start_with_deck(&mut self, deck: Deck) -> Result<(), ActionError> {
        let level = self.level.ok_or(ActionError::LevelNotSelected)?;
        self.deck = deck;
        self.deck.rewind();
        self.begin(level);
        Ok(())
    }

    /// Back to `NotStarted` with no level chosen.
    pub fn reset_game(&mut self) {
        self.clear_round();
        self.level = None;
        self.initial_pile = false;
        self.state = GameState::NotStarted;
        info!("game reset");
    }

    fn clear_round(&mut self) {
        self.deck.rewind();
        self.player_hand = Hand::empty();
        self.cpu_hand = Hand::empty();
        self.pile.clear();
        self.player = Score::default();
        self.cpu = Score::default();
        self.last_scorer = None;
        self.hidden = None;
        self.safe_discard = None;
        self.hand_memory.clear();
        self.game_memory.clear();
        self.undo.clear();
        self.message = None;
        self.last_capture = None;
        self.player_last_slot = None;
        self.cpu_last_slot = None;
    }

    fn begin(&mut self, level: Difficulty) {
        self.clear_round();
        let table = self.deck.draw_n(HAND_SIZE).map(<[Card]>::to_vec).unwrap_or_default();
        self.hidden = match table.as_slice() {
            [a, b, c, _] => Some([*a, *b, *c]),
            _ => None,
        };
        self.pile = table;
        self.initial_pile = true;
        self.deal_hands();
        self.state = GameState::PlayerTurn;
        self.sink.notify(SoundEffect::GameStart);
        info!(%level, top = ?self.pile.last(), "game started");
    }

    /// Deal four cards to each side. Never reads past the end of the deck.
    fn deal_hands(&mut self) -> bool {
        let Some(cards) = self.deck.draw_n(2 * HAND_SIZE).map(<[Card]>::to_vec) else {
            warn!(cursor = self.deck.cursor(), "deal skipped: deck exhausted");
            return false;
        };
        self.player_hand = Hand::from_slice(&cards[..HAND_SIZE]);
        self.cpu_hand = Hand::from_slice(&cards[HAND_SIZE..]);
        true
    }

    fn deal_next_hand(&mut self) -> bool {
        if !self.deal_hands() {
            return false;
        }
        self.sink.notify(SoundEffect::Deal);
        self.safe_discard = None;
        self.hand_memory.clear();
        // the deck cursor is not part of a snapshot
        self.undo.clear();
        debug!(remaining = self.deck.remaining(), "new hand dealt");
        true
    }

    // --- Turns ---

    fn expect_state(&self, expected: GameState) -> Result<(), ActionError> {
        if self.state == expected {
            return Ok(());
        }
        if self.state == GameState::NotStarted {
            return Err(ActionError::NotStarted);
        }
        Err(ActionError::WrongState { expected, actual: self.state })
    }

    /// The human plays the card in `slot`.
    pub fn player_plays(&mut self, slot: usize) -> Result<Play, ActionError> {
        self.expect_state(GameState::PlayerTurn)?;
        if slot >= HAND_SIZE {
            return Err(ActionError::SlotOutOfRange(slot));
        }
        if self.player_hand.get(slot).is_none() {
            debug!(slot, "empty slot ignored");
            return Err(ActionError::EmptySlot(slot));
        }
        if self.undo_enabled() {
            self.undo.record(Snapshot::capture(self));
        }
        self.message = None;
        let card = self.player_hand.take(slot).ok_or(ActionError::EmptySlot(slot))?;
        self.player_last_slot = Some(slot);
        let play = self.place(card, slot, Side::Player);
        self.initial_pile = false;
        Ok(play)
    }

    /// The computer picks and plays a card according to its tier.
    pub fn computer_plays(&mut self) -> Result<Play, ActionError> {
        self.expect_state(GameState::CpuTurn)?;
        let level = self.level.ok_or(ActionError::LevelNotSelected)?;
        let view = TurnView {
            hand: &self.cpu_hand,
            top: self.pile.last().copied(),
            safe_discard: self.safe_discard,
            hand_memory: &self.hand_memory,
            game_memory: &self.game_memory,
        };
        let decision = agents::choose(level, &view, &mut *self.rng).ok_or(ActionError::EmptyHand)?;
        let card = self.cpu_hand.take(decision.slot).ok_or(ActionError::EmptySlot(decision.slot))?;
        debug!(%level, slot = decision.slot, rule = ?decision.rule, %card, "computer decision");
        self.cpu_last_slot = Some(decision.slot);
        Ok(self.place(card, decision.slot, Side::Computer))
    }

    fn remember(&mut self, card: Card) {
        let Some(level) = self.level else { return };
        if level.uses_hand_memory() {
            self.hand_memory.remember(card);
        }
        if level.uses_game_memory() {
            self.game_memory.remember(card);
        }
    }

    fn place(&mut self, card: Card, slot: usize, side: Side) -> Play {
        self.remember(card);
        self.sink.notify(SoundEffect::CardPlay);
        self.pile.push(card);
        let capture = scoring::classify(&self.pile);
        debug!(%side, %card, pile = self.pile.len(), ?capture, "card played");
        match capture {
            Some(capture) => self.resolve_capture(side, capture),
            None => self.state = side.opponent().turn(),
        }
        Play { side, slot, card, capture }
    }

    fn resolve_capture(&mut self, side: Side, capture: Capture) {
        let n = self.pile.len();
        if side == Side::Player && n >= 2 && self.pile[n - 1].is_jack() {
            self.safe_discard = Some(self.pile[n - 2]);
        }
        if let Some([a, b, c]) = self.hidden.take() {
            if side == Side::Player {
                self.message = Some(format!(
                    "You captured the hidden cards: {}, {}, and {}!",
                    a.rank().name(),
                    b.rank().name(),
                    c.rank().name()
                ));
            }
        }
        self.sink.notify(match capture.kind {
            CaptureKind::Pisti => SoundEffect::Pisti,
            CaptureKind::JackPisti => SoundEffect::JackPisti,
            CaptureKind::Sweep => SoundEffect::Capture,
        });
        let score = self.score_mut(side);
        score.points += capture.points;
        score.collected += capture.cards;
        self.last_scorer = Some(side);
        let cards = std::mem::take(&mut self.pile);
        info!(%side, kind = capture.kind.label(), points = capture.points, cards = cards.len(), "capture");
        self.last_capture = Some(CaptureRecord { side, capture, cards });
        self.state = GameState::PileCaptured;
    }

    fn score_mut(&mut self, side: Side) -> &mut Score {
        match side {
            Side::Player => &mut self.player,
            Side::Computer => &mut self.cpu,
        }
    }

    /// Close the capture pause. Play passes to the side that did not capture,
    /// unless the hand or the game just ended.
    ///
    /// The capturer does not move again: after a player capture the next
    /// state is [`GameState::CpuTurn`], after a computer capture it is
    /// [`GameState::PlayerTurn`]. Strict alternation keeps both hands at the
    /// same size, so a hand ends when both are empty.
    pub fn finalize_capture(&mut self) -> Result<HandProgress, ActionError> {
        self.expect_state(GameState::PileCaptured)?;
        let next = self.last_scorer.map_or(Side::Player, Side::opponent);
        self.state = next.turn();
        Ok(self.advance_hand())
    }

    /// Deal the next hand or end the game once both hands are empty.
    pub fn check_end_of_hand(&mut self) -> Result<HandProgress, ActionError> {
        match self.state {
            GameState::NotStarted => Err(ActionError::NotStarted),
            GameState::GameOver => Ok(HandProgress::GameOver),
            GameState::PileCaptured => Ok(HandProgress::InProgress),
            _ => Ok(self.advance_hand()),
        }
    }

    fn advance_hand(&mut self) -> HandProgress {
        if !self.is_hand_finished() {
            return HandProgress::InProgress;
        }
        if self.deck.is_exhausted() {
            self.finish_game();
            return HandProgress::GameOver;
        }
        if self.deal_next_hand() {
            self.state = GameState::PlayerTurn;
            HandProgress::NewHand
        } else {
            HandProgress::InProgress
        }
    }

    fn finish_game(&mut self) {
        self.award_final_pile();
        let (player_bonus, cpu_bonus) =
            scoring::majority_bonus(self.player.collected, self.cpu.collected);
        self.player.points += player_bonus;
        self.cpu.points += cpu_bonus;
        self.state = GameState::GameOver;
        self.undo.clear();
        let outcome = self.outcome();
        self.sink.notify(match outcome {
            Some(Outcome::PlayerWins) => SoundEffect::PlayerWins,
            Some(Outcome::CpuWins) => SoundEffect::CpuWins,
            _ => SoundEffect::Tie,
        });
        info!(
            player = self.player.points,
            cpu = self.cpu.points,
            player_cards = self.player.collected,
            cpu_cards = self.cpu.collected,
            ?outcome,
            "game over"
        );
    }

    /// Remaining table cards go to the last side that captured (the computer
    /// when nobody has).
    fn award_final_pile(&mut self) {
        if self.pile.is_empty() {
            return;
        }
        let side = self.last_scorer.unwrap_or(Side::Computer);
        let points = scoring::pile_points(&self.pile);
        let cards = self.pile.len();
        let score = self.score_mut(side);
        score.points += points;
        score.collected += cards;
        self.pile.clear();
        debug!(%side, points, cards, "final pile awarded");
    }

    /// Take back the human's last move (and any computer reply since).
    pub fn undo(&mut self) -> Result<(), ActionError> {
        if !self.can_undo() {
            return Err(ActionError::UndoUnavailable);
        }
        let snapshot = self.undo.take().ok_or(ActionError::UndoUnavailable)?;
        snapshot.restore(self);
        self.message = None;
        self.last_capture = None;
        self.state = GameState::PlayerTurn;
        self.sink.notify(SoundEffect::Undo);
        debug!("undo applied");
        Ok(())
    }

    /// Read-only copy of everything a display needs.
    pub fn view(&self) -> GameView {
        let shown = match (&self.last_capture, self.state) {
            (Some(record), GameState::PileCaptured) => record.cards.as_slice(),
            _ => self.pile.as_slice(),
        };
        GameView {
            state: self.state,
            level: self.level,
            player: self.player,
            cpu: self.cpu,
            player_hand: self.player_hand,
            cpu_hand: self.cpu_hand,
            table_top: shown.last().copied(),
            table_second: shown.len().checked_sub(2).map(|i| shown[i]),
            table_len: shown.len(),
            initial_pile: self.initial_pile,
            deck_remaining: self.deck.remaining(),
            can_undo: self.can_undo(),
            message: self.message.clone(),
            last_capture: self.last_capture.clone(),
            last_slots: self.last_slots(),
            outcome: self.outcome(),
        }
    }
}

/// Snapshot of the state a display layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GameView {
    pub state: GameState,
    pub level: Option<Difficulty>,
    pub player: Score,
    pub cpu: Score,
    pub player_hand: Hand,
    /// Shown face down.
    pub cpu_hand: Hand,
    pub table_top: Option<Card>,
    /// Face down while the initial pile stands.
    pub table_second: Option<Card>,
    pub table_len: usize,
    pub initial_pile: bool,
    pub deck_remaining: usize,
    pub can_undo: bool,
    pub message: Option<String>,
    pub last_capture: Option<CaptureRecord>,
    pub last_slots: (Option<usize>, Option<usize>),
    pub outcome: Option<Outcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::sound::RecordingSink;

    /// Table: 4 cards, then player hand, then computer hand, then the rest.
    fn stacked_game(level: Difficulty, top: &str) -> Game {
        let mut g = Game::new(GameConfig::default().with_seed(1));
        g.set_level(level).unwrap();
        let deck = Deck::stacked(&parse_cards(top).unwrap()).unwrap();
        g.start_with_deck(deck).unwrap();
        g
    }

    #[test]
    fn start_requires_level() {
        let mut g = Game::default();
        assert_eq!(g.start_game(), Err(ActionError::LevelNotSelected));
        assert_eq!(g.state, GameState::NotStarted);
        assert_eq!(g.deck.cursor(), 0);
    }

    #[test]
    fn start_deals_table_and_hands() {
        let g = stacked_game(Difficulty::Beginner, "2h 3h 4h 5h 6h 7h 8h 9h 6s 7s 8s 9s");
        assert_eq!(g.state, GameState::PlayerTurn);
        assert_eq!(g.pile.len(), 4);
        assert_eq!(g.deck.cursor(), 12);
        assert_eq!(g.player_hand.len(), 4);
        assert_eq!(g.cpu_hand.len(), 4);
        assert!(g.initial_pile);
        let hidden = g.hidden.unwrap();
        assert_eq!(hidden.to_vec(), parse_cards("2h 3h 4h").unwrap());
        assert_eq!(g.cards_accounted(), 52);
    }

    #[test]
    fn level_locked_during_game() {
        let mut g = stacked_game(Difficulty::Beginner, "");
        assert_eq!(g.set_level(Difficulty::Advanced), Err(ActionError::GameInProgress));
        assert_eq!(g.level, Some(Difficulty::Beginner));
    }

    #[test]
    fn out_of_turn_and_empty_slot_are_rejected() {
        let mut g = stacked_game(Difficulty::Beginner, "2h 3h 4h 5h 6h 7h 8h 9h Ts Qs Ks 9s");
        assert!(matches!(g.computer_plays(), Err(ActionError::WrongState { .. })));
        assert_eq!(g.player_plays(4), Err(ActionError::SlotOutOfRange(4)));
        g.player_plays(0).unwrap();
        assert_eq!(g.state, GameState::CpuTurn);
        assert!(matches!(g.player_plays(1), Err(ActionError::WrongState { .. })));
        g.computer_plays().unwrap();
        assert_eq!(g.player_plays(0), Err(ActionError::EmptySlot(0)));
        assert_eq!(g.state, GameState::PlayerTurn);
    }

    #[test]
    fn player_jack_capture_sets_hint_and_message() {
        // table top is 5h; player holds a Jack in slot 1
        let mut g = stacked_game(Difficulty::Intermediate, "2h 3h 4h 5h 6h Jc 8h 9h 6s 7s 8s 9s");
        let sink = RecordingSink::new();
        g.set_sink(sink.clone());
        let play = g.player_plays(1).unwrap();
        let capture = play.capture.unwrap();
        assert_eq!(capture.kind, CaptureKind::Sweep);
        assert_eq!(capture.cards, 5);
        assert_eq!(g.state, GameState::PileCaptured);
        assert_eq!(g.safe_discard, parse_cards("5h").unwrap().first().copied());
        assert_eq!(g.message.as_deref(), Some("You captured the hidden cards: Deuce, Three, and Four!"));
        assert!(g.hidden.is_none());
        assert_eq!(g.player, Score { points: 1, collected: 5 });
        assert_eq!(sink.effects(), vec![SoundEffect::CardPlay, SoundEffect::Capture]);
        assert_eq!(g.cards_accounted(), 52);
    }

    #[test]
    fn computer_capture_of_hidden_cards_is_silent() {
        // player dumps 6h, computer holds 6s
        let mut g = stacked_game(Difficulty::Beginner, "2h 3h 4h 5h 6h 7h 8h 9h 6s 7s 8s 9s");
        g.player_plays(0).unwrap();
        let play = g.computer_plays().unwrap();
        assert_eq!(play.slot, 0);
        assert!(play.capture.is_some());
        assert!(g.hidden.is_none());
        assert!(g.message.is_none());
        assert_eq!(g.last_scorer, Some(Side::Computer));
        assert_eq!(g.finalize_capture(), Ok(HandProgress::InProgress));
        assert_eq!(g.state, GameState::PlayerTurn);
        assert!(g.pile.is_empty());
    }

    #[test]
    fn finalize_after_player_capture_hands_turn_to_computer() {
        let mut g = stacked_game(Difficulty::Beginner, "2h 3h 4h 5h 5s 7h 8h 9h 6s 7s 8s 9s");
        g.player_plays(0).unwrap();
        assert_eq!(g.state, GameState::PileCaptured);
        g.finalize_capture().unwrap();
        assert_eq!(g.state, GameState::CpuTurn);
        assert_eq!(g.finalize_capture(), Err(ActionError::WrongState {
            expected: GameState::PileCaptured,
            actual: GameState::CpuTurn
        }));
    }

    #[test]
    fn memories_follow_level() {
        let mut g = stacked_game(Difficulty::Beginner, "2h 3h 4h 5h 6h 7h 8h 9h Ts 7s 8s 9s");
        g.player_plays(0).unwrap();
        assert!(g.hand_memory.is_empty() && g.game_memory.is_empty());

        let mut g = stacked_game(Difficulty::Intermediate, "2h 3h 4h 5h 6h 7h 8h 9h Ts 7s 8s 9s");
        g.player_plays(0).unwrap();
        assert_eq!(g.hand_memory.len(), 1);
        assert!(g.game_memory.is_empty());

        let mut g = stacked_game(Difficulty::Advanced, "2h 3h 4h 5h 6h 7h 8h 9h Ts 7s 8s 9s");
        g.player_plays(0).unwrap();
        assert_eq!(g.hand_memory.len(), 1);
        assert_eq!(g.game_memory.len(), 1);
    }

    #[test]
    fn reset_clears_level_and_state() {
        let mut g = stacked_game(Difficulty::Beginner, "");
        g.player_plays(0).unwrap();
        g.reset_game();
        assert_eq!(g.state, GameState::NotStarted);
        assert_eq!(g.level, None);
        assert!(g.pile.is_empty());
        assert!(g.player_hand.is_empty());
        assert_eq!(g.player, Score::default());
        assert!(!g.can_undo());
        assert_eq!(g.start_game(), Err(ActionError::LevelNotSelected));
    }
}
