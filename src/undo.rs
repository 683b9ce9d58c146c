//! Single-level undo of the human's most recent move.
//!
//! A [`Snapshot`] is taken just before the player's card is applied. Rolling
//! back also discards whatever the computer did in reply. Dealing a new hand
//! or ending the game forfeits the snapshot, because the deck position is not
//! part of it.

use crate::cards::Card;
use crate::game::{Game, Score, Side};
use crate::hand::{Hand, Memory};

/// Copy of the round state a human move can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    player: Score,
    cpu: Score,
    last_scorer: Option<Side>,
    pile: Vec<Card>,
    player_hand: Hand,
    cpu_hand: Hand,
    hidden: Option<[Card; 3]>,
    safe_discard: Option<Card>,
    initial_pile: bool,
    hand_memory: Memory,
    last_slots: (Option<usize>, Option<usize>),
}

impl Snapshot {
    pub(crate) fn capture(game: &Game) -> Self {
        Self {
            player: game.player,
            cpu: game.cpu,
            last_scorer: game.last_scorer,
            pile: game.pile.clone(),
            player_hand: game.player_hand,
            cpu_hand: game.cpu_hand,
            hidden: game.hidden,
            safe_discard: game.safe_discard,
            initial_pile: game.initial_pile,
            hand_memory: game.hand_memory.clone(),
            last_slots: (game.player_last_slot, game.cpu_last_slot),
        }
    }

    /// Write every captured field back; the caller sets the turn.
    pub(crate) fn restore(self, game: &mut Game) {
        game.player = self.player;
        game.cpu = self.cpu;
        game.last_scorer = self.last_scorer;
        game.pile = self.pile;
        game.player_hand = self.player_hand;
        game.cpu_hand = self.cpu_hand;
        game.hidden = self.hidden;
        game.safe_discard = self.safe_discard;
        game.initial_pile = self.initial_pile;
        game.hand_memory = self.hand_memory;
        (game.player_last_slot, game.cpu_last_slot) = self.last_slots;
    }

    pub fn pile(&self) -> &[Card] {
        &self.pile
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player_hand
    }
}

/// Holds at most one snapshot. Recording replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct UndoSlot {
    snapshot: Option<Snapshot>,
}

impl UndoSlot {
    pub fn record(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Remove the snapshot so it cannot be applied twice.
    pub fn take(&mut self) -> Option<Snapshot> {
        self.snapshot.take()
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    pub fn is_armed(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn peek(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}
