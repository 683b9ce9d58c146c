//! Agents: the computer opponent's card selection.
//!
//! Each difficulty tier is a [`Strategy`] that looks at a read-only
//! [`TurnView`] and proposes a hand slot. Tiers share the capture check and
//! the safe-discard lookup defined here; when a tier has no opinion the
//! common [`fallback`] picks a card with the engine's RNG.

use crate::cards::Card;
use crate::hand::{Hand, Memory};
use core::fmt;
use rand::Rng;
use std::str::FromStr;

mod strategies;

pub use strategies::{Advanced, Beginner, Intermediate};

/// Difficulty tiers, in increasing order of memory use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] =
        [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Advanced];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Whether the tier keeps a per-hand record of played cards.
    pub fn uses_hand_memory(self) -> bool {
        self >= Difficulty::Intermediate
    }

    /// Whether the tier keeps a whole-game record of played cards.
    pub fn uses_game_memory(self) -> bool {
        self == Difficulty::Advanced
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Beginner => Difficulty::Intermediate,
            Difficulty::Intermediate => Difficulty::Advanced,
            Difficulty::Advanced => Difficulty::Beginner,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Beginner => Difficulty::Advanced,
            Difficulty::Intermediate => Difficulty::Beginner,
            Difficulty::Advanced => Difficulty::Intermediate,
        }
    }

    /// The strategy implementing this tier.
    pub fn strategy(self) -> &'static dyn Strategy {
        match self {
            Difficulty::Beginner => &Beginner,
            Difficulty::Intermediate => &Intermediate,
            Difficulty::Advanced => &Advanced,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DifficultyParseError {
    #[error("unknown difficulty: '{0}'")]
    Unknown(String),
}

impl FromStr for Difficulty {
    type Err = DifficultyParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DifficultyParseError::Unknown(s.to_string()))
    }
}

/// Which rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Rule {
    /// Matches the pile's top face.
    MatchTop,
    /// Jack onto a non-empty pile.
    Jack,
    /// Same face as the card the player exposed with a Jack.
    SafeDiscard,
    /// Face seen most often in hand and this hand's plays.
    CommonFace,
    /// Highest count across the whole game and the rest of the hand.
    MatchNumber,
    /// Cheapest non-Jack by card points.
    LowestValue,
    /// Uniformly random non-Jack.
    RandomDiscard,
    /// Only Jacks left: first occupied slot.
    FirstSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub slot: usize,
    pub rule: Rule,
}

impl Decision {
    pub(crate) fn new(slot: usize, rule: Rule) -> Self {
        Self { slot, rule }
    }
}

/// Everything a strategy may look at. Borrowed from the game for the
/// duration of one decision.
#[derive(Debug, Clone, Copy)]
pub struct TurnView<'a> {
    pub hand: &'a Hand,
    /// Top card of the table pile, if any.
    pub top: Option<Card>,
    pub safe_discard: Option<Card>,
    pub hand_memory: &'a Memory,
    pub game_memory: &'a Memory,
}

/// A difficulty tier's selection logic. Pure: no mutation, no randomness.
pub trait Strategy: Send + Sync {
    /// Propose a slot, or `None` to defer to [`fallback`].
    fn decide(&self, view: &TurnView<'_>) -> Option<Decision>;
}

/// Match the top card's face, else play a Jack. Only applies to a non-empty
/// pile.
pub fn capture_check(view: &TurnView<'_>) -> Option<Decision> {
    let top = view.top?;
    if let Some(slot) = view.hand.find_rank(top.rank()) {
        return Some(Decision::new(slot, Rule::MatchTop));
    }
    view.hand.find_rank(crate::cards::Rank::Jack).map(|slot| Decision::new(slot, Rule::Jack))
}

/// A held card with the same face as the recorded safe-discard hint.
pub fn safe_discard(view: &TurnView<'_>) -> Option<Decision> {
    let hint = view.safe_discard?;
    view.hand.find_rank(hint.rank()).map(|slot| Decision::new(slot, Rule::SafeDiscard))
}

/// Random non-Jack if any, else the first occupied slot. `None` only for an
/// empty hand.
pub fn fallback<R: Rng + ?Sized>(hand: &Hand, rng: &mut R) -> Option<Decision> {
    let candidates: Vec<usize> =
        hand.iter().filter(|(_, c)| !c.is_jack()).map(|(i, _)| i).collect();
    if !candidates.is_empty() {
        let pick = candidates[rng.random_range(0..candidates.len())];
        return Some(Decision::new(pick, Rule::RandomDiscard));
    }
    hand.first_occupied().map(|slot| Decision::new(slot, Rule::FirstSlot))
}

/// Run the tier's strategy and fall back when it has no opinion.
pub fn choose<R: Rng + ?Sized>(
    difficulty: Difficulty,
    view: &TurnView<'_>,
    rng: &mut R,
) -> Option<Decision> {
    difficulty.strategy().decide(view).or_else(|| fallback(view.hand, rng))
}
