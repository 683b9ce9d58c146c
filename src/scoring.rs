//! Point values and capture classification.
//!
//! Everything here is a pure function of the cards involved; the game decides
//! who is credited.

use crate::cards::{Card, Rank, Suit};

/// The Two of this suit is worth 2 points.
pub const MINOR_SUIT: Suit = Suit::Clubs;
/// The Ten of this suit is worth 3 points.
pub const MAJOR_SUIT: Suit = Suit::Diamonds;

/// Points for a two-card pishti of any face but Jack.
pub const PISTI_POINTS: u32 = 10;
/// Points for a two-card pishti of Jacks.
pub const JACK_PISTI_POINTS: u32 = 20;
/// Awarded at game end to the side that collected more cards.
pub const MAJORITY_BONUS: u32 = 3;

/// Point value of a single card in isolation.
///
/// ```
/// use pishti::cards::{Card, Rank, Suit};
/// use pishti::scoring::card_points;
///
/// assert_eq!(card_points(Card::new(Rank::Ten, Suit::Diamonds)), 3);
/// assert_eq!(card_points(Card::new(Rank::Ten, Suit::Hearts)), 0);
/// ```
pub const fn card_points(card: Card) -> u32 {
    match (card.rank(), card.suit()) {
        (Rank::Jack, _) | (Rank::Ace, _) => 1,
        (Rank::Two, MINOR_SUIT) => 2,
        (Rank::Ten, MAJOR_SUIT) => 3,
        _ => 0,
    }
}

/// Sum of [`card_points`] over a pile.
pub fn pile_points(pile: &[Card]) -> u32 {
    pile.iter().copied().map(card_points).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CaptureKind {
    /// Two-card pile, matching faces.
    Pisti,
    /// Two-card pile, Jack on Jack.
    JackPisti,
    /// Any other capture: the whole pile is scored card by card.
    Sweep,
}

impl CaptureKind {
    pub fn label(self) -> &'static str {
        match self {
            CaptureKind::Pisti => "Pishti",
            CaptureKind::JackPisti => "Jack Pishti",
            CaptureKind::Sweep => "Capture",
        }
    }
}

/// Result of resolving a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub kind: CaptureKind,
    pub points: u32,
    /// Cards credited as physically collected.
    pub cards: usize,
}

/// Whether the top of `pile` captures it: the top card matches the face
/// directly beneath, or is a Jack.
pub fn is_capture(pile: &[Card]) -> bool {
    match pile {
        [.., below, top] => top.rank() == below.rank() || top.is_jack(),
        _ => false,
    }
}

/// Classify and score the pile right after its top card was placed.
///
/// Returns `None` when the top card does not capture.
///
/// ```
/// use pishti::cards::parse_cards;
/// use pishti::scoring::{classify, CaptureKind};
///
/// let pile = parse_cards("7h 7s").unwrap();
/// let capture = classify(&pile).unwrap();
/// assert_eq!(capture.kind, CaptureKind::Pisti);
/// assert_eq!(capture.points, 10);
/// ```
pub fn classify(pile: &[Card]) -> Option<Capture> {
    if !is_capture(pile) {
        return None;
    }
    if let [below, top] = pile {
        if below.rank() == top.rank() {
            let (kind, points) = if top.is_jack() {
                (CaptureKind::JackPisti, JACK_PISTI_POINTS)
            } else {
                (CaptureKind::Pisti, PISTI_POINTS)
            };
            return Some(Capture { kind, points, cards: 2 });
        }
    }
    Some(Capture { kind: CaptureKind::Sweep, points: pile_points(pile), cards: pile.len() })
}

/// Majority bonus for `(player, computer)` collected-card counts. A tie pays
/// nobody.
pub fn majority_bonus(player_cards: usize, cpu_cards: usize) -> (u32, u32) {
    use std::cmp::Ordering;
    match player_cards.cmp(&cpu_cards) {
        Ordering::Greater => (MAJORITY_BONUS, 0),
        Ordering::Less => (0, MAJORITY_BONUS),
        Ordering::Equal => (0, 0),
    }
}
