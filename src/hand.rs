use crate::cards::{Card, Rank};
use crate::deck::DECK_SIZE;

/// Number of cards dealt to each side per hand.
pub const HAND_SIZE: usize = 4;

/// Four card slots. A played slot stays empty until the next deal.
///
/// ```
/// use pishti::cards::{Card, Rank, Suit};
/// use pishti::hand::Hand;
///
/// let mut hand = Hand::dealt([
///     Card::new(Rank::Ace, Suit::Hearts),
///     Card::new(Rank::Two, Suit::Clubs),
///     Card::new(Rank::Jack, Suit::Spades),
///     Card::new(Rank::Ten, Suit::Diamonds),
/// ]);
/// assert_eq!(hand.take(1), Some(Card::new(Rank::Two, Suit::Clubs)));
/// assert_eq!(hand.take(1), None);
/// assert_eq!(hand.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hand {
    slots: [Option<Card>; HAND_SIZE],
}

impl Hand {
    pub const fn empty() -> Self {
        Self { slots: [None; HAND_SIZE] }
    }

    pub fn dealt(cards: [Card; HAND_SIZE]) -> Self {
        Self { slots: cards.map(Some) }
    }

    /// Build from a dealt slice; missing positions stay empty.
    pub fn from_slice(cards: &[Card]) -> Self {
        let mut hand = Self::empty();
        for (slot, card) in hand.slots.iter_mut().zip(cards) {
            *slot = Some(*card);
        }
        hand
    }

    pub fn slots(&self) -> &[Option<Card>; HAND_SIZE] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<Card> {
        self.slots.get(slot).copied().flatten()
    }

    /// Empty the slot and return its card.
    pub fn take(&mut self, slot: usize) -> Option<Card> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Occupied slots as `(slot, card)`, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Card)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, c)| c.map(|c| (i, c)))
    }

    /// First occupied slot holding `rank`.
    pub fn find_rank(&self, rank: Rank) -> Option<usize> {
        self.iter().find(|(_, c)| c.rank() == rank).map(|(i, _)| i)
    }

    pub fn first_occupied(&self) -> Option<usize> {
        self.iter().next().map(|(i, _)| i)
    }
}

/// Append-only record of played cards, capped at one deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    cards: Vec<Card>,
}

impl Memory {
    pub fn new() -> Self {
        Self { cards: Vec::with_capacity(DECK_SIZE) }
    }

    /// Record a card; ignored once the buffer holds a full deck.
    pub fn remember(&mut self, card: Card) {
        if self.cards.len() < DECK_SIZE {
            self.cards.push(card);
        }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// How many remembered cards show `rank`.
    pub fn count_rank(&self, rank: Rank) -> usize {
        self.cards.iter().filter(|c| c.rank() == rank).count()
    }
}

impl From<Vec<Card>> for Memory {
    fn from(mut cards: Vec<Card>) -> Self {
        cards.truncate(DECK_SIZE);
        Self { cards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    #[test]
    fn slots_empty_in_place() {
        let cards = parse_cards("Ah 2c Js Td").unwrap();
        let mut hand = Hand::from_slice(&cards);
        assert_eq!(hand.len(), 4);
        assert_eq!(hand.take(0), Some(cards[0]));
        assert_eq!(hand.get(0), None);
        assert_eq!(hand.get(1), Some(cards[1]));
        assert_eq!(hand.first_occupied(), Some(1));
        assert_eq!(hand.find_rank(Rank::Jack), Some(2));
        assert_eq!(hand.take(9), None);
        for i in 1..4 {
            hand.take(i);
        }
        assert!(hand.is_empty());
        assert_eq!(hand.first_occupied(), None);
    }

    #[test]
    fn memory_is_capped() {
        let mut m = Memory::new();
        let c = parse_cards("7h").unwrap()[0];
        for _ in 0..60 {
            m.remember(c);
        }
        assert_eq!(m.len(), DECK_SIZE);
        assert_eq!(m.count_rank(Rank::Seven), DECK_SIZE);
        m.clear();
        assert!(m.is_empty());
    }
}
