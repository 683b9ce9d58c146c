use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("a deck needs exactly 52 cards, got {0}")]
    WrongCount(usize),
    #[error("duplicate card in deck: {0}")]
    Duplicate(Card),
}

/// The 52-card deck plus a cursor marking the next undealt position.
///
/// Dealing never removes cards; it only advances the cursor, so the same
/// ordering can be inspected after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Deck {
    /// ```
    /// use pishti::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.remaining(), 52);
    /// ```
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for s in Suit::ALL {
            for r in Rank::ALL {
                cards.push(Card::new(r, s));
            }
        }
        Self { cards, cursor: 0 }
    }

    /// Build a deck in a fixed order; the first card is dealt first.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.len() != DECK_SIZE {
            return Err(DeckError::WrongCount(cards.len()));
        }
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for c in &cards {
            if !seen.insert(*c) {
                return Err(DeckError::Duplicate(*c));
            }
        }
        Ok(Self { cards, cursor: 0 })
    }

    /// Build a deck whose first cards are `top` (in order) followed by the
    /// rest of the standard deck in standard order.
    pub fn stacked(top: &[Card]) -> Result<Self, DeckError> {
        let mut cards: Vec<Card> = top.to_vec();
        cards.extend(Deck::standard().cards.into_iter().filter(|c| !top.contains(c)));
        Self::from_cards(cards)
    }

    /// Cards in deal order, including the ones already dealt.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Index of the next card to deal (0..=52).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        DECK_SIZE - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= DECK_SIZE
    }

    /// Rewind the cursor without changing the order.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.shuffle_with(&mut rng);
    }

    /// Shuffle in place (Fisher-Yates) with the provided RNG and rewind.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.cursor = 0;
    }

    /// Deal one card from the cursor.
    pub fn draw(&mut self) -> Option<Card> {
        let card = self.cards.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(card)
    }

    /// Deal exactly `n` cards, or nothing if fewer than `n` remain.
    pub fn draw_n(&mut self, n: usize) -> Option<&[Card]> {
        if n > self.remaining() {
            return None;
        }
        let start = self.cursor;
        self.cursor += n;
        Some(&self.cards[start..self.cursor])
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_deck_is_in_identifier_order() {
        let d = Deck::standard();
        assert_eq!(d.remaining(), 52);
        for (i, c) in d.cards().iter().enumerate() {
            assert_eq!(c.id() as usize, i + 1);
        }
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut d1 = Deck::standard();
        let mut d2 = Deck::standard();
        d1.shuffle_seeded(42);
        d2.shuffle_seeded(42);
        assert_eq!(d1.cards, d2.cards);
        let set: HashSet<Card> = d1.cards.iter().copied().collect();
        assert_eq!(set.len(), DECK_SIZE);
    }

    #[test]
    fn draw_advances_cursor_and_stops_at_end() {
        let mut d = Deck::standard();
        d.shuffle_seeded(7);
        let c1 = d.draw().unwrap();
        let c2 = d.draw().unwrap();
        assert_ne!(c1, c2);
        assert_eq!(d.cursor(), 2);
        assert_eq!(d.draw_n(50).map(|s| s.len()), Some(50));
        assert!(d.is_exhausted());
        assert_eq!(d.draw(), None);
        assert_eq!(d.draw_n(1), None);
        assert_eq!(d.cursor(), DECK_SIZE);
    }

    #[test]
    fn draw_n_refuses_partial_deal() {
        let mut d = Deck::standard();
        assert!(d.draw_n(48).is_some());
        assert_eq!(d.draw_n(8), None);
        assert_eq!(d.cursor(), 48);
    }

    #[test]
    fn from_cards_validates() {
        let mut cards = Deck::standard().cards().to_vec();
        assert!(Deck::from_cards(cards.clone()).is_ok());
        cards[1] = cards[0];
        assert_eq!(Deck::from_cards(cards.clone()), Err(DeckError::Duplicate(cards[0])));
        cards.pop();
        assert_eq!(Deck::from_cards(cards), Err(DeckError::WrongCount(51)));
    }

    #[test]
    fn stacked_puts_requested_cards_on_top() {
        let top = [Card::new(Rank::Jack, Suit::Spades), Card::new(Rank::Two, Suit::Clubs)];
        let d = Deck::stacked(&top).unwrap();
        assert_eq!(&d.cards()[..2], &top);
        assert_eq!(d.cards().len(), DECK_SIZE);
    }
}
