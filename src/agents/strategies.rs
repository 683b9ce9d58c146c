use crate::cards::Rank;
use crate::scoring::card_points;

use super::{capture_check, safe_discard, Decision, Rule, Strategy, TurnView};

/// Captures when it can; otherwise leaves the choice to the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Beginner;

impl Strategy for Beginner {
    fn decide(&self, view: &TurnView<'_>) -> Option<Decision> {
        capture_check(view)
    }
}

/// Adds the safe-discard hint and short-term memory of the current hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Intermediate;

impl Strategy for Intermediate {
    fn decide(&self, view: &TurnView<'_>) -> Option<Decision> {
        capture_check(view).or_else(|| safe_discard(view)).or_else(|| common_face(view))
    }
}

/// Adds whole-game memory and a cheapest-card discard.
#[derive(Debug, Clone, Copy, Default)]
pub struct Advanced;

impl Strategy for Advanced {
    fn decide(&self, view: &TurnView<'_>) -> Option<Decision> {
        capture_check(view)
            .or_else(|| safe_discard(view))
            .or_else(|| best_match_number(view))
            .or_else(|| lowest_value(view))
    }
}

/// Discard a face that occurs more than once across the hand and the cards
/// played this hand (Jacks excluded). First slot wins ties.
fn common_face(view: &TurnView<'_>) -> Option<Decision> {
    let mut counts = [0usize; 13];
    let held = view.hand.iter().map(|(_, c)| c);
    for card in held.chain(view.hand_memory.as_slice().iter().copied()) {
        if !card.is_jack() {
            counts[card.rank().index()] += 1;
        }
    }
    let mut best: Option<Rank> = None;
    let mut max_count = 1;
    for (_, card) in view.hand.iter() {
        let count = counts[card.rank().index()];
        if count > max_count {
            max_count = count;
            best = Some(card.rank());
        }
    }
    let rank = best?;
    view.hand.find_rank(rank).map(|slot| Decision::new(slot, Rule::CommonFace))
}

/// For each non-Jack held card: occurrences of its face in the game memory
/// plus in the other held slots. Strictly highest positive count wins.
fn best_match_number(view: &TurnView<'_>) -> Option<Decision> {
    let mut best: Option<(usize, usize)> = None;
    for (slot, card) in view.hand.iter().filter(|(_, c)| !c.is_jack()) {
        let in_memory = view.game_memory.count_rank(card.rank());
        let in_hand =
            view.hand.iter().filter(|(i, c)| *i != slot && c.rank() == card.rank()).count();
        let score = in_memory + in_hand;
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((slot, score));
        }
    }
    best.map(|(slot, _)| Decision::new(slot, Rule::MatchNumber))
}

/// The non-Jack with the fewest card points; earliest slot on ties.
fn lowest_value(view: &TurnView<'_>) -> Option<Decision> {
    let mut best: Option<(usize, u32)> = None;
    for (slot, card) in view.hand.iter().filter(|(_, c)| !c.is_jack()) {
        let value = card_points(card);
        if best.map_or(true, |(_, v)| value < v) {
            best = Some((slot, value));
        }
    }
    best.map(|(slot, _)| Decision::new(slot, Rule::LowestValue))
}
