use pishti::agents::Difficulty;
use pishti::cards::parse_cards;
use pishti::deck::Deck;
use pishti::engine::Engine;
use pishti::game::{ActionError, GameState, HandProgress, Outcome, Score, Side};
use pishti::sound::{RecordingSink, SoundEffect};

// Each later hand gives the player four of one face and the computer four of
// another, so nobody can ever match.
const QUIET_HANDS: &str = "Ah Ad Ac As 2h 2d 2c 2s \
                           3h 3d 3c 3s 4h 4d 4c 4s \
                           5h 5d 5c 5s 6h 6d 6c 6s \
                           7h 7d 7c 7s 8h 8d 8c 8s \
                           9h 9d 9c 9s Th Td Tc Ts";

fn engine_with(level: Difficulty, order: &str) -> (Engine, RecordingSink) {
    let sink = RecordingSink::new();
    let engine = Engine::new(Default::default(), sink.clone());
    engine.set_level(level);
    assert!(engine.start_with_deck(Deck::stacked(&parse_cards(order).unwrap()).unwrap()));
    (engine, sink)
}

/// Human always plays its first occupied slot.
fn play_out(engine: &Engine) {
    for _ in 0..500 {
        let view = engine.view();
        match view.state {
            GameState::PlayerTurn => match view.player_hand.first_occupied() {
                Some(slot) => {
                    engine.player_plays(slot).unwrap();
                }
                None => {
                    engine.check_end_of_hand().unwrap();
                }
            },
            GameState::CpuTurn => {
                engine.computer_plays().unwrap();
                engine.check_end_of_hand().unwrap();
            }
            GameState::PileCaptured => {
                engine.finalize_capture().unwrap();
            }
            _ => return,
        }
    }
    panic!("game did not finish");
}

#[test]
fn uncaptured_pile_goes_to_computer_by_default() {
    let order = format!("Jh Jd Jc Js {QUIET_HANDS} Qh Qd Qc Qs Kh Kd Kc Ks");
    let (engine, sink) = engine_with(Difficulty::Beginner, &order);
    play_out(&engine);

    let view = engine.view();
    assert_eq!(view.state, GameState::GameOver);
    assert_eq!(view.player, Score { points: 0, collected: 0 });
    // 13 card points plus the majority bonus
    assert_eq!(view.cpu, Score { points: 16, collected: 52 });
    assert_eq!(view.table_len, 0);
    assert_eq!(view.outcome, Some(Outcome::CpuWins));
    assert_eq!(engine.with_game(|g| g.last_scorer()), None);
    assert_eq!(sink.last(), Some(SoundEffect::CpuWins));
}

#[test]
fn last_scorer_takes_the_leftover_pile() {
    let order = format!("Jh Jd Jc Qs {QUIET_HANDS} Qh Qd Qc Js Kh Kd Kc Ks");
    let (engine, sink) = engine_with(Difficulty::Beginner, &order);
    play_out(&engine);

    let view = engine.view();
    assert_eq!(view.state, GameState::GameOver);
    assert_eq!(view.player, Score { points: 16, collected: 52 });
    assert_eq!(view.cpu, Score::default());
    assert_eq!(view.outcome, Some(Outcome::PlayerWins));
    assert_eq!(engine.with_game(|g| g.last_scorer()), Some(Side::Player));
    assert_eq!(
        view.message.as_deref(),
        Some("You captured the hidden cards: Jack, Jack, and Jack!")
    );
    assert_eq!(sink.last(), Some(SoundEffect::PlayerWins));
}

#[test]
fn every_hand_deals_eight_cards() {
    let order = format!("Jh Jd Jc Js {QUIET_HANDS} Qh Qd Qc Qs Kh Kd Kc Ks");
    let (engine, sink) = engine_with(Difficulty::Intermediate, &order);
    for expected_remaining in [40, 32, 24, 16, 8, 0] {
        assert_eq!(engine.view().deck_remaining, expected_remaining);
        for _ in 0..4 {
            let slot = engine.view().player_hand.first_occupied().unwrap();
            engine.player_plays(slot).unwrap();
            engine.computer_plays().unwrap();
        }
        assert!(engine.is_hand_finished());
        let progress = engine.check_end_of_hand().unwrap();
        if expected_remaining == 0 {
            assert_eq!(progress, HandProgress::GameOver);
        } else {
            assert_eq!(progress, HandProgress::NewHand);
            assert_eq!(engine.view().state, GameState::PlayerTurn);
            // intermediate memory only covers the current hand
            assert!(engine.with_game(|g| g.hand_memory().is_empty()));
        }
    }
    let deals = sink.effects().iter().filter(|e| **e == SoundEffect::Deal).count();
    assert_eq!(deals, 5);
}

#[test]
fn finished_game_rejects_moves_and_allows_a_level_change() {
    let order = format!("Jh Jd Jc Js {QUIET_HANDS} Qh Qd Qc Qs Kh Kd Kc Ks");
    let (engine, _) = engine_with(Difficulty::Intermediate, &order);
    play_out(&engine);

    assert_eq!(engine.check_end_of_hand(), Ok(HandProgress::GameOver));
    assert!(matches!(engine.player_plays(0), Err(ActionError::WrongState { .. })));
    assert!(matches!(engine.computer_plays(), Err(ActionError::WrongState { .. })));
    assert!(!engine.undo());
    assert!(engine.set_level(Difficulty::Advanced));

    assert!(engine.start_game());
    let view = engine.view();
    assert_eq!(view.state, GameState::PlayerTurn);
    assert_eq!(view.level, Some(Difficulty::Advanced));
    assert_eq!(view.player, Score::default());
    assert_eq!(view.cpu, Score::default());
    assert_eq!(view.deck_remaining, 40);
}

#[test]
fn seeded_games_always_account_for_every_card() {
    for seed in 0..20 {
        for level in Difficulty::ALL {
            let engine = Engine::seeded(seed);
            engine.set_level(level);
            assert!(engine.start_game());
            play_out(&engine);
            let view = engine.view();
            assert_eq!(view.state, GameState::GameOver);
            assert_eq!(view.player.collected + view.cpu.collected, 52);
            // pishti bonuses only ever add to the deck's 13 points
            assert!(view.player.points + view.cpu.points >= 13);
        }
    }
}

#[test]
fn capture_with_the_last_card_ends_the_game_on_finalize() {
    // nobody matches until the last hand, where every King meets a Jack
    let order = format!("Qh Qd Qc Qs {QUIET_HANDS} Kh Kd Kc Ks Jh Jd Jc Js");
    let (engine, sink) = engine_with(Difficulty::Beginner, &order);
    for _ in 0..200 {
        let view = engine.view();
        if view.state == GameState::PileCaptured && engine.is_hand_finished() {
            break;
        }
        match view.state {
            GameState::PlayerTurn => {
                let slot = view.player_hand.first_occupied().unwrap();
                engine.player_plays(slot).unwrap();
            }
            GameState::CpuTurn => {
                engine.computer_plays().unwrap();
                engine.check_end_of_hand().unwrap();
            }
            GameState::PileCaptured => {
                assert_eq!(engine.finalize_capture(), Ok(HandProgress::InProgress));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    let before = engine.view();
    assert_eq!(before.state, GameState::PileCaptured);
    assert_eq!(before.deck_remaining, 0);
    assert_eq!(before.last_capture.as_ref().map(|c| c.side), Some(Side::Computer));
    // 10 for the first sweep, then one per Jack on a lone King
    assert_eq!(before.cpu, Score { points: 13, collected: 52 });
    assert_eq!(before.player, Score::default());

    assert_eq!(engine.finalize_capture(), Ok(HandProgress::GameOver));
    let after = engine.view();
    assert_eq!(after.state, GameState::GameOver);
    assert_eq!(after.cpu, Score { points: 13 + 3, collected: 52 });
    assert_eq!(after.player, Score::default());
    assert_eq!(after.table_len, 0);
    assert_eq!(sink.last(), Some(SoundEffect::CpuWins));

    assert_eq!(engine.check_end_of_hand(), Ok(HandProgress::GameOver));
    assert_eq!(engine.finalize_capture().ok(), None);
    let again = engine.view();
    assert_eq!(again.cpu, after.cpu);
    assert_eq!(again.player, after.player);
    let wins = sink.effects().iter().filter(|e| **e == SoundEffect::CpuWins).count();
    assert_eq!(wins, 1);
}
