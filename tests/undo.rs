use pishti::agents::Difficulty;
use pishti::cards::parse_cards;
use pishti::deck::Deck;
use pishti::engine::Engine;
use pishti::game::{GameConfig, GameState, HandProgress, Score, UndoPolicy};
use pishti::sound::{RecordingSink, SoundEffect};

const NO_MATCH: &str = "2h 3h 4h 5h 6h 7h 8h 9h Ts Qs Ks 9s";

fn engine_with(config: GameConfig, level: Difficulty, order: &str) -> (Engine, RecordingSink) {
    let sink = RecordingSink::new();
    let engine = Engine::new(config, sink.clone());
    engine.set_level(level);
    assert!(engine.start_with_deck(Deck::stacked(&parse_cards(order).unwrap()).unwrap()));
    (engine, sink)
}

#[test]
fn nothing_to_undo_before_the_first_move() {
    let (engine, _) = engine_with(GameConfig::default(), Difficulty::Beginner, NO_MATCH);
    assert!(!engine.can_undo());
    assert!(!engine.undo());
}

#[test]
fn undo_restores_the_position_before_the_move() {
    let (engine, sink) = engine_with(GameConfig::default(), Difficulty::Intermediate, NO_MATCH);
    let before = engine.view();

    engine.player_plays(2).unwrap();
    assert!(engine.view().can_undo);
    assert_eq!(engine.with_game(|g| g.hand_memory().len()), 1);

    assert!(engine.undo());
    assert_eq!(engine.view(), before);
    assert!(engine.with_game(|g| g.hand_memory().is_empty()));
    assert!(engine.with_game(|g| g.is_initial_pile()));
    assert_eq!(sink.last(), Some(SoundEffect::Undo));
}

#[test]
fn undo_also_takes_back_the_computer_reply() {
    let (engine, _) = engine_with(GameConfig::default(), Difficulty::Beginner, NO_MATCH);
    let before = engine.view();
    engine.player_plays(0).unwrap();
    engine.computer_plays().unwrap();
    assert_eq!(engine.view().table_len, 6);
    assert_eq!(engine.view().cpu_hand.len(), 3);

    assert!(engine.undo());
    assert_eq!(engine.view(), before);
}

#[test]
fn undo_reverses_a_capture() {
    let (engine, _) =
        engine_with(GameConfig::default(), Difficulty::Beginner, "2h 3h 4h 5h 5s 7h 8h 9h Ts Qs Ks 9s");
    engine.player_plays(0).unwrap();
    let captured = engine.view();
    assert_eq!(captured.state, GameState::PileCaptured);
    assert!(captured.message.is_some());
    assert!(captured.can_undo);

    assert!(engine.undo());
    let view = engine.view();
    assert_eq!(view.state, GameState::PlayerTurn);
    assert_eq!(view.player, Score::default());
    assert_eq!(view.table_len, 4);
    assert!(view.message.is_none());
    assert!(view.last_capture.is_none());
    assert!(engine.with_game(|g| g.hidden_cards().is_some()));
    assert_eq!(engine.with_game(|g| g.last_scorer()), None);
}

#[test]
fn only_one_level_of_undo() {
    let (engine, _) = engine_with(GameConfig::default(), Difficulty::Beginner, NO_MATCH);
    engine.player_plays(0).unwrap();
    engine.computer_plays().unwrap();
    engine.player_plays(1).unwrap();
    let after_first_reply = 6;
    assert!(engine.undo());
    assert_eq!(engine.view().table_len, after_first_reply);
    assert!(!engine.undo());
    assert_eq!(engine.view().table_len, after_first_reply);
}

#[test]
fn advanced_tier_has_no_undo() {
    let (engine, _) = engine_with(GameConfig::default(), Difficulty::Advanced, NO_MATCH);
    engine.player_plays(0).unwrap();
    assert!(!engine.view().can_undo);
    assert!(!engine.undo());
    assert_eq!(engine.view().state, GameState::CpuTurn);
}

#[test]
fn disabled_policy_turns_undo_off() {
    let config = GameConfig::default().with_undo(UndoPolicy::Disabled);
    let (engine, _) = engine_with(config, Difficulty::Beginner, NO_MATCH);
    engine.player_plays(0).unwrap();
    assert!(!engine.undo());
}

#[test]
fn dealing_a_new_hand_forfeits_undo() {
    let order = "Jh Jd Jc Js Ah Ad Ac As 2h 2d 2c 2s";
    let (engine, _) = engine_with(GameConfig::default(), Difficulty::Beginner, order);
    for slot in 0..4 {
        engine.player_plays(slot).unwrap();
        engine.computer_plays().unwrap();
    }
    assert!(engine.can_undo());
    assert_eq!(engine.check_end_of_hand(), Ok(HandProgress::NewHand));
    assert!(!engine.can_undo());
    assert!(!engine.undo());
}

#[test]
fn reset_forgets_the_snapshot() {
    let (engine, _) = engine_with(GameConfig::default(), Difficulty::Beginner, NO_MATCH);
    engine.player_plays(0).unwrap();
    engine.reset_game();
    assert!(!engine.undo());
    assert_eq!(engine.view().state, GameState::NotStarted);
}
