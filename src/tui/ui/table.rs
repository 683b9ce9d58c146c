use crate::cards::{Card, Rank, Suit};
use crate::game::{GameState, GameView, Outcome, Side};
use crate::hand::{Hand, HAND_SIZE};
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{card_row, centered_rect, inner};

const CARD_WIDTH: u16 = 7;

/// How a card widget is shown.
#[derive(Clone, Copy)]
enum Face {
    Up(Card),
    Down,
    Empty,
}

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let view = app.view();
    let [header, cpu, table, player, status] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Min(4),
    ])
    .areas(f.area());

    draw_header(f, header, app, &view);
    draw_hand(f, cpu, &view, Side::Computer);
    draw_pile(f, table, &view);
    draw_hand(f, player, &view, Side::Player);
    draw_status(f, status, app, &view);

    if app.help_open() {
        draw_help(f);
    } else if app.confirm_new_open() {
        draw_confirm(f);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &AppState, view: &GameView) {
    let level = view.level.map(|l| l.label()).unwrap_or("none");
    let undo = if view.can_undo { "ready" } else { "--" };
    let lines = vec![
        Line::from(format!(
            "Level: {level}   Deck: {} left   Undo: {undo}",
            view.deck_remaining
        )),
        Line::from(format!(
            "You {} pts ({} cards)   CPU {} pts ({} cards)   {}",
            view.player.points,
            view.player.collected,
            view.cpu.points,
            view.cpu.collected,
            state_label(view.state)
        )),
    ];
    let title = format!("pishti  [{}s]", app.started.elapsed().as_secs());
    let header = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(header, area);
}

fn state_label(state: GameState) -> &'static str {
    match state {
        GameState::NotStarted => "Not started",
        GameState::PlayerTurn => "Your turn",
        GameState::CpuTurn => "CPU thinking...",
        GameState::PileCaptured => "Pile captured",
        GameState::GameOver => "Game over",
    }
}

fn draw_hand(f: &mut Frame, area: Rect, view: &GameView, side: Side) {
    let (hand, score, last, title) = match side {
        Side::Player => (&view.player_hand, view.player, view.last_slots.0, "You"),
        Side::Computer => (&view.cpu_hand, view.cpu, view.last_slots.1, "CPU"),
    };
    let mut block = Block::default()
        .title(format!("{title}  {} pts", score.points))
        .borders(Borders::ALL);
    let active = matches!(
        (side, view.state),
        (Side::Player, GameState::PlayerTurn) | (Side::Computer, GameState::CpuTurn)
    );
    if active {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    f.render_widget(block, area);
    let body = inner(area);

    let (labels, cards) = if side == Side::Player && body.height > 3 {
        let [l, c] = Layout::vertical([Constraint::Length(1), Constraint::Length(3)]).areas(body);
        (Some(l), c)
    } else {
        (None, body)
    };
    let slots = card_row(cards, HAND_SIZE, CARD_WIDTH);
    for (i, slot_area) in slots.iter().enumerate() {
        let face = slot_face(hand, i, side);
        let border = if last == Some(i) && matches!(face, Face::Empty) {
            Some(Color::DarkGray)
        } else if side == Side::Player && active && !matches!(face, Face::Empty) {
            Some(Color::Cyan)
        } else {
            None
        };
        render_card_widget(f, *slot_area, face, border);
    }
    if let Some(label_area) = labels {
        for (i, rect) in card_row(label_area, HAND_SIZE, CARD_WIDTH).iter().enumerate() {
            let label = Paragraph::new(format!("[{}]", i + 1))
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::DIM));
            f.render_widget(label, *rect);
        }
    }
}

fn slot_face(hand: &Hand, slot: usize, side: Side) -> Face {
    match (hand.get(slot), side) {
        (None, _) => Face::Empty,
        (Some(card), Side::Player) => Face::Up(card),
        (Some(_), Side::Computer) => Face::Down,
    }
}

fn draw_pile(f: &mut Frame, area: Rect, view: &GameView) {
    let captured = view.state == GameState::PileCaptured;
    let mut title = format!("Table ({} cards)", view.table_len);
    let mut border = Style::default();
    if let (true, Some(record)) = (captured, &view.last_capture) {
        let who = match record.side {
            Side::Player => "You",
            Side::Computer => "CPU",
        };
        title = format!(
            "{who}: {}! +{} pts, {} cards",
            record.capture.kind.label(),
            record.capture.points,
            record.capture.cards
        );
        border = Style::default().fg(Color::Green);
    }
    f.render_widget(Block::default().title(title).borders(Borders::ALL).border_style(border), area);

    let slots = card_row(inner(area), 2, CARD_WIDTH);
    let second = match view.table_second {
        Some(_) if view.initial_pile && view.table_len == 4 => Face::Down,
        Some(card) => Face::Up(card),
        None => Face::Empty,
    };
    let top = view.table_top.map_or(Face::Empty, Face::Up);
    render_card_widget(f, slots[0], second, None);
    render_card_widget(f, slots[1], top, captured.then_some(Color::Green));
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState, view: &GameView) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
            .areas(inner(area));

    let mut info: Vec<Line> = Vec::new();
    match view.state {
        GameState::NotStarted => info.push(Line::from("No game. Press N to deal.")),
        GameState::GameOver => {
            let verdict = match view.outcome {
                Some(Outcome::PlayerWins) => "You win!",
                Some(Outcome::CpuWins) => "CPU wins.",
                _ => "It's a tie.",
            };
            info.push(Line::from(Span::styled(
                format!("{verdict}  Final: {} - {}", view.player.points, view.cpu.points),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            info.push(Line::from("Press N for a new game."));
        }
        GameState::PlayerTurn => info.push(Line::from("Play a card with 1-4.")),
        _ => {}
    }
    if let Some(msg) = &view.message {
        info.push(Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Cyan))));
    }
    if let Some(err) = app.action_error() {
        info.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }

    let keys = vec![Line::from("1-4 play • U undo"), Line::from("N new • R reset • M menu • ? help")];
    f.render_widget(Paragraph::new(info).wrap(Wrap { trim: true }), left);
    f.render_widget(
        Paragraph::new(keys).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        right,
    );
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Table:", bold)),
        Line::from("- 1-4: play the card in that slot"),
        Line::from("- U: undo your last move (not at Advanced)"),
        Line::from("- N: new game (asks first while playing)"),
        Line::from("- R: reset to no game"),
        Line::from("- M: settings menu"),
        Line::from("- Q: quit"),
        Line::from(""),
        Line::from(Span::styled("Scoring:", bold)),
        Line::from("- Match the top card's face, or play a Jack, to take the pile"),
        Line::from("- Pishti (two-card match): 10, Jack on Jack: 20"),
        Line::from("- Aces and Jacks 1, Two of clubs 2, Ten of diamonds 3"),
        Line::from("- Most cards collected: +3"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_confirm(f: &mut Frame) {
    let area = centered_rect(40, 20, f.area());
    let block = Block::default().title("New game").borders(Borders::ALL);
    let lines = vec![Line::from("Abandon the current game?"), Line::from("[Y] yes   [N] no")];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner(area));
}

fn suit_glyph_and_style(s: Suit) -> (char, Style) {
    match s {
        Suit::Hearts => ('♥', Style::default().fg(Color::Red)),
        Suit::Diamonds => ('♦', Style::default().fg(Color::Red)),
        Suit::Spades => ('♠', Style::default().fg(Color::White)),
        Suit::Clubs => ('♣', Style::default().fg(Color::White)),
    }
}

fn rank_label(r: Rank) -> String {
    match r {
        Rank::Ten => String::from("10"),
        other => other.to_char().to_string(),
    }
}

fn render_card_widget(f: &mut Frame, area: Rect, face: Face, border: Option<Color>) {
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    let body = inner(area);
    f.render_widget(block, area);
    let content = match face {
        Face::Up(c) => {
            let (glyph, style) = suit_glyph_and_style(c.suit());
            Line::from(Span::styled(format!("{}{}", rank_label(c.rank()), glyph), style))
        }
        Face::Down => Line::from(Span::styled("▒▒▒", Style::default().fg(Color::Blue))),
        Face::Empty => Line::from(""),
    };
    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), body);
}
