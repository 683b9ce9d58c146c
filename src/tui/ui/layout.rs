use ratatui::layout::{Constraint, Flex};
use ratatui::prelude::{Layout, Rect};

/// Area inside a one-cell border.
pub(super) fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center).areas(r);
    let [area] =
        Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center).areas(row);
    area
}

/// `n` fixed-width card slots centred in `area`.
pub(super) fn card_row(area: Rect, n: usize, card_width: u16) -> Vec<Rect> {
    Layout::horizontal((0..n).map(|_| Constraint::Length(card_width)))
        .flex(Flex::Center)
        .spacing(1)
        .split(area)
        .to_vec()
}
