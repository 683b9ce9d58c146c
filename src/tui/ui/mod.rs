mod layout;
mod menu;
mod table;

use crate::tui::app::{AppState, Scene};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 22;

pub fn draw(f: &mut Frame, app: &AppState) {
    let area = f.area();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small ({}x{}), need {MIN_WIDTH}x{MIN_HEIGHT}",
            area.width, area.height
        );
        f.render_widget(Paragraph::new(msg).alignment(Alignment::Center), area);
        return;
    }
    match app.scene {
        Scene::Menu => menu::draw_menu(f, app),
        Scene::Table => table::draw_table(f, app),
    }
}
