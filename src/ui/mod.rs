mod console;
mod form;
mod gallery;
mod notification;
mod status;
mod theme;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::state::View;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(theme::BG_BASE)), area);

    // Body + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    match app.ui.view {
        View::Form => render_form_view(frame, app, main_layout[0]),
        View::Gallery => gallery::render_gallery(frame, &mut app.gallery, main_layout[0]),
    }
    status::render_status_bar(frame, app, main_layout[1]);

    if let Some(message) = &app.ui.notification {
        notification::render_notification(frame, message, area);
    }
}

fn render_form_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let form_height = form::form_height(&app.form);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(form_height), Constraint::Min(3)])
        .split(area);

    form::render_form(frame, app, layout[0]);
    console::render_console(frame, &app.console, &mut app.ui, layout[1]);
}
