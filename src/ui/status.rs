use ratatui::{prelude::*, widgets::Paragraph};

use super::theme;
use crate::app::App;
use crate::state::View;

pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let base_style = Style::default().bg(theme::BG_BASE).fg(theme::TEXT_MUTED);
    let spin = theme::spinner(app.ui.spinner_frame);

    let mut spans = vec![Span::styled(" ", base_style)];

    if app.controller.is_submitting() {
        spans.push(Span::styled(
            format!(" {} GENERATING ", spin),
            Style::default().fg(theme::BG_BASE).bg(theme::SUCCESS).bold(),
        ));
        spans.push(Span::styled(" ", base_style));
    }

    let helpers = app.runner.pending();
    if helpers > 0 {
        spans.push(Span::styled(
            format!(" {} HELPERS {} ", spin, helpers),
            Style::default().fg(theme::BG_BASE).bg(theme::WARNING).bold(),
        ));
        spans.push(Span::styled(" ", base_style));
    }

    if !app.controller.is_submitting() && helpers == 0 {
        spans.push(Span::styled(" READY ", Style::default().fg(theme::BG_BASE).bg(theme::TEXT_MUTED).bold()));
        spans.push(Span::styled(" ", base_style));
    }

    spans.push(Span::styled(
        format!(" {} ", app.settings.base_url),
        Style::default().fg(theme::TEXT).bg(theme::BG_ELEVATED),
    ));
    spans.push(Span::styled(" ", base_style));

    let hints = match app.ui.view {
        View::Form => "Enter generate  Tab field  ^X clear  F5/F6 servers  F7/F8 run  ^G gallery  ^Q quit",
        View::Gallery => "←/→ move  1-9 jump  Esc/^G back  ^Q quit",
    };
    spans.push(Span::styled(hints, base_style));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(base_style), area);
}
