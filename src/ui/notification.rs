use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::theme;

/// Centered blocking notification. Dismissed with Enter or Esc.
pub fn render_notification(frame: &mut Frame, message: &str, area: Rect) {
    let overlay_width = 60u16.min(area.width);
    let overlay_height = 8u16.min(area.height);
    let x = area.x + area.width.saturating_sub(overlay_width) / 2;
    let y = area.y + area.height.saturating_sub(overlay_height) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", message), Style::default().fg(theme::TEXT))),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Enter", Style::default().fg(theme::WARNING)),
            Span::styled(" / ", Style::default().fg(theme::TEXT_MUTED)),
            Span::styled("Esc", Style::default().fg(theme::WARNING)),
            Span::styled(" to dismiss", Style::default().fg(theme::TEXT_MUTED)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ERROR))
        .style(Style::default().bg(theme::BG_SURFACE))
        .title(Span::styled(" Attention ", Style::default().fg(theme::ERROR).bold()));

    frame.render_widget(Clear, overlay_area);
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), overlay_area);
}
