use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use ac_base::agents::InputField;
use ac_base::form::FormState;

use super::theme;
use crate::app::App;
use crate::state::Focus;

const LABEL_WIDTH: usize = 16;

/// Rows needed by the form block for the current rules.
pub fn form_height(form: &FormState) -> u16 {
    // borders + two selectors + fields + blank + button + result
    let fields = form.rules().visible_fields().len() as u16;
    2 + 2 + fields + 1 + 1 + 1
}

pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;
    let focus = app.ui.focus;
    let value_width = (area.width as usize).saturating_sub(LABEL_WIDTH + 6);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(selector_line("Agent Type", form.category().display_name(), focus == Focus::Category));
    lines.push(selector_line("Agent Name", form.name().display_name(), focus == Focus::Name));

    for field in form.rules().visible_fields() {
        let focused = focus == Focus::Field(field);
        lines.push(field_line(field, form.value(field), form.rules().required(field), focused, value_width));
    }

    lines.push(Line::from(""));
    lines.push(button_line(app));
    lines.push(result_line(form.last_result()));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::BORDER))
        .style(Style::default().bg(theme::BG_SURFACE))
        .title(Span::styled(" Generate Blog Post ", Style::default().fg(theme::ACCENT).bold()));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn label(text: &str, required: bool, focused: bool) -> Span<'static> {
    let marker = if required { "*" } else { "" };
    let style = if focused { Style::default().fg(theme::ACCENT).bold() } else { Style::default().fg(theme::TEXT_SECONDARY) };
    Span::styled(format!(" {:<width$}", format!("{}{}:", text, marker), width = LABEL_WIDTH), style)
}

fn selector_line(text: &str, value: &str, focused: bool) -> Line<'static> {
    let arrows = if focused { Style::default().fg(theme::ACCENT) } else { Style::default().fg(theme::TEXT_MUTED) };
    Line::from(vec![
        label(text, false, focused),
        Span::styled("‹ ", arrows),
        Span::styled(value.to_string(), Style::default().fg(theme::TEXT)),
        Span::styled(" ›", arrows),
    ])
}

fn field_line(field: InputField, value: &str, required: bool, focused: bool, width: usize) -> Line<'static> {
    let shown = tail_fit(value, width.saturating_sub(1));
    let mut spans = vec![label(field.label(), required, focused)];
    let bg = if focused { theme::BG_ELEVATED } else { theme::BG_INPUT };
    spans.push(Span::styled(shown.to_string(), Style::default().fg(theme::TEXT).bg(bg)));
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(theme::ACCENT).bg(bg)));
    }
    Line::from(spans)
}

fn button_line(app: &App) -> Line<'static> {
    let focused = app.ui.focus == Focus::Generate;
    if app.controller.is_submitting() {
        return Line::from(vec![
            Span::raw(" ".repeat(LABEL_WIDTH + 1)),
            Span::styled(
                format!(" {} Generating Post... ", theme::spinner(app.ui.spinner_frame)),
                Style::default().fg(theme::TEXT_MUTED).bg(theme::BG_ELEVATED),
            ),
        ]);
    }
    let style = if focused {
        Style::default().fg(theme::BG_BASE).bg(theme::ACCENT).bold()
    } else {
        Style::default().fg(theme::BG_BASE).bg(theme::ACCENT_DIM)
    };
    Line::from(vec![Span::raw(" ".repeat(LABEL_WIDTH + 1)), Span::styled(" Generate Post ", style)])
}

fn result_line(last_result: Option<&str>) -> Line<'static> {
    match last_result {
        Some(result) => Line::from(vec![
            Span::styled(format!(" {:<width$}", "Last result:", width = LABEL_WIDTH), Style::default().fg(theme::TEXT_SECONDARY)),
            Span::styled(result.to_string(), Style::default().fg(theme::SUCCESS)),
            Span::styled("  F2 voice-over  F3 deploy", Style::default().fg(theme::TEXT_MUTED)),
        ]),
        None => Line::from(Span::styled(" No result yet", Style::default().fg(theme::TEXT_MUTED))),
    }
}

/// Longest suffix of `value` that fits in `width` terminal columns, so the
/// end of the text (where typing happens) stays visible.
pub fn tail_fit(value: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = value.len();
    for (idx, c) in value.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &value[start..]
}
