use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use ac_base::console::{ConsoleLog, LogLevel};

use super::theme;
use crate::state::UiState;

/// "[HH:MM:SS] "
const STAMP_WIDTH: usize = 11;

pub fn render_console(frame: &mut Frame, log: &ConsoleLog, ui: &mut UiState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::BORDER))
        .style(Style::default().bg(theme::BG_BASE))
        .title(Span::styled(" Console ", Style::default().fg(theme::TEXT_SECONDARY).bold()));
    let inner = block.inner(area);

    // Rows are pre-wrapped, so one line is one screen row
    let lines = console_lines(log, inner.width as usize);
    let total = lines.len().min(u16::MAX as usize) as u16;
    ui.set_console_max_scroll(total.saturating_sub(inner.height));

    // Stick to the bottom unless the user scrolled up
    let offset = ui.console_max_scroll - ui.console_scroll;

    let paragraph = Paragraph::new(lines).block(block).scroll((offset, 0));
    frame.render_widget(paragraph, area);
}

fn console_lines(log: &ConsoleLog, width: usize) -> Vec<Line<'static>> {
    let text_width = width.saturating_sub(STAMP_WIDTH);
    let mut lines = Vec::new();
    for entry in log.entries() {
        let color = match entry.level {
            LogLevel::Info => theme::TEXT,
            LogLevel::Success => theme::SUCCESS,
            LogLevel::Error => theme::ERROR,
        };
        let stamp = format!("[{}] ", entry.timestamp.format("%H:%M:%S"));
        let mut first = true;
        for text in entry.message.lines() {
            for row in wrap_line(text, text_width) {
                let prefix = if first { stamp.clone() } else { " ".repeat(STAMP_WIDTH) };
                first = false;
                lines.push(Line::from(vec![
                    Span::styled(prefix, Style::default().fg(theme::TEXT_MUTED)),
                    Span::styled(row, Style::default().fg(color)),
                ]));
            }
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(" Ready.", Style::default().fg(theme::TEXT_MUTED))));
    }
    lines
}

/// Word-wrap `text` to rows no wider than `width` columns. Words wider than
/// a row are split. An empty input yields one empty row.
fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current_width > 0 && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
            continue;
        }
        if current_width > 0 {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }
        for c in word.chars() {
            let w = c.width().unwrap_or(0);
            if current_width > 0 && current_width + w > width {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += w;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn draw(log: &ConsoleLog, ui: &mut UiState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_console(frame, log, ui, area);
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    fn long_errors(log: &mut ConsoleLog) {
        for label in ["first", "second", "third"] {
            log.error(format!("Error: {} {}", label, "server said no ".repeat(6)));
        }
    }

    #[test]
    fn multiline_entries_are_indented() {
        let mut log = ConsoleLog::new();
        log.success("Post generated successfully!\n\nDetails:\nok");
        let lines = console_lines(&log, 80);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].spans[0].content.starts_with('['));
        assert!(lines[3].spans[0].content.chars().all(|c| c == ' '));
        assert_eq!(lines[3].spans[1].content, "ok");
    }

    #[test]
    fn wrap_keeps_rows_within_width() {
        let rows = wrap_line("alpha beta gamma deltadeltadelta", 10);
        assert_eq!(rows, vec!["alpha beta", "gamma", "deltadelta", "delta"]);
        assert_eq!(wrap_line("", 10), vec![String::new()]);
    }

    #[test]
    fn latest_entry_visible_after_wrapped_messages() {
        let mut log = ConsoleLog::new();
        long_errors(&mut log);
        log.info("LATEST_ENTRY");
        let mut ui = UiState::default();

        let screen = draw(&log, &mut ui, 40, 8);
        assert!(screen.contains("LATEST_ENTRY"), "latest console entry not visible");
        assert!(ui.console_max_scroll > 0);
    }

    #[test]
    fn scrolled_to_top_shows_first_entry() {
        let mut log = ConsoleLog::new();
        long_errors(&mut log);
        log.info("LATEST_ENTRY");
        let mut ui = UiState::default();
        draw(&log, &mut ui, 40, 8);

        ui.scroll_console(i16::MAX);
        let screen = draw(&log, &mut ui, 40, 8);
        assert!(screen.contains("Error: first"));
        assert!(!screen.contains("LATEST_ENTRY"));
    }
}
