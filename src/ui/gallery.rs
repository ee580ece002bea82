use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use ac_mod_gallery::Gallery;

use super::theme;

pub fn render_gallery(frame: &mut Frame, gallery: &mut Gallery, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::BORDER))
        .style(Style::default().bg(theme::BG_BASE))
        .title(Span::styled(" Gallery ", Style::default().fg(theme::ACCENT).bold()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if gallery.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(" No images found", Style::default().fg(theme::TEXT_MUTED))));
        frame.render_widget(msg, inner);
        return;
    }

    // caption, image, dots
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    render_caption(frame, gallery, layout[0]);
    render_image(frame, gallery, layout[1]);
    frame.render_widget(Paragraph::new(dot_line(gallery.len(), gallery.index())).alignment(Alignment::Center), layout[2]);
}

fn render_caption(frame: &mut Frame, gallery: &Gallery, area: Rect) {
    let Some(image) = gallery.current() else {
        return;
    };
    let dims = match image.natural {
        Some((w, h)) => format!("{}x{}", w, h),
        None => "unknown size".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", image.file_name()), Style::default().fg(theme::TEXT).bold()),
        Span::styled(format!("{}/{}  {}", gallery.index() + 1, gallery.len(), dims), Style::default().fg(theme::TEXT_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the image with half-block cells: each cell shows two pixel rows
/// (upper via foreground, lower via background).
fn render_image(frame: &mut Frame, gallery: &mut Gallery, area: Rect) {
    gallery.resize(area.width);
    let Some(pixel_rows) = gallery.container_height() else {
        let msg = Paragraph::new(Line::from(Span::styled(" (no preview)", Style::default().fg(theme::TEXT_MUTED))));
        frame.render_widget(msg, area);
        return;
    };

    // Shrink to fit the panel height, keeping the aspect ratio
    let (mut cols, mut rows) = (area.width as u32, (pixel_rows as u32).div_ceil(2));
    let max_rows = area.height as u32;
    if rows > max_rows && rows > 0 {
        cols = (cols * max_rows / rows).max(1);
        rows = max_rows;
    }

    let Some(thumb) = gallery.thumbnail(cols, rows * 2) else {
        return;
    };

    let lines: Vec<Line> = (0..rows)
        .map(|row| {
            let spans: Vec<Span> = (0..cols)
                .map(|col| {
                    let [tr, tg, tb] = thumb.get_pixel(col, row * 2).0;
                    let [br, bg, bb] = thumb.get_pixel(col, row * 2 + 1).0;
                    Span::styled("▀", Style::default().fg(Color::Rgb(tr, tg, tb)).bg(Color::Rgb(br, bg, bb)))
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let x = area.x + (area.width.saturating_sub(cols as u16)) / 2;
    let target = Rect::new(x, area.y, cols as u16, rows as u16);
    frame.render_widget(Paragraph::new(lines), target);
}

fn dot_line(len: usize, current: usize) -> Line<'static> {
    let spans: Vec<Span> = (0..len)
        .map(|i| {
            if i == current {
                Span::styled("● ", Style::default().fg(theme::ACCENT))
            } else {
                Span::styled("○ ", Style::default().fg(theme::TEXT_MUTED))
            }
        })
        .collect();
    Line::from(spans)
}
