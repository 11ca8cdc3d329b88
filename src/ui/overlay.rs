use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::style::COLOR_ERROR;

/// Draw a blocking error message centered on the screen.
pub fn draw_error_overlay(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let width = 64;
    // Borders, blank line, and dismiss hint around the wrapped message.
    let height = wrapped_height(message, width - 4) + 4;
    let popup = centered_rect(width, height, area);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ERROR))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let body = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };
    frame.render_widget(
        Paragraph::new(message.to_string()).wrap(Wrap { trim: true }),
        body,
    );

    let dismiss = Line::from(Span::styled(
        "Press any key to exit",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ));
    let dismiss_area = Rect {
        x: inner.x,
        y: inner.y + inner.height.saturating_sub(1),
        width: inner.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(dismiss).alignment(Alignment::Center),
        dismiss_area,
    );
}

/// Rough line count of `text` wrapped at `width` columns.
fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let lines: usize = text
        .lines()
        .map(|line| line.chars().count().max(1).div_ceil(width))
        .sum();
    u16::try_from(lines.max(1)).unwrap_or(u16::MAX)
}

/// Return a centered `Rect` of the given fixed size within `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}
