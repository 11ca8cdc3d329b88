use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use super::picker::Picker;
use super::style::{COLOR_HINT, COLOR_SELECTED_BG, entry_icon, entry_style, make_block};

pub fn draw_picker(frame: &mut Frame, picker: &Picker) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let title = format!(
        " Select anvi'o output file ({} or {}) - {} ",
        picker.rule.primary_suffix,
        picker.rule.secondary_suffix,
        picker.dir.display()
    );
    let block = make_block(&title);

    if picker.entries.is_empty() {
        let msg = Paragraph::new(Span::styled(
            "No database files here",
            Style::default().fg(COLOR_HINT),
        ))
        .block(block);
        frame.render_widget(msg, rows[0]);
    } else {
        let items: Vec<ListItem> = picker
            .entries
            .iter()
            .map(|entry| {
                let style = entry_style(entry.kind, entry.pairable);
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", entry_icon(entry.kind, entry.pairable)), style),
                    Span::styled(entry.name.clone(), style),
                ]))
            })
            .collect();

        let mut state = ListState::default();
        state.select(Some(picker.index));

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(COLOR_SELECTED_BG)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, rows[0], &mut state);
    }

    let filter = if picker.show_all { "all files" } else { "*.db" };
    let hint = Line::from(Span::styled(
        format!(" ↑/↓ move  Enter open/select  ← up  a toggle filter ({filter})  Esc cancel"),
        Style::default().fg(COLOR_HINT),
    ));
    frame.render_widget(Paragraph::new(hint), rows[1]);
}
