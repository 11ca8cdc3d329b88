use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use super::picker::EntryKind;

// ── Colour constants ──────────────────────────────────────────────────
pub const COLOR_DIR: Color = Color::Cyan;
pub const COLOR_PAIRABLE: Color = Color::Green;
pub const COLOR_FILE: Color = Color::White;
pub const COLOR_SELECTED_BG: Color = Color::DarkGray;
pub const COLOR_HINT: Color = Color::DarkGray;
pub const COLOR_ERROR: Color = Color::Red;

// ── Icon constants ────────────────────────────────────────────────────
pub const ICON_DIR: &str = "▸";
pub const ICON_FILE: &str = " ";
pub const ICON_PAIRABLE: &str = "●";

// ── Helpers ───────────────────────────────────────────────────────────

pub fn entry_style(kind: EntryKind, pairable: bool) -> Style {
    match kind {
        EntryKind::Parent | EntryKind::Dir => Style::default()
            .fg(COLOR_DIR)
            .add_modifier(Modifier::BOLD),
        EntryKind::File if pairable => Style::default().fg(COLOR_PAIRABLE),
        EntryKind::File => Style::default().fg(COLOR_FILE),
    }
}

pub fn entry_icon(kind: EntryKind, pairable: bool) -> &'static str {
    match kind {
        EntryKind::Parent | EntryKind::Dir => ICON_DIR,
        EntryKind::File if pairable => ICON_PAIRABLE,
        EntryKind::File => ICON_FILE,
    }
}

pub fn make_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
}
