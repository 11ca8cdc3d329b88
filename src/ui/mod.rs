// Terminal front end: database picker and blocking error dialog.

mod draw;
mod overlay;
mod picker;
mod style;
mod terminal;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use crate::resolve::PairingRule;

pub use picker::{Entry, EntryKind, Picker, list_dir};
pub use terminal::install_panic_hook;

const POLL_TIMEOUT: Duration = Duration::from_millis(200);

/// Let the user browse from `start` and pick a database file.
///
/// Returns `None` if the picker was dismissed.
pub fn pick_database(start: &Path, rule: PairingRule) -> Result<Option<PathBuf>> {
    let mut tui = terminal::setup_terminal()?;
    let mut picker = Picker::new(start.to_path_buf(), rule);

    let result = (|| -> Result<()> {
        while !picker.done {
            tui.draw(|frame| draw::draw_picker(frame, &picker))?;
            if event::poll(POLL_TIMEOUT)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                picker.handle_key(key);
            }
        }
        Ok(())
    })();

    terminal::restore_terminal()?;
    result?;
    Ok(picker.selection)
}

/// Show `message` and wait for a key press before returning.
pub fn acknowledge(title: &str, message: &str) -> Result<()> {
    let mut tui = terminal::setup_terminal()?;

    let result = (|| -> Result<()> {
        loop {
            tui.draw(|frame| {
                let area = frame.area();
                overlay::draw_error_overlay(frame, area, title, message);
            })?;
            if event::poll(POLL_TIMEOUT)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                return Ok(());
            }
        }
    })();

    terminal::restore_terminal()?;
    result
}
