use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use walkdir::WalkDir;

use crate::resolve::PairingRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Parent,
    Dir,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub name: String,
    pub path: PathBuf,
    /// File name ends with one of the pairing suffixes.
    pub pairable: bool,
}

/// List `dir` for the picker: parent link, subdirectories, then files.
///
/// Only `.db` files are listed unless `show_all` is set. Hidden entries are skipped.
pub fn list_dir(dir: &Path, show_all: bool, rule: &PairingRule) -> Vec<Entry> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker.into_iter().filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type().is_dir() {
            dirs.push(Entry {
                kind: EntryKind::Dir,
                name,
                path: entry.into_path(),
                pairable: false,
            });
        } else if show_all || is_db(entry.path()) {
            let pairable =
                name.ends_with(&rule.primary_suffix) || name.ends_with(&rule.secondary_suffix);
            files.push(Entry {
                kind: EntryKind::File,
                name,
                path: entry.into_path(),
                pairable,
            });
        }
    }

    let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
    if let Some(parent) = dir.parent() {
        entries.push(Entry {
            kind: EntryKind::Parent,
            name: "..".into(),
            path: parent.to_path_buf(),
            pairable: false,
        });
    }
    entries.extend(dirs);
    entries.extend(files);
    entries
}

fn is_db(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("db" | "DB")
    )
}

/// State of the file picker.
pub struct Picker {
    pub dir: PathBuf,
    pub entries: Vec<Entry>,
    pub index: usize,
    pub show_all: bool,
    pub rule: PairingRule,
    /// Set once the user chose a file or gave up.
    pub done: bool,
    pub selection: Option<PathBuf>,
}

impl Picker {
    pub fn new(dir: PathBuf, rule: PairingRule) -> Self {
        let dir = dir.canonicalize().unwrap_or(dir);
        let mut picker = Self {
            dir,
            entries: Vec::new(),
            index: 0,
            show_all: false,
            rule,
            done: false,
            selection: None,
        };
        picker.refresh();
        picker
    }

    pub fn refresh(&mut self) {
        self.entries = list_dir(&self.dir, self.show_all, &self.rule);
        // Start on the first pairable file when there is one.
        self.index = self
            .entries
            .iter()
            .position(|e| e.pairable)
            .unwrap_or(0);
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.entries.get(self.index)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Esc, _)
            | (KeyCode::Char('q'), _) => {
                self.selection = None;
                self.done = true;
            }
            (KeyCode::Down | KeyCode::Char('j'), _) => {
                if self.index + 1 < self.entries.len() {
                    self.index += 1;
                }
            }
            (KeyCode::Up | KeyCode::Char('k'), _) => {
                self.index = self.index.saturating_sub(1);
            }
            (KeyCode::Home | KeyCode::Char('g'), _) => self.index = 0,
            (KeyCode::End | KeyCode::Char('G'), _) => {
                self.index = self.entries.len().saturating_sub(1);
            }
            (KeyCode::Enter | KeyCode::Right | KeyCode::Char('l'), _) => self.activate(),
            (KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h'), _) => self.go_up(),
            (KeyCode::Char('a'), _) => {
                self.show_all = !self.show_all;
                self.refresh();
            }
            _ => {}
        }
    }

    fn activate(&mut self) {
        let Some(entry) = self.selected().cloned() else {
            return;
        };
        match entry.kind {
            EntryKind::Parent | EntryKind::Dir => {
                self.dir = entry.path;
                self.refresh();
            }
            EntryKind::File => {
                self.selection = Some(entry.path);
                self.done = true;
            }
        }
    }

    fn go_up(&mut self) {
        if let Some(parent) = self.dir.parent() {
            self.dir = parent.to_path_buf();
            self.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("runs")).unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::write(dir.path().join("contigs.db"), b"").unwrap();
        fs::write(dir.path().join("s-GENOMES.db"), b"").unwrap();
        fs::write(dir.path().join("s-PAN.db"), b"").unwrap();
        dir
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn lists_dirs_then_db_files() {
        let dir = fixture();
        let entries = list_dir(dir.path(), false, &PairingRule::default());
        assert_eq!(
            names(&entries),
            vec!["..", "runs", "contigs.db", "s-GENOMES.db", "s-PAN.db"]
        );
        assert!(!entries[2].pairable);
        assert!(entries[3].pairable);
    }

    #[test]
    fn show_all_includes_other_files() {
        let dir = fixture();
        let entries = list_dir(dir.path(), true, &PairingRule::default());
        assert!(names(&entries).contains(&"notes.txt"));
        assert!(!names(&entries).contains(&".hidden"));
    }

    #[test]
    fn cursor_starts_on_first_pairable_file() {
        let dir = fixture();
        let picker = Picker::new(dir.path().to_path_buf(), PairingRule::default());
        assert_eq!(picker.selected().unwrap().name, "s-GENOMES.db");
    }

    #[test]
    fn enter_on_file_selects_it() {
        let dir = fixture();
        let mut picker = Picker::new(dir.path().to_path_buf(), PairingRule::default());
        picker.handle_key(key(KeyCode::Down));
        picker.handle_key(key(KeyCode::Enter));
        assert!(picker.done);
        assert_eq!(
            picker.selection.as_deref().and_then(|p| p.file_name()),
            Some(std::ffi::OsStr::new("s-PAN.db"))
        );
    }

    #[test]
    fn enter_on_dir_descends_and_back_returns() {
        let dir = fixture();
        let root = dir.path().canonicalize().unwrap();
        let mut picker = Picker::new(root.clone(), PairingRule::default());
        picker.handle_key(key(KeyCode::Home));
        picker.handle_key(key(KeyCode::Down));
        assert_eq!(picker.selected().unwrap().name, "runs");
        picker.handle_key(key(KeyCode::Enter));
        assert_eq!(picker.dir, root.join("runs"));
        assert!(!picker.done);
        picker.handle_key(key(KeyCode::Backspace));
        assert_eq!(picker.dir, root);
    }

    #[test]
    fn escape_cancels_without_selection() {
        let dir = fixture();
        let mut picker = Picker::new(dir.path().to_path_buf(), PairingRule::default());
        picker.handle_key(key(KeyCode::Esc));
        assert!(picker.done);
        assert!(picker.selection.is_none());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let dir = fixture();
        let mut picker = Picker::new(dir.path().to_path_buf(), PairingRule::default());
        for _ in 0..20 {
            picker.handle_key(key(KeyCode::Down));
        }
        assert_eq!(picker.index, picker.entries.len() - 1);
        for _ in 0..20 {
            picker.handle_key(key(KeyCode::Up));
        }
        assert_eq!(picker.index, 0);
    }

    #[test]
    fn toggling_all_files_refreshes() {
        let dir = fixture();
        let mut picker = Picker::new(dir.path().to_path_buf(), PairingRule::default());
        let before = picker.entries.len();
        picker.handle_key(key(KeyCode::Char('a')));
        assert!(picker.show_all);
        assert_eq!(picker.entries.len(), before + 1);
    }
}
