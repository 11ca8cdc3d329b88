use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::LaunchError;

/// The two filename endings that identify a matching pair of databases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingRule {
    pub primary_suffix: String,
    pub secondary_suffix: String,
}

impl Default for PairingRule {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PairingRule {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            primary_suffix: cfg.primary_suffix.clone(),
            secondary_suffix: cfg.secondary_suffix.clone(),
        }
    }

    fn invalid(&self) -> LaunchError {
        LaunchError::InvalidSelection {
            primary: self.primary_suffix.clone(),
            secondary: self.secondary_suffix.clone(),
        }
    }
}

/// A genomes database and the pangenome database that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabasePair {
    primary: PathBuf,
    secondary: PathBuf,
}

impl DatabasePair {
    /// The genomes storage (`-GENOMES.db`).
    pub fn primary(&self) -> &Path {
        &self.primary
    }

    /// The pangenome (`-PAN.db`).
    pub fn secondary(&self) -> &Path {
        &self.secondary
    }

    /// Directory holding both files.
    pub fn dir(&self) -> &Path {
        self.primary
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    pub fn primary_name(&self) -> String {
        file_name(&self.primary)
    }

    pub fn secondary_name(&self) -> String {
        file_name(&self.secondary)
    }
}

/// Validate the chosen file and locate its counterpart next to it.
pub fn resolve(selection: &Path, rule: &PairingRule) -> Result<DatabasePair, LaunchError> {
    let Some(name) = selection.file_name().and_then(|n| n.to_str()) else {
        return Err(rule.invalid());
    };

    let (pair, counterpart, counterpart_suffix) =
        if let Some(stem) = name.strip_suffix(&rule.primary_suffix) {
            let pan = selection.with_file_name(format!("{stem}{}", rule.secondary_suffix));
            let pair = DatabasePair {
                primary: selection.to_path_buf(),
                secondary: pan.clone(),
            };
            (pair, pan, &rule.secondary_suffix)
        } else if let Some(stem) = name.strip_suffix(&rule.secondary_suffix) {
            let genomes = selection.with_file_name(format!("{stem}{}", rule.primary_suffix));
            let pair = DatabasePair {
                primary: genomes.clone(),
                secondary: selection.to_path_buf(),
            };
            (pair, genomes, &rule.primary_suffix)
        } else {
            return Err(rule.invalid());
        };

    if !selection.is_file() {
        return Err(rule.invalid());
    }
    if !counterpart.is_file() {
        return Err(LaunchError::MissingCounterpart {
            suffix: counterpart_suffix.clone(),
            expected: counterpart,
        });
    }

    Ok(pair)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
