use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use anyhow::Result;
use log::warn;

use crate::config::project_dirs;

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct History {
    pub queries: Vec<String>,
}

impl History {
    /// Moves `query` to the front, dropping older duplicates and anything past `limit`.
    pub fn record(&mut self, query: &str, limit: usize) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.queries.retain(|q| q != query);
        self.queries.insert(0, query.to_string());
        self.queries.truncate(limit);
    }

    pub fn clear(&mut self) {
        self.queries.clear();
    }
}

pub fn get_history_path() -> Option<PathBuf> {
    project_dirs()
        .map(|dirs| {
            let data_dir = dirs.data_dir();
            let _ = fs::create_dir_all(data_dir);
            data_dir.join("history.json")
        })
}

pub fn load_history() -> History {
    get_history_path().map(|p| load_history_from(&p)).unwrap_or_default()
}

pub fn load_history_from(path: &Path) -> History {
    if let Ok(content) = fs::read_to_string(path) {
        if let Ok(history) = serde_json::from_str(&content) {
            return history;
        }
    }
    History::default()
}

pub fn save_history_to(path: &Path, history: &History) -> Result<()> {
    let content = serde_json::to_string_pretty(history)?;
    fs::write(path, content)?;
    Ok(())
}

/// Persists `history`; storage failures are logged and otherwise ignored.
pub fn save_history(history: &History) {
    let Some(path) = get_history_path() else {
        return;
    };
    if let Err(e) = save_history_to(&path, history) {
        warn!("Could not save search history to {:?}: {}", path, e);
    }
}
