//! File-backed top-N leaderboard.
//!
//! A flat JSON list, sorted descending by score, rewritten atomically via
//! a temp file on every accepted submission.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const MAX_ENTRIES: usize = 10;
pub const MAX_NAME_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub name: String,
    pub score: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub when: OffsetDateTime,
}

#[derive(Debug)]
pub struct HighscoreStore {
    path: PathBuf,
    entries: Vec<HighscoreEntry>,
}

impl HighscoreStore {
    /// Loads the list from `path`. A missing file is an empty list; a
    /// corrupt file is logged and replaced on the next save.
    pub fn load(path: PathBuf) -> Self {
        let entries = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    log::warn!(
                        "ignoring corrupt high-score file {}: {}",
                        path.display(),
                        err
                    );
                    Vec::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                log::warn!("cannot read high-score file {}: {}", path.display(), err);
                Vec::new()
            }
        };
        Self { path, entries }
    }

    pub fn entries(&self) -> &[HighscoreEntry] {
        &self.entries
    }

    pub fn top_score(&self) -> u64 {
        self.entries.first().map(|entry| entry.score).unwrap_or(0)
    }

    /// Records a score and persists the capped, sorted list. The name is
    /// trimmed, truncated to [`MAX_NAME_LEN`] characters and defaults to
    /// "Anonymous" when empty.
    pub fn submit(&mut self, name: &str, score: u64) -> io::Result<()> {
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            String::from("Anonymous")
        } else {
            trimmed.chars().take(MAX_NAME_LEN).collect()
        };

        self.entries.push(HighscoreEntry {
            name,
            score,
            when: OffsetDateTime::now_utc(),
        });
        // stable sort keeps insertion order among equal scores
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
        self.save()
    }

    fn save(&self) -> io::Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.entries).map_err(io::Error::other)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)
    }
}
