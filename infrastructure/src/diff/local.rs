//! Serving review tools from a unified diff on local disk.
//!
//! When the CLI is pointed at a diff file instead of a PR URL, the diff
//! tool reads from disk (same ceiling and marker as the code-host path)
//! and the changed-file listing is derived from the diff headers.

use crate::github::DIFF_CHAR_CEILING;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use warden_domain::cap_chars;

/// Per-file change counts derived from unified-diff headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffFileStat {
    pub filename: String,
    pub status: String,
    pub additions: u64,
    pub deletions: u64,
    pub changes: u64,
}

/// A unified diff file on local disk.
#[derive(Debug, Clone)]
pub struct LocalDiffSource {
    path: PathBuf,
}

impl LocalDiffSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The diff text, capped at the same ceiling as code-host diffs.
    pub async fn diff(&self) -> io::Result<String> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(cap_chars(&text, DIFF_CHAR_CEILING, "diff"))
    }

    /// Changed-file listing with add/delete/change counts, serialized
    /// the same way the code-host listing is.
    pub async fn changed_files(&self) -> io::Result<String> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        let stats = parse_diff_stats(&text);
        Ok(serde_json::to_string_pretty(&stats).unwrap_or_else(|_| "[]".to_string()))
    }
}

/// Walk a unified diff and count added/removed lines per file.
pub fn parse_diff_stats(diff: &str) -> Vec<DiffFileStat> {
    let mut stats: Vec<DiffFileStat> = Vec::new();
    for line in diff.lines() {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            let filename = rest
                .split_whitespace()
                .next_back()
                .map(|name| name.strip_prefix("b/").unwrap_or(name))
                .unwrap_or(rest)
                .to_string();
            stats.push(DiffFileStat {
                filename,
                status: "modified".to_string(),
                additions: 0,
                deletions: 0,
                changes: 0,
            });
        } else if let Some(current) = stats.last_mut() {
            if line.starts_with("new file mode") {
                current.status = "added".to_string();
            } else if line.starts_with("deleted file mode") {
                current.status = "removed".to_string();
            } else if line.starts_with('+') && !line.starts_with("+++") {
                current.additions += 1;
                current.changes += 1;
            } else if line.starts_with('-') && !line.starts_with("---") {
                current.deletions += 1;
                current.changes += 1;
            }
        }
    }
    stats
}
