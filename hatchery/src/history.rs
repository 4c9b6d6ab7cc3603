//! Install/remove history journal.
//!
//! Each prefix carries an append-only journal of what was installed and
//! removed, and when. The orchestrator wraps its remove/install phases in a
//! [`HistoryTransaction`]: the opening marker is written up front and the
//! closing marker on drop, so actions are bracketed in the journal even when
//! a phase errors out partway through.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

use crate::install::InstallError;

/// Journal location under the prefix.
const JOURNAL_PATH: &str = ".hatchery/history";

/// A recorded action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    /// An egg was installed.
    Install,
    /// An egg was removed.
    Remove,
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryAction::Install => write!(f, "install"),
            HistoryAction::Remove => write!(f, "remove"),
        }
    }
}

/// The history journal of one prefix.
pub struct History {
    path: PathBuf,
}

impl History {
    /// History journal for a prefix.
    pub fn for_prefix(prefix: &Path) -> Self {
        Self {
            path: prefix.join(JOURNAL_PATH),
        }
    }

    /// The journal file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a scoped transaction.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::HistoryFailed`] when the journal cannot be
    /// created or opened.
    pub fn transaction(&self) -> Result<HistoryTransaction, InstallError> {
        let failed = |source| InstallError::HistoryFailed {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(failed)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(failed)?;

        writeln!(file, "==> {}", Utc::now().to_rfc3339()).map_err(failed)?;

        Ok(HistoryTransaction {
            file,
            path: self.path.clone(),
        })
    }
}

/// Scope guard recording actions into the journal.
///
/// The closing marker is written when the guard drops, on every exit path.
pub struct HistoryTransaction {
    file: File,
    path: PathBuf,
}

impl HistoryTransaction {
    /// Record one action.
    ///
    /// Journal write failures are logged, not propagated; a full disk must
    /// not abort an otherwise healthy install sequence.
    pub fn record(&mut self, action: HistoryAction, filename: &str) {
        if let Err(e) = writeln!(self.file, "{} {}", action, filename) {
            warn!("failed to record {} {} in {}: {}", action, filename, self.path.display(), e);
        }
    }
}

impl Drop for HistoryTransaction {
    fn drop(&mut self) {
        if let Err(e) = writeln!(self.file, "<== {}", Utc::now().to_rfc3339()) {
            warn!("failed to close history transaction in {}: {}", self.path.display(), e);
        }
        let _ = self.file.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_transaction_brackets_actions() {
        let temp = TempDir::new().unwrap();
        let history = History::for_prefix(temp.path());

        {
            let mut txn = history.transaction().unwrap();
            txn.record(HistoryAction::Remove, "acme-1.0.0-1.egg");
            txn.record(HistoryAction::Install, "acme-1.2.0-1.egg");
        }

        let content = fs::read_to_string(history.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("==> "));
        assert_eq!(lines[1], "remove acme-1.0.0-1.egg");
        assert_eq!(lines[2], "install acme-1.2.0-1.egg");
        assert!(lines[3].starts_with("<== "));
    }

    #[test]
    fn test_closing_marker_written_on_early_exit() {
        let temp = TempDir::new().unwrap();
        let history = History::for_prefix(temp.path());

        let run = || -> Result<(), InstallError> {
            let mut txn = history.transaction()?;
            txn.record(HistoryAction::Remove, "acme-1.0.0-1.egg");
            // a phase failure unwinds through `?` with the guard live
            Err(InstallError::ToolFailed {
                filename: "acme-1.2.0-1.egg".to_string(),
                reason: "simulated".to_string(),
            })
        };
        assert!(run().is_err());

        let content = fs::read_to_string(history.path()).unwrap();
        assert!(content.lines().last().unwrap().starts_with("<== "));
    }

    #[test]
    fn test_transactions_append() {
        let temp = TempDir::new().unwrap();
        let history = History::for_prefix(temp.path());

        drop(history.transaction().unwrap());
        drop(history.transaction().unwrap());

        let content = fs::read_to_string(history.path()).unwrap();
        assert_eq!(content.lines().filter(|l| l.starts_with("==> ")).count(), 2);
        assert_eq!(content.lines().filter(|l| l.starts_with("<== ")).count(), 2);
    }
}
