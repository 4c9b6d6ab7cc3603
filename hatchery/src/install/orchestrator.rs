//! Drives a computed plan through the external primitives.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::history::{History, HistoryAction};

use super::plan::ActionPlan;
use super::traits::{EggFetcher, EggTool};
use super::InstallError;

/// Probe filename for the pre-flight write check.
const WRITE_PROBE: &str = ".hatchery-write-test";

/// Executes action plans: fetch, then remove, then install.
///
/// Phase order is a hard barrier. Fetching has no ordering requirement
/// among distributions, removal runs in the plan's reverse-dependency
/// order, and install runs in forward order so dependencies land before
/// their dependents.
///
/// Under dry-run every action is computed and logged but no side effect
/// happens; the plan itself is the observable output.
pub struct Orchestrator<F: EggFetcher, T: EggTool> {
    fetcher: F,
    tool: T,
    local_repo: PathBuf,
    dry_run: bool,
}

impl<F: EggFetcher, T: EggTool> Orchestrator<F, T> {
    /// Create an orchestrator writing downloads into `local_repo`.
    pub fn new(fetcher: F, tool: T, local_repo: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            tool,
            local_repo: local_repo.into(),
            dry_run: false,
        }
    }

    /// Suppress side effects, logging the would-be actions instead.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The local egg cache directory.
    pub fn local_repo(&self) -> &Path {
        &self.local_repo
    }

    /// Execute a plan against a prefix.
    ///
    /// # Errors
    ///
    /// Aborts on the first failing action; the pre-flight check guarantees
    /// nothing has happened before the first one.
    pub fn execute(&self, plan: &ActionPlan, prefix: &Path) -> Result<(), InstallError> {
        check_writable(prefix)?;

        if !self.local_repo.exists() {
            fs::create_dir_all(&self.local_repo).map_err(|e| InstallError::CacheDirFailed {
                path: self.local_repo.clone(),
                source: e,
            })?;
        }

        let verify = plan.mode.is_forced();
        for dist in &plan.fetch {
            info!("downloading {}", dist.filename());
            if self.dry_run {
                continue;
            }
            self.fetcher.fetch(dist, &self.local_repo, verify)?;
        }

        let mut txn = if self.dry_run {
            None
        } else {
            Some(History::for_prefix(prefix).transaction()?)
        };

        for (filename, reason) in &plan.remove {
            info!("removing {} ({})", filename, reason);
            if let Some(txn) = txn.as_mut() {
                self.tool.remove(prefix, filename)?;
                txn.record(HistoryAction::Remove, filename);
            }
        }

        for dist in &plan.install {
            info!("installing {}", dist.filename());
            if let Some(txn) = txn.as_mut() {
                let local = self.local_repo.join(dist.filename());
                self.tool.install(prefix, &local)?;
                txn.record(HistoryAction::Install, dist.filename());
            }
        }

        Ok(())
    }
}

/// Pre-flight write-permission check for a prefix.
///
/// Mandatory before any fetch, removal, or install. Installing into a
/// read-only location must never be attempted partially.
///
/// # Errors
///
/// Returns [`InstallError::PrefixNotWritable`] when the probe file cannot
/// be written.
pub fn check_writable(prefix: &Path) -> Result<(), InstallError> {
    let failed = |source| InstallError::PrefixNotWritable {
        path: prefix.to_path_buf(),
        source,
    };

    fs::create_dir_all(prefix).map_err(failed)?;
    let probe = prefix.join(WRITE_PROBE);
    fs::write(&probe, b"hatchery\n").map_err(failed)?;
    fs::remove_file(&probe).map_err(failed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::egg::Distribution;
    use crate::install::{ActionPlan, ForceMode};
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every call in order, shared between fetcher and tool.
    #[derive(Default)]
    struct CallLog(Mutex<Vec<String>>);

    impl CallLog {
        fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct MockFetcher<'a> {
        log: &'a CallLog,
        fail_on: Option<String>,
    }

    impl EggFetcher for MockFetcher<'_> {
        fn fetch(
            &self,
            dist: &Distribution,
            dest_dir: &Path,
            verify_checksum: bool,
        ) -> Result<PathBuf, InstallError> {
            if self.fail_on.as_deref() == Some(dist.filename()) {
                return Err(InstallError::FetchFailed {
                    url: dist.url(),
                    reason: "simulated".to_string(),
                });
            }
            self.log
                .push(format!("fetch {} verify={}", dist.filename(), verify_checksum));
            Ok(dest_dir.join(dist.filename()))
        }
    }

    struct MockTool<'a> {
        log: &'a CallLog,
    }

    impl EggTool for MockTool<'_> {
        fn install(&self, _prefix: &Path, egg_path: &Path) -> Result<(), InstallError> {
            self.log.push(format!(
                "install {}",
                egg_path.file_name().unwrap().to_string_lossy()
            ));
            Ok(())
        }

        fn remove(&self, _prefix: &Path, filename: &str) -> Result<(), InstallError> {
            self.log.push(format!("remove {}", filename));
            Ok(())
        }
    }

    fn dist(filename: &str) -> Distribution {
        Distribution::new("http://r/eggs/", filename)
    }

    fn plan(targets: &[Distribution], prefix_installed: &[&str], mode: ForceMode) -> ActionPlan {
        let prefix: BTreeSet<String> = prefix_installed.iter().map(|s| s.to_string()).collect();
        ActionPlan::compute(targets, &BTreeSet::new(), &prefix, mode).unwrap()
    }

    #[test]
    fn test_phase_order_fetch_remove_install() {
        let log = CallLog::default();
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("env");
        let targets = vec![dist("lib-2.0-1.egg"), dist("app-1.0-1.egg")];
        let plan = plan(&targets, &["app-0.9-1.egg", "lib-1.9-1.egg"], ForceMode::None);

        let orchestrator = Orchestrator::new(
            MockFetcher {
                log: &log,
                fail_on: None,
            },
            MockTool { log: &log },
            temp.path().join("local-repo"),
        );
        orchestrator.execute(&plan, &prefix).unwrap();

        assert_eq!(
            log.entries(),
            vec![
                "fetch lib-2.0-1.egg verify=false",
                "fetch app-1.0-1.egg verify=false",
                "remove app-0.9-1.egg",
                "remove lib-1.9-1.egg",
                "install lib-2.0-1.egg",
                "install app-1.0-1.egg",
            ]
        );
    }

    #[test]
    fn test_checksum_verified_under_force() {
        let log = CallLog::default();
        let temp = TempDir::new().unwrap();
        let targets = vec![dist("app-1.0-1.egg")];
        let plan = plan(&targets, &[], ForceMode::ForceAll);

        let orchestrator = Orchestrator::new(
            MockFetcher {
                log: &log,
                fail_on: None,
            },
            MockTool { log: &log },
            temp.path().join("local-repo"),
        );
        orchestrator.execute(&plan, &temp.path().join("env")).unwrap();

        assert_eq!(
            log.entries(),
            vec!["fetch app-1.0-1.egg verify=true", "install app-1.0-1.egg"]
        );
    }

    #[test]
    fn test_dry_run_suppresses_side_effects() {
        let log = CallLog::default();
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("env");
        let targets = vec![dist("app-1.0-1.egg")];
        let plan = plan(&targets, &["app-0.9-1.egg"], ForceMode::None);

        let orchestrator = Orchestrator::new(
            MockFetcher {
                log: &log,
                fail_on: None,
            },
            MockTool { log: &log },
            temp.path().join("local-repo"),
        )
        .dry_run(true);
        orchestrator.execute(&plan, &prefix).unwrap();

        assert!(log.entries().is_empty());
        // no history journal either
        assert!(!prefix.join(".hatchery/history").exists());
    }

    #[test]
    fn test_history_records_actions() {
        let log = CallLog::default();
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("env");
        let targets = vec![dist("app-1.0-1.egg")];
        let plan = plan(&targets, &["app-0.9-1.egg"], ForceMode::None);

        let orchestrator = Orchestrator::new(
            MockFetcher {
                log: &log,
                fail_on: None,
            },
            MockTool { log: &log },
            temp.path().join("local-repo"),
        );
        orchestrator.execute(&plan, &prefix).unwrap();

        let journal = fs::read_to_string(prefix.join(".hatchery/history")).unwrap();
        assert!(journal.contains("remove app-0.9-1.egg"));
        assert!(journal.contains("install app-1.0-1.egg"));
        assert!(journal.lines().last().unwrap().starts_with("<== "));
    }

    #[test]
    fn test_fetch_failure_aborts_before_removal() {
        let log = CallLog::default();
        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("env");
        let targets = vec![dist("app-1.0-1.egg")];
        let plan = plan(&targets, &["app-0.9-1.egg"], ForceMode::None);

        let orchestrator = Orchestrator::new(
            MockFetcher {
                log: &log,
                fail_on: Some("app-1.0-1.egg".to_string()),
            },
            MockTool { log: &log },
            temp.path().join("local-repo"),
        );
        let err = orchestrator.execute(&plan, &prefix).unwrap_err();

        assert!(matches!(err, InstallError::FetchFailed { .. }));
        assert!(log.entries().iter().all(|e| !e.starts_with("remove")));
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_prefix_is_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let prefix = temp.path().join("env");
        fs::create_dir_all(&prefix).unwrap();
        fs::set_permissions(&prefix, fs::Permissions::from_mode(0o555)).unwrap();

        let result = check_writable(&prefix);

        fs::set_permissions(&prefix, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(matches!(
            result,
            Err(InstallError::PrefixNotWritable { .. })
        ));
    }

    #[test]
    fn test_creates_local_repo() {
        let log = CallLog::default();
        let temp = TempDir::new().unwrap();
        let local_repo = temp.path().join("cache").join("eggs");
        let targets = vec![dist("app-1.0-1.egg")];
        let plan = plan(&targets, &[], ForceMode::None);

        let orchestrator = Orchestrator::new(
            MockFetcher {
                log: &log,
                fail_on: None,
            },
            MockTool { log: &log },
            &local_repo,
        );
        orchestrator.execute(&plan, &temp.path().join("env")).unwrap();
        assert!(local_repo.is_dir());
    }
}
