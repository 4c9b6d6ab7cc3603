//! Remove an installed egg matching a requirement.

use std::path::Path;

use hatchery::config::ConfigFile;
use hatchery::egg::{lenient_cname, split_eggname, Requirement};
use hatchery::history::{History, HistoryAction};
use hatchery::install::{CommandEggTool, EggTool};
use hatchery::installed::LocalEggStore;

use crate::error::CliError;

use super::print_action;

/// Remove the installed egg matching the requirement from the prefix.
///
/// A requirement naming nothing installed, or mismatching the installed
/// version, is reported and nothing is removed; both are normal exits.
pub fn run(
    req: &Requirement,
    prefix: &Path,
    config: &ConfigFile,
    dry_run: bool,
) -> Result<(), CliError> {
    let store = LocalEggStore::new(prefix);
    let installed = store.list()?;

    let mut found = None;
    for filename in &installed {
        if lenient_cname(filename) != req.name {
            continue;
        }
        if let Some(version) = &req.version {
            let matches = match split_eggname(filename) {
                Ok(egg) => {
                    &egg.version == version && req.build.map_or(true, |b| b == egg.build)
                }
                Err(_) => false,
            };
            if !matches {
                println!(
                    "Version mismatch: {} is installed, cannot remove {}.",
                    filename, req
                );
                return Ok(());
            }
        }
        found = Some(filename.clone());
        break;
    }

    let Some(filename) = found else {
        println!("Package '{}' does not seem to be installed.", req.name);
        return Ok(());
    };

    print_action("removing", &filename);
    if dry_run {
        return Ok(());
    }

    let tool = match &config.install.tool {
        Some(program) => CommandEggTool::new(program),
        None => CommandEggTool::default(),
    };
    let mut txn = History::for_prefix(prefix).transaction()?;
    tool.remove(prefix, &filename)?;
    txn.record(HistoryAction::Remove, &filename);
    Ok(())
}
