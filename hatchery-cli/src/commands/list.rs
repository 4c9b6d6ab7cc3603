//! List installed eggs.

use std::path::Path;

use hatchery::egg::split_eggname;
use hatchery::installed::LocalEggStore;

use crate::error::CliError;

/// Print installed eggs for the primary prefix, and for the target prefix
/// when it differs.
pub fn run(primary_prefix: &Path, prefix: &Path) -> Result<(), CliError> {
    println!("primary prefix: {}", primary_prefix.display());
    print_installed(primary_prefix)?;

    if prefix != primary_prefix {
        println!();
        println!("prefix: {}", prefix.display());
        print_installed(prefix)?;
    }
    Ok(())
}

fn print_installed(prefix: &Path) -> Result<(), CliError> {
    let store = LocalEggStore::new(prefix);
    let installed = store.list()?;

    if installed.is_empty() {
        println!("    (no eggs installed)");
        return Ok(());
    }

    for filename in installed {
        match split_eggname(&filename) {
            Ok(egg) => println!(
                "    {:<24} {}-{}",
                egg.name, egg.version, egg.build
            ),
            Err(_) => println!("    {}", filename),
        }
    }
    Ok(())
}
