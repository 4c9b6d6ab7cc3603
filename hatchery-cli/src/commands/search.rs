//! Search the merged catalog.

use hatchery::catalog::Catalog;
use regex::RegexBuilder;

use crate::error::CliError;

/// Print matching project names with their available versions.
///
/// `?` lists every project in the catalog.
pub fn run(catalog: &Catalog, pattern: &str) -> Result<(), CliError> {
    let mut names: Vec<String> = if pattern == "?" {
        catalog.cnames().map(str::to_string).collect()
    } else {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(CliError::Pattern)?;
        catalog.search(&re)
    };
    names.sort();

    println!("{:<24} {}", "Project name", "Versions");
    println!("{}", "-".repeat(48));
    for name in names {
        let versions = catalog.list_versions(&name);
        if !versions.is_empty() {
            println!("{:<24} {}", name, versions.join(", "));
        }
    }
    Ok(())
}
