//! Resolve a requirement and drive the install orchestrator.

use std::collections::HashMap;
use std::path::Path;

use hatchery::auth::Credentials;
use hatchery::catalog::{Catalog, CatalogResolver};
use hatchery::config::{default_prefix, ConfigFile};
use hatchery::egg::Requirement;
use hatchery::install::{
    ActionPlan, CommandEggTool, ForceMode, HttpEggFetcher, Orchestrator, Resolver,
};
use hatchery::installed::LocalEggStore;

use crate::error::CliError;

use super::print_action;

/// Options threaded from the command line.
pub struct InstallOptions {
    pub mode: ForceMode,
    pub no_deps: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

/// Resolve, plan, and execute an install into the prefix.
///
/// An unresolvable requirement prints available-version hints and returns
/// normally; the process exits 0 for that outcome by design.
pub fn run(
    catalog: &Catalog,
    config: &ConfigFile,
    credentials: Option<Credentials>,
    req: &Requirement,
    prefix: &Path,
    opts: &InstallOptions,
) -> Result<(), CliError> {
    let resolver = CatalogResolver::new(catalog);
    let Some(targets) = resolver.resolve(req, !opts.no_deps) else {
        println!("No distribution found for requirement '{}'.", req);
        let versions = catalog.list_versions(&req.name);
        if !versions.is_empty() {
            println!(
                "Versions for package '{}' are: {}",
                req.name,
                versions.join(", ")
            );
        }
        return Ok(());
    };

    if opts.verbose {
        println!("Distributions in install order:");
        for dist in &targets {
            println!("    {}", dist);
        }
    }

    let primary_prefix = default_prefix();
    let primary_store = LocalEggStore::new(&primary_prefix);
    let primary_installed = primary_store.list()?;
    let prefix_installed = if prefix == primary_prefix {
        primary_installed.clone()
    } else {
        LocalEggStore::new(prefix).list()?
    };

    let plan = ActionPlan::compute(&targets, &primary_installed, &prefix_installed, opts.mode)?;

    for dist in &plan.fetch {
        print_action("downloading", dist.filename());
    }
    for (filename, _) in &plan.remove {
        print_action("removing", filename);
    }
    for dist in &plan.install {
        print_action("installing", dist.filename());
    }
    if plan.is_empty() {
        println!("Nothing to do: requirement already satisfied.");
        return Ok(());
    }

    let checksums: HashMap<String, String> = plan
        .fetch
        .iter()
        .filter_map(|dist| {
            let checksum = catalog.spec(dist)?.checksum.clone()?;
            Some((dist.filename().to_string(), checksum))
        })
        .collect();

    let fetcher = HttpEggFetcher::new()
        .with_credentials(credentials)
        .with_checksums(checksums);
    let tool = match &config.install.tool {
        Some(program) => CommandEggTool::new(program),
        None => CommandEggTool::default(),
    };

    let orchestrator = Orchestrator::new(fetcher, tool, config.resolved_local_repo(prefix))
        .dry_run(opts.dry_run);
    orchestrator.execute(&plan, prefix)?;
    Ok(())
}
