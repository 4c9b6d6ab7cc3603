//! Hatchery CLI - download and install prebuilt egg packages.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use hatchery::auth::Credentials;
use hatchery::catalog::{Catalog, CatalogLoader, HttpIndexClient};
use hatchery::config::{default_prefix, ConfigFile};
use hatchery::egg::Requirement;
use hatchery::install::{check_writable, ForceMode};
use hatchery::platform::custom_platform;
use hatchery::proxy::{proxy_from_spec, Proxy};

mod commands;
mod error;

use commands::install::InstallOptions;
use error::CliError;

#[derive(Parser)]
#[command(name = "hatchery")]
#[command(about = "Download and install prebuilt egg packages", version)]
struct Args {
    /// Requirement: a package name and optional version, e.g. "acme 1.2.0"
    requirement: Vec<String>,

    /// Force install the main package (not its dependencies, see --forceall)
    #[arg(short, long, conflicts_with = "forceall")]
    force: bool,

    /// Force install of all packages, including dependencies
    #[arg(long)]
    forceall: bool,

    /// Show what would have been downloaded/removed/installed
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Neither download nor install dependencies
    #[arg(short = 'N', long)]
    no_deps: bool,

    /// Install prefix, overriding the config file setting
    #[arg(long, value_name = "PATH", conflicts_with = "sys_prefix")]
    prefix: Option<PathBuf>,

    /// Use the built-in default prefix, regardless of the config file
    #[arg(long)]
    sys_prefix: bool,

    /// Use a proxy for downloads
    #[arg(long, value_name = "URL")]
    proxy: Option<String>,

    /// Remove a package
    #[arg(long)]
    remove: bool,

    /// Search the package index and display available versions ('?' for all)
    #[arg(short, long, value_name = "STR")]
    search: Option<String>,

    /// List the packages currently installed on the system
    #[arg(short, long)]
    list: bool,

    /// Display the configuration and exit
    #[arg(long)]
    config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let _logging = hatchery::logging::init_logging(&hatchery::logging::default_log_dir(), args.verbose)
        .map_err(|e| CliError::Logging(e.to_string()))?;

    if !args.requirement.is_empty() && (args.list || args.config || args.search.is_some()) {
        return Err(CliError::Usage(
            "option takes no requirement arguments".to_string(),
        ));
    }

    let config = ConfigFile::load().map_err(CliError::Config)?;

    if args.config {
        commands::config::show(&config);
        return Ok(());
    }

    let prefix = if args.sys_prefix {
        default_prefix()
    } else if let Some(prefix) = &args.prefix {
        prefix.clone()
    } else {
        config.resolved_prefix()
    };

    if args.list {
        return commands::list::run(&default_prefix(), &prefix);
    }

    // Proxy configuration is checked before any network access.
    let proxy_spec = args.proxy.clone().or_else(|| config.network.proxy.clone());
    let proxy = match proxy_spec {
        Some(spec) => Some(proxy_from_spec(&spec).map_err(CliError::Proxy)?),
        None => None,
    };
    let credentials = Credentials::from_config(&config);

    if let Some(pattern) = &args.search {
        let catalog = load_catalog(&config, credentials, proxy)?;
        return commands::search::run(&catalog, pattern);
    }

    if args.requirement.is_empty() {
        return Err(CliError::Usage(
            "requirement (that is, a name and an optional version) missing".to_string(),
        ));
    }
    let req: Requirement = args
        .requirement
        .join(" ")
        .parse()
        .map_err(|e: hatchery::egg::RequirementParseError| CliError::Usage(e.to_string()))?;

    println!("prefix: {}", prefix.display());
    check_writable(&prefix)?;

    if args.remove {
        return commands::remove::run(&req, &prefix, &config, args.dry_run);
    }

    let catalog = load_catalog(&config, credentials.clone(), proxy)?;
    let opts = InstallOptions {
        mode: if args.forceall {
            ForceMode::ForceAll
        } else if args.force {
            ForceMode::Force
        } else {
            ForceMode::None
        },
        no_deps: args.no_deps,
        dry_run: args.dry_run,
        verbose: args.verbose,
    };
    commands::install::run(&catalog, &config, credentials, &req, &prefix, &opts)
}

fn load_catalog(
    config: &ConfigFile,
    credentials: Option<Credentials>,
    proxy: Option<Proxy>,
) -> Result<Catalog, CliError> {
    if config.index.roots.is_empty() {
        tracing::warn!("no index roots configured; the catalog will be empty");
    }

    let timeout = Duration::from_secs(config.network.timeout_secs);
    let client =
        HttpIndexClient::build(timeout, credentials, proxy).map_err(CliError::Catalog)?;
    let mut loader = CatalogLoader::new(client, custom_platform());
    for root in &config.index.roots {
        loader.load(root).map_err(CliError::Catalog)?;
    }
    Ok(loader.into_catalog())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_force_flags_conflict() {
        let result = Args::try_parse_from(["hatchery", "--force", "--forceall", "acme"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_requirement_words() {
        let args = Args::try_parse_from(["hatchery", "acme", "1.2.0"]).unwrap();
        assert_eq!(args.requirement, vec!["acme", "1.2.0"]);
    }
}
