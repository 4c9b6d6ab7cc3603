//! Show the resolved configuration.

use hatchery::config::{config_file_path, ConfigFile};

/// Print the config path and the resolved settings.
pub fn show(config: &ConfigFile) {
    let prefix = config.resolved_prefix();

    println!("config file: {}", config_file_path().display());
    println!();
    println!("config file setting:");
    println!("    prefix = {}", prefix.display());
    println!(
        "    local_repo = {}",
        config.resolved_local_repo(&prefix).display()
    );
    println!("    index roots:");
    if config.index.roots.is_empty() {
        println!("        (none configured)");
    }
    for root in &config.index.roots {
        println!("        {}", root);
    }
}
