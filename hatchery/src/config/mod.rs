//! Configuration for ~/.hatchery/config.ini.
//!
//! Configuration is loaded once at startup and threaded through
//! constructors; nothing reads it ad hoc.

mod file;

pub use file::{
    config_directory, config_file_path, default_local_repo, default_prefix, ConfigError,
    ConfigFile, IndexSettings, InstallSettings, NetworkSettings,
};
