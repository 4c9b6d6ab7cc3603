//! Configuration file handling.
//!
//! Loads and saves user configuration with sensible defaults.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// Default index-fetch timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// Install-location settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSettings {
    /// Target installation prefix. Default: `~/.hatchery/env`.
    pub prefix: Option<PathBuf>,

    /// Local egg cache directory. Default: `<prefix>/local-repo`.
    pub local_repo: Option<PathBuf>,

    /// Installer executable. Default: `egginst` on `PATH`.
    pub tool: Option<PathBuf>,
}

/// Remote index settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSettings {
    /// Root index URLs, in merge order.
    pub roots: Vec<String>,
}

/// Network settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    /// Proxy specification, when downloads must go through one.
    pub proxy: Option<String>,

    /// Index-fetch timeout in seconds.
    pub timeout_secs: u64,

    /// Basic-auth username.
    pub username: Option<String>,

    /// Basic-auth password.
    pub password: Option<String>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            username: None,
            password: None,
        }
    }
}

/// User configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// Install-location settings.
    pub install: InstallSettings,

    /// Remote index settings.
    pub index: IndexSettings,

    /// Network settings.
    pub network: NetworkSettings,
}

impl ConfigFile {
    /// Load configuration from the default path (~/.hatchery/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("install")) {
            config.install.prefix = section.get("prefix").map(PathBuf::from);
            config.install.local_repo = section.get("local_repo").map(PathBuf::from);
            config.install.tool = section.get("tool").map(PathBuf::from);
        }

        if let Some(section) = ini.section(Some("index")) {
            if let Some(roots) = section.get("roots") {
                config.index.roots = roots
                    .split([',', ' '])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
        }

        if let Some(section) = ini.section(Some("network")) {
            config.network.proxy = section.get("proxy").map(str::to_string);
            config.network.username = section.get("username").map(str::to_string);
            config.network.password = section.get("password").map(str::to_string);
            if let Some(value) = section.get("timeout_secs") {
                config.network.timeout_secs =
                    value.parse().map_err(|_| ConfigError::InvalidValue {
                        section: "network".to_string(),
                        key: "timeout_secs".to_string(),
                        value: value.to_string(),
                        reason: "expected an unsigned integer".to_string(),
                    })?;
            }
        }

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::DirectoryError)?;
        }

        let mut ini = Ini::new();

        {
            let mut section = ini.with_section(Some("install"));
            if let Some(prefix) = &self.install.prefix {
                section.set("prefix", prefix.display().to_string());
            }
            if let Some(local_repo) = &self.install.local_repo {
                section.set("local_repo", local_repo.display().to_string());
            }
            if let Some(tool) = &self.install.tool {
                section.set("tool", tool.display().to_string());
            }
        }

        if !self.index.roots.is_empty() {
            ini.with_section(Some("index"))
                .set("roots", self.index.roots.join(","));
        }

        {
            let mut section = ini.with_section(Some("network"));
            section.set("timeout_secs", self.network.timeout_secs.to_string());
            if let Some(proxy) = &self.network.proxy {
                section.set("proxy", proxy.clone());
            }
            if let Some(username) = &self.network.username {
                section.set("username", username.clone());
            }
            if let Some(password) = &self.network.password {
                section.set("password", password.clone());
            }
        }

        ini.write_to_file(path)
            .map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// The effective install prefix.
    pub fn resolved_prefix(&self) -> PathBuf {
        self.install
            .prefix
            .clone()
            .unwrap_or_else(default_prefix)
    }

    /// The effective local egg cache for a prefix.
    pub fn resolved_local_repo(&self, prefix: &Path) -> PathBuf {
        self.install
            .local_repo
            .clone()
            .unwrap_or_else(|| default_local_repo(prefix))
    }
}

/// Get the path to the config directory (~/.hatchery).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hatchery")
}

/// Get the path to the config file (~/.hatchery/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// The built-in install prefix (~/.hatchery/env).
pub fn default_prefix() -> PathBuf {
    config_directory().join("env")
}

/// The built-in local egg cache for a prefix.
pub fn default_local_repo(prefix: &Path) -> PathBuf {
    prefix.join("local-repo")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert!(config.install.prefix.is_none());
        assert!(config.index.roots.is_empty());
        assert_eq!(config.network.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.network.proxy.is_none());
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("missing.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.install.prefix = Some(PathBuf::from("/opt/hatchery"));
        config.index.roots = vec![
            "https://a.example.com".to_string(),
            "https://b.example.com".to_string(),
        ];
        config.network.proxy = Some("proxy.example.com:3128".to_string());
        config.network.timeout_secs = 60;
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_roots_accept_comma_and_space_separators() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(
            &path,
            "[index]\nroots = https://a.example.com, https://b.example.com\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.index.roots.len(), 2);
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[network]\ntimeout_secs = soon\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_resolved_paths() {
        let config = ConfigFile::default();
        let prefix = config.resolved_prefix();
        assert!(prefix.ends_with(".hatchery/env"));
        assert_eq!(
            config.resolved_local_repo(Path::new("/opt/env")),
            PathBuf::from("/opt/env/local-repo")
        );

        let mut configured = ConfigFile::default();
        configured.install.prefix = Some(PathBuf::from("/opt/other"));
        configured.install.local_repo = Some(PathBuf::from("/var/cache/eggs"));
        assert_eq!(configured.resolved_prefix(), PathBuf::from("/opt/other"));
        assert_eq!(
            configured.resolved_local_repo(Path::new("/opt/other")),
            PathBuf::from("/var/cache/eggs")
        );
    }
}
