//! Basic-credential supplier for index and egg requests.

use crate::config::ConfigFile;

/// Username and optional password for HTTP basic authentication.
///
/// Applied to every index and egg request when present; absence means
/// anonymous access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name.
    pub username: String,

    /// Password, when the account has one.
    pub password: Option<String>,
}

impl Credentials {
    /// Create credentials.
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Credentials from the config file, or `None` when unconfigured.
    pub fn from_config(config: &ConfigFile) -> Option<Self> {
        let username = config.network.username.clone()?;
        Some(Self {
            username,
            password: config.network.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_username() {
        let mut config = ConfigFile::default();
        assert!(Credentials::from_config(&config).is_none());

        config.network.username = Some("user".to_string());
        config.network.password = Some("secret".to_string());
        let credentials = Credentials::from_config(&config).unwrap();
        assert_eq!(credentials.username, "user");
        assert_eq!(credentials.password.as_deref(), Some("secret"));
    }
}
