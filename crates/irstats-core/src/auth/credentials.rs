use std::fmt;

use crate::api::ConfigError;

const ENV_USERNAME: &str = "IRSTATS_USERNAME";
const ENV_PASSWORD: &str = "IRSTATS_PASSWORD";

/// Membersite login credentials. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(ConfigError::MissingCredentials("username"));
        }
        if password.is_empty() {
            return Err(ConfigError::MissingCredentials("password"));
        }
        Ok(Self { username, password })
    }

    /// Read `IRSTATS_USERNAME` / `IRSTATS_PASSWORD`, loading `.env` first
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(
            lookup(ENV_USERNAME).unwrap_or_default(),
            lookup(ENV_PASSWORD).unwrap_or_default(),
        )
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Form fields for the login POST
    pub(crate) fn login_form(&self) -> [(&'static str, &str); 2] {
        [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("alice", "secret").expect("valid credentials");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_rejects_empty_fields() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(ConfigError::MissingCredentials("username"))
        ));
        assert!(matches!(
            Credentials::new("alice", ""),
            Err(ConfigError::MissingCredentials("password"))
        ));
    }

    #[test]
    fn test_login_form() {
        let creds = Credentials::new("alice", "secret").expect("valid credentials");
        assert_eq!(
            creds.login_form(),
            [("username", "alice"), ("password", "secret")]
        );
    }

    #[test]
    fn test_from_lookup() {
        let creds = Credentials::from_lookup(|key| match key {
            "IRSTATS_USERNAME" => Some("bob".to_string()),
            "IRSTATS_PASSWORD" => Some("hunter2".to_string()),
            _ => None,
        })
        .expect("both vars set");
        assert_eq!(creds.username(), "bob");

        let missing = Credentials::from_lookup(|key| {
            (key == "IRSTATS_USERNAME").then(|| "bob".to_string())
        });
        assert!(matches!(missing, Err(ConfigError::MissingCredentials("password"))));
    }
}
