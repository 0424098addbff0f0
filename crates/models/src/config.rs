use std::fmt;

use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use strum::Display;

pub const DEFAULT_LOGIN_URL: &str = "https://dashboard.honeygain.com/api/v1/users/tokens";
pub const DEFAULT_POT_URL: &str = "https://dashboard.honeygain.com/api/v1/contest_winnings";
pub const DEFAULT_BALANCE_URL: &str = "https://dashboard.honeygain.com/api/v1/users/balances";
pub const DEFAULT_ACHIEVEMENTS_URL: &str = "https://dashboard.honeygain.com/api/v1/achievements/";
pub const DEFAULT_ACHIEVEMENT_CLAIM_URL: &str =
    "https://dashboard.honeygain.com/api/v1/achievements/claim";

/// Persisted configuration. Serialized as TOML with the sections `User`,
/// `Settings` and `Url`; a document missing any of them does not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "User")]
    pub user: UserAuth,
    #[serde(rename = "Settings")]
    pub settings: Settings,
    #[serde(rename = "Url")]
    pub urls: Urls,
}

impl AppConfig {
    pub fn with_defaults(user: UserAuth) -> Self {
        Self {
            user,
            settings: Settings::default(),
            urls: Urls::default(),
        }
    }

    pub fn from_toml_str(s: &str) -> eyre::Result<Self> {
        let config: Self = toml::from_str(s).wrap_err("parse config toml")?;
        config.urls.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> eyre::Result<String> {
        toml::to_string_pretty(self).wrap_err("serialize config toml")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AuthMode {
    Token,
    Password,
}

/// How the dashboard is authenticated against. The `auth_mode` key selects the
/// variant inside the `User` section.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "auth_mode", rename_all = "snake_case")]
pub enum UserAuth {
    /// Pre-provisioned bearer token; no login call is ever made.
    Token { token: String },
    Password { email: String, password: String },
}

impl UserAuth {
    pub fn mode(&self) -> AuthMode {
        match self {
            Self::Token { .. } => AuthMode::Token,
            Self::Password { .. } => AuthMode::Password,
        }
    }
}

impl fmt::Debug for UserAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { .. } => f
                .debug_struct("Token")
                .field("token", &"<redacted>")
                .finish(),
            Self::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub lucky_pot: bool,
    pub achievements: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lucky_pot: true,
            achievements: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Urls {
    pub login: String,
    pub pot: String,
    pub balance: String,
    pub achievements: String,
    pub achievement_claim: String,
}

impl Urls {
    fn validate(&self) -> eyre::Result<()> {
        for (name, url) in [
            ("login", &self.login),
            ("pot", &self.pot),
            ("balance", &self.balance),
            ("achievements", &self.achievements),
            ("achievement_claim", &self.achievement_claim),
        ] {
            if url.trim().is_empty() {
                return Err(eyre::eyre!("empty url: {name}"));
            }
        }
        Ok(())
    }
}

impl Default for Urls {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN_URL.to_string(),
            pot: DEFAULT_POT_URL.to_string(),
            balance: DEFAULT_BALANCE_URL.to_string(),
            achievements: DEFAULT_ACHIEVEMENTS_URL.to_string(),
            achievement_claim: DEFAULT_ACHIEVEMENT_CLAIM_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_config_survives_toml() {
        let config = AppConfig::with_defaults(UserAuth::Password {
            email: "me@example.com".to_string(),
            password: "hunter2".to_string(),
        });
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[User]"));
        assert!(text.contains("auth_mode = \"password\""));
        assert!(text.contains("[Url]"));
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_url_section_is_rejected() {
        let text = r#"
[User]
auth_mode = "token"
token = "abc"

[Settings]
lucky_pot = true
achievements = false
"#;
        assert!(AppConfig::from_toml_str(text).is_err());
    }

    #[test]
    fn missing_url_field_is_rejected() {
        let text = r#"
[User]
auth_mode = "token"
token = "abc"

[Settings]
lucky_pot = true
achievements = true

[Url]
login = "https://example.com/login"
pot = "https://example.com/pot"
balance = "https://example.com/balance"
achievements = "https://example.com/achievements"
"#;
        assert!(AppConfig::from_toml_str(text).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let user = UserAuth::Password {
            email: "me@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let printed = format!("{user:?}");
        assert!(printed.contains("me@example.com"));
        assert!(!printed.contains("hunter2"));
        assert_eq!(user.mode().to_string(), "password");
    }
}
