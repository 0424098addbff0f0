use std::path::{Path, PathBuf};

use serde_json::Value;

use models::config::UserAuth;
use models::LoginResponse;

use crate::{ClientError, Result, Session, Transport};

/// On-disk copy of the last successful login response.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached access token, if the file exists and has the login response shape.
    pub fn load(&self) -> Option<String> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        if text.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<LoginResponse>(&text) {
            Ok(login) => Some(login.data.access_token),
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable token cache {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    pub fn store_raw(&self, body: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, body.trim())?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenManager {
    auth: UserAuth,
    cache: TokenCache,
}

impl TokenManager {
    pub fn new(auth: UserAuth, cache: TokenCache) -> Self {
        Self { auth, cache }
    }

    /// Returns a bearer token, logging in when the cache is empty or `invalid`
    /// is set. `Ok(None)` means the credentials were refused.
    pub async fn get_token<T: Transport>(
        &self,
        session: &Session<T>,
        invalid: bool,
    ) -> Result<Option<String>> {
        let (email, password) = match &self.auth {
            UserAuth::Token { token } => {
                if invalid {
                    tracing::warn!("The configured token was rejected; update it in the config");
                }
                return Ok(Some(token.clone()));
            }
            UserAuth::Password { email, password } => (email, password),
        };

        if !invalid {
            if let Some(token) = self.cache.load() {
                return Ok(Some(token));
            }
        }

        tracing::warn!("Generating new Token!");
        tracing::warn!("Logging in to Honeygain!");
        let reply = session.login(email, password).await?;

        let value: Value =
            serde_json::from_str(&reply.body).map_err(|_| ClientError::LoginLockedOut)?;

        if value.get("title").is_some() {
            tracing::error!("Wrong Login Credentials. Please enter the right ones.");
            self.cache.clear()?;
            return Ok(None);
        }

        let login: LoginResponse = serde_json::from_value(value)
            .map_err(|e| ClientError::UnexpectedLogin(format!("status {}: {e}", reply.status)))?;
        self.cache.store_raw(&reply.body)?;
        Ok(Some(login.data.access_token))
    }
}
