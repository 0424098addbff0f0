use std::path::Path;

use eyre::WrapErr;
use models::config::AppConfig;

use crate::credentials::CredentialProvider;

/// Loads the config, rewriting it from scratch when it is missing, empty or
/// does not parse (including missing sections or keys).
pub fn load_or_create(
    path: &Path,
    provider: &mut dyn CredentialProvider,
) -> eyre::Result<AppConfig> {
    match read_existing(path) {
        Ok(Some(config)) => return Ok(config),
        Ok(None) => {}
        Err(e) => tracing::warn!("Config at {} is unusable: {:#}", path.display(), e),
    }
    regenerate(path, provider)
}

/// Writes a default config with fresh credentials, replacing whatever is there.
pub fn regenerate(path: &Path, provider: &mut dyn CredentialProvider) -> eyre::Result<AppConfig> {
    tracing::warn!("Generating new Config.");
    let user = provider.credentials().wrap_err("collect credentials")?;
    let config = AppConfig::with_defaults(user);
    save(path, &config)?;
    Ok(config)
}

pub fn save(path: &Path, config: &AppConfig) -> eyre::Result<()> {
    ensure_parent_dir(path)?;
    let text = config.to_toml_string()?;
    std::fs::write(path, text).wrap_err_with(|| format!("write config {}", path.display()))
}

fn read_existing(path: &Path) -> eyre::Result<Option<AppConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).wrap_err("read config")?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    AppConfig::from_toml_str(&text).map(Some)
}

pub(crate) fn ensure_parent_dir(path: &Path) -> eyre::Result<()> {
    let Some(parent) = path.parent() else {
        return Err(eyre::eyre!("invalid path: {path:?}"));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if !parent.exists() {
        tracing::warn!("Creating folder {}", parent.display());
    }
    std::fs::create_dir_all(parent).wrap_err("create parent dir")?;
    Ok(())
}
