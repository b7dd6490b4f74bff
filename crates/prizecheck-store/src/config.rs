//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level prizecheck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrizecheckConfig {
    /// Seconds the player gets to study the deck.
    #[serde(default = "default_total_time")]
    pub total_time_secs: u64,
    /// Where the profile (rank and personal best) is stored.
    #[serde(default)]
    pub profile_path: Option<PathBuf>,
    /// Directory of JSON card data used to fill in names and images.
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
    /// Fixed seed for repeatable deals.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_total_time() -> u64 {
    120
}

impl Default for PrizecheckConfig {
    fn default() -> Self {
        Self {
            total_time_secs: default_total_time(),
            profile_path: None,
            catalog_dir: None,
            seed: None,
        }
    }
}

impl PrizecheckConfig {
    /// The configured profile path, or the per-user default.
    pub fn profile_path(&self) -> PathBuf {
        self.profile_path
            .clone()
            .or_else(|| user_config_dir().map(|dir| dir.join("profile.json")))
            .unwrap_or_else(|| PathBuf::from("prizecheck-profile.json"))
    }
}

/// Expand `${VAR}` references. Unset variables expand to nothing; an
/// unterminated `${` is left as written.
fn resolve_env_vars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find("${") {
        let Some(len) = rest[open + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        let name = &rest[open + 2..open + 2 + len];
        out.push_str(&std::env::var(name).unwrap_or_default());
        rest = &rest[open + 3 + len..];
    }
    out.push_str(rest);
    out
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations:
/// `prizecheck.toml` in the current directory, then `config.toml` in the
/// per-user config directory.
///
/// Environment variable overrides: `PRIZECHECK_PROFILE`, `PRIZECHECK_SEED`.
pub fn load_config_from(path: Option<&Path>) -> Result<PrizecheckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("prizecheck.toml");
        if local.exists() {
            Some(local)
        } else {
            user_config_dir()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PrizecheckConfig::default(),
    };

    if let Ok(profile) = std::env::var("PRIZECHECK_PROFILE") {
        config.profile_path = Some(PathBuf::from(profile));
    }

    if let Ok(seed) = std::env::var("PRIZECHECK_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid PRIZECHECK_SEED: '{seed}'"))?;
        config.seed = Some(seed);
    }

    config.profile_path = config.profile_path.as_deref().map(resolve_path);
    config.catalog_dir = config.catalog_dir.as_deref().map(resolve_path);

    Ok(config)
}

/// Parse a TOML string into a config and check its values.
pub fn parse_config_str(content: &str) -> Result<PrizecheckConfig> {
    let config: PrizecheckConfig = toml::from_str(content)?;
    anyhow::ensure!(
        config.total_time_secs > 0,
        "total_time_secs must be at least 1"
    );
    Ok(config)
}

/// `$XDG_CONFIG_HOME/prizecheck`, falling back to `~/.config/prizecheck`.
fn user_config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("prizecheck"))
}
