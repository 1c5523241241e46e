use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: Server,
    pub roots: Roots,
    pub auth: Auth,
    #[serde(default)]
    pub remote: Remote,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub bind_addr: String,
    pub port: u16,
    #[serde(default = "default_base_path")]
    pub base_path: String,
}
fn default_base_path() -> String {
    "/webview".to_string()
}

/// Ordered whitelist of directories resources may be served from.
/// First match wins, so order is part of the policy.
#[derive(Debug, Deserialize, Clone)]
pub struct Roots {
    pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Auth {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Remote {
    pub extension_location: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.roots.dirs.is_empty() {
            anyhow::bail!("roots.dirs must not be empty");
        }
        for dir in &self.roots.dirs {
            if !dir.is_dir() {
                anyhow::bail!("root does not exist or is not a directory: {}", dir.display());
            }
        }
        if self.auth.allowed_origins.is_empty() {
            anyhow::bail!("allowed_origins must not be empty");
        }
        if let Some(loc) = &self.remote.extension_location {
            Url::parse(loc)
                .map_err(|e| anyhow::anyhow!("invalid remote.extension_location: {e}"))?;
        }
        Ok(())
    }

    /// Root URIs in whitelist order, each canonicalized so later containment
    /// checks compare against real paths.
    pub fn root_uris(&self) -> anyhow::Result<Vec<Url>> {
        self.roots
            .dirs
            .iter()
            .map(|dir| {
                let canon = dunce::canonicalize(dir)?;
                Url::from_directory_path(&canon)
                    .map_err(|_| anyhow::anyhow!("root is not an absolute path: {}", canon.display()))
            })
            .collect()
    }

    pub fn extension_location(&self) -> Option<Url> {
        self.remote
            .extension_location
            .as_deref()
            .and_then(|loc| Url::parse(loc).ok())
    }
}
