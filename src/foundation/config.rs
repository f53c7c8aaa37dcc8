use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::foundation::error::{PosterError, PosterResult};

/// User-Agent sent with every remote image request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.132 Safari/537.36";

/// Font used when a text element leaves `fn` empty.
pub const DEFAULT_FONT: &str = "Alibaba-PuHuiTi-Regular.otf";

/// Storage-relative placeholder substituted for unobtainable images.
pub const PLACEHOLDER_REF: &str = "/img/no-img.jpg";

/// Host-side settings for a [`crate::Poster`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PosterConfig {
    /// Root that storage-relative image references resolve against.
    pub storage_root: PathBuf,
    /// Directory holding font files.
    pub fonts_dir: PathBuf,
    /// Font file name used when an element names none.
    pub default_font: String,
    /// Storage-relative path of the placeholder image.
    pub placeholder: String,
    /// HTTP response cache directory; `<storage_root>/cache` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    /// User-Agent header for remote fetches.
    pub user_agent: String,
    /// Timeout applied to each remote fetch, in milliseconds.
    pub http_timeout_ms: u64,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("."),
            fonts_dir: PathBuf::from("fonts"),
            default_font: DEFAULT_FONT.to_owned(),
            placeholder: PLACEHOLDER_REF.to_owned(),
            cache_dir: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            http_timeout_ms: 10_000,
        }
    }
}

impl PosterConfig {
    /// Load a JSON config file; absent keys keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| PosterError::config(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no render could work with.
    pub fn validate(&self) -> PosterResult<()> {
        if self.http_timeout_ms == 0 {
            return Err(PosterError::config("http_timeout_ms must be > 0"));
        }
        if self.default_font.trim().is_empty() {
            return Err(PosterError::config("default_font must be non-empty"));
        }
        if self.placeholder.trim().is_empty() {
            return Err(PosterError::config("placeholder must be non-empty"));
        }
        Ok(())
    }

    /// Effective cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| self.storage_root.join("cache"))
    }

    /// Remote fetch timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
