use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;

use crate::{
    assets::source::normalize_rel_path,
    foundation::config::PosterConfig,
    foundation::error::{PosterError, PosterResult},
};

/// Font file contents, shared between renders.
#[derive(Clone)]
pub struct FontFace {
    /// File name the face was loaded under.
    pub name: String,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Resolves font file names under the fonts directory and memoizes loaded faces.
#[derive(Debug)]
pub struct FontStore {
    dir: PathBuf,
    default_font: String,
    loaded: Mutex<HashMap<String, Arc<FontFace>>>,
}

impl FontStore {
    /// Store rooted at the configured fonts directory.
    pub fn new(cfg: &PosterConfig) -> Self {
        Self {
            dir: cfg.fonts_dir.clone(),
            default_font: cfg.default_font.clone(),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Load `name`, or the default font when `name` is blank.
    pub fn load(&self, name: &str) -> PosterResult<Arc<FontFace>> {
        let name = if name.trim().is_empty() {
            self.default_font.as_str()
        } else {
            name.trim()
        };
        if name.contains(['/', '\\']) {
            return Err(PosterError::font(format!(
                "font name '{name}' must be a bare file name"
            )));
        }
        let rel = normalize_rel_path(name).map_err(|e| PosterError::font(e.to_string()))?;

        let mut loaded = self.loaded.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(face) = loaded.get(&rel) {
            return Ok(Arc::clone(face));
        }

        let path = self.dir.join(&rel);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read font '{}'", path.display()))
            .map_err(|e| PosterError::font(format!("{e:#}")))?;
        let face = Arc::new(FontFace {
            name: rel.clone(),
            bytes: Arc::new(bytes),
        });
        loaded.insert(rel, Arc::clone(&face));
        Ok(face)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
