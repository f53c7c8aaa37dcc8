use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::Context;

use crate::{
    assets::cache::{CacheStore, RequestSignature},
    assets::decode::decode_image,
    foundation::config::PosterConfig,
    foundation::error::{PosterError, PosterResult},
};

/// Path segment that marks files uploaded to local storage, even behind a foreign host URL.
pub const UPLOAD_SEGMENT: &str = "/storage/upload/";

const BUILTIN_PLACEHOLDER_SIZE: u32 = 64;
const BUILTIN_PLACEHOLDER_RGBA: [u8; 4] = [229, 229, 229, 255];

/// Where an image reference points after rewriting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageRef {
    /// Normalized path relative to the storage root.
    Local(String),
    /// Absolute network URL.
    Remote(String),
}

/// Resolve a raw element reference.
///
/// Upload references are rewritten to their storage-relative form first, so
/// `http://host:9001/storage/upload/a.jpg` is served from disk.
pub fn resolve_reference(reference: &str) -> PosterResult<ImageRef> {
    let rewritten = rewrite_upload_ref(reference);
    if rewritten.starts_with("http") {
        return Ok(ImageRef::Remote(rewritten.into_owned()));
    }
    Ok(ImageRef::Local(normalize_rel_path(&rewritten)?))
}

fn rewrite_upload_ref(reference: &str) -> Cow<'_, str> {
    match reference.split(UPLOAD_SEGMENT).nth(1) {
        Some(rest) => Cow::Owned(format!("{UPLOAD_SEGMENT}{rest}")),
        None => Cow::Borrowed(reference),
    }
}

/// Normalize a storage reference into a relative path.
///
/// The result uses `/` separators, drops leading `/` and `.` segments, and rejects parent
/// traversals (`..`).
pub fn normalize_rel_path(source: &str) -> PosterResult<String> {
    let s = source.trim().replace('\\', "/");

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PosterError::asset(format!(
                "image path '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(PosterError::asset(format!(
            "image path '{source}' must contain a file name"
        )));
    }

    Ok(out.join("/"))
}

/// Resolves element image references to decoded bitmaps.
///
/// [`ImageSource::fetch`] never fails: anything that cannot be read, downloaded or decoded is
/// replaced by the placeholder image.
pub struct ImageSource {
    storage_root: PathBuf,
    placeholder_ref: String,
    user_agent: String,
    client: reqwest::blocking::Client,
    cache: Arc<dyn CacheStore>,
    placeholder: OnceLock<image::RgbaImage>,
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSource")
            .field("storage_root", &self.storage_root)
            .field("placeholder_ref", &self.placeholder_ref)
            .field("placeholder_loaded", &self.placeholder.get().is_some())
            .finish()
    }
}

impl ImageSource {
    /// Build a source from host config and a host-owned response cache.
    pub fn new(cfg: &PosterConfig, cache: Arc<dyn CacheStore>) -> PosterResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(cfg.http_timeout())
            .build()
            .map_err(|e| PosterError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            storage_root: cfg.storage_root.clone(),
            placeholder_ref: cfg.placeholder.clone(),
            user_agent: cfg.user_agent.clone(),
            client,
            cache,
            placeholder: OnceLock::new(),
        })
    }

    /// Fetch `reference`, substituting the placeholder on any failure.
    pub fn fetch(&self, reference: &str) -> image::RgbaImage {
        match self.try_fetch(reference) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(reference, error = %e, "image unavailable, using placeholder");
                self.placeholder()
            }
        }
    }

    /// Fetch `reference`, reporting failures instead of substituting the placeholder.
    pub fn try_fetch(&self, reference: &str) -> PosterResult<image::RgbaImage> {
        match resolve_reference(reference)? {
            ImageRef::Local(rel) => self.load_local(&rel),
            ImageRef::Remote(url) => self.load_remote(&url),
        }
    }

    /// The placeholder bitmap, loaded once per source.
    pub fn placeholder(&self) -> image::RgbaImage {
        self.placeholder
            .get_or_init(|| {
                let loaded = normalize_rel_path(&self.placeholder_ref)
                    .and_then(|rel| self.load_local(&rel));
                match loaded {
                    Ok(img) => img,
                    Err(e) => {
                        tracing::warn!(
                            placeholder = %self.placeholder_ref,
                            error = %e,
                            "placeholder image unavailable, using built-in fill"
                        );
                        builtin_placeholder()
                    }
                }
            })
            .clone()
    }

    fn load_local(&self, rel: &str) -> PosterResult<image::RgbaImage> {
        let path = self.storage_root.join(rel);
        if !path.is_file() {
            return Err(PosterError::asset(format!(
                "no such image '{}'",
                path.display()
            )));
        }
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read image bytes from '{}'", path.display()))?;
        decode_image(&bytes)
    }

    fn load_remote(&self, url: &str) -> PosterResult<image::RgbaImage> {
        let sig = RequestSignature::get(url, self.user_agent.as_str());
        if let Some(body) = self.cache.get(&sig) {
            match decode_image(&body) {
                Ok(img) => return Ok(img),
                Err(e) => tracing::debug!(url, error = %e, "cached body undecodable, refetching"),
            }
        }

        let resp = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;
        let body = resp
            .bytes()
            .with_context(|| format!("read body of {url}"))?;

        let img = decode_image(&body)?;
        if let Err(e) = self.cache.put(&sig, &body) {
            tracing::warn!(url, error = %e, "failed to cache response");
        }
        Ok(img)
    }
}

fn builtin_placeholder() -> image::RgbaImage {
    image::RgbaImage::from_pixel(
        BUILTIN_PLACEHOLDER_SIZE,
        BUILTIN_PLACEHOLDER_SIZE,
        image::Rgba(BUILTIN_PLACEHOLDER_RGBA),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
