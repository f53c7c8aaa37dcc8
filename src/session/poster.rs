use std::sync::Arc;

use crate::{
    assets::cache::{CacheStore, DiskCache},
    assets::fonts::FontStore,
    assets::source::ImageSource,
    encode::output::{Encoded, encode_image, thumbnail},
    foundation::config::PosterConfig,
    foundation::error::PosterResult,
    layout::model::LayoutDocument,
    render::compose::{RenderReport, compose},
};

/// Renders layout documents against one storage root, font directory and response cache.
///
/// A `Poster` is `Send + Sync`; concurrent renders share its caches but nothing else.
#[derive(Debug)]
pub struct Poster {
    config: PosterConfig,
    images: ImageSource,
    fonts: FontStore,
}

impl Poster {
    /// Construct a poster renderer with an on-disk response cache at [`PosterConfig::cache_dir`].
    pub fn new(config: PosterConfig) -> PosterResult<Self> {
        config.validate()?;
        let cache = DiskCache::open(config.cache_dir())?;
        Self::with_cache(config, Arc::new(cache))
    }

    /// Construct a poster renderer using a host-provided response cache.
    pub fn with_cache(config: PosterConfig, cache: Arc<dyn CacheStore>) -> PosterResult<Self> {
        config.validate()?;
        let images = ImageSource::new(&config, cache)?;
        let fonts = FontStore::new(&config);
        Ok(Self {
            config,
            images,
            fonts,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &PosterConfig {
        &self.config
    }

    /// Image loader shared by every render.
    pub fn images(&self) -> &ImageSource {
        &self.images
    }

    /// Font loader shared by every render.
    pub fn fonts(&self) -> &FontStore {
        &self.fonts
    }

    /// Render `doc` to a bitmap, discarding the skip report.
    pub fn render(&self, doc: &LayoutDocument) -> PosterResult<image::DynamicImage> {
        self.render_with_report(doc).map(|(img, _)| img)
    }

    /// Render `doc` and report which elements were skipped.
    pub fn render_with_report(
        &self,
        doc: &LayoutDocument,
    ) -> PosterResult<(image::DynamicImage, RenderReport)> {
        compose(doc, &self.images, &self.fonts)
    }

    /// Render and serialize `doc` in its requested format.
    pub fn encode(&self, doc: &LayoutDocument) -> PosterResult<Encoded> {
        let img = self.render(doc)?;
        encode_image(&img, doc.format, doc.quality)
    }

    /// Render `doc` and scale the result by `scale`.
    pub fn thumbnail(&self, doc: &LayoutDocument, scale: f64) -> PosterResult<image::DynamicImage> {
        let img = self.render(doc)?;
        thumbnail(&img, scale)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/poster.rs"]
mod tests;
