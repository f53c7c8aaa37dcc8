use crate::{
    assets::fonts::FontStore,
    assets::source::ImageSource,
    foundation::color::Color,
    foundation::error::{PosterError, PosterResult, RenderError},
    layout::model::{Element, LayoutDocument},
    render::elements::{draw_avatar, draw_image, draw_qrcode, draw_text},
    render::raster::resize_exact,
    text::engine::TextEngine,
};

/// One element the compositor had to skip.
#[derive(Debug)]
pub struct SkippedElement {
    /// Position in `items`.
    pub index: usize,
    /// Element tag.
    pub kind: &'static str,
    /// Why it was skipped.
    pub error: RenderError,
}

/// Per-render record of skipped elements. An empty report means every known element was drawn.
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Skipped elements in paint order.
    pub skipped: Vec<SkippedElement>,
}

impl RenderReport {
    /// `true` when nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Build the opaque base canvas for `doc`.
pub fn compose_background(doc: &LayoutDocument, images: &ImageSource) -> PosterResult<image::RgbaImage> {
    if doc.w == 0 || doc.h == 0 {
        return Err(PosterError::document(format!(
            "canvas must be non-empty, got {}x{}",
            doc.w, doc.h
        )));
    }

    if let Some(reference) = doc.background_ref() {
        let bg = images.fetch(reference);
        return Ok(resize_exact(&bg, doc.w, doc.h));
    }

    let color = Color::parse_or(&doc.bgc, Color::WHITE)
        .map_err(|e| PosterError::document(format!("bgc: {e}")))?
        .opaque();
    Ok(image::RgbaImage::from_pixel(doc.w, doc.h, color.to_pixel()))
}

/// Paint `doc` and shape the result for its output format.
///
/// Element failures never abort the render; they land in the returned report.
#[tracing::instrument(skip_all, fields(w = doc.w, h = doc.h, items = doc.items.len()))]
pub fn compose(
    doc: &LayoutDocument,
    images: &ImageSource,
    fonts: &FontStore,
) -> PosterResult<(image::DynamicImage, RenderReport)> {
    let mut canvas = compose_background(doc, images)?;
    let mut engine = TextEngine::new();
    let mut report = RenderReport::default();

    for (index, item) in doc.items.iter().enumerate() {
        let drawn = match item {
            Element::Text(el) => draw_text(&mut canvas, el, fonts, &mut engine),
            Element::Image(el) => draw_image(&mut canvas, el.bounds, &el.v, images),
            Element::Avatar(el) => draw_avatar(&mut canvas, el, images),
            Element::Qrcode(el) => draw_qrcode(&mut canvas, el, images),
            Element::Unknown => {
                tracing::debug!(index, "ignoring element of unknown kind");
                continue;
            }
        };
        if let Err(error) = drawn {
            tracing::warn!(index, kind = item.kind(), %error, "element skipped");
            report.skipped.push(SkippedElement {
                index,
                kind: item.kind(),
                error,
            });
        }
    }

    let out = image::DynamicImage::ImageRgba8(canvas);
    let out = if doc.format.has_alpha() {
        out
    } else {
        image::DynamicImage::ImageRgb8(out.to_rgb8())
    };
    Ok((out, report))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
