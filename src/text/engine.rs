use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::fonts::FontFace,
    foundation::color::Color,
    foundation::error::{PosterError, PosterResult},
    text::wrap::TextMeasure,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

struct RegisteredFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Stateful helper for shaping and measuring text with Parley.
///
/// One engine belongs to one render; fonts are registered with its font context on first use.
/// Both the Parley registration and the rasterizer's font data share the face's byte buffer.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fonts: HashMap<String, RegisteredFont>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Construct an engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
        }
    }

    /// Family name `face` was registered under.
    pub fn family_name(&mut self, face: &FontFace) -> PosterResult<String> {
        Ok(self.register(face)?.family.clone())
    }

    /// Glyph source for drawing runs shaped from `face`; clones share one blob.
    pub fn font_data(&mut self, face: &FontFace) -> PosterResult<vello_cpu::peniko::FontData> {
        Ok(self.register(face)?.data.clone())
    }

    fn register(&mut self, face: &FontFace) -> PosterResult<&RegisteredFont> {
        if !self.fonts.contains_key(&face.name) {
            let shared: Arc<dyn AsRef<[u8]> + Send + Sync> = face.bytes.clone();
            let families = self
                .font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::new(shared.clone()), None);
            let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                PosterError::font(format!("no font families registered from '{}'", face.name))
            })?;
            let family = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| {
                    PosterError::font(format!("font '{}' has no family name", face.name))
                })?
                .to_string();
            let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::new(shared), 0);

            self.fonts
                .insert(face.name.clone(), RegisteredFont { family, data });
        }
        self.fonts
            .get(&face.name)
            .ok_or_else(|| PosterError::font(format!("font '{}' is not registered", face.name)))
    }

    /// Lay out `text` without soft wrapping; hard `\n` breaks start new lines.
    pub fn layout_plain(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> PosterResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PosterError::text("text size must be finite and > 0"));
        }
        let family_name = self.family_name(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }

    /// Advance width of `text` on a single line, trailing whitespace included.
    pub fn measure(&mut self, text: &str, face: &FontFace, size_px: f32) -> PosterResult<f32> {
        let layout = self.layout_plain(text, face, size_px, TextBrushRgba8::default())?;
        Ok(layout.full_width())
    }
}

/// [`TextMeasure`] bound to one face and size.
pub struct FontMeasure<'a> {
    engine: &'a mut TextEngine,
    face: &'a FontFace,
    size_px: f32,
}

impl<'a> FontMeasure<'a> {
    /// Measure with `face` at `size_px`.
    pub fn new(engine: &'a mut TextEngine, face: &'a FontFace, size_px: f32) -> Self {
        Self {
            engine,
            face,
            size_px,
        }
    }
}

impl TextMeasure for FontMeasure<'_> {
    fn measure(&mut self, text: &str) -> PosterResult<f32> {
        self.engine.measure(text, self.face, self.size_px)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
