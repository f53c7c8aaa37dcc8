use crate::{
    assets::fonts::FontStore,
    assets::source::ImageSource,
    foundation::color::Color,
    foundation::error::RenderError,
    layout::model::{AvatarElement, ElementBox, QrElement, TextElement},
    render::raster::{
        apply_alpha_mask, composite_over, ellipse_mask, ellipse_ring, layer_size, paste_opaque,
        rasterize, resize_exact,
    },
    text::engine::{FontMeasure, TextBrushRgba8, TextEngine},
    text::wrap::wrap_text,
};

/// Avatar masks and rings are rasterized at this multiple of the source size.
pub const AVATAR_SUPERSAMPLE: u32 = 3;
/// Ring stroke width before supersampling.
pub const AVATAR_RING_PX: u32 = 4;
/// Side length of one QR module before the final resize.
pub const QR_MODULE_PX: u32 = 10;
/// Smallest QR version tried.
pub const QR_MIN_VERSION: i16 = 2;

/// Wrap, shape and draw a text element clipped to its box.
pub fn draw_text(
    canvas: &mut image::RgbaImage,
    el: &TextElement,
    fonts: &FontStore,
    engine: &mut TextEngine,
) -> Result<(), RenderError> {
    let ElementBox { x, y, w, h } = el.bounds;
    let (w16, h16) = layer_size(w, h)?;
    let color = Color::parse_or(&el.c, Color::INK).map_err(RenderError::Color)?;
    let face = fonts.load(&el.font)?;

    let lines = {
        let mut measure = FontMeasure::new(engine, &face, el.s);
        wrap_text(&el.v, &mut measure, w as f32)?
    };
    if lines.is_empty() {
        return Ok(());
    }
    let text = lines
        .iter()
        .map(|l| l.strip_suffix('\n').unwrap_or(l))
        .collect::<Vec<_>>()
        .join("\n");

    let layout = engine.layout_plain(&text, &face, el.s, TextBrushRgba8::from(color))?;
    let font = engine.font_data(&face)?;

    let layer = rasterize(w16, h16, |ctx| {
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    })?;

    composite_over(canvas, &layer, x, y);
    Ok(())
}

/// Stretch the referenced image to the box and blend it in.
///
/// Fetch failures are absorbed by [`ImageSource::fetch`], which substitutes the placeholder.
pub fn draw_image(
    canvas: &mut image::RgbaImage,
    bounds: ElementBox,
    reference: &str,
    images: &ImageSource,
) -> Result<(), RenderError> {
    layer_size(bounds.w, bounds.h)?;
    let src = images.fetch(reference);
    let layer = resize_exact(&src, bounds.w, bounds.h);
    composite_over(canvas, &layer, bounds.x, bounds.y);
    Ok(())
}

/// Circular crop with an optional ring.
pub fn draw_avatar(
    canvas: &mut image::RgbaImage,
    el: &AvatarElement,
    images: &ImageSource,
) -> Result<(), RenderError> {
    let ElementBox { x, y, w, h } = el.bounds;
    layer_size(w, h)?;
    let ring_color = Color::parse_or(&el.c, Color::WHITE).map_err(RenderError::Color)?;

    let mut src = images.fetch(&el.v);
    let (iw, ih) = src.dimensions();
    let (bw, bh) = supersampled(iw, ih)?;

    let mask = resize_exact(&ellipse_mask(bw, bh)?, iw, ih);
    apply_alpha_mask(&mut src, &mask);
    let mut avatar = resize_exact(&src, w, h);

    if ring_color.a > 0 {
        let stroke = f64::from(AVATAR_RING_PX * AVATAR_SUPERSAMPLE);
        let ring = ellipse_ring(bw, bh, stroke, ring_color)?;
        composite_over(&mut avatar, &resize_exact(&ring, w, h), 0, 0);
    }

    composite_over(canvas, &avatar, x, y);
    Ok(())
}

fn supersampled(iw: u32, ih: u32) -> Result<(u16, u16), RenderError> {
    let scale = |v: u32| {
        v.checked_mul(AVATAR_SUPERSAMPLE)
            .ok_or_else(|| RenderError::Geometry(format!("avatar source {iw}x{ih} too large")))
    };
    layer_size(scale(iw)?, scale(ih)?)
}

/// Encode the payload and paste the symbol opaquely; `wxacode:` payloads go to [`draw_image`].
pub fn draw_qrcode(
    canvas: &mut image::RgbaImage,
    el: &QrElement,
    images: &ImageSource,
) -> Result<(), RenderError> {
    if let Some(reference) = el.wxacode_ref() {
        return draw_image(canvas, el.bounds, reference, images);
    }

    let ElementBox { x, y, w, h } = el.bounds;
    layer_size(w, h)?;
    let fg = Color::parse_or(&el.c, Color::INK).map_err(RenderError::Color)?;

    let symbol = qr_bitmap(&el.v, fg.opaque(), el.p)?;
    paste_opaque(canvas, &resize_exact(&symbol, w, h), x, y);
    Ok(())
}

/// Smallest symbol (version [`QR_MIN_VERSION`] or above, EC level M) holding `payload`.
pub fn encode_qr(payload: &str) -> Result<qrcode::QrCode, RenderError> {
    for v in QR_MIN_VERSION..=40 {
        match qrcode::QrCode::with_version(
            payload.as_bytes(),
            qrcode::Version::Normal(v),
            qrcode::EcLevel::M,
        ) {
            Ok(code) => return Ok(code),
            Err(qrcode::types::QrError::DataTooLong) => continue,
            Err(e) => return Err(RenderError::Qr(e.to_string())),
        }
    }
    Err(RenderError::Qr(format!(
        "payload of {} bytes does not fit version 40",
        payload.len()
    )))
}

/// Unscaled symbol: [`QR_MODULE_PX`] per module, `border` light modules on each side.
pub fn qr_bitmap(payload: &str, fg: Color, border: u32) -> Result<image::RgbaImage, RenderError> {
    let code = encode_qr(payload)?;
    let modules = code.width() as u32;
    let side = modules
        .checked_add(border.saturating_mul(2))
        .and_then(|m| m.checked_mul(QR_MODULE_PX))
        .filter(|&s| s <= u32::from(u16::MAX))
        .ok_or_else(|| RenderError::Geometry(format!("quiet zone {border} too large")))?;

    let mut img = image::RgbaImage::from_pixel(side, side, Color::WHITE.to_pixel());
    let ink = fg.to_pixel();
    for (i, module) in code.to_colors().into_iter().enumerate() {
        if module != qrcode::Color::Dark {
            continue;
        }
        let mx = (i as u32 % modules + border) * QR_MODULE_PX;
        let my = (i as u32 / modules + border) * QR_MODULE_PX;
        for py in my..my + QR_MODULE_PX {
            for px in mx..mx + QR_MODULE_PX {
                img.put_pixel(px, py, ink);
            }
        }
    }
    Ok(img)
}

#[cfg(test)]
#[path = "../../tests/unit/render/elements.rs"]
mod tests;
