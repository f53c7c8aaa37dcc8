use anyhow::Context;

use crate::foundation::error::{PosterError, PosterResult};

/// Largest SVG raster edge accepted when rasterizing at intrinsic size.
const MAX_SVG_DIM: u32 = 16_384;

/// Decode encoded image bytes into straight-alpha RGBA8.
///
/// Raster formats go through `image`; SVG documents are rasterized at their intrinsic size.
pub fn decode_image(bytes: &[u8]) -> PosterResult<image::RgbaImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    (text.starts_with("<?xml") || text.starts_with("<svg") || text.starts_with("<!--"))
        && text.contains("<svg")
}

fn rasterize_svg(bytes: &[u8]) -> PosterResult<image::RgbaImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let to_px = |v: f32| -> PosterResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(PosterError::asset("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    };
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;
    if width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(PosterError::asset(format!(
            "svg raster size too large: {width}x{height}"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PosterError::asset("failed to allocate svg pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    let mut data = pixmap.data().to_vec();
    unpremultiply_rgba8_in_place(&mut data);
    image::RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| PosterError::asset("svg raster buffer size mismatch"))
}

/// Convert premultiplied RGBA8 to straight alpha in place.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
