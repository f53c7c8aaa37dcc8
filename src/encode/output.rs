use std::io::Cursor;

use anyhow::Context;

use crate::{
    foundation::error::{PosterError, PosterResult},
    layout::model::OutputFormat,
};

/// Scale used by [`thumbnail`] callers that do not pick one.
pub const DEFAULT_THUMBNAIL_SCALE: f64 = 0.5;

/// Encoded poster bytes plus the MIME type to serve them with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoded {
    /// Serialized image.
    pub bytes: Vec<u8>,
    /// `image/<format>`.
    pub mime_type: String,
}

/// Serialize `img` as `format`.
///
/// `quality` only affects JPEG and is clamped to `1..=100`. JPEG is progressive and drops alpha;
/// PNG and WebP are lossless.
pub fn encode_image(
    img: &image::DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> PosterResult<Encoded> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Jpeg => encode_progressive_jpeg(img, quality, &mut bytes)?,
        OutputFormat::Png | OutputFormat::Webp => {
            img.write_to(&mut Cursor::new(&mut bytes), format.image_format())
                .with_context(|| format!("encode {}", format.name()))?;
        }
    }
    Ok(Encoded {
        bytes,
        mime_type: format.mime_type(),
    })
}

fn encode_progressive_jpeg(
    img: &image::DynamicImage,
    quality: u8,
    out: &mut Vec<u8>,
) -> PosterResult<()> {
    let rgb = img.to_rgb8();
    let side = |v: u32| {
        u16::try_from(v)
            .map_err(|_| PosterError::encode(format!("jpeg side {v} exceeds {}", u16::MAX)))
    };
    let (w, h) = (side(rgb.width())?, side(rgb.height())?);

    let mut encoder = jpeg_encoder::Encoder::new(out, quality.clamp(1, 100));
    encoder.set_progressive(true);
    encoder
        .encode(rgb.as_raw(), w, h, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| PosterError::encode(format!("jpeg: {e}")))
}

/// Target size of a thumbnail: each side rounded, never below one pixel.
pub fn thumbnail_size(w: u32, h: u32, scale: f64) -> PosterResult<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(PosterError::document(format!(
            "thumbnail scale must be finite and > 0, got {scale}"
        )));
    }
    let side = |v: u32| ((f64::from(v) * scale).round().max(1.0)).min(f64::from(u32::MAX)) as u32;
    Ok((side(w), side(h)))
}

/// Resize `img` by `scale` with Lanczos3.
pub fn thumbnail(img: &image::DynamicImage, scale: f64) -> PosterResult<image::DynamicImage> {
    let (w, h) = thumbnail_size(img.width(), img.height(), scale)?;
    Ok(img.resize_exact(w, h, image::imageops::FilterType::Lanczos3))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/output.rs"]
mod tests;
