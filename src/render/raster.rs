use kurbo::Shape;

use crate::{
    assets::decode::unpremultiply_rgba8_in_place,
    foundation::color::Color,
    foundation::error::RenderError,
};

/// Validate an element box for rasterization and narrow it to `vello_cpu` dimensions.
pub(crate) fn layer_size(w: u32, h: u32) -> Result<(u16, u16), RenderError> {
    if w == 0 || h == 0 {
        return Err(RenderError::Geometry(format!("empty box {w}x{h}")));
    }
    let w16: u16 = w
        .try_into()
        .map_err(|_| RenderError::Geometry(format!("width {w} exceeds {}", u16::MAX)))?;
    let h16: u16 = h
        .try_into()
        .map_err(|_| RenderError::Geometry(format!("height {h} exceeds {}", u16::MAX)))?;
    Ok((w16, h16))
}

/// Render whatever `draw` paints into a fresh transparent `w×h` layer.
pub(crate) fn rasterize(
    w: u16,
    h: u16,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> Result<image::RgbaImage, RenderError> {
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    pixmap_to_rgba(&pixmap)
}

/// Convert a premultiplied `vello_cpu` pixmap to a straight-alpha image.
pub(crate) fn pixmap_to_rgba(pixmap: &vello_cpu::Pixmap) -> Result<image::RgbaImage, RenderError> {
    let mut data = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut data);
    image::RgbaImage::from_raw(u32::from(pixmap.width()), u32::from(pixmap.height()), data)
        .ok_or_else(|| RenderError::Raster("pixmap byte len mismatch".to_owned()))
}

/// Ellipse inscribed in `w×h`, inset by `inset` on every side.
pub(crate) fn ellipse_path(w: f64, h: f64, inset: f64) -> vello_cpu::kurbo::BezPath {
    let rx = (w / 2.0 - inset).max(0.0);
    let ry = (h / 2.0 - inset).max(0.0);
    let e = kurbo::Ellipse::new((w / 2.0, h / 2.0), (rx, ry), 0.0);
    let mut p = vello_cpu::kurbo::BezPath::new();
    for el in e.path_elements(0.1) {
        p.push(el);
    }
    p
}

/// Single-channel mask of a filled ellipse covering the whole `w×h` box.
pub(crate) fn ellipse_mask(w: u16, h: u16) -> Result<image::GrayImage, RenderError> {
    let layer = rasterize(w, h, |ctx| {
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        ctx.fill_path(&ellipse_path(f64::from(w), f64::from(h), 0.0));
    })?;
    Ok(image::GrayImage::from_fn(layer.width(), layer.height(), |x, y| {
        image::Luma([layer.get_pixel(x, y).0[3]])
    }))
}

/// Ellipse outline of `stroke_px` lying entirely inside the `w×h` box.
pub(crate) fn ellipse_ring(
    w: u16,
    h: u16,
    stroke_px: f64,
    color: Color,
) -> Result<image::RgbaImage, RenderError> {
    rasterize(w, h, |ctx| {
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(stroke_px));
        ctx.stroke_path(&ellipse_path(f64::from(w), f64::from(h), stroke_px / 2.0));
    })
}

/// Smooth resize to exactly `w×h`, ignoring aspect ratio.
pub(crate) fn resize_exact<P>(
    img: &image::ImageBuffer<P, Vec<P::Subpixel>>,
    w: u32,
    h: u32,
) -> image::ImageBuffer<P, Vec<P::Subpixel>>
where
    P: image::Pixel + 'static,
    P::Subpixel: 'static,
{
    if img.dimensions() == (w, h) {
        return img.clone();
    }
    image::imageops::resize(img, w, h, image::imageops::FilterType::Lanczos3)
}

/// Alpha-composite `layer` onto `canvas` with its top-left at `(x, y)`; off-canvas parts clip.
pub(crate) fn composite_over(canvas: &mut image::RgbaImage, layer: &image::RgbaImage, x: i64, y: i64) {
    image::imageops::overlay(canvas, layer, x, y);
}

/// Copy `layer` onto `canvas` at `(x, y)` without blending.
pub(crate) fn paste_opaque(canvas: &mut image::RgbaImage, layer: &image::RgbaImage, x: i64, y: i64) {
    image::imageops::replace(canvas, layer, x, y);
}

/// Multiply the alpha channel of `img` by `mask`.
pub(crate) fn apply_alpha_mask(img: &mut image::RgbaImage, mask: &image::GrayImage) {
    for (px, m) in img.pixels_mut().zip(mask.pixels()) {
        px.0[3] = ((u16::from(px.0[3]) * u16::from(m.0[0]) + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
