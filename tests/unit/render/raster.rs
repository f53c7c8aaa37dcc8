use super::*;

#[test]
fn layer_size_rejects_empty_and_oversized_boxes() {
    assert_eq!(layer_size(10, 20).unwrap(), (10, 20));
    assert!(matches!(layer_size(0, 5), Err(RenderError::Geometry(_))));
    assert!(matches!(layer_size(5, 0), Err(RenderError::Geometry(_))));
    assert!(matches!(
        layer_size(u32::from(u16::MAX) + 1, 5),
        Err(RenderError::Geometry(_))
    ));
}

#[test]
fn ellipse_mask_is_solid_in_center_and_clear_in_corners() {
    let mask = ellipse_mask(60, 40).unwrap();
    assert_eq!(mask.dimensions(), (60, 40));
    assert_eq!(mask.get_pixel(30, 20).0[0], 255);
    for (x, y) in [(0, 0), (59, 0), (0, 39), (59, 39)] {
        assert_eq!(mask.get_pixel(x, y).0[0], 0, "corner ({x},{y})");
    }
}

#[test]
fn ring_is_hollow_and_colored_on_the_edge() {
    let red = Color::rgb(255, 0, 0);
    let ring = ellipse_ring(90, 90, 12.0, red).unwrap();
    assert_eq!(ring.get_pixel(45, 45).0[3], 0);
    assert_eq!(ring.get_pixel(0, 0).0[3], 0);

    let edge = ring.get_pixel(45, 5).0;
    assert_eq!(edge[3], 255);
    assert!(edge[0] >= 250 && edge[1] <= 5 && edge[2] <= 5, "{edge:?}");
}

#[test]
fn alpha_mask_multiplies_existing_alpha() {
    let mut img = image::RgbaImage::from_pixel(2, 1, image::Rgba([10, 20, 30, 255]));
    img.put_pixel(1, 0, image::Rgba([10, 20, 30, 128]));
    let mut mask = image::GrayImage::from_pixel(2, 1, image::Luma([255]));
    mask.put_pixel(0, 0, image::Luma([0]));

    apply_alpha_mask(&mut img, &mask);
    assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 0]);
    assert_eq!(img.get_pixel(1, 0).0, [10, 20, 30, 128]);
}

#[test]
fn composite_over_clips_negative_offsets() {
    let mut canvas = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
    let layer = image::RgbaImage::from_pixel(3, 3, image::Rgba([0, 0, 0, 255]));
    composite_over(&mut canvas, &layer, -2, -2);
    assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(1, 1).0, [255, 255, 255, 255]);
}

#[test]
fn paste_opaque_replaces_alpha_too() {
    let mut canvas = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255]));
    let layer = image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 0]));
    paste_opaque(&mut canvas, &layer, 1, 1);
    assert_eq!(canvas.get_pixel(1, 1).0, [1, 2, 3, 0]);
    assert_eq!(canvas.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn resize_exact_ignores_aspect_ratio() {
    let img = image::RgbaImage::from_pixel(10, 2, image::Rgba([9, 9, 9, 255]));
    let out = resize_exact(&img, 3, 7);
    assert_eq!(out.dimensions(), (3, 7));
}
