//! Canvas composition: background, per-element renderers and raster helpers.

/// Background plus ordered element dispatch.
pub mod compose;
/// Text, image, avatar and QR renderers.
pub mod elements;
pub(crate) mod raster;
