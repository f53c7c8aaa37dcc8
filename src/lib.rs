//! Poster renders declarative layout documents into raster images.
//!
//! A [`LayoutDocument`] describes a canvas (size, background color or image) and an ordered list of
//! elements: wrapped text, stretched images, circular avatars and QR codes. A [`Poster`] owns the
//! host-side resources (storage root, fonts, HTTP response cache) and turns documents into
//! bitmaps, encoded bytes or thumbnails:
//!
//! - Parse with [`LayoutDocument::from_json_str`] or [`LayoutDocument::from_path`]
//! - Build a [`Poster`] from a [`PosterConfig`]
//! - Call [`Poster::render`], [`Poster::encode`] or [`Poster::thumbnail`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod text;

/// Output serialization.
pub mod encode;
/// Layout document model.
pub mod layout;
/// Canvas composition.
pub mod render;
/// Rendering facade.
pub mod session;

pub use crate::assets::cache::{CacheStore, DiskCache, NoCache, RequestSignature};
pub use crate::assets::decode::decode_image;
pub use crate::assets::fonts::{FontFace, FontStore};
pub use crate::assets::source::{ImageRef, ImageSource, resolve_reference};
pub use crate::foundation::color::Color;
pub use crate::foundation::config::PosterConfig;
pub use crate::foundation::error::{PosterError, PosterResult, RenderError};
pub use crate::text::engine::{FontMeasure, TextBrushRgba8, TextEngine};
pub use crate::text::wrap::{TextMeasure, wrap_text};

pub use crate::encode::output::{DEFAULT_THUMBNAIL_SCALE, Encoded};
pub use crate::layout::model::{
    AvatarElement, Element, ElementBox, ImageElement, LayoutDocument, OutputFormat, QrElement,
    TextElement,
};
pub use crate::render::compose::{RenderReport, SkippedElement};
pub use crate::session::poster::Poster;
