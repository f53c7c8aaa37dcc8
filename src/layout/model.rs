use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{PosterError, PosterResult};

/// Marker that turns a QR slot into an image slot (mini-program code images).
pub const WXACODE_PREFIX: &str = "wxacode:";

/// A complete poster description: background plus ordered elements.
///
/// Documents are produced by an external template system and consumed once per render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutDocument {
    /// Requested output format.
    #[serde(rename = "type")]
    pub format: OutputFormat,
    /// Compression quality (JPEG only).
    pub quality: u8,
    /// Canvas width in pixels.
    pub w: u32,
    /// Canvas height in pixels.
    pub h: u32,
    /// Background color; blank means white.
    #[serde(default)]
    pub bgc: String,
    /// Background image reference; blank means none.
    #[serde(rename = "bgUrl", default)]
    pub bg_url: Option<String>,
    /// Elements in paint order.
    pub items: Vec<Element>,
}

impl LayoutDocument {
    /// Parse a document from JSON text.
    pub fn from_json_str(s: &str) -> PosterResult<Self> {
        serde_json::from_str(s).map_err(|e| PosterError::document(e.to_string()))
    }

    /// Read and parse a document file.
    pub fn from_path(path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read layout document '{}'", path.display()))?;
        Self::from_json_str(&text)
            .map_err(|e| PosterError::document(format!("{}: {e}", path.display())))
    }

    /// Background image reference, if one is set.
    pub fn background_ref(&self) -> Option<&str> {
        self.bg_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Raster output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Baseline JPEG, no alpha.
    Jpeg,
    /// Lossless PNG with alpha.
    Png,
    /// Lossless WebP with alpha.
    Webp,
}

impl OutputFormat {
    /// Normalize a format name, accepting the `jpg` alias.
    pub fn parse(name: &str) -> PosterResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            other => Err(PosterError::document(format!(
                "unsupported output format '{other}'"
            ))),
        }
    }

    /// Canonical encoder name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    /// MIME type of encoded output.
    pub fn mime_type(self) -> String {
        format!("image/{}", self.name())
    }

    /// Whether the format keeps an alpha channel.
    pub fn has_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    /// File extension conventionally used for the format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

impl<'de> serde::Deserialize<'de> for OutputFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Pixel rectangle with a top-left origin. Placement outside the canvas is allowed and clips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ElementBox {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

/// One positioned visual unit, tagged by `t`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "t", rename_all = "lowercase")]
pub enum Element {
    /// Wrapped text.
    Text(TextElement),
    /// Plain image.
    Image(ImageElement),
    /// Circular avatar with a ring.
    Avatar(AvatarElement),
    /// QR code (or a mini-program code image behind [`WXACODE_PREFIX`]).
    Qrcode(QrElement),
    /// Any tag this renderer does not know; ignored at dispatch.
    #[serde(other)]
    Unknown,
}

impl Element {
    /// Tag name as written in documents.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Avatar(_) => "avatar",
            Self::Qrcode(_) => "qrcode",
            Self::Unknown => "unknown",
        }
    }
}

/// Text element fields.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextElement {
    /// Target box; text wraps at `w` and is clipped to `w×h`.
    #[serde(flatten)]
    pub bounds: ElementBox,
    /// Text content.
    pub v: String,
    /// Font file name; blank selects the configured default font.
    #[serde(rename = "fn", default)]
    pub font: String,
    /// Font size in pixels.
    pub s: f32,
    /// Fill color.
    #[serde(default = "default_ink")]
    pub c: String,
}

/// Image element fields.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageElement {
    /// Target box; the image is stretched to exactly `w×h`.
    #[serde(flatten)]
    pub bounds: ElementBox,
    /// Local path or URL.
    pub v: String,
}

/// Avatar element fields.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AvatarElement {
    /// Target box.
    #[serde(flatten)]
    pub bounds: ElementBox,
    /// Local path or URL.
    pub v: String,
    /// Ring color.
    #[serde(default = "default_ring")]
    pub c: String,
}

/// QR code element fields.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QrElement {
    /// Target box.
    #[serde(flatten)]
    pub bounds: ElementBox,
    /// Payload, or `wxacode:<image ref>`.
    #[serde(default)]
    pub v: String,
    /// Foreground color.
    #[serde(default = "default_ink")]
    pub c: String,
    /// Quiet zone width in modules.
    #[serde(default)]
    pub p: u32,
}

impl QrElement {
    /// Image reference when the payload carries the mini-program marker.
    pub fn wxacode_ref(&self) -> Option<&str> {
        self.v.strip_prefix(WXACODE_PREFIX)
    }
}

fn default_ink() -> String {
    "#010203".to_owned()
}

fn default_ring() -> String {
    "#ffffff".to_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/model.rs"]
mod tests;
