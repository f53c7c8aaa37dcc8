/// Convenience result type used across the crate.
pub type PosterResult<T> = Result<T, PosterError>;

/// Top-level error taxonomy used by render and encode APIs.
///
/// These errors are fatal to the call that returns them. Failures confined to a single element
/// are reported as [`RenderError`] instead and never abort a render.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Malformed or incomplete layout document.
    #[error("document error: {0}")]
    Document(String),

    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Image resolution or decoding failure.
    #[error("asset error: {0}")]
    Asset(String),

    /// Font lookup or registration failure.
    #[error("font error: {0}")]
    Font(String),

    /// Text measurement or layout failure.
    #[error("text error: {0}")]
    Text(String),

    /// Output serialization failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::Document`] value.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Build a [`PosterError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PosterError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`PosterError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`PosterError::Text`] value.
    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }

    /// Build a [`PosterError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

/// Failure confined to one element. The compositor logs it and moves on.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The element's image could not be obtained.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The element's font could not be loaded.
    #[error("font unavailable: {0}")]
    Font(String),

    /// Text could not be measured or laid out.
    #[error("text layout failed: {0}")]
    Text(String),

    /// The payload could not be encoded as a QR symbol.
    #[error("qr encoding failed: {0}")]
    Qr(String),

    /// The element box cannot be rasterized (zero or oversized extent).
    #[error("invalid geometry: {0}")]
    Geometry(String),

    /// The element color could not be parsed.
    #[error("invalid color: {0}")]
    Color(String),

    /// Rasterization of an intermediate layer failed.
    #[error("raster failed: {0}")]
    Raster(String),
}

impl From<PosterError> for RenderError {
    fn from(err: PosterError) -> Self {
        match err {
            PosterError::Font(msg) => Self::Font(msg),
            PosterError::Text(msg) => Self::Text(msg),
            PosterError::Asset(msg) => Self::Fetch(msg),
            other => Self::Raster(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
