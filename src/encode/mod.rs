//! Output serialization and thumbnails.

/// Byte encoders and the thumbnail resizer.
pub mod output;
