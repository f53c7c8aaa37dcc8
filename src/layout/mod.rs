//! Layout documents: canvas settings plus ordered elements.

/// Document, element and output format types.
pub mod model;
