//! Host-facing rendering facade.

/// [`Poster`](poster::Poster) and its operations.
pub mod poster;
