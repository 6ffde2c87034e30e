//! Playlist module: the ordered track sequence and its traversal cursor.
//!
//! The `Playlist` container lives in `playlist::model` and is the only
//! place that knows how tracks are linked together.

mod model;

pub use model::*;
