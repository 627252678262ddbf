//! Comment storage and the comment query surface.
//!
//! - [`store`]: raw comment groups keyed by declaration position
//! - [`lines`]: the normalised [`Comments`] value handed to callers

mod lines;
mod store;

pub use lines::{Comments, prefix};
pub use store::{CommentGroup, CommentStore};
