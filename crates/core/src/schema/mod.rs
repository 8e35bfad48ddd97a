//! Protocol schema: every shape the router ever serializes.
//!
//! Field presence follows the platform's published schema. Required fields are
//! always emitted, even when empty. Optional fields are omitted at their zero
//! value and decode back to it when absent.

pub mod lists;
pub mod manifest;
pub mod meta;
pub mod stream;
pub mod subtitles;
pub mod types;

pub use lists::*;
pub use manifest::*;
pub use meta::*;
pub use stream::*;
pub use subtitles::*;
pub use types::*;

/// `skip_serializing_if` predicate for optional scalar fields.
pub(crate) fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
