//! URL handling module for linkcheck
//!
//! This module provides reference resolution, fragment splitting, root
//! normalization and the link exclusion filter.

mod filter;
mod normalize;

pub use filter::{LinkFilter, INERT_SCHEMES};
pub use normalize::{decode_fragment, is_under_root, normalize_root, resolve, split_fragment};
