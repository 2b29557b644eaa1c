//! URL handling module for Reel-Harvest
//!
//! This module provides root normalization, percent-decoded folder
//! identifiers, and the scope ("jail") checks that keep traversal inside a
//! target's root.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::{decode_component, folder_key, normalize_root};
pub use scope::{ancestors_within, depth_below, is_within_root};
