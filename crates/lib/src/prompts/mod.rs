//! # Prompt Templates
//!
//! This module holds the fixed instructions sent to the vision model and the
//! schema vocabulary (required keys, allowed colors) that goes with them.

pub mod colors;
pub mod extraction;

pub use colors::{is_allowed_color, ALLOWED_COLORS};
pub use extraction::{build_system_prompt, build_user_prompt, REQUIRED_FIELDS};
