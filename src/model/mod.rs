//! Document model types for segmented text.
//!
//! This module defines the intermediate representation that bridges line
//! segmentation and rendering. The model is format-agnostic: blocks carry
//! their source lines and renderers decide how line breaks are expressed.

mod block;
mod document;
mod line;

pub use block::{Block, HeadingKind};
pub use document::{Boundary, Document, Envelope, LineSpacingProfile, Metadata};
pub use line::{sanitize, Line};
