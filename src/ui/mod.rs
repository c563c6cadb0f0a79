//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering, overlays, and layout
//! - `input`: Keyboard event handling
//! - `styles`: Theme-resolved palette
//! - `views`: Per-page content rendering (chat list, member roster)

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
