//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering, layout and overlays
//! - `calendar`: Projected events and the students of the selected event
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling

pub mod calendar;
pub mod input;
pub mod render;
pub mod styles;
