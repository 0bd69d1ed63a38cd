//! View layer
//!
//! `compose` turns a session into screen content; `render` draws it.

pub mod compose;
pub mod render;

pub use compose::{compose, Emphasis, Screen, ScreenLine};
