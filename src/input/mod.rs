//! Input handling

pub mod keymap;
