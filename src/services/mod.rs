//! Collaborators and process plumbing used around the session
//!
//! - `storage` - load/save of the whole data set
//! - `distance` - driving distance lookup
//! - `time_source` - clock abstraction
//! - `log_dirs`, `tracing_setup` - diagnostics
//! - `terminal_modes` - raw mode / alternate screen lifecycle

pub mod distance;
pub mod log_dirs;
pub mod storage;
pub mod terminal_modes;
pub mod time_source;
pub mod tracing_setup;
