//! Utility module - console styling and progress spinners

pub mod progress;
pub mod styling;

pub use progress::*;
pub use styling::*;
