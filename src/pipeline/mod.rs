//! Pipeline module - bin tables and the metrics derived from them

pub mod auc;
pub mod bins;
pub mod derive;
pub mod error;
pub mod ks;
pub mod lift;
pub mod loader;

pub use auc::*;
pub use bins::*;
pub use derive::*;
pub use error::ScorecardError;
pub use ks::*;
pub use lift::*;
pub use loader::*;
