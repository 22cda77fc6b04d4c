//! Fighter entity, move vocabulary, and generation profiles.

pub mod moves;
pub mod profile;
pub mod types;

pub use moves::*;
pub use profile::*;
pub use types::*;
