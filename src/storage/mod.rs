//! Fighter persistence.

pub mod fighter_store;

pub use fighter_store::FighterStore;
