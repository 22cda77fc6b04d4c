//! Terminal presentation.

pub mod battle_view;

pub use battle_view::{bar, render_battle, render_round};
