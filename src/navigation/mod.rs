//! Reference and definition navigation.
//!
//! Turns raw locations from a language server into grouped, context-windowed
//! text reports.

mod error;
mod grouper;
mod matcher;
mod navigator;
pub mod render;
pub mod windows;

pub use error::NavigationError;
pub use grouper::HitSet;
pub use matcher::{default_separators, SymbolMatcher};
pub use navigator::{NavigationOptions, Navigator};
pub use windows::DisplayWindow;
