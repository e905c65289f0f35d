//! Error types raised by collaborators.

mod embedding;
mod store;

pub use embedding::*;
pub use store::*;
