//! Error types

mod fetch;
mod persist;

pub use fetch::*;
pub use persist::*;
