//! Memory-side component tests.

pub mod cache;
pub mod nvm;
