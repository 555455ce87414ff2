//! Metadata partial generation.
//!
//! Secure-memory metadata (one-time authentication codes, counters) is
//! produced from a monotonically increasing counter under a fixed key. The
//! cryptographic primitive lives outside this crate; the contract here is
//! only determinism and freedom from side effects.

/// Keystream contract and the default keyed generator.
pub mod keystream;

pub use keystream::{KeystreamGenerator, PARTIAL_VALUE_MASK, PartialGenerator};
