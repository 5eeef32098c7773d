//! Shared foundational types used across the nocbuild toolchain.
//!
//! This crate provides the common result type for internal errors and the
//! content hash embedded into generated sources for provenance tracking.

#![warn(missing_docs)]

pub mod hash;
pub mod result;

pub use hash::ContentHash;
pub use result::{InternalError, NocResult};
