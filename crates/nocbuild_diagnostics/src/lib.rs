//! Diagnostic creation, accumulation, and rendering for the build pipeline.
//!
//! This crate provides structured [`Diagnostic`] messages with severity
//! levels and error codes. The thread-safe [`DiagnosticSink`] accumulates
//! diagnostics while a pipeline stage runs, so a single build surfaces every
//! problem found in that stage instead of only the first; the driver decides
//! at defined checkpoints whether accumulated errors abort the build.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{codes, Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
