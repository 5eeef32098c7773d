//! The seam between the resolved graph model and HDL code generation.
//!
//! The templating stage that turns a model into HDL source lives outside
//! this toolchain; it receives a read-only [`CodegenInput`] and implements
//! [`ImageCoreRenderer`]. No computation or validation happens on this
//! side of the seam — by the time code generation runs, the model is
//! guaranteed internally consistent, so template authors never need to
//! handle malformed graphs.

#![warn(missing_docs)]

use nocbuild_common::ContentHash;
use nocbuild_graph::{GraphModel, ResolvedConnections};

/// The complete, validated input handed to the code-generation stage.
///
/// Everything is borrowed: the renderer may read the model and the
/// categorized connection buckets but cannot mutate them. The two
/// provenance fields are embedded verbatim into generated output so a
/// built image can be traced back to its source description.
#[derive(Debug, Clone, Copy)]
pub struct CodegenInput<'a> {
    /// The fully indexed, validated graph model.
    pub model: &'a GraphModel,
    /// The validated connection buckets, in declaration order.
    pub connections: &'a ResolvedConnections,
    /// An identifier for the source description (typically its path).
    pub source: &'a str,
    /// The content hash of the source description.
    pub source_hash: ContentHash,
}

/// An error reported by an external renderer.
#[derive(Debug, thiserror::Error)]
#[error("image core rendering failed: {message}")]
pub struct RenderError {
    /// Description of the rendering failure.
    pub message: String,
}

impl RenderError {
    /// Creates a new render error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Implemented by the external templating stage.
pub trait ImageCoreRenderer {
    /// Renders the image core source text from the given input.
    fn render(&self, input: &CodegenInput<'_>) -> Result<String, RenderError>;
}
