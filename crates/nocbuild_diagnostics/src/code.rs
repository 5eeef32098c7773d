//! Diagnostic codes with category prefixes for structured error identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// Warning diagnostics, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `E201`, `W101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// Well-known diagnostic codes emitted by the build pipeline.
pub mod codes {
    use super::{Category, DiagnosticCode};

    /// A block instance sets a parameter its descriptor does not declare.
    pub const UNKNOWN_PARAMETER: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);
    /// A requested connection matched none of the connection categories.
    pub const UNRESOLVED_CONNECTION: DiagnosticCode = DiagnosticCode::new(Category::Error, 201);
    /// A clock-domain connection references an undeclared clock on either end.
    pub const UNRESOLVED_CLOCK_DOMAIN: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);
    /// A declared clock never appears as a clock-domain destination.
    pub const UNCONNECTED_CLOCK: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);
    /// A stream-endpoint port name does not match `in<digit>`/`out<digit>`.
    pub const BAD_ENDPOINT_PORT: DiagnosticCode = DiagnosticCode::new(Category::Error, 401);
    /// An endpoint port index is outside the endpoint's declared data-port count.
    pub const ENDPOINT_PORT_RANGE: DiagnosticCode = DiagnosticCode::new(Category::Error, 402);
    /// A node index does not fit the packed 10-bit field.
    pub const NODE_INDEX_OVERFLOW: DiagnosticCode = DiagnosticCode::new(Category::Error, 403);
    /// A port index does not fit the packed 6-bit field.
    pub const PORT_INDEX_OVERFLOW: DiagnosticCode = DiagnosticCode::new(Category::Error, 404);
    /// The external image-core renderer reported a failure.
    pub const RENDER_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Error, 501);
}
