//! Diagnostic codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Warning diagnostics, prefixed with `W`.
    Warning,
    /// Informational notes, prefixed with `N`.
    Note,
    /// Timing constraint diagnostics, prefixed with `T`.
    Timing,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Warning => 'W',
            Category::Note => 'N',
            Category::Timing => 'T',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a number.
///
/// Displayed as the prefix followed by a zero-padded 3-digit number, e.g.
/// `W101` or `N102`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// A PHY delay option was supplied for a PHY kind that ignores it.
    pub const UNUSED_PHY_DELAY: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);
    /// An unrecognized top-level key was forwarded to the SoC arguments.
    pub const FORWARDED_KEY: DiagnosticCode = DiagnosticCode::new(Category::Note, 102);
    /// A top-level key was shadowed by a `soc` entry of the same name.
    pub const SHADOWED_KEY: DiagnosticCode = DiagnosticCode::new(Category::Warning, 103);
    /// Timing constraints were skipped because the PHY has no physical clocks.
    pub const CONSTRAINTS_SKIPPED: DiagnosticCode = DiagnosticCode::new(Category::Timing, 1);

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
