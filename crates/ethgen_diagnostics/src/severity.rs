//! How much attention a diagnostic deserves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a non-fatal diagnostic.
///
/// There is no error level: anything that prevents a build is returned as a
/// `GenError` instead of being recorded.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Context, e.g. an option forwarded without validation.
    Note,
    /// A supplied option has no effect or is overridden.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
        })
    }
}
