//! Non-fatal diagnostics raised while generating a core.
//!
//! Fatal problems abort generation through `ethgen_common::GenError`;
//! everything the user should know about but that does not prevent a build
//! (ignored options, forwarded keys) is recorded as a [`Diagnostic`] in a
//! [`DiagnosticSink`] owned by the caller.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use severity::Severity;
pub use sink::DiagnosticSink;
