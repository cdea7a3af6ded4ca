//! Common result and error types for the generator.

use std::fmt;

/// The standard result type for every fallible generator operation.
///
/// Any `Err` aborts the composition in progress; no partial artifact is ever
/// produced. Non-fatal findings are reported through the diagnostics sink
/// instead and the operation still returns `Ok`.
pub type GenResult<T> = Result<T, GenError>;

/// Errors that abort a core generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
    /// A configuration key is malformed, deprecated, missing, or inconsistent.
    #[error("configuration error in '{key}': {message}")]
    Configuration {
        /// The offending configuration key.
        key: String,
        /// What is wrong with it.
        message: String,
    },

    /// No known PHY pad shape matched the supplied pads.
    #[error("ambiguous configuration: {0}")]
    AmbiguousConfiguration(String),

    /// The pad shape was recognized but cannot be resolved automatically.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// A pad bundle was requested (or declared) more than once.
    #[error("resource conflict: '{name}' index {index} is already in use")]
    ResourceConflict {
        /// The bundle or region name.
        name: String,
        /// The bundle index.
        index: u32,
    },

    /// An undeclared pad or unknown enumeration value was requested.
    #[error("{kind} not found: '{name}'")]
    NotFound {
        /// What was being looked up (e.g. "pad", "vendor").
        kind: NotFoundKind,
        /// The name that failed to resolve.
        name: String,
    },
}

/// The namespace a failed lookup was performed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotFoundKind {
    /// A pad bundle in the platform registry.
    Pad,
    /// A vendor name.
    Vendor,
    /// A vendor toolchain name.
    Toolchain,
    /// A PHY kind name.
    Phy,
    /// A core kind name.
    Core,
    /// A named value of some other enumerated option.
    Value,
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotFoundKind::Pad => "pad",
            NotFoundKind::Vendor => "vendor",
            NotFoundKind::Toolchain => "toolchain",
            NotFoundKind::Phy => "PHY",
            NotFoundKind::Core => "core",
            NotFoundKind::Value => "value",
        };
        f.write_str(s)
    }
}

impl GenError {
    /// Creates a configuration error for the given key.
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a lookup failure.
    pub fn not_found(kind: NotFoundKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Returns the configuration key this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            GenError::Configuration { key, .. } => Some(key),
            _ => None,
        }
    }
}
