//! Error types for schema construction and resolver invocation.
//!
//! Build-time errors ([`SchemaError`]) are fatal: the generation call aborts
//! with no partial schema. Request-time errors ([`ResolveError`]) are scoped
//! to one resolver invocation and never affect the build or other requests.

use std::fmt;

use thiserror::Error;

/// Which cache table a type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Object,
    Interface,
    Input,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Input => "input",
        };
        f.write_str(kind)
    }
}

/// Fatal errors raised while compiling the metadata registry into a graph.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A referenced target identity has no corresponding registry entry.
    #[error("referenced type not found in registry: {name}")]
    MissingRegistryEntry { name: String },

    /// A field/argument/return type maps to no scalar, object, or interface.
    #[error("cannot determine output type for {name}")]
    UnresolvedOutputType { name: String },

    /// An input-position type maps to no scalar or input type.
    #[error("cannot determine input type for {name}")]
    UnresolvedInputType { name: String },

    /// The same target identity was registered twice in one cache table.
    /// Indicates the same declared type was processed twice.
    #[error("duplicate {kind} type registration for {name}")]
    DuplicateRegistration { kind: TypeKind, name: String },

    /// A type's ancestor chain loops back onto itself.
    #[error("inheritance cycle detected at {name}")]
    InheritanceCycle { name: String },
}

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// One field-level validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The set of violations for one resolver invocation, surfaced as a single
/// structured error to that request's caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailure {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Errors raised by one resolver invocation at request time.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Argument validation rejected the invocation.
    #[error("argument validation failed: {0}")]
    Validation(ValidationFailure),

    /// The underlying user logic failed.
    #[error("resolver failed: {0}")]
    Failed(String),
}
