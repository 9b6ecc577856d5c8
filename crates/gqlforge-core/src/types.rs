//! Declared type references and wrapping options.
//!
//! A [`TypeExpr`] is what a field, argument, or handler declares as its type:
//! either a built-in scalar token or a reference to another declared type by
//! target identity. [`TypeOptions`] carries the nullability and list flags
//! applied when the reference is resolved into a graph type.

use crate::target::TargetId;

/// Built-in scalar tokens plus caller-declared custom scalars.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarToken {
    Id,
    Int,
    Float,
    Boolean,
    String,
    /// A custom scalar known to the scalar resolver by name.
    Custom(std::string::String),
}

impl ScalarToken {
    /// The GraphQL type name this token renders as.
    pub fn name(&self) -> &str {
        match self {
            Self::Id => "ID",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::Custom(name) => name,
        }
    }
}

/// A declared type reference, as produced by a type thunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A scalar leaf type, resolved without a cache lookup.
    Scalar(ScalarToken),
    /// A reference to a declared object, interface, input, or argument type.
    Target(TargetId),
}

/// Nullability and list-wrapping options for one declared type usage.
///
/// The default is a required (non-null) single value, matching GraphQL's
/// `Type!`. List wrapping carries independent nullability for the list
/// container and its items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeOptions {
    /// The value itself (or the list container) may be null.
    pub nullable: bool,
    /// The value is a list of the declared type.
    pub is_array: bool,
    /// List items may be null. Only meaningful when `is_array` is set.
    pub nullable_items: bool,
}

impl TypeOptions {
    /// A nullable single value (`Type`).
    pub fn nullable() -> Self {
        Self {
            nullable: true,
            ..Self::default()
        }
    }

    /// A non-null list of non-null items (`[Type!]!`).
    pub fn list() -> Self {
        Self {
            is_array: true,
            ..Self::default()
        }
    }

    /// Returns a copy with `nullable_items` set (`[Type]`-style items).
    pub fn with_nullable_items(mut self) -> Self {
        self.nullable_items = true;
        self
    }

    /// Returns a copy with `nullable` set.
    pub fn with_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_token_names() {
        assert_eq!(ScalarToken::Id.name(), "ID");
        assert_eq!(ScalarToken::Int.name(), "Int");
        assert_eq!(ScalarToken::Float.name(), "Float");
        assert_eq!(ScalarToken::Boolean.name(), "Boolean");
        assert_eq!(ScalarToken::String.name(), "String");
        assert_eq!(ScalarToken::Custom("DateTime".into()).name(), "DateTime");
    }

    #[test]
    fn test_type_options_default_is_required_single() {
        let opts = TypeOptions::default();
        assert!(!opts.nullable);
        assert!(!opts.is_array);
        assert!(!opts.nullable_items);
    }

    #[test]
    fn test_type_options_helpers() {
        assert!(TypeOptions::nullable().nullable);
        assert!(TypeOptions::list().is_array);
        assert!(TypeOptions::list().with_nullable_items().nullable_items);
        assert!(TypeOptions::list().with_nullable().nullable);
    }
}
