//! Scalar resolution boundary.
//!
//! The builder asks the scalar resolver first for every declared type
//! reference; only a "not a scalar" answer sends it to the cache tables.

use gqlforge_core::types::TypeExpr;

use crate::graph::ScalarNode;

/// Maps a raw declared type reference to a known scalar, or signals
/// "not a scalar" so the builder looks the reference up in the resolution
/// cache.
pub trait ScalarResolver {
    fn try_scalar(&self, expr: &TypeExpr) -> Option<ScalarNode>;
}

/// Resolves the built-in scalar tokens (`ID`, `Int`, `Float`, `Boolean`,
/// `String`) and caller-declared custom scalar tokens by name. Target
/// references are never scalars here.
#[derive(Debug, Default)]
pub struct DefaultScalarResolver;

impl ScalarResolver for DefaultScalarResolver {
    fn try_scalar(&self, expr: &TypeExpr) -> Option<ScalarNode> {
        match expr {
            TypeExpr::Scalar(token) => Some(ScalarNode::new(token.name())),
            TypeExpr::Target(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlforge_core::registry::RegistryBuilder;
    use gqlforge_core::types::ScalarToken;

    #[test]
    fn test_builtin_tokens_resolve() {
        let resolver = DefaultScalarResolver;
        let scalar = resolver
            .try_scalar(&TypeExpr::Scalar(ScalarToken::Int))
            .unwrap();
        assert_eq!(scalar.name, "Int");

        let custom = resolver
            .try_scalar(&TypeExpr::Scalar(ScalarToken::Custom("DateTime".into())))
            .unwrap();
        assert_eq!(custom.name, "DateTime");
    }

    #[test]
    fn test_target_references_are_not_scalars() {
        let mut builder = RegistryBuilder::new();
        let target = builder.target();

        let resolver = DefaultScalarResolver;
        assert!(resolver.try_scalar(&TypeExpr::Target(target)).is_none());
    }
}
