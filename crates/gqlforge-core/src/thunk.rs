//! Lazy type and field-list accessors.
//!
//! Field types may reference types declared later in the registry, so
//! descriptors carry thunks instead of eagerly evaluated values. A thunk is
//! evaluated during the build pass, once the registry is complete; this
//! breaks the declaration-order dependency without allowing true
//! construction cycles.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::FieldDescriptor;
use crate::target::TargetId;
use crate::types::{ScalarToken, TypeExpr};

/// A deferred declared-type reference.
#[derive(Clone)]
pub struct TypeThunk(Arc<dyn Fn() -> TypeExpr + Send + Sync>);

impl TypeThunk {
    pub fn new(f: impl Fn() -> TypeExpr + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluates the thunk, producing the declared type reference.
    pub fn get(&self) -> TypeExpr {
        (self.0)()
    }
}

impl From<TypeExpr> for TypeThunk {
    fn from(expr: TypeExpr) -> Self {
        Self::new(move || expr.clone())
    }
}

impl From<TargetId> for TypeThunk {
    fn from(target: TargetId) -> Self {
        TypeExpr::Target(target).into()
    }
}

impl From<ScalarToken> for TypeThunk {
    fn from(token: ScalarToken) -> Self {
        TypeExpr::Scalar(token).into()
    }
}

impl fmt::Debug for TypeThunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeThunk(..)")
    }
}

/// A deferred field-descriptor list.
#[derive(Clone)]
pub struct FieldsThunk(Arc<dyn Fn() -> Vec<FieldDescriptor> + Send + Sync>);

impl FieldsThunk {
    pub fn new(f: impl Fn() -> Vec<FieldDescriptor> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluates the thunk, producing the declared fields.
    pub fn get(&self) -> Vec<FieldDescriptor> {
        (self.0)()
    }
}

impl From<Vec<FieldDescriptor>> for FieldsThunk {
    fn from(fields: Vec<FieldDescriptor>) -> Self {
        Self::new(move || fields.clone())
    }
}

impl fmt::Debug for FieldsThunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldsThunk(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeOptions;

    #[test]
    fn test_type_thunk_from_scalar() {
        let thunk: TypeThunk = ScalarToken::Int.into();
        assert_eq!(thunk.get(), TypeExpr::Scalar(ScalarToken::Int));
        // Thunks are re-evaluable
        assert_eq!(thunk.get(), TypeExpr::Scalar(ScalarToken::Int));
    }

    #[test]
    fn test_fields_thunk_defers_evaluation() {
        let thunk = FieldsThunk::new(|| {
            vec![FieldDescriptor::new(
                "id",
                ScalarToken::Id,
                TypeOptions::default(),
            )]
        });

        let fields = thunk.get();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "id");
    }
}
