//! Pre-resolution descriptors.
//!
//! Descriptors are the registry's representation of declared types, fields,
//! parameters, and query/mutation/field-resolver handlers, before the
//! compiler resolves them into graph nodes. Field lists and type references
//! are thunked so declaration order never matters.

use std::sync::Arc;

use crate::target::TargetId;
use crate::thunk::{FieldsThunk, TypeThunk};
use crate::types::TypeOptions;
use crate::validation::ValidateOverride;

/// A caller-registered concrete-type predicate.
///
/// Used by the executor to decide whether a runtime value is an instance of
/// a given object type when resolving abstract results. When absent, the
/// compiler derives a tag-based check from the registry's inheritance data.
pub type TypeCheckFn = Arc<dyn Fn(&serde_json::Value) -> bool + Send + Sync>;

/// A declared object, interface, input, or argument type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Identity of the declared type.
    pub target: TargetId,
    /// GraphQL type name.
    pub name: String,
    pub description: Option<String>,
    /// Lazily-evaluated field list.
    pub fields: FieldsThunk,
    /// Identity of the parent type, if the declaration extends one.
    /// `None` marks the implicit root of an inheritance chain.
    pub super_target: Option<TargetId>,
    /// Identities of implemented interfaces, in declaration order.
    pub interfaces: Vec<TargetId>,
    /// Optional registered predicate overriding tag-based discrimination.
    pub type_check: Option<DebuggableTypeCheck>,
}

/// Newtype so `TypeDescriptor` stays `Debug` despite holding a closure.
#[derive(Clone)]
pub struct DebuggableTypeCheck(pub TypeCheckFn);

impl std::fmt::Debug for DebuggableTypeCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TypeCheckFn(..)")
    }
}

impl TypeDescriptor {
    pub fn new(
        target: TargetId,
        name: impl Into<String>,
        fields: impl Into<FieldsThunk>,
    ) -> Self {
        Self {
            target,
            name: name.into(),
            description: None,
            fields: fields.into(),
            super_target: None,
            interfaces: Vec::new(),
            type_check: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares the parent type this one extends.
    pub fn with_super(mut self, super_target: TargetId) -> Self {
        self.super_target = Some(super_target);
        self
    }

    /// Declares implemented interfaces, in order.
    pub fn with_interfaces(mut self, interfaces: Vec<TargetId>) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// Registers an explicit concrete-type predicate.
    pub fn with_type_check(
        mut self,
        check: impl Fn(&serde_json::Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.type_check = Some(DebuggableTypeCheck(Arc::new(check)));
        self
    }
}

/// A declared field on an object, interface, input, or argument type.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    /// Deferred declared type reference.
    pub raw_type: TypeThunk,
    pub options: TypeOptions,
    /// Parameters, for object/interface fields only.
    pub params: Vec<ParamDescriptor>,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        raw_type: impl Into<TypeThunk>,
        options: TypeOptions,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            deprecation_reason: None,
            raw_type: raw_type.into(),
            options,
            params: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_deprecation(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    pub fn with_params(mut self, params: Vec<ParamDescriptor>) -> Self {
        self.params = params;
        self
    }
}

/// A single named argument parameter.
#[derive(Debug, Clone)]
pub struct ArgParam {
    pub name: String,
    pub description: Option<String>,
    pub raw_type: TypeThunk,
    pub options: TypeOptions,
    /// Per-argument validation override, merged with the global settings
    /// by the resolver factory.
    pub validate: Option<ValidateOverride>,
}

/// An argument bundle expanding into the fields of a declared argument type,
/// including fields inherited from its ancestor chain.
#[derive(Debug, Clone)]
pub struct BundleParam {
    pub raw_type: TypeThunk,
}

/// A parameter of a field or handler.
#[derive(Debug, Clone)]
pub enum ParamDescriptor {
    Arg(ArgParam),
    Bundle(BundleParam),
}

impl ParamDescriptor {
    pub fn arg(
        name: impl Into<String>,
        raw_type: impl Into<TypeThunk>,
        options: TypeOptions,
    ) -> Self {
        Self::Arg(ArgParam {
            name: name.into(),
            description: None,
            raw_type: raw_type.into(),
            options,
            validate: None,
        })
    }

    pub fn bundle(raw_type: impl Into<TypeThunk>) -> Self {
        Self::Bundle(BundleParam {
            raw_type: raw_type.into(),
        })
    }

    /// Returns a copy with the per-argument validation override set.
    /// No effect on bundles.
    pub fn with_validate(self, validate: ValidateOverride) -> Self {
        match self {
            Self::Arg(mut arg) => {
                arg.validate = Some(validate);
                Self::Arg(arg)
            }
            bundle @ Self::Bundle(_) => bundle,
        }
    }
}

/// A declared query, mutation, or field-resolver handler.
#[derive(Debug, Clone)]
pub struct HandlerDescriptor {
    /// Method name; becomes the field name on the root (or parent) type.
    pub method_name: String,
    /// Deferred return type reference.
    pub return_type: TypeThunk,
    pub return_options: TypeOptions,
    pub params: Vec<ParamDescriptor>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    /// For field resolvers: identity of the object type whose field this
    /// handler computes.
    pub parent_target: Option<TargetId>,
}

impl HandlerDescriptor {
    pub fn new(
        method_name: impl Into<String>,
        return_type: impl Into<TypeThunk>,
        return_options: TypeOptions,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            return_type: return_type.into(),
            return_options,
            params: Vec::new(),
            description: None,
            deprecation_reason: None,
            parent_target: None,
        }
    }

    pub fn with_params(mut self, params: Vec<ParamDescriptor>) -> Self {
        self.params = params;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_deprecation(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    /// Marks this handler as a field resolver for the given object type.
    pub fn with_parent(mut self, parent: TargetId) -> Self {
        self.parent_target = Some(parent);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use crate::types::ScalarToken;

    #[test]
    fn test_type_descriptor_builder_methods() {
        let mut builder = RegistryBuilder::new();
        let animal = builder.target();
        let node = builder.target();
        let dog = builder.target();

        let desc = TypeDescriptor::new(dog, "Dog", Vec::new())
            .with_description("A dog")
            .with_super(animal)
            .with_interfaces(vec![node]);

        assert_eq!(desc.name, "Dog");
        assert_eq!(desc.description.as_deref(), Some("A dog"));
        assert_eq!(desc.super_target, Some(animal));
        assert_eq!(desc.interfaces, vec![node]);
        assert!(desc.type_check.is_none());
    }

    #[test]
    fn test_param_descriptor_validate_override_ignores_bundles() {
        let mut builder = RegistryBuilder::new();
        let args = builder.target();

        let bundle =
            ParamDescriptor::bundle(args).with_validate(ValidateOverride::Enabled(false));
        assert!(matches!(bundle, ParamDescriptor::Bundle(_)));

        let arg = ParamDescriptor::arg("limit", ScalarToken::Int, TypeOptions::nullable())
            .with_validate(ValidateOverride::Enabled(false));
        match arg {
            ParamDescriptor::Arg(a) => assert!(a.validate.is_some()),
            ParamDescriptor::Bundle(_) => panic!("expected arg"),
        }
    }
}
