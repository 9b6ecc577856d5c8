//! The caller-owned metadata registry.
//!
//! A [`MetadataRegistry`] holds, post-build, immutable lists of type and
//! handler descriptors collected elsewhere (annotations, decorators, manual
//! declaration). It is a plain value passed into the schema build entry
//! point; there is no process-global registry state, so builds are
//! reentrant by construction.

use std::collections::HashSet;

use crate::descriptor::{HandlerDescriptor, TypeDescriptor};
use crate::target::TargetId;

/// Immutable descriptor collection consumed by the schema compiler.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    object_types: Vec<TypeDescriptor>,
    interface_types: Vec<TypeDescriptor>,
    input_types: Vec<TypeDescriptor>,
    argument_types: Vec<TypeDescriptor>,
    queries: Vec<HandlerDescriptor>,
    mutations: Vec<HandlerDescriptor>,
    field_resolvers: Vec<HandlerDescriptor>,
}

impl MetadataRegistry {
    /// Declared object types, in registration order.
    pub fn object_types(&self) -> &[TypeDescriptor] {
        &self.object_types
    }

    /// Declared interface types, in registration order.
    pub fn interface_types(&self) -> &[TypeDescriptor] {
        &self.interface_types
    }

    /// Declared input types, in registration order.
    pub fn input_types(&self) -> &[TypeDescriptor] {
        &self.input_types
    }

    /// Declared argument (bundle) types, in registration order.
    pub fn argument_types(&self) -> &[TypeDescriptor] {
        &self.argument_types
    }

    /// Declared query handlers, in registration order.
    pub fn queries(&self) -> &[HandlerDescriptor] {
        &self.queries
    }

    /// Declared mutation handlers, in registration order.
    pub fn mutations(&self) -> &[HandlerDescriptor] {
        &self.mutations
    }

    /// Declared field-resolver handlers, in registration order.
    pub fn field_resolvers(&self) -> &[HandlerDescriptor] {
        &self.field_resolvers
    }

    /// Looks up an object type descriptor by identity.
    pub fn object_type(&self, target: TargetId) -> Option<&TypeDescriptor> {
        self.object_types.iter().find(|d| d.target == target)
    }

    /// Looks up an interface type descriptor by identity.
    pub fn interface_type(&self, target: TargetId) -> Option<&TypeDescriptor> {
        self.interface_types.iter().find(|d| d.target == target)
    }

    /// Looks up an input type descriptor by identity.
    pub fn input_type(&self, target: TargetId) -> Option<&TypeDescriptor> {
        self.input_types.iter().find(|d| d.target == target)
    }

    /// Looks up an argument type descriptor by identity.
    pub fn argument_type(&self, target: TargetId) -> Option<&TypeDescriptor> {
        self.argument_types.iter().find(|d| d.target == target)
    }

    /// The declared name of a target, whatever kind it was declared as.
    pub fn type_name(&self, target: TargetId) -> Option<&str> {
        self.object_type(target)
            .or_else(|| self.interface_type(target))
            .or_else(|| self.input_type(target))
            .or_else(|| self.argument_type(target))
            .map(|d| d.name.as_str())
    }

    /// Finds the field resolver declared for `(parent, method_name)`.
    pub fn field_resolver(&self, parent: TargetId, method_name: &str) -> Option<&HandlerDescriptor> {
        self.field_resolvers
            .iter()
            .find(|h| h.parent_target == Some(parent) && h.method_name == method_name)
    }

    /// Object types whose ancestor chain includes `target`.
    ///
    /// Used to derive tag-based concrete-type checks: a value tagged with a
    /// descendant's name is an instance of the ancestor type.
    pub fn object_descendants(&self, target: TargetId) -> Vec<&TypeDescriptor> {
        self.object_types
            .iter()
            .filter(|d| d.target != target && self.chain_contains(d, target))
            .collect()
    }

    fn chain_contains(&self, descriptor: &TypeDescriptor, target: TargetId) -> bool {
        let mut seen = HashSet::new();
        let mut current = descriptor.super_target;
        while let Some(t) = current {
            if t == target {
                return true;
            }
            if !seen.insert(t) {
                // Malformed chain; reported as a cycle during the build pass.
                return false;
            }
            current = self.object_type(t).and_then(|d| d.super_target);
        }
        false
    }
}

/// Builds a [`MetadataRegistry`], minting target identities along the way.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    next_target: u64,
    registry: MetadataRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh target identity.
    ///
    /// Identities are minted before their descriptors are declared, so
    /// descriptors may reference forward-declared types freely.
    pub fn target(&mut self) -> TargetId {
        let id = TargetId::new(self.next_target);
        self.next_target += 1;
        id
    }

    pub fn object_type(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.registry.object_types.push(descriptor);
        self
    }

    pub fn interface_type(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.registry.interface_types.push(descriptor);
        self
    }

    pub fn input_type(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.registry.input_types.push(descriptor);
        self
    }

    pub fn argument_type(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.registry.argument_types.push(descriptor);
        self
    }

    pub fn query(&mut self, handler: HandlerDescriptor) -> &mut Self {
        self.registry.queries.push(handler);
        self
    }

    pub fn mutation(&mut self, handler: HandlerDescriptor) -> &mut Self {
        self.registry.mutations.push(handler);
        self
    }

    pub fn field_resolver(&mut self, handler: HandlerDescriptor) -> &mut Self {
        self.registry.field_resolvers.push(handler);
        self
    }

    /// Finalizes the registry. It is immutable from here on.
    pub fn build(self) -> MetadataRegistry {
        self.registry
    }
}
