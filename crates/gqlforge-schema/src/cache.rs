//! Type resolution cache.
//!
//! Three identity-keyed tables mapping a target identity to its constructed
//! graph node. Populated exactly once per generation call and discarded with
//! the build context; entries are write-once, read-many.

use std::collections::HashMap;
use std::sync::Arc;

use gqlforge_core::target::TargetId;

use crate::error::{Result, SchemaError, TypeKind};
use crate::graph::{InputNode, InterfaceNode, ObjectNode};

/// Identity-keyed tables of constructed nodes for one generation call.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    objects: HashMap<TargetId, Arc<ObjectNode>>,
    interfaces: HashMap<TargetId, Arc<InterfaceNode>>,
    inputs: HashMap<TargetId, Arc<InputNode>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object node. Registering the same identity twice is a
    /// programming-error-class fault and fails the build.
    pub fn register_object(&mut self, target: TargetId, node: Arc<ObjectNode>) -> Result<()> {
        if let Some(existing) = self.objects.insert(target, node) {
            return Err(SchemaError::DuplicateRegistration {
                kind: TypeKind::Object,
                name: existing.name().to_string(),
            });
        }
        Ok(())
    }

    /// Registers an interface node; duplicate identities fail the build.
    pub fn register_interface(
        &mut self,
        target: TargetId,
        node: Arc<InterfaceNode>,
    ) -> Result<()> {
        if let Some(existing) = self.interfaces.insert(target, node) {
            return Err(SchemaError::DuplicateRegistration {
                kind: TypeKind::Interface,
                name: existing.name().to_string(),
            });
        }
        Ok(())
    }

    /// Registers an input node; duplicate identities fail the build.
    pub fn register_input(&mut self, target: TargetId, node: Arc<InputNode>) -> Result<()> {
        if let Some(existing) = self.inputs.insert(target, node) {
            return Err(SchemaError::DuplicateRegistration {
                kind: TypeKind::Input,
                name: existing.name().to_string(),
            });
        }
        Ok(())
    }

    /// Looks up the object node for a target identity.
    pub fn object(&self, target: TargetId) -> Option<Arc<ObjectNode>> {
        self.objects.get(&target).cloned()
    }

    /// Looks up the interface node for a target identity.
    pub fn interface(&self, target: TargetId) -> Option<Arc<InterfaceNode>> {
        self.interfaces.get(&target).cloned()
    }

    /// Looks up the input node for a target identity.
    pub fn input(&self, target: TargetId) -> Option<Arc<InputNode>> {
        self.inputs.get(&target).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TypeCheck;
    use gqlforge_core::registry::RegistryBuilder;
    use gqlforge_core::descriptor::TypeDescriptor;

    fn object_shell(builder: &mut RegistryBuilder, name: &str) -> (TargetId, Arc<ObjectNode>) {
        let target = builder.target();
        let descriptor = TypeDescriptor::new(target, name, Vec::new());
        (target, Arc::new(ObjectNode::shell(&descriptor, TypeCheck::Always)))
    }

    #[test]
    fn test_lookup_returns_registered_instance() {
        let mut builder = RegistryBuilder::new();
        let (target, node) = object_shell(&mut builder, "Post");

        let mut cache = ResolutionCache::new();
        cache.register_object(target, Arc::clone(&node)).unwrap();

        let found = cache.object(target).unwrap();
        assert!(Arc::ptr_eq(&found, &node));
        // Repeated lookups hand out the identical instance
        assert!(Arc::ptr_eq(&cache.object(target).unwrap(), &node));
    }

    #[test]
    fn test_lookup_on_unregistered_identity_is_not_found() {
        let mut builder = RegistryBuilder::new();
        let (_, _) = object_shell(&mut builder, "Post");
        let missing = builder.target();

        let cache = ResolutionCache::new();
        assert!(cache.object(missing).is_none());
        assert!(cache.interface(missing).is_none());
        assert!(cache.input(missing).is_none());
    }

    #[test]
    fn test_duplicate_registration_is_fatal() {
        let mut builder = RegistryBuilder::new();
        let (target, node) = object_shell(&mut builder, "Post");

        let mut cache = ResolutionCache::new();
        cache.register_object(target, Arc::clone(&node)).unwrap();

        let err = cache.register_object(target, node).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateRegistration {
                kind: TypeKind::Object,
                ..
            }
        ));
    }

    #[test]
    fn test_tables_are_independent_per_kind() {
        let mut builder = RegistryBuilder::new();
        let target = builder.target();
        let descriptor = TypeDescriptor::new(target, "Node", Vec::new());

        let mut cache = ResolutionCache::new();
        cache
            .register_interface(target, Arc::new(InterfaceNode::shell(&descriptor)))
            .unwrap();

        // Same identity in a different table is not a duplicate
        cache
            .register_input(target, Arc::new(InputNode::shell(&descriptor)))
            .unwrap();

        assert!(cache.interface(target).is_some());
        assert!(cache.input(target).is_some());
        assert!(cache.object(target).is_none());
    }
}
