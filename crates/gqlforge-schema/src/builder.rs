//! Type graph builder.
//!
//! Compiles a metadata registry into a [`SchemaGraph`] in two phases.
//! Phase 1 registers a shallow node shell for every declared interface,
//! object, and input type, so any type can be referenced before its own
//! fields exist. Phase 2 resolves fields, implemented-interface lists, and
//! arguments by identity lookup: interfaces first, then objects
//! (ancestor-first, memoized), then inputs. The root operation builder runs
//! last against the completed cache.
//!
//! All errors here are fatal: the generation call aborts with no partial
//! schema. A build context (cache plus cycle guard) is created per call and
//! discarded with it; there is no cross-invocation state.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use gqlforge_core::descriptor::{HandlerDescriptor, ParamDescriptor, TypeDescriptor};
use gqlforge_core::registry::MetadataRegistry;
use gqlforge_core::target::TargetId;
use gqlforge_core::types::{TypeExpr, TypeOptions};

use crate::cache::ResolutionCache;
use crate::error::{Result, SchemaError};
use crate::graph::{
    FieldNode, InputNode, InputRef, InputValueNode, InterfaceNode, NamedType, ObjectNode,
    OutputRef, SchemaGraph, TypeCheck, Wrapped,
};
use crate::resolvers::ResolverFactory;
use crate::scalars::ScalarResolver;

/// Builds a schema graph from a caller-owned metadata registry.
///
/// # Example
///
/// ```ignore
/// let schema = SchemaBuilder::new(&registry, &DefaultScalarResolver, &factory).build()?;
/// ```
pub struct SchemaBuilder<'a> {
    registry: &'a MetadataRegistry,
    scalars: &'a dyn ScalarResolver,
    factory: &'a dyn ResolverFactory,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(
        registry: &'a MetadataRegistry,
        scalars: &'a dyn ScalarResolver,
        factory: &'a dyn ResolverFactory,
    ) -> Self {
        Self {
            registry,
            scalars,
            factory,
        }
    }

    /// Runs one generation call.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] on registry inconsistency, unresolvable
    /// type references, duplicate registration, or inheritance cycles. No
    /// partial schema is returned.
    pub fn build(&self) -> Result<SchemaGraph> {
        debug!("Starting type graph build");
        BuildContext::new(self.registry, self.scalars, self.factory).run()
    }
}

/// Convenience entry point for [`SchemaBuilder`].
pub fn build_schema(
    registry: &MetadataRegistry,
    scalars: &dyn ScalarResolver,
    factory: &dyn ResolverFactory,
) -> Result<SchemaGraph> {
    SchemaBuilder::new(registry, scalars, factory).build()
}

/// Per-call build state: the resolution cache and the inheritance cycle
/// guard. Created at the start of a generation call, dropped at its end.
struct BuildContext<'a> {
    registry: &'a MetadataRegistry,
    scalars: &'a dyn ScalarResolver,
    factory: &'a dyn ResolverFactory,
    cache: ResolutionCache,
    resolving: HashSet<TargetId>,
}

impl<'a> BuildContext<'a> {
    fn new(
        registry: &'a MetadataRegistry,
        scalars: &'a dyn ScalarResolver,
        factory: &'a dyn ResolverFactory,
    ) -> Self {
        Self {
            registry,
            scalars,
            factory,
            cache: ResolutionCache::new(),
            resolving: HashSet::new(),
        }
    }

    fn run(mut self) -> Result<SchemaGraph> {
        let registry = self.registry;

        self.register_shells()?;

        // Interfaces carry no forward references to objects; resolve first.
        for descriptor in registry.interface_types() {
            self.resolve_interface(descriptor)?;
        }
        for descriptor in registry.object_types() {
            self.resolve_object(descriptor)?;
        }
        for descriptor in registry.input_types() {
            self.resolve_input(descriptor)?;
        }

        let query = self.build_root("Query", "Root query type", registry.queries())?;
        let mutation = if registry.mutations().is_empty() {
            None
        } else {
            Some(self.build_root("Mutation", "Root mutation type", registry.mutations())?)
        };

        // The output enumerates every interface and object node, reachable
        // from the roots or not. Input types ride along via references only.
        let mut types =
            Vec::with_capacity(registry.interface_types().len() + registry.object_types().len());
        for descriptor in registry.interface_types() {
            if let Some(node) = self.cache.interface(descriptor.target) {
                types.push(NamedType::Interface(node));
            }
        }
        for descriptor in registry.object_types() {
            if let Some(node) = self.cache.object(descriptor.target) {
                types.push(NamedType::Object(node));
            }
        }

        debug!(
            type_count = types.len(),
            has_mutation = mutation.is_some(),
            "Type graph build complete"
        );

        Ok(SchemaGraph {
            query,
            mutation,
            types,
        })
    }

    /// Phase 1: register a shallow shell for every declared type.
    fn register_shells(&mut self) -> Result<()> {
        let registry = self.registry;

        for descriptor in registry.interface_types() {
            trace!(name = %descriptor.name, "Registering interface shell");
            self.cache
                .register_interface(descriptor.target, Arc::new(InterfaceNode::shell(descriptor)))?;
        }
        for descriptor in registry.object_types() {
            trace!(name = %descriptor.name, "Registering object shell");
            let check = self.derive_type_check(descriptor);
            self.cache
                .register_object(descriptor.target, Arc::new(ObjectNode::shell(descriptor, check)))?;
        }
        for descriptor in registry.input_types() {
            trace!(name = %descriptor.name, "Registering input shell");
            self.cache
                .register_input(descriptor.target, Arc::new(InputNode::shell(descriptor)))?;
        }

        debug!(
            interfaces = registry.interface_types().len(),
            objects = registry.object_types().len(),
            inputs = registry.input_types().len(),
            "Registered type shells"
        );
        Ok(())
    }

    /// The concrete-type discriminator for one object descriptor.
    ///
    /// A registered predicate wins. Otherwise: a type with no declared
    /// interfaces and no ancestor is the only concrete type for its own
    /// shape and always matches; anything else matches when the candidate
    /// value's type tag names this type or one of its registry descendants.
    fn derive_type_check(&self, descriptor: &TypeDescriptor) -> TypeCheck {
        if let Some(check) = &descriptor.type_check {
            return TypeCheck::Predicate(check.0.clone());
        }

        let has_ancestor = descriptor
            .super_target
            .is_some_and(|t| self.registry.object_type(t).is_some());
        if descriptor.interfaces.is_empty() && !has_ancestor {
            return TypeCheck::Always;
        }

        let mut tags = HashSet::new();
        tags.insert(descriptor.name.clone());
        for descendant in self.registry.object_descendants(descriptor.target) {
            tags.insert(descendant.name.clone());
        }
        TypeCheck::Tags(tags)
    }

    fn resolve_interface(&mut self, descriptor: &TypeDescriptor) -> Result<Arc<InterfaceNode>> {
        let node = self.lookup_interface(descriptor.target)?;
        if node.is_resolved() {
            return Ok(node);
        }

        trace!(name = %descriptor.name, "Resolving interface fields");
        let mut fields = IndexMap::new();
        for field in descriptor.fields.get() {
            let ty = self.resolve_output_type(&field.raw_type.get(), field.options)?;
            fields.insert(
                field.name.clone(),
                FieldNode {
                    name: field.name.clone(),
                    description: field.description.clone(),
                    deprecation_reason: field.deprecation_reason.clone(),
                    ty,
                    args: IndexMap::new(),
                    resolver: None,
                },
            );
        }
        node.seal(fields);
        Ok(node)
    }

    fn resolve_object(&mut self, descriptor: &TypeDescriptor) -> Result<Arc<ObjectNode>> {
        let node = self.lookup_object(descriptor.target)?;
        if node.is_resolved() {
            return Ok(node);
        }
        if !self.resolving.insert(descriptor.target) {
            return Err(SchemaError::InheritanceCycle {
                name: descriptor.name.clone(),
            });
        }

        trace!(name = %descriptor.name, "Resolving object type");

        // Ancestor first: its fields and interfaces are copied, never
        // re-resolved.
        let ancestor = match descriptor.super_target {
            Some(target) => {
                let registry = self.registry;
                let parent = registry.object_type(target).ok_or_else(|| {
                    SchemaError::MissingRegistryEntry {
                        name: self.target_name(target),
                    }
                })?;
                Some(self.resolve_object(parent)?)
            }
            None => None,
        };

        // Own declared interfaces, then the ancestor's, de-duplicated,
        // first-seen order. Interface implementation is inherited without
        // redeclaration.
        let mut interfaces: Vec<Arc<InterfaceNode>> = Vec::new();
        for target in &descriptor.interfaces {
            let interface = self.lookup_interface(*target)?;
            if !interfaces.iter().any(|i| Arc::ptr_eq(i, &interface)) {
                interfaces.push(interface);
            }
        }
        if let Some(ancestor) = &ancestor {
            for interface in ancestor.interfaces() {
                if !interfaces.iter().any(|i| Arc::ptr_eq(i, interface)) {
                    interfaces.push(Arc::clone(interface));
                }
            }
        }

        // Overlay merge: own fields, then ancestor fields, then interface
        // fields. Later steps only add names not already present.
        let mut fields = IndexMap::new();
        for field in descriptor.fields.get() {
            let ty = self.resolve_output_type(&field.raw_type.get(), field.options)?;
            let args = self.bind_params(&field.params)?;
            let resolver = self
                .registry
                .field_resolver(descriptor.target, &field.name)
                .map(|handler| self.factory.create_field_resolver(handler));
            fields.insert(
                field.name.clone(),
                FieldNode {
                    name: field.name.clone(),
                    description: field.description.clone(),
                    deprecation_reason: field.deprecation_reason.clone(),
                    ty,
                    args,
                    resolver,
                },
            );
        }
        if let Some(ancestor) = &ancestor {
            for (name, field) in ancestor.fields() {
                if !fields.contains_key(name) {
                    fields.insert(name.clone(), field.clone());
                }
            }
        }
        for interface in &interfaces {
            for (name, field) in interface.fields() {
                if !fields.contains_key(name) {
                    fields.insert(name.clone(), field.clone());
                }
            }
        }

        node.seal(interfaces, fields);
        self.resolving.remove(&descriptor.target);
        Ok(node)
    }

    fn resolve_input(&mut self, descriptor: &TypeDescriptor) -> Result<Arc<InputNode>> {
        let node = self.lookup_input(descriptor.target)?;
        if node.is_resolved() {
            return Ok(node);
        }
        if !self.resolving.insert(descriptor.target) {
            return Err(SchemaError::InheritanceCycle {
                name: descriptor.name.clone(),
            });
        }

        trace!(name = %descriptor.name, "Resolving input type");

        let ancestor = match descriptor.super_target {
            Some(target) => {
                let registry = self.registry;
                let parent = registry.input_type(target).ok_or_else(|| {
                    SchemaError::MissingRegistryEntry {
                        name: self.target_name(target),
                    }
                })?;
                Some(self.resolve_input(parent)?)
            }
            None => None,
        };

        let mut fields = IndexMap::new();
        for field in descriptor.fields.get() {
            let ty = self.resolve_input_type(&field.raw_type.get(), field.options)?;
            fields.insert(
                field.name.clone(),
                InputValueNode {
                    name: field.name.clone(),
                    description: field.description.clone(),
                    ty,
                },
            );
        }
        if let Some(ancestor) = &ancestor {
            for (name, field) in ancestor.fields() {
                if !fields.contains_key(name) {
                    fields.insert(name.clone(), field.clone());
                }
            }
        }

        node.seal(fields);
        self.resolving.remove(&descriptor.target);
        Ok(node)
    }

    /// Resolves a declared type in output position: scalar, then object,
    /// then interface, then fail naming the offender.
    fn resolve_output_type(
        &self,
        expr: &TypeExpr,
        options: TypeOptions,
    ) -> Result<Wrapped<OutputRef>> {
        if let Some(scalar) = self.scalars.try_scalar(expr) {
            return Ok(Wrapped::apply(OutputRef::Scalar(scalar), options));
        }
        if let TypeExpr::Target(target) = expr {
            if let Some(object) = self.cache.object(*target) {
                return Ok(Wrapped::apply(OutputRef::Object(object), options));
            }
            if let Some(interface) = self.cache.interface(*target) {
                return Ok(Wrapped::apply(OutputRef::Interface(interface), options));
            }
        }
        Err(SchemaError::UnresolvedOutputType {
            name: self.expr_name(expr),
        })
    }

    /// Resolves a declared type in input position: scalar, then input type.
    /// Interfaces and objects are never valid here.
    fn resolve_input_type(
        &self,
        expr: &TypeExpr,
        options: TypeOptions,
    ) -> Result<Wrapped<InputRef>> {
        if let Some(scalar) = self.scalars.try_scalar(expr) {
            return Ok(Wrapped::apply(InputRef::Scalar(scalar), options));
        }
        if let TypeExpr::Target(target) = expr
            && let Some(input) = self.cache.input(*target)
        {
            return Ok(Wrapped::apply(InputRef::Input(input), options));
        }
        Err(SchemaError::UnresolvedInputType {
            name: self.expr_name(expr),
        })
    }

    /// Binds a parameter list into a name-keyed argument map.
    ///
    /// Bundles expand outermost-ancestor-first, so a more-derived level's
    /// field silently replaces an ancestor's field of the same name.
    fn bind_params(
        &self,
        params: &[ParamDescriptor],
    ) -> Result<IndexMap<String, InputValueNode>> {
        let mut args = IndexMap::new();
        for param in params {
            match param {
                ParamDescriptor::Arg(arg) => {
                    let ty = self.resolve_input_type(&arg.raw_type.get(), arg.options)?;
                    args.insert(
                        arg.name.clone(),
                        InputValueNode {
                            name: arg.name.clone(),
                            description: arg.description.clone(),
                            ty,
                        },
                    );
                }
                ParamDescriptor::Bundle(bundle) => {
                    let expr = bundle.raw_type.get();
                    let TypeExpr::Target(target) = expr else {
                        return Err(SchemaError::MissingRegistryEntry {
                            name: self.expr_name(&expr),
                        });
                    };
                    for level in self.argument_chain(target)? {
                        for field in level.fields.get() {
                            let ty =
                                self.resolve_input_type(&field.raw_type.get(), field.options)?;
                            args.insert(
                                field.name.clone(),
                                InputValueNode {
                                    name: field.name.clone(),
                                    description: field.description.clone(),
                                    ty,
                                },
                            );
                        }
                    }
                }
            }
        }
        Ok(args)
    }

    /// The argument type's ancestor chain, outermost ancestor first,
    /// ending with the type itself.
    fn argument_chain(&self, target: TargetId) -> Result<Vec<&'a TypeDescriptor>> {
        let registry = self.registry;
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(target);
        while let Some(target) = current {
            if !seen.insert(target) {
                return Err(SchemaError::InheritanceCycle {
                    name: self.target_name(target),
                });
            }
            let descriptor =
                registry
                    .argument_type(target)
                    .ok_or_else(|| SchemaError::MissingRegistryEntry {
                        name: self.target_name(target),
                    })?;
            chain.push(descriptor);
            current = descriptor.super_target;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Assembles a root operation node from a flat handler list.
    fn build_root(
        &self,
        name: &str,
        description: &str,
        handlers: &[HandlerDescriptor],
    ) -> Result<Arc<ObjectNode>> {
        debug!(root = name, handler_count = handlers.len(), "Building root operation type");

        let mut fields = IndexMap::new();
        for handler in handlers {
            let ty = self.resolve_output_type(&handler.return_type.get(), handler.return_options)?;
            let args = self.bind_params(&handler.params)?;
            trace!(root = name, field = %handler.method_name, "Added root field");
            fields.insert(
                handler.method_name.clone(),
                FieldNode {
                    name: handler.method_name.clone(),
                    description: handler.description.clone(),
                    deprecation_reason: handler.deprecation_reason.clone(),
                    ty,
                    args,
                    resolver: Some(self.factory.create_resolver(handler)),
                },
            );
        }

        let node = Arc::new(ObjectNode::root(name, description));
        node.seal(Vec::new(), fields);
        Ok(node)
    }

    fn lookup_object(&self, target: TargetId) -> Result<Arc<ObjectNode>> {
        self.cache
            .object(target)
            .ok_or_else(|| SchemaError::MissingRegistryEntry {
                name: self.target_name(target),
            })
    }

    fn lookup_interface(&self, target: TargetId) -> Result<Arc<InterfaceNode>> {
        self.cache
            .interface(target)
            .ok_or_else(|| SchemaError::MissingRegistryEntry {
                name: self.target_name(target),
            })
    }

    fn lookup_input(&self, target: TargetId) -> Result<Arc<InputNode>> {
        self.cache
            .input(target)
            .ok_or_else(|| SchemaError::MissingRegistryEntry {
                name: self.target_name(target),
            })
    }

    fn expr_name(&self, expr: &TypeExpr) -> String {
        match expr {
            TypeExpr::Scalar(token) => token.name().to_string(),
            TypeExpr::Target(target) => self.target_name(*target),
        }
    }

    fn target_name(&self, target: TargetId) -> String {
        self.registry
            .type_name(target)
            .map(str::to_string)
            .unwrap_or_else(|| target.to_string())
    }
}
