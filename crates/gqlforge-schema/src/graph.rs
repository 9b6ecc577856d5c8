//! The resolved type graph.
//!
//! These are the nodes the compiler produces and the executor consumes:
//! interface, object, and input types, their fields and arguments, and the
//! finished [`SchemaGraph`]. Nodes are `Arc`-shared; every reference to the
//! same declared type across the whole graph is the identical node instance.
//!
//! Field maps and interface lists are memoized behind `OnceLock` and set
//! exactly once during the second build phase. Node shells exist (and can be
//! referenced from other nodes' field types) before their own fields are
//! resolved, which is what permits forward, self, and mutual references
//! among declared types.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use gqlforge_core::descriptor::{TypeCheckFn, TypeDescriptor};
use gqlforge_core::target::TargetId;
use gqlforge_core::types::TypeOptions;

use crate::resolvers::ResolverFn;

/// JSON field carrying the concrete type tag on runtime values.
pub const TYPE_TAG_FIELD: &str = "__typename";

/// Concrete-type discriminator attached to an object node.
///
/// Replaces runtime nominal-instance checks: a value either carries a stored
/// type tag checked against the type's own name and its registry
/// descendants, or the caller registered an explicit predicate.
#[derive(Clone)]
pub enum TypeCheck {
    /// The only possible concrete type for its shape; always matches.
    Always,
    /// Matches when the value's type tag is one of these names.
    Tags(HashSet<String>),
    /// Caller-registered predicate.
    Predicate(TypeCheckFn),
}

impl TypeCheck {
    /// Whether a candidate runtime value is an instance of this type.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            Self::Always => true,
            Self::Tags(tags) => value
                .get(TYPE_TAG_FIELD)
                .and_then(|tag| tag.as_str())
                .is_some_and(|tag| tags.contains(tag)),
            Self::Predicate(check) => check(value),
        }
    }
}

impl fmt::Debug for TypeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("TypeCheck::Always"),
            Self::Tags(tags) => f.debug_tuple("TypeCheck::Tags").field(tags).finish(),
            Self::Predicate(_) => f.write_str("TypeCheck::Predicate(..)"),
        }
    }
}

/// A resolved scalar leaf type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarNode {
    pub name: String,
    pub description: Option<String>,
}

impl ScalarNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Types that render as a GraphQL type name.
pub trait TypeName {
    fn type_name(&self) -> &str;
}

impl TypeName for ScalarNode {
    fn type_name(&self) -> &str {
        &self.name
    }
}

/// Nullability/list wrapping applied over a base type reference.
///
/// Renders in GraphQL notation, e.g. `[Post!]!`.
#[derive(Debug, Clone)]
pub enum Wrapped<T> {
    Base(T),
    NonNull(Box<Wrapped<T>>),
    List(Box<Wrapped<T>>),
}

impl<T> Wrapped<T> {
    /// Applies type options to a base reference: non-null wrapping unless
    /// `nullable`, list wrapping if `is_array`, with independent nullability
    /// of the list container and its items.
    pub fn apply(base: T, options: TypeOptions) -> Self {
        let mut ty = Self::Base(base);
        if options.is_array {
            if !options.nullable_items {
                ty = ty.non_null();
            }
            ty = Self::List(Box::new(ty));
        }
        if !options.nullable {
            ty = ty.non_null();
        }
        ty
    }

    fn non_null(self) -> Self {
        Self::NonNull(Box::new(self))
    }

    /// The innermost base reference.
    pub fn base(&self) -> &T {
        match self {
            Self::Base(base) => base,
            Self::NonNull(inner) | Self::List(inner) => inner.base(),
        }
    }

    /// Whether the outermost wrapper is non-null.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }
}

impl<T: TypeName> fmt::Display for Wrapped<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(base) => f.write_str(base.type_name()),
            Self::NonNull(inner) => write!(f, "{inner}!"),
            Self::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

/// Base reference in output position: scalar, object, or interface.
#[derive(Clone)]
pub enum OutputRef {
    Scalar(ScalarNode),
    Object(Arc<ObjectNode>),
    Interface(Arc<InterfaceNode>),
}

impl OutputRef {
    pub fn as_object(&self) -> Option<&Arc<ObjectNode>> {
        match self {
            Self::Object(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&Arc<InterfaceNode>> {
        match self {
            Self::Interface(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarNode> {
        match self {
            Self::Scalar(node) => Some(node),
            _ => None,
        }
    }
}

impl TypeName for OutputRef {
    fn type_name(&self) -> &str {
        match self {
            Self::Scalar(node) => &node.name,
            Self::Object(node) => node.name(),
            Self::Interface(node) => node.name(),
        }
    }
}

impl fmt::Debug for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputRef({})", self.type_name())
    }
}

/// Base reference in input position: scalar or input type.
#[derive(Clone)]
pub enum InputRef {
    Scalar(ScalarNode),
    Input(Arc<InputNode>),
}

impl InputRef {
    pub fn as_input(&self) -> Option<&Arc<InputNode>> {
        match self {
            Self::Input(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarNode> {
        match self {
            Self::Scalar(node) => Some(node),
            _ => None,
        }
    }
}

impl TypeName for InputRef {
    fn type_name(&self) -> &str {
        match self {
            Self::Scalar(node) => &node.name,
            Self::Input(node) => node.name(),
        }
    }
}

impl fmt::Debug for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputRef({})", self.type_name())
    }
}

/// A named input value: a field argument or an input-type field.
#[derive(Debug, Clone)]
pub struct InputValueNode {
    pub name: String,
    pub description: Option<String>,
    pub ty: Wrapped<InputRef>,
}

/// A resolved field on an object or interface node.
#[derive(Clone)]
pub struct FieldNode {
    pub name: String,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    pub ty: Wrapped<OutputRef>,
    pub args: IndexMap<String, InputValueNode>,
    /// Bound resolver; absent fields fall back to the executor's default
    /// property access.
    pub resolver: Option<ResolverFn>,
}

impl fmt::Debug for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldNode")
            .field("name", &self.name)
            .field("ty", &self.ty.to_string())
            .field("args", &self.args.keys().collect::<Vec<_>>())
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}

const UNRESOLVED: &str = "type graph node accessed before field resolution";

/// A resolved interface type.
///
/// Interfaces carry no resolvers or arguments; only object types bind
/// execution for a given field name.
pub struct InterfaceNode {
    name: String,
    description: Option<String>,
    target: TargetId,
    fields: OnceLock<IndexMap<String, FieldNode>>,
}

impl InterfaceNode {
    pub(crate) fn shell(descriptor: &TypeDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            target: descriptor.target,
            fields: OnceLock::new(),
        }
    }

    pub(crate) fn seal(&self, fields: IndexMap<String, FieldNode>) {
        // Guarded by the builder's is_resolved check; a second seal is
        // unreachable.
        let _ = self.fields.set(fields);
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.fields.get().is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn fields(&self) -> &IndexMap<String, FieldNode> {
        self.fields.get().expect(UNRESOLVED)
    }

    pub fn field(&self, name: &str) -> Option<&FieldNode> {
        self.fields().get(name)
    }
}

impl fmt::Debug for InterfaceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InterfaceNode({})", self.name)
    }
}

/// A resolved object type.
pub struct ObjectNode {
    name: String,
    description: Option<String>,
    /// Absent on the synthesized root operation types.
    target: Option<TargetId>,
    type_check: TypeCheck,
    interfaces: OnceLock<Vec<Arc<InterfaceNode>>>,
    fields: OnceLock<IndexMap<String, FieldNode>>,
}

impl ObjectNode {
    pub(crate) fn shell(descriptor: &TypeDescriptor, type_check: TypeCheck) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            target: Some(descriptor.target),
            type_check,
            interfaces: OnceLock::new(),
            fields: OnceLock::new(),
        }
    }

    pub(crate) fn root(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            target: None,
            type_check: TypeCheck::Always,
            interfaces: OnceLock::new(),
            fields: OnceLock::new(),
        }
    }

    pub(crate) fn seal(
        &self,
        interfaces: Vec<Arc<InterfaceNode>>,
        fields: IndexMap<String, FieldNode>,
    ) {
        let _ = self.interfaces.set(interfaces);
        let _ = self.fields.set(fields);
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.fields.get().is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    /// The type-identity predicate the executor uses to pick a concrete
    /// type for an abstract result.
    pub fn type_check(&self) -> &TypeCheck {
        &self.type_check
    }

    /// Implemented interfaces, explicit and inherited, first-seen order.
    pub fn interfaces(&self) -> &[Arc<InterfaceNode>] {
        self.interfaces.get().expect(UNRESOLVED)
    }

    pub fn fields(&self) -> &IndexMap<String, FieldNode> {
        self.fields.get().expect(UNRESOLVED)
    }

    pub fn field(&self, name: &str) -> Option<&FieldNode> {
        self.fields().get(name)
    }
}

impl fmt::Debug for ObjectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectNode({})", self.name)
    }
}

/// A resolved input type.
pub struct InputNode {
    name: String,
    description: Option<String>,
    target: TargetId,
    fields: OnceLock<IndexMap<String, InputValueNode>>,
}

impl InputNode {
    pub(crate) fn shell(descriptor: &TypeDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            target: descriptor.target,
            fields: OnceLock::new(),
        }
    }

    pub(crate) fn seal(&self, fields: IndexMap<String, InputValueNode>) {
        let _ = self.fields.set(fields);
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.fields.get().is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn fields(&self) -> &IndexMap<String, InputValueNode> {
        self.fields.get().expect(UNRESOLVED)
    }

    pub fn field(&self, name: &str) -> Option<&InputValueNode> {
        self.fields().get(name)
    }
}

impl fmt::Debug for InputNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputNode({})", self.name)
    }
}

/// A named type the executor must know about, listed in the graph output
/// even when unreachable from the root fields.
#[derive(Debug, Clone)]
pub enum NamedType {
    Object(Arc<ObjectNode>),
    Interface(Arc<InterfaceNode>),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            Self::Object(node) => node.name(),
            Self::Interface(node) => node.name(),
        }
    }
}

/// The finished schema graph: the sole output of a generation call.
///
/// Input types are not listed separately; they are reachable only through
/// argument and input-field type references.
#[derive(Debug)]
pub struct SchemaGraph {
    pub query: Arc<ObjectNode>,
    pub mutation: Option<Arc<ObjectNode>>,
    pub types: Vec<NamedType>,
}

impl SchemaGraph {
    /// Looks up a listed named type by name.
    pub fn named_type(&self, name: &str) -> Option<&NamedType> {
        self.types.iter().find(|t| t.name() == name)
    }

    /// Looks up a listed object type by name.
    pub fn object(&self, name: &str) -> Option<&Arc<ObjectNode>> {
        self.types.iter().find_map(|t| match t {
            NamedType::Object(node) if node.name() == name => Some(node),
            _ => None,
        })
    }

    /// Looks up a listed interface type by name.
    pub fn interface(&self, name: &str) -> Option<&Arc<InterfaceNode>> {
        self.types.iter().find_map(|t| match t {
            NamedType::Interface(node) if node.name() == name => Some(node),
            _ => None,
        })
    }
}
