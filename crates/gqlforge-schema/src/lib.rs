//! # gqlforge-schema
//!
//! Compiles a metadata registry of class/interface/field descriptors into a
//! single consistent, cross-referenced GraphQL type graph, plus the resolver
//! bindings needed to execute requests against it.
//!
//! The build is a pure, single-threaded, in-memory transformation over an
//! already-collected [`MetadataRegistry`](gqlforge_core::MetadataRegistry):
//! no I/O, no request lifecycle, no execution. The finished
//! [`SchemaGraph`] (root query node, optional root mutation node, and the
//! full named-type list) is handed to an external GraphQL-style executor.
//!
//! ## Guarantees
//!
//! - Exactly one resolved node per target identity: every reference to the
//!   same declared type, anywhere in the graph, is the identical `Arc`.
//! - Inherited fields are merged with own fields winning over ancestor
//!   fields, which win over interface fields.
//! - Every build-time inconsistency (missing registry entry, unresolvable
//!   type, duplicate registration, inheritance cycle) is fatal and
//!   surfaced synchronously; no partial schema escapes.
//!
//! ## Modules
//!
//! - [`builder`] - The two-phase type graph builder and build entry point
//! - [`graph`] - Resolved graph nodes and the schema output
//! - [`cache`] - Identity-keyed type resolution cache
//! - [`scalars`] - Scalar resolution boundary
//! - [`resolvers`] - Resolver factory boundary and argument validation glue
//! - [`error`] - Build-time and request-time error types

pub mod builder;
pub mod cache;
pub mod error;
pub mod graph;
pub mod resolvers;
pub mod scalars;

pub use builder::{SchemaBuilder, build_schema};
pub use cache::ResolutionCache;
pub use error::{ResolveError, Result, SchemaError, TypeKind, ValidationFailure, Violation};
pub use graph::{
    FieldNode, InputNode, InputRef, InputValueNode, InterfaceNode, NamedType, ObjectNode,
    OutputRef, ScalarNode, SchemaGraph, TYPE_TAG_FIELD, TypeCheck, TypeName, Wrapped,
};
pub use resolvers::{
    ArgumentValidator, JsonResolverFactory, ResolverFactory, ResolverFn, ResolverInput,
};
pub use scalars::{DefaultScalarResolver, ScalarResolver};
