//! # gqlforge-core
//!
//! Descriptor data model and metadata registry for the gqlforge schema
//! compiler.
//!
//! This crate holds everything the compiler consumes: target identities,
//! type/field/parameter/handler descriptors with lazily-evaluated type
//! accessors, and the caller-owned [`MetadataRegistry`] they are collected
//! into. It contains no resolution logic; the compiler lives in
//! `gqlforge-schema`.
//!
//! ## Modules
//!
//! - [`target`] - Target identities (stable handles for declared types)
//! - [`types`] - Declared type references and nullability/list options
//! - [`thunk`] - Lazy type and field-list accessors
//! - [`descriptor`] - Pre-resolution descriptors for types, fields, params,
//!   and handlers
//! - [`registry`] - The caller-owned metadata registry and its builder
//! - [`validation`] - Argument validation settings and merge semantics

pub mod descriptor;
pub mod registry;
pub mod target;
pub mod thunk;
pub mod types;
pub mod validation;

pub use descriptor::{
    ArgParam, BundleParam, DebuggableTypeCheck, FieldDescriptor, HandlerDescriptor,
    ParamDescriptor, TypeCheckFn, TypeDescriptor,
};
pub use registry::{MetadataRegistry, RegistryBuilder};
pub use target::TargetId;
pub use thunk::{FieldsThunk, TypeThunk};
pub use types::{ScalarToken, TypeExpr, TypeOptions};
pub use validation::{ValidateOverride, ValidationSettings, ValidatorOptions, effective_options};
