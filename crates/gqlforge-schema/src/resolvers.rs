//! Resolver factory boundary.
//!
//! The factory turns handler and field-resolver descriptors into the
//! callables invoked at execution time. The factory, not the builder, is
//! responsible for running the argument-validation step before user logic;
//! validation failures are scoped to the single invocation.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::trace;

use gqlforge_core::descriptor::{HandlerDescriptor, ParamDescriptor};
use gqlforge_core::validation::{ValidationSettings, ValidatorOptions, effective_options};

use crate::error::{ResolveError, ValidationFailure, Violation};

/// Everything a resolver invocation receives.
#[derive(Debug, Clone, Copy)]
pub struct ResolverInput<'a> {
    /// The parent value the field is resolved against.
    pub source: &'a Value,
    /// Named argument values for this invocation.
    pub args: &'a Map<String, Value>,
    /// Request-scoped context supplied by the executor.
    pub context: &'a Value,
}

/// The callable bound to a field, invoked by the executor.
pub type ResolverFn =
    Arc<dyn Fn(ResolverInput<'_>) -> Result<Value, ResolveError> + Send + Sync>;

/// Produces resolver callables for handler descriptors.
pub trait ResolverFactory {
    /// Resolver for a query or mutation handler.
    fn create_resolver(&self, handler: &HandlerDescriptor) -> ResolverFn;

    /// Resolver for a declared computed-field handler.
    fn create_field_resolver(&self, handler: &HandlerDescriptor) -> ResolverFn;
}

/// The pluggable per-argument value-checking step.
pub trait ArgumentValidator: Send + Sync {
    /// Checks one argument value against the effective options.
    fn check(
        &self,
        argument: &str,
        value: &Value,
        options: &ValidatorOptions,
    ) -> std::result::Result<(), Violation>;
}

/// Resolver factory reading properties from JSON parent values.
///
/// Handlers resolve to `source[method_name]`; missing properties resolve to
/// null. When a validator is attached, every single-argument parameter's
/// effective validation options are computed up front (global settings
/// merged with per-argument overrides) and checked before the property read.
/// Bundle-expanded arguments carry no per-argument override, so any argument
/// value not claimed by a single-argument parameter is checked under the
/// global options whenever the handler declares a bundle.
#[derive(Default)]
pub struct JsonResolverFactory {
    validation: ValidationSettings,
    validator: Option<Arc<dyn ArgumentValidator>>,
}

impl JsonResolverFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validation(mut self, settings: ValidationSettings) -> Self {
        self.validation = settings;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn ArgumentValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    fn bind(&self, handler: &HandlerDescriptor) -> ResolverFn {
        // Effective options are fixed at bind time; only the values vary
        // per invocation.
        let checks: Vec<(String, ValidatorOptions)> = handler
            .params
            .iter()
            .filter_map(|param| match param {
                ParamDescriptor::Arg(arg) => {
                    effective_options(&self.validation, arg.validate.as_ref())
                        .map(|options| (arg.name.clone(), options))
                }
                ParamDescriptor::Bundle(_) => None,
            })
            .collect();

        // Bundle fields have no override of their own; the global options
        // apply to every value not claimed by a single argument. A single
        // argument stays claimed even when its own override disabled
        // validation.
        let single_names: Vec<String> = handler
            .params
            .iter()
            .filter_map(|param| match param {
                ParamDescriptor::Arg(arg) => Some(arg.name.clone()),
                ParamDescriptor::Bundle(_) => None,
            })
            .collect();
        let bundle_options = handler
            .params
            .iter()
            .any(|param| matches!(param, ParamDescriptor::Bundle(_)))
            .then(|| effective_options(&self.validation, None))
            .flatten();

        let validator = self.validator.clone();
        let method_name = handler.method_name.clone();

        trace!(
            method = %method_name,
            checked_args = checks.len(),
            "Binding JSON property resolver"
        );

        Arc::new(move |input: ResolverInput<'_>| {
            if let Some(validator) = &validator {
                let mut violations = Vec::new();
                for (name, options) in &checks {
                    match input.args.get(name) {
                        Some(value) => {
                            if let Err(violation) = validator.check(name, value, options) {
                                violations.push(violation);
                            }
                        }
                        None => {
                            if !options.skip_missing_properties() {
                                violations.push(Violation {
                                    field: name.clone(),
                                    message: "missing required argument".to_string(),
                                });
                            }
                        }
                    }
                }
                if let Some(options) = &bundle_options {
                    for (name, value) in input.args {
                        if single_names.contains(name) {
                            continue;
                        }
                        if let Err(violation) = validator.check(name, value, options) {
                            violations.push(violation);
                        }
                    }
                }
                if !violations.is_empty() {
                    return Err(ResolveError::Validation(ValidationFailure { violations }));
                }
            }

            Ok(input
                .source
                .get(&method_name)
                .cloned()
                .unwrap_or(Value::Null))
        })
    }
}

impl ResolverFactory for JsonResolverFactory {
    fn create_resolver(&self, handler: &HandlerDescriptor) -> ResolverFn {
        self.bind(handler)
    }

    fn create_field_resolver(&self, handler: &HandlerDescriptor) -> ResolverFn {
        self.bind(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlforge_core::types::{ScalarToken, TypeOptions};
    use gqlforge_core::validation::ValidateOverride;
    use serde_json::json;

    struct RejectNegative;

    impl ArgumentValidator for RejectNegative {
        fn check(
            &self,
            argument: &str,
            value: &Value,
            _options: &ValidatorOptions,
        ) -> std::result::Result<(), Violation> {
            if value.as_i64().is_some_and(|n| n < 0) {
                return Err(Violation {
                    field: argument.to_string(),
                    message: "must not be negative".to_string(),
                });
            }
            Ok(())
        }
    }

    fn invoke(resolver: &ResolverFn, source: Value, args: Value) -> Result<Value, ResolveError> {
        let args = args.as_object().cloned().unwrap_or_default();
        resolver(ResolverInput {
            source: &source,
            args: &args,
            context: &Value::Null,
        })
    }

    #[test]
    fn test_resolver_reads_source_property_by_method_name() {
        let factory = JsonResolverFactory::new();
        let handler =
            HandlerDescriptor::new("title", ScalarToken::String, TypeOptions::default());
        let resolver = factory.create_resolver(&handler);

        let value = invoke(&resolver, json!({"title": "hello"}), json!({})).unwrap();
        assert_eq!(value, json!("hello"));

        let missing = invoke(&resolver, json!({}), json!({})).unwrap();
        assert_eq!(missing, Value::Null);
    }

    #[test]
    fn test_validator_rejects_invalid_argument() {
        let factory = JsonResolverFactory::new().with_validator(Arc::new(RejectNegative));
        let handler = HandlerDescriptor::new("posts", ScalarToken::String, TypeOptions::default())
            .with_params(vec![ParamDescriptor::arg(
                "limit",
                ScalarToken::Int,
                TypeOptions::nullable(),
            )]);
        let resolver = factory.create_resolver(&handler);

        let err = invoke(&resolver, json!({}), json!({"limit": -5})).unwrap_err();
        match err {
            ResolveError::Validation(failure) => {
                assert_eq!(failure.violations.len(), 1);
                assert_eq!(failure.violations[0].field, "limit");
            }
            other => panic!("expected validation failure, got {other}"),
        }

        // Valid value passes through to the property read
        assert!(invoke(&resolver, json!({"posts": []}), json!({"limit": 5})).is_ok());
    }

    #[test]
    fn test_false_override_skips_validation_for_that_argument() {
        let factory = JsonResolverFactory::new().with_validator(Arc::new(RejectNegative));
        let handler = HandlerDescriptor::new("posts", ScalarToken::String, TypeOptions::default())
            .with_params(vec![
                ParamDescriptor::arg("limit", ScalarToken::Int, TypeOptions::nullable())
                    .with_validate(ValidateOverride::Enabled(false)),
            ]);
        let resolver = factory.create_resolver(&handler);

        assert!(invoke(&resolver, json!({}), json!({"limit": -5})).is_ok());
    }

    #[test]
    fn test_bundle_arguments_validated_under_global_options() {
        let mut builder = gqlforge_core::registry::RegistryBuilder::new();
        let paging = builder.target();

        let factory = JsonResolverFactory::new().with_validator(Arc::new(RejectNegative));
        let handler = HandlerDescriptor::new("posts", ScalarToken::String, TypeOptions::default())
            .with_params(vec![ParamDescriptor::bundle(paging)]);
        let resolver = factory.create_resolver(&handler);

        let err = invoke(&resolver, json!({}), json!({"limit": -5})).unwrap_err();
        match err {
            ResolveError::Validation(failure) => {
                assert_eq!(failure.violations[0].field, "limit");
            }
            other => panic!("expected validation failure, got {other}"),
        }

        assert!(invoke(&resolver, json!({"posts": []}), json!({"limit": 5})).is_ok());
    }

    #[test]
    fn test_disabled_global_validation_exempts_bundle_arguments() {
        let mut builder = gqlforge_core::registry::RegistryBuilder::new();
        let paging = builder.target();

        let factory = JsonResolverFactory::new()
            .with_validation(ValidationSettings {
                enabled: false,
                ..Default::default()
            })
            .with_validator(Arc::new(RejectNegative));
        let handler = HandlerDescriptor::new("posts", ScalarToken::String, TypeOptions::default())
            .with_params(vec![ParamDescriptor::bundle(paging)]);
        let resolver = factory.create_resolver(&handler);

        assert!(invoke(&resolver, json!({}), json!({"limit": -5})).is_ok());
    }

    #[test]
    fn test_argument_override_still_wins_next_to_a_bundle() {
        let mut builder = gqlforge_core::registry::RegistryBuilder::new();
        let paging = builder.target();

        let factory = JsonResolverFactory::new().with_validator(Arc::new(RejectNegative));
        let handler = HandlerDescriptor::new("posts", ScalarToken::String, TypeOptions::default())
            .with_params(vec![
                ParamDescriptor::arg("depth", ScalarToken::Int, TypeOptions::nullable())
                    .with_validate(ValidateOverride::Enabled(false)),
                ParamDescriptor::bundle(paging),
            ]);
        let resolver = factory.create_resolver(&handler);

        // The exempted single argument stays exempt; the bundle value does not
        assert!(invoke(&resolver, json!({}), json!({"depth": -1})).is_ok());
        let err = invoke(&resolver, json!({}), json!({"depth": -1, "limit": -5})).unwrap_err();
        match err {
            ResolveError::Validation(failure) => {
                assert_eq!(failure.violations.len(), 1);
                assert_eq!(failure.violations[0].field, "limit");
            }
            other => panic!("expected validation failure, got {other}"),
        }
    }

    #[test]
    fn test_missing_argument_tolerated_unless_overridden() {
        let factory = JsonResolverFactory::new().with_validator(Arc::new(RejectNegative));

        // Default: skip_missing_properties = true
        let tolerant = HandlerDescriptor::new("posts", ScalarToken::String, TypeOptions::default())
            .with_params(vec![ParamDescriptor::arg(
                "limit",
                ScalarToken::Int,
                TypeOptions::nullable(),
            )]);
        let resolver = factory.create_resolver(&tolerant);
        assert!(invoke(&resolver, json!({}), json!({})).is_ok());

        // Explicit skip-missing-properties = false
        let strict = HandlerDescriptor::new("posts", ScalarToken::String, TypeOptions::default())
            .with_params(vec![
                ParamDescriptor::arg("limit", ScalarToken::Int, TypeOptions::nullable())
                    .with_validate(ValidateOverride::Options(ValidatorOptions {
                        skip_missing_properties: Some(false),
                        ..Default::default()
                    })),
            ]);
        let resolver = factory.create_resolver(&strict);
        let err = invoke(&resolver, json!({}), json!({})).unwrap_err();
        assert!(matches!(err, ResolveError::Validation(_)));
    }
}
