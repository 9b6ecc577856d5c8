//! Argument validation settings.
//!
//! Validation itself is a pluggable value-checking step owned by the
//! resolver factory; this module only defines how the global settings and
//! per-argument overrides combine into the options passed to that step.
//!
//! Rules:
//! - a `false` override disables validation for that argument regardless of
//!   the global setting;
//! - a `true` override uses the global options as-is;
//! - an options override is field-merged over the global options, override
//!   fields winning;
//! - `skip_missing_properties` defaults to `true` unless explicitly
//!   overridden to `false`.

use serde::{Deserialize, Serialize};

/// Options handed to the value-checking step for one argument.
///
/// Fields are optional so an override can state only what it changes; the
/// defaults are applied by the accessor methods after merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ValidatorOptions {
    /// Tolerate properties missing from the checked value. Defaults to true.
    pub skip_missing_properties: Option<bool>,
    /// Reject values carrying properties the type does not declare.
    pub forbid_unknown_values: Option<bool>,
    /// Validation groups to apply.
    pub groups: Option<Vec<String>>,
}

impl ValidatorOptions {
    /// Returns `self` merged over `base`: fields set on `self` win.
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            skip_missing_properties: self
                .skip_missing_properties
                .or(base.skip_missing_properties),
            forbid_unknown_values: self.forbid_unknown_values.or(base.forbid_unknown_values),
            groups: self.groups.clone().or_else(|| base.groups.clone()),
        }
    }

    /// Effective `skip_missing_properties`, defaulting to `true`.
    pub fn skip_missing_properties(&self) -> bool {
        self.skip_missing_properties.unwrap_or(true)
    }

    /// Effective `forbid_unknown_values`, defaulting to `false`.
    pub fn forbid_unknown_values(&self) -> bool {
        self.forbid_unknown_values.unwrap_or(false)
    }
}

/// Global validation configuration for a resolver factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ValidationSettings {
    /// Whether arguments are validated when no per-argument override says
    /// otherwise.
    pub enabled: bool,
    /// Options passed to the value-checking step.
    pub options: ValidatorOptions,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            options: ValidatorOptions::default(),
        }
    }
}

/// Per-argument validation override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidateOverride {
    /// Force validation on (with the global options) or off.
    Enabled(bool),
    /// Validate with these options merged over the global ones.
    Options(ValidatorOptions),
}

/// Resolves the options the value-checking step receives for one argument.
///
/// Returns `None` when validation is disabled for the argument.
pub fn effective_options(
    global: &ValidationSettings,
    per_arg: Option<&ValidateOverride>,
) -> Option<ValidatorOptions> {
    match per_arg {
        Some(ValidateOverride::Enabled(false)) => None,
        Some(ValidateOverride::Enabled(true)) => Some(global.options.clone()),
        Some(ValidateOverride::Options(over)) => Some(over.merged_over(&global.options)),
        None => global.enabled.then(|| global.options.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_false_override_disables_regardless_of_global() {
        let global = ValidationSettings::default();
        assert!(global.enabled);
        assert_eq!(
            effective_options(&global, Some(&ValidateOverride::Enabled(false))),
            None
        );
    }

    #[test]
    fn test_true_override_enables_with_global_options() {
        let global = ValidationSettings {
            enabled: false,
            options: ValidatorOptions {
                groups: Some(vec!["create".into()]),
                ..Default::default()
            },
        };
        let opts = effective_options(&global, Some(&ValidateOverride::Enabled(true))).unwrap();
        assert_eq!(opts.groups, Some(vec!["create".to_string()]));
    }

    #[test]
    fn test_options_override_fields_win_over_global() {
        let global = ValidationSettings {
            enabled: true,
            options: ValidatorOptions {
                skip_missing_properties: Some(true),
                forbid_unknown_values: Some(true),
                groups: Some(vec!["update".into()]),
            },
        };
        let over = ValidateOverride::Options(ValidatorOptions {
            skip_missing_properties: Some(false),
            ..Default::default()
        });

        let opts = effective_options(&global, Some(&over)).unwrap();
        assert!(!opts.skip_missing_properties());
        // Unset override fields fall back to the global options
        assert!(opts.forbid_unknown_values());
        assert_eq!(opts.groups, Some(vec!["update".to_string()]));
    }

    #[test]
    fn test_skip_missing_properties_defaults_true() {
        let opts = ValidatorOptions::default();
        assert!(opts.skip_missing_properties());
        assert!(!opts.forbid_unknown_values());

        let global = ValidationSettings::default();
        let opts = effective_options(&global, None).unwrap();
        assert!(opts.skip_missing_properties());
    }

    #[test]
    fn test_disabled_global_without_override_yields_none() {
        let global = ValidationSettings {
            enabled: false,
            ..Default::default()
        };
        assert_eq!(effective_options(&global, None), None);
    }
}
