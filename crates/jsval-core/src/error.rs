//! # Error Types — Validation Failure Taxonomy
//!
//! Defines the error types returned by every constraint in jsval. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation is first-failure-wins: a constraint returns exactly one
//!   [`ValidationError`] describing the first violation it encountered.
//! - Failures inside a named property carry the property name and box the
//!   nested cause, so the full path is recoverable through `source()`.
//! - Schema-dependency failures are returned as-is (no wrapping variant).

use thiserror::Error;

/// Result type for constraint validation.
pub type ValidationResult = Result<(), ValidationError>;

/// A single validation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The value is neither a keyed mapping nor a named-field record.
    #[error("cannot get property names from a value of kind {kind}")]
    UnsupportedShape {
        /// Kind of the rejected value.
        kind: &'static str,
    },

    /// A keyed mapping used a key that is not a string.
    #[error("can only handle maps with string keys (found a {kind} key)")]
    NonStringKey {
        /// Kind of the offending key.
        kind: &'static str,
    },

    /// A record exposes two fields under the same property name.
    #[error("record exposes more than one field named '{name}'")]
    DuplicateProperty {
        /// The colliding exposed name.
        name: String,
    },

    /// An enumerated property name could not be fetched back from the value.
    #[error("property '{name}' is enumerated but cannot be resolved")]
    UnresolvedProperty {
        /// The enumerated name.
        name: String,
    },

    /// The value has fewer properties than `minProperties`.
    #[error("fewer properties than minProperties ({count} < {min})")]
    TooFewProperties {
        /// Number of enumerable properties in the value.
        count: usize,
        /// Configured lower bound.
        min: usize,
    },

    /// The value has more properties than `maxProperties`.
    #[error("more properties than maxProperties ({count} > {max})")]
    TooManyProperties {
        /// Number of enumerable properties in the value.
        count: usize,
        /// Configured upper bound.
        max: usize,
    },

    /// A required property is absent.
    #[error("object property '{name}' is required")]
    MissingRequired {
        /// Name of the missing property.
        name: String,
    },

    /// A property matched by name or pattern failed its constraint.
    #[error("object property '{name}' validation failed: {source}")]
    Property {
        /// Name of the failing property.
        name: String,
        /// The nested failure.
        source: Box<ValidationError>,
    },

    /// A property matched no rule and additional properties are forbidden.
    #[error("additional properties are not allowed (found '{name}')")]
    AdditionalNotAllowed {
        /// First unmatched property name.
        name: String,
    },

    /// A property matched no rule and failed the additional-properties constraint.
    #[error("additional property '{name}' validation failed: {source}")]
    AdditionalProperty {
        /// Name of the failing property.
        name: String,
        /// The nested failure.
        source: Box<ValidationError>,
    },

    /// A present property requires another property that is absent.
    #[error("property '{name}' requires dependency '{dependency}', which is missing")]
    MissingDependency {
        /// The property whose presence triggered the check.
        name: String,
        /// The missing co-property.
        dependency: String,
    },

    /// The value is of the wrong kind for a leaf constraint.
    #[error("expected a value of kind {expected}, found {found}")]
    TypeMismatch {
        /// Kind the constraint accepts.
        expected: &'static str,
        /// Kind that was supplied.
        found: &'static str,
    },

    /// A pattern passed to a builder does not compile.
    #[error("invalid property pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// Generic failure reported by an externally implemented constraint.
    #[error("{reason}")]
    Invalid {
        /// Human-readable description of the violation.
        reason: String,
    },
}

impl ValidationError {
    /// Failure reported by a constraint outside this workspace.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    /// Attach a property name to a nested failure.
    pub fn property(name: impl Into<String>, source: ValidationError) -> Self {
        Self::Property {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Attach a property name to a failure of the additional-properties constraint.
    pub fn additional(name: impl Into<String>, source: ValidationError) -> Self {
        Self::AdditionalProperty {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// The property this error is attached to, if any.
    pub fn property_name(&self) -> Option<&str> {
        match self {
            Self::MissingRequired { name }
            | Self::Property { name, .. }
            | Self::AdditionalNotAllowed { name }
            | Self::AdditionalProperty { name, .. }
            | Self::MissingDependency { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true for errors raised before any property was examined
    /// because the value could not be read as an object.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedShape { .. }
                | Self::NonStringKey { .. }
                | Self::DuplicateProperty { .. }
                | Self::UnresolvedProperty { .. }
        )
    }
}

/// Error converting foreign data into a [`Value`](crate::Value).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// A YAML mapping key has no [`MapKey`](crate::MapKey) representation.
    #[error("unsupported map key of kind {kind}")]
    UnsupportedKey {
        /// Kind of the offending key.
        kind: &'static str,
    },

    /// A number fits neither `i64` nor `f64`.
    #[error("unsupported number: {0}")]
    UnsupportedNumber(String),
}
