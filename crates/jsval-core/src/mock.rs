//! # Mock Constraints
//!
//! Minimal leaf constraints for exercising constraint composition without
//! the primitive constraint library. They check the *kind* of a value and
//! nothing else: no lengths, ranges, formats or enumerations.
//!
//! Enabled by the `mock` feature.

use crate::constraint::Constraint;
use crate::error::{ValidationError, ValidationResult};
use crate::value::Value;

/// Value kinds recognised by [`KindConstraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `null`.
    Null,
    /// `true` / `false`.
    Boolean,
    /// Integers only.
    Integer,
    /// Integers and floats.
    Number,
    /// Strings.
    String,
    /// Arrays.
    Array,
    /// Keyed mappings and named-field records.
    Object,
}

impl Kind {
    /// Kind name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Kind::Null, Value::Null)
            | (Kind::Boolean, Value::Bool(_))
            | (Kind::Integer, Value::Int(_))
            | (Kind::Number, Value::Int(_) | Value::Float(_))
            | (Kind::String, Value::String(_))
            | (Kind::Array, Value::Array(_))
            | (Kind::Object, Value::Map(_) | Value::Record(_)) => true,
            _ => false,
        }
    }
}

/// Accepts values of a single [`Kind`], optionally declaring a default.
#[derive(Debug, Clone)]
pub struct KindConstraint {
    kind: Kind,
    default: Option<Value>,
}

impl KindConstraint {
    /// Constraint accepting values of `kind`.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            default: None,
        }
    }

    /// Accepts strings.
    pub fn string() -> Self {
        Self::new(Kind::String)
    }

    /// Accepts integers.
    pub fn integer() -> Self {
        Self::new(Kind::Integer)
    }

    /// Accepts integers and floats.
    pub fn number() -> Self {
        Self::new(Kind::Number)
    }

    /// Accepts booleans.
    pub fn boolean() -> Self {
        Self::new(Kind::Boolean)
    }

    /// Declare a default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// The accepted kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }
}

impl Constraint for KindConstraint {
    fn validate(&self, value: &Value) -> ValidationResult {
        let value = value.deref_once();
        if self.kind.accepts(value) {
            Ok(())
        } else {
            Err(ValidationError::TypeMismatch {
                expected: self.kind.name(),
                found: value.type_name(),
            })
        }
    }

    fn default_value(&self) -> Option<Value> {
        self.default.clone()
    }
}

/// Rejects every value with a fixed reason.
#[derive(Debug, Clone)]
pub struct RejectAll {
    reason: String,
}

impl RejectAll {
    /// Constraint failing with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Constraint for RejectAll {
    fn validate(&self, _value: &Value) -> ValidationResult {
        Err(ValidationError::invalid(self.reason.clone()))
    }
}
