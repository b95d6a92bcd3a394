//! # Constraint Capability
//!
//! The [`Constraint`] trait is the seam between the object validator and
//! every other kind of constraint. Primitive constraints (string, number,
//! array, ...) live outside this workspace and implement it; the object
//! constraint implements it too, so object constraints nest.

use std::fmt;
use std::sync::Arc;

use crate::error::ValidationResult;
use crate::value::Value;

/// A composable validator for one value, with an optional default.
///
/// Implementations must be `Send + Sync`: constraints are shared between
/// threads through [`SharedConstraint`] and may be validated concurrently.
pub trait Constraint: Send + Sync + fmt::Debug {
    /// Validate `value`, returning the first violation found.
    fn validate(&self, value: &Value) -> ValidationResult;

    /// The value a caller may substitute when the constrained property is absent.
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// Returns true if this constraint declares a default.
    fn has_default(&self) -> bool {
        self.default_value().is_some()
    }
}

/// Reference-counted handle under which constraints are registered.
pub type SharedConstraint = Arc<dyn Constraint>;

/// Accepts every value. Equivalent to the `true` schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValue;

impl Constraint for AnyValue {
    fn validate(&self, _value: &Value) -> ValidationResult {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_value_accepts_everything_and_has_no_default() {
        let c = AnyValue;
        assert!(c.validate(&Value::Null).is_ok());
        assert!(c.validate(&Value::object([("a", 1)])).is_ok());
        assert!(!c.has_default());
        assert_eq!(c.default_value(), None);
    }
}
