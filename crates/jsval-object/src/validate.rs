//! # Object Validation
//!
//! Implements [`Constraint`] for [`ObjectConstraint`]. Validation is a fixed
//! sequence of passes; the first failure ends it.
//!
//! 1. Resolve the value's shape and enumerate its property names. A record
//!    exposing two fields under one name is rejected as a shape error.
//! 2. Check `minProperties` / `maxProperties` against the name count.
//! 3. Exact-name pass: each registered property is validated if present.
//!    An absent required property fails. An absent optional property with
//!    a default is only noted; the input is never modified. Required names
//!    without a registered constraint must also be present.
//! 4. Pattern pass: names not claimed by step 3 are matched against the
//!    patterns in registration order; the first matching pattern claims
//!    the name.
//! 5. Additional pass: unclaimed names are validated against the
//!    additional-properties constraint, or rejected if there is none.
//!    Every name validated in steps 3 to 5 counts as seen, under the name it
//!    was enumerated with.
//! 6. Dependency pass over names that were present and validated: a name
//!    with property dependencies requires all of them; otherwise its schema
//!    dependency, if any, validates the whole value and its failure is
//!    returned unchanged.
//!
//! Name sets are ordered, so the reported failure is the same on every run
//! for a fixed configuration and input.

use std::collections::{BTreeMap, BTreeSet};

use jsval_core::{Constraint, ValidationError, ValidationResult, Value};
use tracing::{debug, trace};

use crate::accessor::Accessor;
use crate::object::ObjectConstraint;

impl Constraint for ObjectConstraint {
    fn validate(&self, value: &Value) -> ValidationResult {
        let span = tracing::debug_span!("object_validate", kind = value.type_name());
        let _guard = span.enter();

        debug!("start");
        let result = self.validate_object(value);
        match &result {
            Ok(()) => debug!("pass"),
            Err(err) => debug!(error = %err, "fail"),
        }
        result
    }
}

impl ObjectConstraint {
    fn validate_object(&self, value: &Value) -> ValidationResult {
        let resolver = self.resolver_snapshot();
        let accessor = Accessor::resolve(value, resolver.as_ref())?;

        let names = accessor.property_names();
        self.check_bounds(names.len())?;

        // Unclaimed names, and names whose present value was validated.
        let mut remaining: BTreeSet<String> = names.into_iter().collect();
        let mut seen: BTreeSet<String> = BTreeSet::new();

        let rules = self.rules_snapshot();
        let required = self.required_snapshot();

        for (name, constraint) in &rules.properties {
            let Some(property) = accessor.property(name) else {
                if required.contains(name) {
                    return Err(ValidationError::MissingRequired { name: name.clone() });
                }
                match constraint.default_value() {
                    Some(default) => {
                        trace!(property = %name, default = %default, "absent, default available")
                    }
                    None => trace!(property = %name, "absent"),
                }
                continue;
            };

            remaining.remove(&property.name);
            seen.insert(property.name.clone());
            constraint
                .validate(property.value)
                .map_err(|e| ValidationError::property(name.as_str(), e))?;
        }

        if let Some(name) = required
            .iter()
            .filter(|name| !rules.properties.contains_key(*name))
            .find(|name| accessor.property(name).is_none())
        {
            return Err(ValidationError::MissingRequired { name: name.clone() });
        }

        for rule in &rules.patterns {
            let matched: Vec<String> = remaining
                .iter()
                .filter(|name| rule.pattern.is_match(name))
                .cloned()
                .collect();
            for name in matched {
                remaining.remove(&name);
                let property = accessor
                    .property(&name)
                    .ok_or_else(|| ValidationError::UnresolvedProperty { name: name.clone() })?;
                trace!(property = %name, pattern = rule.pattern.as_str(), "pattern match");
                seen.insert(name.clone());
                rule.constraint
                    .validate(property.value)
                    .map_err(|e| ValidationError::property(name, e))?;
            }
        }

        if let Some(first) = remaining.first() {
            let Some(additional) = &rules.additional else {
                return Err(ValidationError::AdditionalNotAllowed {
                    name: first.clone(),
                });
            };
            for name in &remaining {
                let property = accessor
                    .property(name)
                    .ok_or_else(|| ValidationError::UnresolvedProperty { name: name.clone() })?;
                trace!(property = %name, "additional property");
                seen.insert(name.clone());
                additional
                    .validate(property.value)
                    .map_err(|e| ValidationError::additional(name.as_str(), e))?;
            }
        }

        for name in &seen {
            let dependencies = self.prop_dependencies_of(name);
            if !dependencies.is_empty() {
                trace!(property = %name, ?dependencies, "checking property dependencies");
                if let Some(missing) = dependencies.iter().find(|dep| !seen.contains(*dep)) {
                    return Err(ValidationError::MissingDependency {
                        name: name.clone(),
                        dependency: missing.clone(),
                    });
                }
                continue;
            }

            if let Some(schema) = self.schema_dependency_of(name) {
                trace!(property = %name, "checking schema dependency");
                schema.validate(value)?;
            }
        }

        Ok(())
    }

    fn check_bounds(&self, count: usize) -> ValidationResult {
        let (min, max) = self.property_bounds();
        if let Some(min) = min.filter(|min| count < *min) {
            return Err(ValidationError::TooFewProperties { count, min });
        }
        if let Some(max) = max.filter(|max| count > *max) {
            return Err(ValidationError::TooManyProperties { count, max });
        }
        Ok(())
    }

    /// Defaults a caller could substitute for absent properties.
    ///
    /// Returns, for every property registered with
    /// [`add_prop`](Self::add_prop) that is absent from `value` and whose
    /// constraint declares a default, that default. `value` is not modified
    /// and no validation is performed.
    ///
    /// # Errors
    ///
    /// Returns the same shape errors as validation when `value` is neither a
    /// keyed mapping with string keys nor a named-field record.
    pub fn defaults(&self, value: &Value) -> Result<BTreeMap<String, Value>, ValidationError> {
        let resolver = self.resolver_snapshot();
        let accessor = Accessor::resolve(value, resolver.as_ref())?;
        let rules = self.rules_snapshot();

        Ok(rules
            .properties
            .iter()
            .filter(|(name, _)| accessor.property(name).is_none())
            .filter_map(|(name, constraint)| {
                constraint
                    .default_value()
                    .map(|default| (name.clone(), default))
            })
            .collect())
    }
}
