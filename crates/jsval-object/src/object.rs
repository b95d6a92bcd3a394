//! # Object Constraint — Builder and Storage
//!
//! [`ObjectConstraint`] owns the configuration of a JSON-Schema-style
//! `object` constraint. Every setter takes `&self` and returns `&Self`, so a
//! constraint shared through an `Arc` can be reconfigured while other
//! threads are validating against it.
//!
//! ## Locking
//!
//! | State | Guard |
//! |-------|-------|
//! | exact-name properties, pattern properties, additional policy | `rules` |
//! | required names | `required` |
//! | property and schema dependencies | `dependencies` |
//! | field resolver | `resolver` |
//! | `minProperties` / `maxProperties` | atomics |
//!
//! Guards are `parking_lot::RwLock`s and are never held across a call into
//! another constraint. Validation copies what it needs and releases the
//! guard first; a schema dependency may therefore point back at the same
//! object constraint without deadlocking.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jsval_core::{SharedConstraint, ValidationError};
use parking_lot::RwLock;
use regex::Regex;

use crate::accessor::{DeclaredFieldResolver, FieldNaming, FieldResolver};

/// Sentinel for an unset property-count bound.
const UNSET: usize = usize::MAX;

/// A constraint bound to every unmatched name matching `pattern`.
#[derive(Debug, Clone)]
pub(crate) struct PatternRule {
    pub(crate) pattern: Regex,
    pub(crate) constraint: SharedConstraint,
}

/// Everything that decides which constraint a property is validated by.
///
/// Cloned as a unit at the start of each validation.
#[derive(Debug, Clone, Default)]
pub(crate) struct PropertyRules {
    pub(crate) properties: BTreeMap<String, SharedConstraint>,
    /// Registration order is evaluation order.
    pub(crate) patterns: Vec<PatternRule>,
    /// `None` forbids additional properties.
    pub(crate) additional: Option<SharedConstraint>,
}

#[derive(Debug, Default)]
struct Dependencies {
    properties: HashMap<String, Vec<String>>,
    schemas: HashMap<String, SharedConstraint>,
}

/// A JSON-Schema-style constraint over keyed mappings and named-field records.
///
/// Created empty: no properties, no bounds, nothing required, and additional
/// properties forbidden.
#[derive(Debug)]
pub struct ObjectConstraint {
    rules: RwLock<PropertyRules>,
    required: RwLock<BTreeSet<String>>,
    dependencies: RwLock<Dependencies>,
    resolver: RwLock<Arc<dyn FieldResolver>>,
    min_properties: AtomicUsize,
    max_properties: AtomicUsize,
}

impl Default for ObjectConstraint {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectConstraint {
    /// Create an empty object constraint.
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(PropertyRules::default()),
            required: RwLock::new(BTreeSet::new()),
            dependencies: RwLock::new(Dependencies::default()),
            resolver: RwLock::new(Arc::new(DeclaredFieldResolver)),
            min_properties: AtomicUsize::new(UNSET),
            max_properties: AtomicUsize::new(UNSET),
        }
    }

    // -- Builder ------------------------------------------------------------

    /// Add names to the required set. Idempotent.
    pub fn required<I, S>(&self, names: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.write().extend(names.into_iter().map(Into::into));
        self
    }

    /// Inclusive lower bound on the number of properties.
    ///
    /// `usize::MAX` is the unset marker, so passing it clears the bound
    /// instead of rejecting every input.
    pub fn min_properties(&self, n: usize) -> &Self {
        self.min_properties.store(n, Ordering::Release);
        self
    }

    /// Inclusive upper bound on the number of properties.
    ///
    /// As with [`min_properties`](Self::min_properties), `usize::MAX` clears
    /// the bound.
    pub fn max_properties(&self, n: usize) -> &Self {
        self.max_properties.store(n, Ordering::Release);
        self
    }

    /// Remove the lower bound.
    pub fn clear_min_properties(&self) -> &Self {
        self.min_properties.store(UNSET, Ordering::Release);
        self
    }

    /// Remove the upper bound.
    pub fn clear_max_properties(&self) -> &Self {
        self.max_properties.store(UNSET, Ordering::Release);
        self
    }

    /// Constraint for properties matched by neither name nor pattern.
    /// `None` forbids them.
    pub fn additional_properties(&self, constraint: Option<SharedConstraint>) -> &Self {
        self.rules.write().additional = constraint;
        self
    }

    /// Register (or replace) the constraint for the property `name`.
    pub fn add_prop(&self, name: impl Into<String>, constraint: SharedConstraint) -> &Self {
        self.rules.write().properties.insert(name.into(), constraint);
        self
    }

    /// Register (or replace) the constraint for names matching `pattern`.
    ///
    /// Names claimed by [`add_prop`](Self::add_prop) are never matched against
    /// patterns. A name matching several patterns is claimed by the one
    /// registered first; replacing a pattern keeps its position.
    pub fn pattern_properties(&self, pattern: Regex, constraint: SharedConstraint) -> &Self {
        let mut rules = self.rules.write();
        let existing = rules
            .patterns
            .iter()
            .position(|rule| rule.pattern.as_str() == pattern.as_str());
        match existing {
            Some(index) => rules.patterns[index].constraint = constraint,
            None => rules.patterns.push(PatternRule {
                pattern,
                constraint,
            }),
        }
        drop(rules);
        self
    }

    /// Compile `pattern` and register it as with
    /// [`pattern_properties`](Self::pattern_properties).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPattern`] if the pattern does not compile.
    pub fn pattern_properties_str(
        &self,
        pattern: &str,
        constraint: SharedConstraint,
    ) -> Result<&Self, ValidationError> {
        let compiled = Regex::new(pattern).map_err(|e| ValidationError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.pattern_properties(compiled, constraint))
    }

    /// Require every name in `to` whenever `from` is present. Additive.
    pub fn prop_dependency<I, S>(&self, from: impl Into<String>, to: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .write()
            .properties
            .entry(from.into())
            .or_default()
            .extend(to.into_iter().map(Into::into));
        self
    }

    /// Require the whole value to satisfy `constraint` whenever `from` is
    /// present. Replaces any previous schema for `from`.
    pub fn schema_dependency(&self, from: impl Into<String>, constraint: SharedConstraint) -> &Self {
        self.dependencies
            .write()
            .schemas
            .insert(from.into(), constraint);
        self
    }

    /// Install the field-resolution strategy for named-field records.
    pub fn field_resolver(&self, resolver: Arc<dyn FieldResolver>) -> &Self {
        *self.resolver.write() = resolver;
        self
    }

    /// Install one of the built-in field-resolution strategies.
    pub fn field_naming(&self, naming: FieldNaming) -> &Self {
        self.field_resolver(naming.resolver())
    }

    // -- Queries ------------------------------------------------------------

    /// Returns true if `name` is in the required set.
    pub fn is_prop_required(&self, name: &str) -> bool {
        self.required.read().contains(name)
    }

    /// Names that must be present whenever `from` is present.
    pub fn prop_dependencies_of(&self, from: &str) -> Vec<String> {
        self.dependencies
            .read()
            .properties
            .get(from)
            .cloned()
            .unwrap_or_default()
    }

    /// Schema the whole value must satisfy whenever `from` is present.
    pub fn schema_dependency_of(&self, from: &str) -> Option<SharedConstraint> {
        self.dependencies.read().schemas.get(from).cloned()
    }

    /// Configured `(minProperties, maxProperties)`.
    pub fn property_bounds(&self) -> (Option<usize>, Option<usize>) {
        (
            bound(self.min_properties.load(Ordering::Acquire)),
            bound(self.max_properties.load(Ordering::Acquire)),
        )
    }

    // -- Snapshots ------------------------------------------------------------

    pub(crate) fn rules_snapshot(&self) -> PropertyRules {
        self.rules.read().clone()
    }

    pub(crate) fn required_snapshot(&self) -> BTreeSet<String> {
        self.required.read().clone()
    }

    pub(crate) fn resolver_snapshot(&self) -> Arc<dyn FieldResolver> {
        Arc::clone(&self.resolver.read())
    }
}

fn bound(raw: usize) -> Option<usize> {
    (raw != UNSET).then_some(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsval_core::mock::KindConstraint;
    use jsval_core::AnyValue;

    #[test]
    fn new_constraint_is_empty() {
        let c = ObjectConstraint::new();
        assert_eq!(c.property_bounds(), (None, None));
        assert!(!c.is_prop_required("a"));
        assert!(c.prop_dependencies_of("a").is_empty());
        assert!(c.schema_dependency_of("a").is_none());
        let rules = c.rules_snapshot();
        assert!(rules.properties.is_empty());
        assert!(rules.patterns.is_empty());
        assert!(rules.additional.is_none());
    }

    #[test]
    fn required_is_idempotent_union() {
        let c = ObjectConstraint::new();
        c.required(["a", "b"]).required(["b", "c"]);
        assert_eq!(
            c.required_snapshot().into_iter().collect::<Vec<_>>(),
            ["a", "b", "c"]
        );
        assert!(c.is_prop_required("c"));
    }

    #[test]
    fn bounds_set_and_clear() {
        let c = ObjectConstraint::new();
        c.min_properties(1).max_properties(3);
        assert_eq!(c.property_bounds(), (Some(1), Some(3)));
        c.clear_min_properties();
        assert_eq!(c.property_bounds(), (None, Some(3)));
        c.min_properties(0).clear_max_properties();
        assert_eq!(c.property_bounds(), (Some(0), None));
    }

    #[test]
    fn prop_dependencies_are_additive() {
        let c = ObjectConstraint::new();
        c.prop_dependency("a", ["b"]).prop_dependency("a", ["c", "d"]);
        assert_eq!(c.prop_dependencies_of("a"), ["b", "c", "d"]);
    }

    #[test]
    fn schema_dependency_last_write_wins() {
        let c = ObjectConstraint::new();
        let first: SharedConstraint = Arc::new(AnyValue);
        let second: SharedConstraint = Arc::new(KindConstraint::string());
        c.schema_dependency("a", first).schema_dependency("a", Arc::clone(&second));
        let stored = c.schema_dependency_of("a").expect("schema dependency");
        assert!(Arc::ptr_eq(&stored, &second));
    }

    #[test]
    fn replacing_a_pattern_keeps_its_position() {
        let c = ObjectConstraint::new();
        c.pattern_properties_str("^a", Arc::new(AnyValue))
            .unwrap()
            .pattern_properties_str("^b", Arc::new(AnyValue))
            .unwrap()
            .pattern_properties_str("^a", Arc::new(KindConstraint::string()))
            .unwrap();
        let rules = c.rules_snapshot();
        let sources: Vec<&str> = rules.patterns.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(sources, ["^a", "^b"]);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let c = ObjectConstraint::new();
        let err = c
            .pattern_properties_str("(unclosed", Arc::new(AnyValue))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn add_prop_overwrites() {
        let c = ObjectConstraint::new();
        let replacement: SharedConstraint = Arc::new(KindConstraint::integer());
        c.add_prop("a", Arc::new(AnyValue))
            .add_prop("a", Arc::clone(&replacement));
        let rules = c.rules_snapshot();
        assert_eq!(rules.properties.len(), 1);
        assert!(Arc::ptr_eq(&rules.properties["a"], &replacement));
    }
}
