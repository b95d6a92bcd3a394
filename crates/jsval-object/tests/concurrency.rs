//! Integration tests: reconfiguring an object constraint while it is being
//! used for validation.

use std::sync::{Arc, Weak};
use std::thread;

use jsval_core::mock::KindConstraint;
use jsval_core::{
    AnyValue, Constraint, SharedConstraint, ValidationError, ValidationResult, Value,
};
use jsval_object::ObjectConstraint;
use serde_json::json;

fn string() -> SharedConstraint {
    Arc::new(KindConstraint::string())
}

/// Registers a new optional property on its owner every time it validates.
#[derive(Debug)]
struct Reconfigure {
    owner: Weak<ObjectConstraint>,
}

impl Constraint for Reconfigure {
    fn validate(&self, _value: &Value) -> ValidationResult {
        if let Some(owner) = self.owner.upgrade() {
            owner
                .add_prop("late", Arc::new(AnyValue))
                .required(["trigger"])
                .prop_dependency("never_present", ["trigger"])
                .schema_dependency("never_present", Arc::new(AnyValue));
        }
        Ok(())
    }
}

/// Schema dependency that reconfigures and re-validates its owner.
#[derive(Debug)]
struct ReenterOwner {
    owner: Weak<ObjectConstraint>,
}

impl Constraint for ReenterOwner {
    fn validate(&self, value: &Value) -> ValidationResult {
        let Some(owner) = self.owner.upgrade() else {
            return Ok(());
        };
        owner
            .add_prop("audit", Arc::new(AnyValue))
            .required(["card"])
            .prop_dependency("audit", ["card"]);
        // Only "card" carries this schema, and the nested call sees the same
        // value, so recursion stops once "card" has a property dependency.
        owner.prop_dependency("card", ["card"]);
        owner.validate(value)
    }
}

#[test]
fn test_builders_race_with_validation() {
    let c = Arc::new(ObjectConstraint::new());
    c.add_prop("name", string()).required(["name"]);

    let input = Value::from(json!({"name": "alice"}));

    thread::scope(|s| {
        for _ in 0..4 {
            let c = Arc::clone(&c);
            let input = input.clone();
            s.spawn(move || {
                for _ in 0..200 {
                    assert!(c.validate(&input).is_ok());
                }
            });
        }

        for writer in 0..2 {
            let c = Arc::clone(&c);
            s.spawn(move || {
                for i in 0..100 {
                    c.add_prop(format!("opt_{writer}_{i}"), string())
                        .pattern_properties_str(&format!("^x_{writer}_{i}_"), string())
                        .unwrap()
                        .prop_dependency(format!("absent_{writer}"), [format!("dep_{i}")])
                        .schema_dependency(format!("absent_{writer}"), Arc::new(AnyValue))
                        .min_properties(0)
                        .max_properties(10);
                }
            });
        }
    });

    assert_eq!(c.prop_dependencies_of("absent_0").len(), 100);
    assert_eq!(c.property_bounds(), (Some(0), Some(10)));
    assert!(c.validate(&input).is_ok());
}

#[test]
fn test_nested_constraint_may_reconfigure_owner() {
    let c = Arc::new(ObjectConstraint::new());
    c.add_prop(
        "trigger",
        Arc::new(Reconfigure {
            owner: Arc::downgrade(&c),
        }),
    );

    // Would deadlock if validation held any configuration lock while
    // calling into the nested constraint.
    assert!(c.validate(&Value::from(json!({"trigger": 1}))).is_ok());
    assert!(c.is_prop_required("trigger"));
    assert_eq!(c.prop_dependencies_of("never_present"), ["trigger"]);

    // The property registered mid-validation takes part from the next call.
    assert!(c
        .validate(&Value::from(json!({"trigger": 1, "late": null})))
        .is_ok());
}

#[test]
fn test_schema_dependency_may_reenter_owner() {
    let c = Arc::new(ObjectConstraint::new());
    c.add_prop("card", string()).schema_dependency(
        "card",
        Arc::new(ReenterOwner {
            owner: Arc::downgrade(&c),
        }),
    );

    // Would deadlock if the dependency pass held a configuration lock while
    // running the schema.
    assert!(c.validate(&Value::from(json!({"card": "4111"}))).is_ok());
    assert!(c.is_prop_required("card"));
    assert_eq!(c.prop_dependencies_of("audit"), ["card"]);
    assert!(c.schema_dependency_of("card").is_some());

    assert_eq!(
        c.validate(&Value::from(json!({"audit": 1}))),
        Err(ValidationError::MissingRequired {
            name: "card".into()
        })
    );
}

#[test]
fn test_recursive_schema_through_shared_handle() {
    let node = Arc::new(ObjectConstraint::new());
    node.add_prop("value", Arc::new(KindConstraint::integer()))
        .required(["value"]);
    let child: SharedConstraint = node.clone();
    node.add_prop("next", child);

    let list = Value::from(json!({"value": 1, "next": {"value": 2, "next": {"value": 3}}}));
    assert!(node.validate(&list).is_ok());

    let broken = Value::from(json!({"value": 1, "next": {"next": {"value": 3}}}));
    let err = node.validate(&broken).unwrap_err();
    assert_eq!(err.property_name(), Some("next"));
}
