//! # jsval-core — Foundational Types for Constraint Validation
//!
//! This crate defines what every jsval constraint shares:
//!
//! 1. **The value model.** [`Value`] is the opaque input to validation. It
//!    distinguishes keyed mappings ([`Value::Map`]) from named-field records
//!    ([`Value::Record`]) and carries one level of shared indirection
//!    ([`Value::Ref`]). JSON converts losslessly via `From`; YAML via
//!    [`Value::from_yaml`], which keeps non-string mapping keys.
//!
//! 2. **The constraint capability.** [`Constraint`] is the single trait
//!    implemented by every validator, leaf or composite.
//!
//! 3. **The error taxonomy.** [`ValidationError`] enumerates every failure a
//!    constraint can report. Validation stops at the first failure.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - The `mock` feature exposes kind-only leaf constraints for tests.

pub mod constraint;
pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use constraint::{AnyValue, Constraint, SharedConstraint};
pub use error::{ValidationError, ValidationResult, ValueError};
pub use value::{Field, Map, MapKey, Record, Value};
