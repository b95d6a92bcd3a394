//! # jsval-object — Object Constraint
//!
//! A JSON-Schema-style `object` constraint over keyed mappings and
//! named-field records: exact-name properties, pattern properties, an
//! additional-properties policy, property-count bounds, required names, and
//! property / schema dependencies.
//!
//! ## Modules
//!
//! - [`accessor`] — resolves a value's shape and reads its properties;
//!   pluggable [`FieldResolver`]s name the fields of records.
//! - [`object`] — [`ObjectConstraint`] builder and its lock-guarded storage.
//! - `validate` — the [`Constraint`](jsval_core::Constraint) implementation
//!   and default-substitution helper.
//!
//! ## Concurrency
//!
//! Builders take `&self`: share an `Arc<ObjectConstraint>` and reconfigure it
//! while other threads validate. Validation never holds a lock while calling
//! into a nested constraint.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsval-core` internally.
//! - First failure wins; errors are never aggregated.
//! - Validation never modifies its input.

pub mod accessor;
pub mod object;
mod validate;

pub use accessor::{
    Accessor, CaseInsensitiveFieldResolver, DeclaredFieldResolver, FieldNaming, FieldResolver,
    Property, TaggedFieldResolver,
};
pub use object::ObjectConstraint;
