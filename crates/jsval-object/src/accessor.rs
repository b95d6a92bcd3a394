//! # Record Accessor
//!
//! Reads properties out of an opaque [`Value`]. The shape of the value is
//! resolved once, after looking through a single [`Value::Ref`]:
//!
//! - a keyed mapping exposes its keys, all of which must be strings;
//! - a named-field record exposes its fields through a [`FieldResolver`];
//! - anything else is a shape error.
//!
//! Absence is `None`. A property holding `Null`, `0` or `""` is present.
//!
//! ## Field Resolution
//!
//! Records do not carry a single canonical naming. A [`FieldResolver`]
//! decides which name each declared field answers to:
//!
//! | Resolver | Exposed name | Lookup |
//! |----------|--------------|--------|
//! | [`DeclaredFieldResolver`] | declared name | exact, case-sensitive |
//! | [`CaseInsensitiveFieldResolver`] | declared name | exact first, then case-insensitive |
//! | [`TaggedFieldResolver`] | tag if set, else declared name; tag `"-"` hides the field | exact on the exposed name |

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use jsval_core::{Field, Map, MapKey, Record, ValidationError, Value};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FieldResolver
// ---------------------------------------------------------------------------

/// Strategy mapping property names onto the declared fields of a [`Record`].
pub trait FieldResolver: Send + Sync + fmt::Debug {
    /// Name under which `field` is exposed, or `None` to hide it.
    fn exposed_name(&self, field: &Field) -> Option<String>;

    /// Declared position of the field answering to `name`.
    fn field_index(&self, record: &Record, name: &str) -> Option<usize>;

    /// All exposed names, in declaration order.
    fn field_names(&self, record: &Record) -> Vec<String> {
        record
            .fields()
            .iter()
            .filter_map(|field| self.exposed_name(field))
            .collect()
    }
}

/// Exposes every declared field under its declared name; case-sensitive lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredFieldResolver;

impl FieldResolver for DeclaredFieldResolver {
    fn exposed_name(&self, field: &Field) -> Option<String> {
        Some(field.name.clone())
    }

    fn field_index(&self, record: &Record, name: &str) -> Option<usize> {
        record.fields().iter().position(|field| field.name == name)
    }
}

/// Exposes declared names; lookups fall back to a case-insensitive match.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveFieldResolver;

impl FieldResolver for CaseInsensitiveFieldResolver {
    fn exposed_name(&self, field: &Field) -> Option<String> {
        Some(field.name.clone())
    }

    fn field_index(&self, record: &Record, name: &str) -> Option<usize> {
        let fields = record.fields();
        fields.iter().position(|field| field.name == name).or_else(|| {
            let folded = name.to_lowercase();
            fields
                .iter()
                .position(|field| field.name.to_lowercase() == folded)
        })
    }
}

/// Exposes each field under its tag when one is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggedFieldResolver;

impl FieldResolver for TaggedFieldResolver {
    fn exposed_name(&self, field: &Field) -> Option<String> {
        match field.tag.as_deref() {
            Some("-") => None,
            Some(tag) if !tag.is_empty() => Some(tag.to_string()),
            _ => Some(field.name.clone()),
        }
    }

    fn field_index(&self, record: &Record, name: &str) -> Option<usize> {
        record
            .fields()
            .iter()
            .position(|field| self.exposed_name(field).as_deref() == Some(name))
    }
}

/// Serializable selector for the built-in resolvers.
///
/// Intended to be embedded in host configuration, e.g. as
/// `field_naming = "tagged"` in a TOML or YAML settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNaming {
    /// [`DeclaredFieldResolver`].
    #[default]
    Declared,
    /// [`CaseInsensitiveFieldResolver`].
    CaseInsensitive,
    /// [`TaggedFieldResolver`].
    Tagged,
}

impl FieldNaming {
    /// The resolver implementing this naming convention.
    pub fn resolver(self) -> Arc<dyn FieldResolver> {
        match self {
            FieldNaming::Declared => Arc::new(DeclaredFieldResolver),
            FieldNaming::CaseInsensitive => Arc::new(CaseInsensitiveFieldResolver),
            FieldNaming::Tagged => Arc::new(TaggedFieldResolver),
        }
    }
}

// ---------------------------------------------------------------------------
// Accessor
// ---------------------------------------------------------------------------

/// A property found in a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Property<'a> {
    /// The name under which the property is enumerated. For records this
    /// can differ from the name that was looked up (case folding).
    pub name: String,
    /// The property value.
    pub value: &'a Value,
}

/// Property access over a value whose shape has been resolved.
#[derive(Debug, Clone, Copy)]
pub enum Accessor<'a> {
    /// A keyed mapping with string keys only.
    Map(&'a Map),
    /// A named-field record and the resolver that names its fields.
    Record {
        /// The record.
        record: &'a Record,
        /// Field-resolution strategy.
        resolver: &'a dyn FieldResolver,
    },
}

impl<'a> Accessor<'a> {
    /// Resolve the shape of `value`, looking through one [`Value::Ref`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonStringKey`] for a mapping with a
    /// non-string key, [`ValidationError::DuplicateProperty`] for a record
    /// whose resolver exposes two fields under one name, and
    /// [`ValidationError::UnsupportedShape`] for any value that is neither a
    /// mapping nor a record.
    pub fn resolve(
        value: &'a Value,
        resolver: &'a dyn FieldResolver,
    ) -> Result<Self, ValidationError> {
        match value.deref_once() {
            Value::Map(map) => {
                if let Some(key) = map.keys().find(|key| key.as_str().is_none()) {
                    return Err(ValidationError::NonStringKey { kind: key.kind() });
                }
                Ok(Accessor::Map(map))
            }
            Value::Record(record) => {
                let mut exposed = HashSet::new();
                if let Some(name) = resolver
                    .field_names(record)
                    .into_iter()
                    .find(|name| !exposed.insert(name.clone()))
                {
                    return Err(ValidationError::DuplicateProperty { name });
                }
                Ok(Accessor::Record { record, resolver })
            }
            other => Err(ValidationError::UnsupportedShape {
                kind: other.type_name(),
            }),
        }
    }

    /// All enumerable property names.
    pub fn property_names(&self) -> Vec<String> {
        match self {
            Accessor::Map(map) => map
                .keys()
                .filter_map(|key| key.as_str().map(str::to_string))
                .collect(),
            Accessor::Record { record, resolver } => resolver.field_names(record),
        }
    }

    /// Fetch a property by name; `None` if absent.
    pub fn property(&self, name: &str) -> Option<Property<'a>> {
        match *self {
            Accessor::Map(map) => map
                .get(&MapKey::String(name.to_string()))
                .map(|value| Property {
                    name: name.to_string(),
                    value,
                }),
            Accessor::Record { record, resolver } => {
                let field = record.get(resolver.field_index(record, name)?)?;
                Some(Property {
                    name: resolver.exposed_name(field)?,
                    value: &field.value,
                })
            }
        }
    }
}
