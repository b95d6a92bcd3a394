//! # Value Model
//!
//! [`Value`] is the opaque input every constraint validates. Besides the
//! JSON scalar and container kinds it distinguishes two object shapes:
//!
//! - [`Value::Map`] — a keyed mapping. Keys are [`MapKey`]s, so a mapping
//!   may carry integer or boolean keys (as YAML allows); object validation
//!   rejects those.
//! - [`Value::Record`] — a named-field record with declared fields in a
//!   fixed order, each optionally tagged with an alternate name.
//!
//! [`Value::Ref`] is one level of shared indirection. Object validation
//! looks through exactly one `Ref`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ValueError;

// ---------------------------------------------------------------------------
// MapKey
// ---------------------------------------------------------------------------

/// Key of a keyed mapping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    /// Boolean key.
    Bool(bool),
    /// Integer key.
    Int(i64),
    /// String key. The only kind accepted by object validation.
    String(String),
}

impl MapKey {
    /// Get as string reference if this is a String key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MapKey::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the kind name of this key.
    pub fn kind(&self) -> &'static str {
        match self {
            MapKey::Bool(_) => "boolean",
            MapKey::Int(_) => "integer",
            MapKey::String(_) => "string",
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Bool(b) => write!(f, "{b}"),
            MapKey::Int(i) => write!(f, "{i}"),
            MapKey::String(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::String(s.to_string())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::String(s)
    }
}

impl From<i64> for MapKey {
    fn from(i: i64) -> Self {
        MapKey::Int(i)
    }
}

impl From<bool> for MapKey {
    fn from(b: bool) -> Self {
        MapKey::Bool(b)
    }
}

/// Keyed mapping storage.
pub type Map = BTreeMap<MapKey, Value>;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A declared field of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Declared field name.
    pub name: String,
    /// Alternate serialized name. `"-"` hides the field from tag-based lookup.
    pub tag: Option<String>,
    /// Field value. Always present, even when it is a zero value.
    pub value: Value,
}

/// A named-field record.
///
/// Fields keep their declaration order; names are not required to be
/// unique, but lookups resolve to the first match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    type_name: String,
    fields: Vec<Field>,
}

impl Record {
    /// Create an empty record of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append an untagged field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            tag: None,
            value: value.into(),
        });
        self
    }

    /// Append a field with an alternate serialized name.
    pub fn tagged_field(
        mut self,
        name: impl Into<String>,
        tag: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            tag: Some(tag.into()),
            value: value.into(),
        });
        self
    }

    /// The record's type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All declared fields, in order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field at a declared position.
    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A value that can be validated.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value. A property holding `Null` is present, not absent.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// Keyed mapping.
    Map(Map),
    /// Named-field record.
    Record(Record),
    /// Shared reference to another value.
    Ref(Arc<Value>),
}

impl Value {
    /// Wrap a value in one level of shared indirection.
    pub fn shared(value: impl Into<Value>) -> Self {
        Value::Ref(Arc::new(value.into()))
    }

    /// Build a string-keyed mapping from `(name, value)` pairs.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (MapKey::String(k.into()), v.into()))
                .collect(),
        )
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float. Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string reference if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the mapping if this is a Map value.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get the record if this is a Record value.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Look through one level of [`Value::Ref`]. Other values are returned as-is.
    pub fn deref_once(&self) -> &Value {
        match self {
            Value::Ref(inner) => inner,
            other => other,
        }
    }

    /// Returns the kind name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Ref(_) => "reference",
        }
    }

    /// Convert a YAML document into a value.
    ///
    /// Unlike JSON, YAML mappings may use integer or boolean keys; those are
    /// preserved as [`MapKey::Int`] / [`MapKey::Bool`]. Tags are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnsupportedKey`] for null, float, sequence or
    /// mapping keys, and [`ValueError::UnsupportedNumber`] for numbers that
    /// fit neither `i64` nor `f64`.
    pub fn from_yaml(yaml: &serde_yaml::Value) -> Result<Value, ValueError> {
        match yaml {
            serde_yaml::Value::Null => Ok(Value::Null),
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(ValueError::UnsupportedNumber(n.to_string()))
                }
            }
            serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
            serde_yaml::Value::Sequence(seq) => {
                let items: Result<Vec<Value>, ValueError> =
                    seq.iter().map(Value::from_yaml).collect();
                Ok(Value::Array(items?))
            }
            serde_yaml::Value::Mapping(mapping) => {
                let mut map = Map::new();
                for (k, v) in mapping {
                    map.insert(yaml_key(k)?, Value::from_yaml(v)?);
                }
                Ok(Value::Map(map))
            }
            serde_yaml::Value::Tagged(tagged) => Value::from_yaml(&tagged.value),
        }
    }
}

fn yaml_key(key: &serde_yaml::Value) -> Result<MapKey, ValueError> {
    match key {
        serde_yaml::Value::String(s) => Ok(MapKey::String(s.clone())),
        serde_yaml::Value::Bool(b) => Ok(MapKey::Bool(*b)),
        serde_yaml::Value::Number(n) => n
            .as_i64()
            .map(MapKey::Int)
            .ok_or(ValueError::UnsupportedKey { kind: "number" }),
        serde_yaml::Value::Tagged(tagged) => yaml_key(&tagged.value),
        serde_yaml::Value::Null => Err(ValueError::UnsupportedKey { kind: "null" }),
        serde_yaml::Value::Sequence(_) => Err(ValueError::UnsupportedKey { kind: "sequence" }),
        serde_yaml::Value::Mapping(_) => Err(ValueError::UnsupportedKey { kind: "mapping" }),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(fl) => write!(f, "{fl}"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Record(record) => {
                write!(f, "{} {{", record.type_name())?;
                for (i, field) in record.fields().iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", field.name, field.value)?;
                }
                write!(f, " }}")
            }
            Value::Ref(inner) => write!(f, "&{inner}"),
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

/// JSON objects become string-keyed mappings; numbers outside `i64` become floats.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (MapKey::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
