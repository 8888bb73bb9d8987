//! Capability interfaces a data-access layer implements so its records can be
//! serialized, plus the value model those interfaces speak.
//!
//! - [`Schema`] describes a record type: its persisted columns, declared method
//!   fields, and which association names exist.
//! - [`Record`] is one instance: column/method accessors and association accessors.
//!
//! Neither trait knows anything about XML; the serializer only queries them.

use std::borrow::Cow;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format used for the natural string form of a date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for the natural string form of a datetime.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declared kind of a column or method field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    Time,
    DateTime,
    Binary,
    /// Placeholder for a nil association element. Never a column kind.
    #[serde(skip)]
    Association,
}

impl Kind {
    /// Lowercase kind name, as written into `type` attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Text => "text",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Decimal => "decimal",
            Kind::Boolean => "boolean",
            Kind::Date => "date",
            Kind::Time => "time",
            Kind::DateTime => "datetime",
            Kind::Binary => "binary",
            Kind::Association => "association",
        }
    }

    /// Whether non-nil values of this kind carry a `type` attribute.
    pub fn is_tagged(&self) -> bool {
        matches!(self, Kind::Integer | Kind::Boolean)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column or method value read from a record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Natural string form, or `None` for nil.
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::Nil => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            // Debug keeps the fractional part on whole floats ("2.0", not "2").
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Nil)
    }
}

/// A persisted column or declared method field: name plus kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: Kind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Cardinality of a declared association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    BelongsTo,
    HasOne,
    HasMany,
}

impl AssociationKind {
    pub fn is_collection(&self) -> bool {
        matches!(self, AssociationKind::HasMany)
    }
}

/// Type-level metadata for a record type.
pub trait Schema {
    /// Type name, e.g. `BlogPost` or `Blog::Post`.
    fn type_name(&self) -> &str;

    /// Key the descriptor cache files this type under. Types whose columns are
    /// only known at runtime must fold them into the key, since two such types
    /// can share a name.
    fn cache_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.type_name())
    }

    /// Persisted columns in declaration order.
    fn columns(&self) -> Vec<Column>;

    /// Computed, zero-argument method fields. Empty unless a type declares some.
    fn method_fields(&self) -> Vec<Column> {
        Vec::new()
    }

    /// Looks up a declared association by name.
    fn association(&self, name: &str) -> Option<AssociationKind>;
}

/// The value behind an association accessor.
pub enum AssociationValue<'a> {
    /// Collection-valued association. `item_type` names the target type even when
    /// `records` is empty.
    Many {
        item_type: &'a dyn Schema,
        records: Vec<Box<dyn Record + 'a>>,
    },
    /// A present single associated record.
    One(Box<dyn Record + 'a>),
    /// Single-valued association with no associated record.
    Nil,
}

impl fmt::Debug for AssociationValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationValue::Many { item_type, records } => f
                .debug_struct("Many")
                .field("item_type", &item_type.type_name())
                .field("len", &records.len())
                .finish(),
            AssociationValue::One(record) => f
                .debug_tuple("One")
                .field(&record.schema().type_name())
                .finish(),
            AssociationValue::Nil => f.write_str("Nil"),
        }
    }
}

/// One record instance.
pub trait Record {
    /// Metadata for this record's type.
    fn schema(&self) -> &dyn Schema;

    /// Typed value of a persisted column.
    fn read_attribute(&self, name: &str) -> Value;

    /// Column value as stored, before any type cast. Used for datetime columns so the
    /// stored text is written without a parse/format round trip.
    fn read_attribute_before_type_cast(&self, name: &str) -> Option<String> {
        self.read_attribute(name).into_string()
    }

    /// Value of a declared method field.
    fn call_method(&self, _name: &str) -> Value {
        Value::Nil
    }

    /// Value behind a declared association.
    fn association(&self, _name: &str) -> AssociationValue<'_> {
        AssociationValue::Nil
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn schema(&self) -> &dyn Schema {
        (**self).schema()
    }

    fn read_attribute(&self, name: &str) -> Value {
        (**self).read_attribute(name)
    }

    fn read_attribute_before_type_cast(&self, name: &str) -> Option<String> {
        (**self).read_attribute_before_type_cast(name)
    }

    fn call_method(&self, name: &str) -> Value {
        (**self).call_method(name)
    }

    fn association(&self, name: &str) -> AssociationValue<'_> {
        (**self).association(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn schema(&self) -> &dyn Schema {
        (**self).schema()
    }

    fn read_attribute(&self, name: &str) -> Value {
        (**self).read_attribute(name)
    }

    fn read_attribute_before_type_cast(&self, name: &str) -> Option<String> {
        (**self).read_attribute_before_type_cast(name)
    }

    fn call_method(&self, name: &str) -> Value {
        (**self).call_method(name)
    }

    fn association(&self, name: &str) -> AssociationValue<'_> {
        (**self).association(name)
    }
}
