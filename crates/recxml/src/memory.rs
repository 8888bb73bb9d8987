//! In-memory record store.
//!
//! [`MemoryStore`] holds type definitions ([`TypeDef`], a [`Schema`]) and rows
//! ([`StoredRecord`], a [`Record`]) in memory, so records can be serialized without
//! a database. Stores are built in code or loaded from JSON:
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "name": "Post",
//!       "columns": [
//!         { "name": "id", "kind": "integer" },
//!         { "name": "title", "kind": "string" },
//!         { "name": "author_id", "kind": "integer" }
//!       ],
//!       "associations": [
//!         { "name": "author", "kind": "belongs_to", "target": "User" },
//!         { "name": "comments", "kind": "has_many", "target": "Comment" }
//!       ]
//!     }
//!   ],
//!   "records": {
//!     "Post": [ { "id": 1, "title": "Hello", "author_id": 1 } ]
//!   }
//! }
//! ```
//!
//! Foreign keys default to `<association>_id` on the owner for `belongs_to`, and to
//! `<owner_type>_id` on the target for `has_one`/`has_many`. Method field values
//! are stored on the row under the method's name.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::StoreError;
use crate::inflect;
use crate::model::{
    AssociationKind, AssociationValue, Column, DATE_FORMAT, DATETIME_FORMAT, Kind, Record, Schema,
    Value,
};

/// Accepted datetime spellings, tried in order.
const DATETIME_INPUT_FORMATS: &[&str] =
    &[DATETIME_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%SZ"];

fn default_primary_key() -> String {
    "id".to_string()
}

/// A declared association of a [`TypeDef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationDef {
    pub name: String,
    pub kind: AssociationKind,
    /// Target type name.
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
}

/// A record type held by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub methods: Vec<Column>,
    #[serde(default)]
    pub associations: Vec<AssociationDef>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: default_primary_key(),
            columns: Vec::new(),
            methods: Vec::new(),
            associations: Vec::new(),
        }
    }

    pub fn column(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.columns.push(Column::new(name, kind));
        self
    }

    pub fn method(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.methods.push(Column::new(name, kind));
        self
    }

    pub fn belongs_to(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.association(name, AssociationKind::BelongsTo, target)
    }

    pub fn has_one(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.association(name, AssociationKind::HasOne, target)
    }

    pub fn has_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.association(name, AssociationKind::HasMany, target)
    }

    fn association(
        mut self,
        name: impl Into<String>,
        kind: AssociationKind,
        target: impl Into<String>,
    ) -> Self {
        self.associations.push(AssociationDef {
            name: name.into(),
            kind,
            target: target.into(),
            foreign_key: None,
        });
        self
    }

    /// Overrides the foreign key of the most recently declared association.
    pub fn foreign_key(mut self, key: impl Into<String>) -> Self {
        if let Some(last) = self.associations.last_mut() {
            last.foreign_key = Some(key.into());
        }
        self
    }

    fn find_association(&self, name: &str) -> Option<&AssociationDef> {
        self.associations.iter().find(|a| a.name == name)
    }

    fn foreign_key_for(&self, association: &AssociationDef) -> String {
        match (&association.foreign_key, association.kind) {
            (Some(key), _) => key.clone(),
            (None, AssociationKind::BelongsTo) => format!("{}_id", association.name),
            (None, _) => format!("{}_id", inflect::underscore(inflect::demodulize(&self.name))),
        }
    }

    fn kind_of(&self, name: &str) -> Option<Kind> {
        self.columns
            .iter()
            .chain(self.methods.iter())
            .find(|c| c.name == name)
            .map(|c| c.kind)
    }
}

impl Schema for TypeDef {
    fn type_name(&self) -> &str {
        &self.name
    }

    /// `Post(id:integer,title:string|excerpt:string)`: the name plus the column
    /// and method signature, so a redefined type never reuses stale descriptors.
    fn cache_key(&self) -> Cow<'_, str> {
        let signature = |columns: &[Column]| {
            columns
                .iter()
                .map(|c| format!("{}:{}", c.name, c.kind))
                .collect::<Vec<_>>()
                .join(",")
        };
        Cow::Owned(format!(
            "{}({}|{})",
            self.name,
            signature(&self.columns),
            signature(&self.methods)
        ))
    }

    fn columns(&self) -> Vec<Column> {
        self.columns.clone()
    }

    fn method_fields(&self) -> Vec<Column> {
        self.methods.clone()
    }

    fn association(&self, name: &str) -> Option<AssociationKind> {
        self.find_association(name).map(|a| a.kind)
    }
}

/// One stored row: typed values plus the text they were loaded from.
#[derive(Debug, Clone, Default)]
struct Row {
    values: HashMap<String, Value>,
    raw: HashMap<String, String>,
}

/// Wire shape of a JSON store document.
#[derive(Debug, Deserialize)]
struct StoreDocument {
    types: Vec<TypeDef>,
    #[serde(default)]
    records: BTreeMap<String, Vec<Map<String, JsonValue>>>,
}

/// Record types and rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    types: Vec<TypeDef>,
    index: HashMap<String, usize>,
    rows: HashMap<String, Vec<Row>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let document: StoreDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Loads a store from a parsed JSON value.
    pub fn from_json_value(json: JsonValue) -> Result<Self, StoreError> {
        let document: StoreDocument = serde_json::from_value(json)?;
        Self::from_document(document)
    }

    /// Loads a store from a reader yielding a JSON document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let document: StoreDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    fn from_document(document: StoreDocument) -> Result<Self, StoreError> {
        let mut store = MemoryStore::new();
        for def in document.types {
            store.define(def);
        }
        store.validate()?;
        for (type_name, rows) in document.records {
            for row in rows {
                store.insert(&type_name, row)?;
            }
        }
        Ok(store)
    }

    /// Declares a type, replacing any earlier type of the same name.
    pub fn define(&mut self, def: TypeDef) -> &mut Self {
        match self.index.get(&def.name) {
            Some(&i) => self.types[i] = def,
            None => {
                self.index.insert(def.name.clone(), self.types.len());
                self.rows.entry(def.name.clone()).or_default();
                self.types.push(def);
            }
        }
        self
    }

    /// Checks that every association targets a declared type.
    pub fn validate(&self) -> Result<(), StoreError> {
        for def in &self.types {
            for association in &def.associations {
                if !self.index.contains_key(&association.target) {
                    return Err(StoreError::UnknownType {
                        type_name: association.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Appends a row to `type_name`, converting each value by its declared kind.
    /// Keys that are neither columns nor method fields are kept untyped as strings.
    pub fn insert(
        &mut self,
        type_name: &str,
        fields: Map<String, JsonValue>,
    ) -> Result<(), StoreError> {
        let def = self.type_def(type_name).ok_or_else(|| StoreError::UnknownType {
            type_name: type_name.to_string(),
        })?;

        let mut row = Row::default();
        for (name, json) in fields {
            let kind = def.kind_of(&name).unwrap_or(Kind::String);
            let value = convert(&def.name, &name, kind, &json)?;
            if let JsonValue::String(s) = &json {
                row.raw.insert(name.clone(), s.clone());
            }
            row.values.insert(name, value);
        }
        self.rows.entry(type_name.to_string()).or_default().push(row);
        Ok(())
    }

    /// Declared type by name.
    pub fn type_def(&self, type_name: &str) -> Option<&TypeDef> {
        self.index.get(type_name).map(|&i| &self.types[i])
    }

    /// Declared types, in declaration order.
    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    /// All records of a type, in insertion order.
    pub fn all(&self, type_name: &str) -> Result<Vec<StoredRecord<'_>>, StoreError> {
        let def = self.type_def(type_name).ok_or_else(|| StoreError::UnknownType {
            type_name: type_name.to_string(),
        })?;
        Ok(self.records_where(def, |_| true))
    }

    /// The record of a type whose primary key equals `id`.
    pub fn find(&self, type_name: &str, id: impl Into<Value>) -> Option<StoredRecord<'_>> {
        let def = self.type_def(type_name)?;
        let id = id.into();
        self.records_where(def, |row| row.values.get(&def.primary_key) == Some(&id))
            .into_iter()
            .next()
    }

    fn records_where<'s>(
        &'s self,
        def: &'s TypeDef,
        keep: impl Fn(&Row) -> bool,
    ) -> Vec<StoredRecord<'s>> {
        self.rows
            .get(&def.name)
            .map(|rows| {
                rows.iter()
                    .filter(|row| keep(row))
                    .map(|row| StoredRecord {
                        store: self,
                        def,
                        row,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Converts a JSON value to a typed [`Value`] of `kind`.
fn convert(
    type_name: &str,
    column: &str,
    kind: Kind,
    json: &JsonValue,
) -> Result<Value, StoreError> {
    let invalid = |message: &str| StoreError::InvalidValue {
        type_name: type_name.to_string(),
        column: column.to_string(),
        message: message.to_string(),
    };

    if json.is_null() {
        return Ok(Value::Nil);
    }
    let value = match kind {
        Kind::Integer => json
            .as_i64()
            .map(Value::Integer)
            .ok_or_else(|| invalid("expected an integer"))?,
        Kind::Float => json
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| invalid("expected a number"))?,
        Kind::Boolean => json
            .as_bool()
            .map(Value::Boolean)
            .ok_or_else(|| invalid("expected a boolean"))?,
        Kind::Date => {
            let text = json.as_str().ok_or_else(|| invalid("expected a date string"))?;
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(Value::Date)
                .map_err(|e| invalid(&e.to_string()))?
        }
        Kind::DateTime => {
            let text = json
                .as_str()
                .ok_or_else(|| invalid("expected a datetime string"))?;
            DATETIME_INPUT_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(Value::DateTime)
                .ok_or_else(|| invalid("unrecognized datetime format"))?
        }
        // Decimals keep their literal spelling (serde_json is built with arbitrary_precision).
        Kind::Decimal => match json {
            JsonValue::Number(n) => Value::String(n.to_string()),
            JsonValue::String(s) => Value::String(s.clone()),
            _ => return Err(invalid("expected a decimal")),
        },
        Kind::String | Kind::Text | Kind::Time | Kind::Binary | Kind::Association => match json {
            JsonValue::String(s) => Value::String(s.clone()),
            other => Value::String(other.to_string()),
        },
    };
    Ok(value)
}

/// A row of a [`MemoryStore`] viewed as a [`Record`].
#[derive(Debug, Clone, Copy)]
pub struct StoredRecord<'s> {
    store: &'s MemoryStore,
    def: &'s TypeDef,
    row: &'s Row,
}

impl<'s> StoredRecord<'s> {
    pub fn type_def(&self) -> &'s TypeDef {
        self.def
    }

    pub fn get(&self, name: &str) -> Option<&'s Value> {
        self.row.values.get(name)
    }

    fn primary_key(&self) -> Option<&'s Value> {
        self.get(&self.def.primary_key)
    }
}

impl Record for StoredRecord<'_> {
    fn schema(&self) -> &dyn Schema {
        self.def
    }

    fn read_attribute(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }

    fn read_attribute_before_type_cast(&self, name: &str) -> Option<String> {
        match self.row.raw.get(name) {
            Some(raw) => Some(raw.clone()),
            None => self.read_attribute(name).into_string(),
        }
    }

    fn call_method(&self, name: &str) -> Value {
        self.read_attribute(name)
    }

    /// Unknown names and undeclared targets resolve to [`AssociationValue::Nil`].
    fn association(&self, name: &str) -> AssociationValue<'_> {
        let Some(association) = self.def.find_association(name) else {
            return AssociationValue::Nil;
        };
        let Some(target) = self.store.type_def(&association.target) else {
            return AssociationValue::Nil;
        };
        let foreign_key = self.def.foreign_key_for(association);

        match association.kind {
            AssociationKind::BelongsTo => {
                let related = self
                    .get(&foreign_key)
                    .filter(|key| !key.is_nil())
                    .and_then(|key| {
                        self.store
                            .records_where(target, |row| {
                                row.values.get(&target.primary_key) == Some(key)
                            })
                            .into_iter()
                            .next()
                    });
                match related {
                    Some(record) => AssociationValue::One(Box::new(record)),
                    None => AssociationValue::Nil,
                }
            }
            AssociationKind::HasOne | AssociationKind::HasMany => {
                let Some(own_key) = self.primary_key().filter(|key| !key.is_nil()) else {
                    return if association.kind.is_collection() {
                        AssociationValue::Many {
                            item_type: target,
                            records: Vec::new(),
                        }
                    } else {
                        AssociationValue::Nil
                    };
                };
                let mut related = self
                    .store
                    .records_where(target, |row| row.values.get(&foreign_key) == Some(own_key));
                if association.kind.is_collection() {
                    AssociationValue::Many {
                        item_type: target,
                        records: related
                            .into_iter()
                            .map(|record| Box::new(record) as Box<dyn Record + '_>)
                            .collect(),
                    }
                } else if related.is_empty() {
                    AssociationValue::Nil
                } else {
                    AssociationValue::One(Box::new(related.swap_remove(0)))
                }
            }
        }
    }
}
