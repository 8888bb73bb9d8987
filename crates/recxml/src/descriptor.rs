//! Field descriptor resolution.
//!
//! A record type's serializable scalar fields are derived once from its
//! [`Schema`] and cached for the lifetime of the resolver, keyed by
//! [`Schema::cache_key`]. Entries are never invalidated: a schema whose columns
//! change must present a new key.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::trace;

use crate::inflect;
use crate::model::{Column, Kind, Schema};

/// A serializable scalar field: where the value comes from, what the element is
/// called, and how the value is typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Column or method name on the record.
    pub source_name: String,
    /// Element name in the XML output.
    pub output_name: String,
    pub kind: Kind,
}

impl FieldDescriptor {
    /// Builds a descriptor, deriving the output name from the source name.
    pub fn new(source_name: impl Into<String>, kind: Kind) -> Self {
        let source_name = source_name.into();
        let output_name = inflect::xml_name(&source_name);
        Self {
            source_name,
            output_name,
            kind,
        }
    }

    /// Builds a descriptor with an explicit output name.
    pub fn renamed(
        source_name: impl Into<String>,
        output_name: impl Into<String>,
        kind: Kind,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            output_name: output_name.into(),
            kind,
        }
    }
}

impl From<&Column> for FieldDescriptor {
    fn from(column: &Column) -> Self {
        FieldDescriptor::new(column.name.clone(), column.kind)
    }
}

/// Everything derived from one type's schema.
#[derive(Debug, Clone)]
pub struct TypeDescriptors {
    /// Persisted columns, in column order.
    pub fields: Arc<[FieldDescriptor]>,
    /// Declared method fields.
    pub methods: Arc<[FieldDescriptor]>,
    /// Singular element name for one record of the type.
    pub element_name: String,
}

impl TypeDescriptors {
    fn derive(schema: &(impl Schema + ?Sized)) -> Self {
        Self {
            fields: schema.columns().iter().map(FieldDescriptor::from).collect(),
            methods: schema.method_fields().iter().map(FieldDescriptor::from).collect(),
            element_name: element_name_for(schema.type_name()),
        }
    }

    /// Plural element name used for collection wrappers.
    pub fn collection_name(&self) -> String {
        inflect::pluralize(&self.element_name)
    }

    /// Default fields restricted to `only`, keeping descriptor order.
    pub fn fields_only(&self, only: &[String]) -> Vec<FieldDescriptor> {
        self.fields
            .iter()
            .filter(|field| only.iter().any(|name| *name == field.source_name))
            .cloned()
            .collect()
    }
}

/// Singular, hyphenated element name for a type name: `Blog::BlogPost` -> `blog-post`.
pub fn element_name_for(type_name: &str) -> String {
    inflect::xml_name(inflect::demodulize(type_name))
}

/// Per-type descriptor cache.
///
/// Lookups take a read lock; a miss computes outside any lock and inserts. Two
/// threads missing at once both compute the same value and the first insert wins.
#[derive(Debug, Default)]
pub struct DescriptorResolver {
    cache: RwLock<HashMap<String, Arc<TypeDescriptors>>>,
}

static GLOBAL: Lazy<DescriptorResolver> = Lazy::new(DescriptorResolver::new);

impl DescriptorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide resolver used by [`Describable`] and the default serializer.
    pub fn global() -> &'static DescriptorResolver {
        &GLOBAL
    }

    /// Returns the cached descriptors for `schema`, computing them on first use.
    pub fn resolve(&self, schema: &(impl Schema + ?Sized)) -> Arc<TypeDescriptors> {
        let key = schema.cache_key();
        if let Some(found) = self.cache.read().get(key.as_ref()) {
            return Arc::clone(found);
        }

        let derived = Arc::new(TypeDescriptors::derive(schema));
        trace!(
            type_name = schema.type_name(),
            key = key.as_ref(),
            fields = derived.fields.len(),
            methods = derived.methods.len(),
            "cached field descriptors"
        );
        Arc::clone(
            self.cache
                .write()
                .entry(key.into_owned())
                .or_insert(derived),
        )
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }
}

/// Descriptor resolution and element naming for any [`Schema`].
pub trait Describable {
    /// Field descriptors for persisted columns, in column order.
    fn field_descriptors(&self) -> Arc<[FieldDescriptor]>;

    /// Field descriptors for declared method fields.
    fn method_descriptors(&self) -> Arc<[FieldDescriptor]>;

    /// Singular element name for one record of this type.
    fn element_name(&self) -> String;

    /// Plural element name for a collection of this type.
    fn collection_element_name(&self) -> String {
        inflect::pluralize(&self.element_name())
    }
}

impl<S: Schema + ?Sized> Describable for S {
    fn field_descriptors(&self) -> Arc<[FieldDescriptor]> {
        Arc::clone(&DescriptorResolver::global().resolve(self).fields)
    }

    fn method_descriptors(&self) -> Arc<[FieldDescriptor]> {
        Arc::clone(&DescriptorResolver::global().resolve(self).methods)
    }

    fn element_name(&self) -> String {
        DescriptorResolver::global().resolve(self).element_name.clone()
    }
}
