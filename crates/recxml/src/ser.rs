//! Record and collection serialization.
//!
//! [`XmlSerializer`] builds XML element trees directly from records:
//!
//! - [`serialize_one_into`](XmlSerializer::serialize_one_into) writes one record
//!   into a document, choosing where its element goes from `root_node`, `parent`,
//!   or the document root (in that order).
//! - [`serialize_many_into`](XmlSerializer::serialize_many_into) writes a
//!   `type="array"` wrapper holding one element per record, in input order.
//!
//! The owning variants ([`serialize_one`](XmlSerializer::serialize_one),
//! [`serialize_many`](XmlSerializer::serialize_many)) create the document
//! themselves; the collection variant also renders it to text.

use std::sync::Arc;

use tracing::debug;

use crate::descriptor::{DescriptorResolver, FieldDescriptor, TypeDescriptors};
use crate::error::Result;
use crate::include;
use crate::inflect;
use crate::model::{Record, Schema};
use crate::options::XmlOptions;
use crate::render::{self, FieldSource};
use crate::xml::utils::{ARRAY_TYPE, TYPE_ATTRIBUTE};
use crate::xml::{NodeId, XmlDocument};

/// Builds XML trees for records, using one descriptor cache.
#[derive(Debug, Clone, Copy)]
pub struct XmlSerializer<'r> {
    resolver: &'r DescriptorResolver,
}

impl Default for XmlSerializer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlSerializer<'static> {
    /// Serializer backed by the process-wide descriptor cache.
    pub fn new() -> Self {
        Self {
            resolver: DescriptorResolver::global(),
        }
    }
}

impl<'r> XmlSerializer<'r> {
    /// Serializer backed by a caller-owned descriptor cache.
    pub fn with_resolver(resolver: &'r DescriptorResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &'r DescriptorResolver {
        self.resolver
    }

    /// Cached descriptors for a type.
    pub fn descriptors(&self, schema: &dyn Schema) -> Arc<TypeDescriptors> {
        self.resolver.resolve(schema)
    }

    /// Serializes one record into a new document.
    ///
    /// `parent` and `root_node` are ignored here: they can only name nodes of a
    /// caller-owned document, see [`serialize_one_into`](Self::serialize_one_into).
    pub fn serialize_one(&self, record: &dyn Record, options: &XmlOptions) -> Result<XmlDocument> {
        let options = XmlOptions {
            parent: None,
            root_node: None,
            ..options.clone()
        };
        let mut doc = XmlDocument::new();
        self.serialize_one_into(&mut doc, record, &options)?;
        Ok(doc)
    }

    /// Serializes one record into `doc` and returns the record's element.
    ///
    /// Target element:
    /// 1. `root_node` when given: fields are written into it, nothing is created;
    /// 2. otherwise a new element named `root` (default: the type's element name),
    ///    appended to `parent` when given;
    /// 3. otherwise the document root, installing the new element if the document
    ///    has none yet.
    ///
    /// A new element whose name differs from the type's element name is tagged
    /// with `type="<TypeName>"`.
    pub fn serialize_one_into(
        &self,
        doc: &mut XmlDocument,
        record: &dyn Record,
        options: &XmlOptions,
    ) -> Result<NodeId> {
        let schema = record.schema();
        let descriptors = self.descriptors(schema);
        let element = match options.root_node {
            Some(node) => node,
            None => self.attach_record_element(doc, schema, &descriptors, options),
        };

        let fields = active_fields(&descriptors, options);
        for field in fields.iter() {
            render::render_field(doc, element, record, field, FieldSource::Column);
        }
        let methods = options
            .methods
            .as_deref()
            .unwrap_or(&descriptors.methods);
        for method in methods {
            render::render_field(doc, element, record, method, FieldSource::Method);
        }

        for entry in &options.include {
            include::include_association(self, doc, element, record, options, entry)?;
        }
        Ok(element)
    }

    fn attach_record_element(
        &self,
        doc: &mut XmlDocument,
        schema: &dyn Schema,
        descriptors: &TypeDescriptors,
        options: &XmlOptions,
    ) -> NodeId {
        let name = options
            .root
            .as_deref()
            .unwrap_or(&descriptors.element_name);

        let element = match (options.parent, doc.root()) {
            (Some(parent), _) => doc.append_element(parent, name),
            (None, Some(existing)) => return existing,
            (None, None) => {
                let node = doc.create_element(name);
                doc.set_root(node);
                node
            }
        };
        if name != descriptors.element_name {
            doc.set_attribute(element, TYPE_ATTRIBUTE, schema.type_name());
        }
        element
    }

    /// Serializes `records` as a collection document and returns its text.
    ///
    /// Honors `indent`; `parent` and `root_node` are ignored.
    pub fn serialize_many<R: Record>(
        &self,
        records: &[R],
        item_type: &dyn Schema,
        options: &XmlOptions,
    ) -> Result<String> {
        let options = XmlOptions {
            parent: None,
            root_node: None,
            ..options.clone()
        };
        let mut doc = XmlDocument::new();
        self.serialize_many_into(&mut doc, records, item_type, &options)?;
        doc.to_xml_string(options.indent())
    }

    /// Serializes `records` into `doc` under a `type="array"` wrapper and returns
    /// the wrapper.
    ///
    /// The wrapper is named `root` (default: the plural element name of
    /// `item_type`) and each item is named by its singular form. The wrapper is
    /// appended to `parent` when given, otherwise installed as the document root.
    /// With `only` (and no explicit `fields`), every item gets the same filtered
    /// field list.
    pub fn serialize_many_into<R: Record>(
        &self,
        doc: &mut XmlDocument,
        records: &[R],
        item_type: &dyn Schema,
        options: &XmlOptions,
    ) -> Result<NodeId> {
        let descriptors = self.descriptors(item_type);
        let (wrapper_name, item_name) = match options.root.as_deref() {
            Some(root) => (root.to_string(), inflect::singularize(root)),
            None => (descriptors.collection_name(), descriptors.element_name.clone()),
        };

        let wrapper = doc.create_element(wrapper_name.as_str());
        match options.parent {
            Some(parent) => doc.append_child(parent, wrapper),
            None => doc.set_root(wrapper),
        }
        doc.set_attribute(wrapper, TYPE_ATTRIBUTE, ARRAY_TYPE);

        let fields = match (&options.fields, &options.only) {
            (Some(fields), _) => Some(fields.clone()),
            (None, Some(only)) => Some(descriptors.fields_only(only)),
            (None, None) => None,
        };
        let item_options = XmlOptions {
            parent: Some(wrapper),
            root_node: None,
            root: Some(item_name),
            fields,
            ..options.clone()
        };

        debug!(
            item_type = item_type.type_name(),
            wrapper = %wrapper_name,
            items = records.len(),
            depth = options.depth(),
            "serializing collection"
        );
        for record in records {
            self.serialize_one_into(doc, record, &item_options)?;
        }
        Ok(wrapper)
    }
}

/// Field list for one record: explicit `fields`, else defaults filtered by `only`,
/// else all defaults.
fn active_fields(descriptors: &TypeDescriptors, options: &XmlOptions) -> Arc<[FieldDescriptor]> {
    match (&options.fields, &options.only) {
        (Some(fields), _) => fields.as_slice().into(),
        (None, Some(only)) => descriptors.fields_only(only).into(),
        (None, None) => Arc::clone(&descriptors.fields),
    }
}

/// XML serialization for any [`Record`], through the process-wide serializer.
pub trait Serializable {
    /// Builds a new document holding this record.
    fn to_xml_document(&self, options: &XmlOptions) -> Result<XmlDocument>;

    /// Writes this record into a caller-owned document.
    fn write_xml(&self, doc: &mut XmlDocument, options: &XmlOptions) -> Result<NodeId>;

    /// Builds a new document holding this record and renders it to text.
    fn to_xml(&self, options: &XmlOptions) -> Result<String> {
        self.to_xml_document(options)?
            .to_xml_string(options.indent())
    }
}

impl<R: Record + ?Sized> Serializable for R {
    fn to_xml_document(&self, options: &XmlOptions) -> Result<XmlDocument> {
        XmlSerializer::new().serialize_one(&self, options)
    }

    fn write_xml(&self, doc: &mut XmlDocument, options: &XmlOptions) -> Result<NodeId> {
        XmlSerializer::new().serialize_one_into(doc, &self, options)
    }
}

/// Serializes one record into a new document.
pub fn serialize_one(record: &dyn Record, options: &XmlOptions) -> Result<XmlDocument> {
    XmlSerializer::new().serialize_one(record, options)
}

/// Serializes a collection of records to XML text.
pub fn serialize_many<R: Record>(
    records: &[R],
    item_type: &dyn Schema,
    options: &XmlOptions,
) -> Result<String> {
    XmlSerializer::new().serialize_many(records, item_type, options)
}
