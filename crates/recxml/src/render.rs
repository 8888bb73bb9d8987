//! Renders one column or method value as one XML element.
//!
//! - nil values become an empty element with `nil="true"` and no `type`;
//! - non-nil values become text content, and `integer`/`boolean` kinds also get
//!   `type="<kind>"`.

use crate::descriptor::FieldDescriptor;
use crate::model::{Kind, Record};
use crate::xml::utils::{NIL_ATTRIBUTE, TYPE_ATTRIBUTE};
use crate::xml::{NodeId, XmlDocument};

/// Where a descriptor's value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// A persisted column.
    Column,
    /// A declared zero-argument method.
    Method,
}

/// Reads the value for `field` from `record` as text, `None` when nil.
///
/// Datetime columns are read before type cast, so stored text is written as is.
pub fn read_value(
    record: &dyn Record,
    field: &FieldDescriptor,
    source: FieldSource,
) -> Option<String> {
    match (source, field.kind) {
        (FieldSource::Column, Kind::DateTime) => {
            record.read_attribute_before_type_cast(&field.source_name)
        }
        (FieldSource::Column, _) => record.read_attribute(&field.source_name).into_string(),
        (FieldSource::Method, _) => record.call_method(&field.source_name).into_string(),
    }
}

/// Renders `field` of `record` as a new last child of `parent`.
pub fn render_field(
    doc: &mut XmlDocument,
    parent: NodeId,
    record: &dyn Record,
    field: &FieldDescriptor,
    source: FieldSource,
) -> NodeId {
    let value = read_value(record, field, source);
    render_value(doc, parent, &field.output_name, field.kind, value)
}

/// Renders an already-read value as a new last child of `parent`.
pub fn render_value(
    doc: &mut XmlDocument,
    parent: NodeId,
    name: &str,
    kind: Kind,
    value: Option<String>,
) -> NodeId {
    let node = doc.append_element(parent, name);
    match value {
        None => doc.set_attribute(node, NIL_ATTRIBUTE, "true"),
        Some(text) => {
            if kind.is_tagged() {
                doc.set_attribute(node, TYPE_ATTRIBUTE, kind.as_str());
            }
            doc.set_text(node, text);
        }
    }
    node
}

/// Renders the nil placeholder for an absent single association.
pub fn render_nil_association(doc: &mut XmlDocument, parent: NodeId, name: &str) -> NodeId {
    render_value(doc, parent, name, Kind::Association, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssociationKind, Column, Schema, Value};

    struct Row;

    struct RowSchema;

    impl Schema for RowSchema {
        fn type_name(&self) -> &str {
            "Row"
        }

        fn columns(&self) -> Vec<Column> {
            Vec::new()
        }

        fn association(&self, _name: &str) -> Option<AssociationKind> {
            None
        }
    }

    impl Record for Row {
        fn schema(&self) -> &dyn Schema {
            &RowSchema
        }

        fn read_attribute(&self, name: &str) -> Value {
            match name {
                "id" => Value::Integer(7),
                "flag" => Value::Boolean(false),
                "title" => Value::from("Hi"),
                "created_at" => Value::from("2008-01-01 00:00:00 parsed"),
                _ => Value::Nil,
            }
        }

        fn read_attribute_before_type_cast(&self, name: &str) -> Option<String> {
            match name {
                "created_at" => Some("2008-01-01 00:00:00".to_string()),
                _ => None,
            }
        }

        fn call_method(&self, name: &str) -> Value {
            match name {
                "score" => Value::Integer(99),
                _ => Value::Nil,
            }
        }
    }

    fn render(field: FieldDescriptor, source: FieldSource) -> (XmlDocument, NodeId) {
        let mut doc = XmlDocument::new();
        let root = doc.create_element("row");
        doc.set_root(root);
        let node = render_field(&mut doc, root, &Row, &field, source);
        (doc, node)
    }

    #[test]
    fn test_integer_and_boolean_are_typed() {
        let (doc, node) = render(FieldDescriptor::new("id", Kind::Integer), FieldSource::Column);
        assert_eq!(doc.text(node), Some("7"));
        assert_eq!(doc.attribute(node, "type"), Some("integer"));

        let (doc, node) = render(FieldDescriptor::new("flag", Kind::Boolean), FieldSource::Column);
        assert_eq!(doc.text(node), Some("false"));
        assert_eq!(doc.attribute(node, "type"), Some("boolean"));
    }

    #[test]
    fn test_string_is_untyped() {
        let (doc, node) = render(FieldDescriptor::new("title", Kind::String), FieldSource::Column);
        assert_eq!(doc.name(node), "title");
        assert_eq!(doc.text(node), Some("Hi"));
        assert_eq!(doc.attribute(node, "type"), None);
    }

    #[test]
    fn test_nil_is_marked_and_untyped() {
        let field = FieldDescriptor::new("missing", Kind::Integer);
        let (doc, node) = render(field, FieldSource::Column);
        assert_eq!(doc.attribute(node, "nil"), Some("true"));
        assert_eq!(doc.attribute(node, "type"), None);
        assert_eq!(doc.text(node), None);
    }

    #[test]
    fn test_datetime_reads_raw_value() {
        let (doc, node) = render(
            FieldDescriptor::new("created_at", Kind::DateTime),
            FieldSource::Column,
        );
        assert_eq!(doc.name(node), "created-at");
        assert_eq!(doc.text(node), Some("2008-01-01 00:00:00"));
        assert_eq!(doc.attribute(node, "type"), None);
    }

    #[test]
    fn test_method_source() {
        let (doc, node) = render(FieldDescriptor::new("score", Kind::Integer), FieldSource::Method);
        assert_eq!(doc.text(node), Some("99"));
        assert_eq!(doc.attribute(node, "type"), Some("integer"));
    }

    #[test]
    fn test_nil_association_placeholder() {
        let mut doc = XmlDocument::new();
        let root = doc.create_element("post");
        let node = render_nil_association(&mut doc, root, "author");
        assert_eq!(doc.name(node), "author");
        assert_eq!(doc.attribute(node, "nil"), Some("true"));
        assert_eq!(doc.attribute(node, "type"), None);
        assert_eq!(doc.children(root), &[node]);
    }
}
