//! Association inclusion.
//!
//! An `include` entry names a declared association of the record being written.
//! Depending on what the association accessor returns, the includer nests a
//! collection wrapper, a single record element, or a nil placeholder under the
//! record's element.

use tracing::trace;

use crate::error::{Result, SerializeError};
use crate::inflect;
use crate::model::{AssociationValue, Record};
use crate::options::{Include, XmlOptions};
use crate::render;
use crate::ser::XmlSerializer;
use crate::xml::{NodeId, XmlDocument};

/// Serializes the association named by `include` under `element`.
///
/// Fails with [`SerializeError::InvalidInclude`] when the record's type declares no
/// such association, and with [`SerializeError::IncludeDepthExceeded`] when
/// `max_depth` is set and this inclusion would go past it.
pub fn include_association(
    serializer: &XmlSerializer<'_>,
    doc: &mut XmlDocument,
    element: NodeId,
    record: &dyn Record,
    options: &XmlOptions,
    include: &Include,
) -> Result<()> {
    let name = include.name();
    let schema = record.schema();
    let Some(kind) = schema.association(name) else {
        return Err(SerializeError::InvalidInclude {
            type_name: schema.type_name().to_string(),
            association: name.to_string(),
        });
    };

    let mut nested = options.for_association(include.nested());
    if let Some(max_depth) = nested.max_depth {
        if nested.depth() > max_depth {
            return Err(SerializeError::IncludeDepthExceeded { depth: max_depth });
        }
    }

    let tag = inflect::xml_name(name);
    nested.root = Some(tag.clone());
    nested.parent = Some(element);

    let value = record.association(name);
    trace!(
        type_name = schema.type_name(),
        association = name,
        ?kind,
        ?value,
        depth = nested.depth(),
        "including association"
    );

    match value {
        AssociationValue::Many { item_type, records } => {
            serializer.serialize_many_into(doc, records.as_slice(), item_type, &nested)?;
        }
        AssociationValue::One(associated) => {
            serializer.serialize_one_into(doc, associated.as_ref(), &nested)?;
        }
        AssociationValue::Nil => {
            render::render_nil_association(doc, element, &tag);
        }
    }
    Ok(())
}
