//! XML text output for [`XmlDocument`] trees, written through quick-xml.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;
use crate::xml::document::{NodeId, XmlDocument};

/// Serialize a document to an XML string.
///
/// `indent` selects two-space pretty printing; otherwise no whitespace is written
/// between elements.
pub fn to_xml_string(document: &XmlDocument, indent: bool) -> Result<String> {
    let buffer = to_xml_vec(document, indent)?;
    Ok(String::from_utf8(buffer)?)
}

/// Serialize a document to an XML byte vector.
pub fn to_xml_vec(document: &XmlDocument, indent: bool) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    to_xml_writer(document, &mut buffer, indent)?;
    Ok(buffer)
}

/// Serialize a document to an XML writer.
pub fn to_xml_writer<W: Write>(document: &XmlDocument, writer: W, indent: bool) -> Result<()> {
    let writer = if indent {
        Writer::new_with_indent(writer, b' ', 2)
    } else {
        Writer::new(writer)
    };
    let mut serializer = TreeWriter { document, writer };
    serializer.write_document()
}

struct TreeWriter<'d, W: Write> {
    document: &'d XmlDocument,
    writer: Writer<W>,
}

impl<W: Write> TreeWriter<'_, W> {
    fn write_document(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if let Some(root) = self.document.root() {
            self.write_element(root)?;
        }
        Ok(())
    }

    fn write_element(&mut self, node: NodeId) -> Result<()> {
        let element = self.document.element(node);
        let mut start = BytesStart::new(element.name.as_str());
        for (key, value) in &element.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        // Nil and empty-collection elements self-close.
        if element.children.is_empty() && element.text.is_none() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(start))?;
        // An empty text event still keeps the closing tag on the same line when indenting.
        if let Some(text) = element.text.as_deref() {
            self.writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for &child in &element.children {
            self.write_element(child)?;
        }
        self.writer
            .write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
        Ok(())
    }
}
