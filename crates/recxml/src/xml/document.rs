//! In-memory XML element tree.
//!
//! Nodes live in an arena owned by [`XmlDocument`] and are addressed by
//! [`NodeId`]. Node ids are only meaningful for the document that created them;
//! passing an id from another document panics.

use std::io::Write;

use crate::error::Result;

/// Handle to an element inside an [`XmlDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One XML element: name, attributes in insertion order, optional text content,
/// and child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl Element {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Looks up an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// An XML document under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlDocument {
    nodes: Vec<Element>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes.push(Element::new(name));
        NodeId(self.nodes.len() - 1)
    }

    /// Attaches `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Creates an element and attaches it as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let child = self.create_element(name);
        self.append_child(parent, child);
        child
    }

    /// Sets or replaces an attribute.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        let key = key.into();
        let value = value.into();
        let attributes = &mut self.nodes[node.0].attributes;
        match attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => attributes.push((key, value)),
        }
    }

    /// Sets the text content of an element.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.nodes[node.0].text = Some(text.into());
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Installs `node` as the document root.
    pub fn set_root(&mut self, node: NodeId) {
        self.root = Some(node);
    }

    pub fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn attribute(&self, node: NodeId, key: &str) -> Option<&str> {
        self.nodes[node.0].attribute(key)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].text.as_deref()
    }

    /// First child of `node` named `name`.
    pub fn child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .find(|&c| self.name(c) == name)
    }

    /// Number of elements created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serializes the document to text.
    pub fn to_xml_string(&self, indent: bool) -> Result<String> {
        super::ser::to_xml_string(self, indent)
    }

    /// Serializes the document to `writer`.
    pub fn write_to<W: Write>(&self, writer: W, indent: bool) -> Result<()> {
        super::ser::to_xml_writer(self, writer, indent)
    }
}
