//! Per-call serialization options.
//!
//! [`XmlOptions`] is a read-only input to one serialization call. Crossing an
//! association boundary goes through [`XmlOptions::for_association`], which drops
//! the keys that describe the *current* record (`fields`, `methods`, `include`,
//! `root_node`) and then lets the association's nested options override the rest.

use crate::descriptor::FieldDescriptor;
use crate::xml::NodeId;

/// An entry of the `include` list.
#[derive(Debug, Clone, PartialEq)]
pub enum Include {
    /// Include the association with the propagated options as they are.
    Association(String),
    /// Include the association, overriding propagated options with these.
    Nested(String, Box<XmlOptions>),
}

impl Include {
    /// Association name.
    pub fn name(&self) -> &str {
        match self {
            Include::Association(name) | Include::Nested(name, _) => name,
        }
    }

    pub fn nested(&self) -> Option<&XmlOptions> {
        match self {
            Include::Association(_) => None,
            Include::Nested(_, options) => Some(options),
        }
    }

    /// Builds a nested include from a dotted path: `comments.author` becomes
    /// `comments` with a nested include of `author`.
    pub fn from_path(path: &str) -> Include {
        match path.split_once('.') {
            Some((head, rest)) => Include::Nested(
                head.to_string(),
                Box::new(XmlOptions::new().include_entry(Include::from_path(rest))),
            ),
            None => Include::Association(path.to_string()),
        }
    }
}

impl From<&str> for Include {
    fn from(name: &str) -> Self {
        Include::Association(name.to_string())
    }
}

impl From<String> for Include {
    fn from(name: String) -> Self {
        Include::Association(name)
    }
}

/// Options for one serialization call.
///
/// # Example
///
/// ```
/// use helios_recxml::XmlOptions;
///
/// let options = XmlOptions::new()
///     .with_only(["id", "title"])
///     .include("author")
///     .include_nested("comments", XmlOptions::new().include("author"))
///     .with_indent(true);
/// assert_eq!(options.include.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlOptions {
    /// Element name for the record, or for the collection wrapper.
    pub root: Option<String>,
    /// Attach the new element under this node of the caller's document.
    pub parent: Option<NodeId>,
    /// Write fields directly into this existing node instead of creating one.
    pub root_node: Option<NodeId>,
    /// Restrict default fields to these source names.
    pub only: Option<Vec<String>>,
    /// Field list to use instead of the type's defaults. Takes precedence over `only`.
    pub fields: Option<Vec<FieldDescriptor>>,
    /// Method field list to use instead of the type's defaults.
    pub methods: Option<Vec<FieldDescriptor>>,
    /// Associations to serialize, in order.
    pub include: Vec<Include>,
    /// Pretty-print text output.
    pub indent: Option<bool>,
    /// Fail with `IncludeDepthExceeded` past this many nested association levels.
    pub max_depth: Option<usize>,
    /// Association levels already entered.
    pub(crate) depth: usize,
}

impl XmlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_root_node(mut self, node: NodeId) -> Self {
        self.root_node = Some(node);
        self
    }

    pub fn with_only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_methods(mut self, methods: Vec<FieldDescriptor>) -> Self {
        self.methods = Some(methods);
        self
    }

    /// Appends an association to the include list.
    pub fn include(self, name: impl Into<String>) -> Self {
        self.include_entry(Include::Association(name.into()))
    }

    /// Appends an association with its own nested options.
    pub fn include_nested(self, name: impl Into<String>, options: XmlOptions) -> Self {
        self.include_entry(Include::Nested(name.into(), Box::new(options)))
    }

    pub fn include_entry(mut self, include: Include) -> Self {
        self.include.push(include);
        self
    }

    /// Adds a dotted include path, merging it into an existing entry for the
    /// same association: `comments.author` then `comments.commenter` yields one
    /// `comments` entry including both.
    pub fn include_path(mut self, path: &str) -> Self {
        self.merge_include_path(path);
        self
    }

    fn merge_include_path(&mut self, path: &str) {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let existing = self.include.iter_mut().find(|entry| entry.name() == head);

        match (existing, rest) {
            (None, _) => self.include.push(Include::from_path(path)),
            (Some(_), None) => {}
            (Some(entry), Some(rest)) => {
                if let Include::Association(name) = entry {
                    *entry = Include::Nested(std::mem::take(name), Box::default());
                }
                if let Include::Nested(_, nested) = entry {
                    nested.merge_include_path(rest);
                }
            }
        }
    }

    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Whether text output is pretty-printed. Defaults to compact.
    pub fn indent(&self) -> bool {
        self.indent.unwrap_or(false)
    }

    /// Current association nesting level (0 for the top-level call).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `self` with every key set in `other` replaced by `other`'s value.
    pub fn merge(mut self, other: &XmlOptions) -> XmlOptions {
        fn take<T: Clone>(slot: &mut Option<T>, other: &Option<T>) {
            if other.is_some() {
                slot.clone_from(other);
            }
        }

        take(&mut self.root, &other.root);
        take(&mut self.parent, &other.parent);
        take(&mut self.root_node, &other.root_node);
        take(&mut self.only, &other.only);
        take(&mut self.fields, &other.fields);
        take(&mut self.methods, &other.methods);
        take(&mut self.indent, &other.indent);
        take(&mut self.max_depth, &other.max_depth);
        if !other.include.is_empty() {
            self.include.clone_from(&other.include);
        }
        self
    }

    /// Options handed to an associated record or collection.
    ///
    /// `fields`, `methods`, `include` and `root_node` describe the current record and
    /// are never propagated; `nested` (from an [`Include::Nested`] entry) then wins
    /// over whatever remains.
    pub fn for_association(&self, nested: Option<&XmlOptions>) -> XmlOptions {
        let propagated = XmlOptions {
            fields: None,
            methods: None,
            include: Vec::new(),
            root_node: None,
            depth: self.depth + 1,
            ..self.clone()
        };
        match nested {
            Some(nested) => propagated.merge(nested),
            None => propagated,
        }
    }
}
