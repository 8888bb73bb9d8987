//! Attribute names and values shared by the XML writer and reader.

/// Attribute marking an element whose logical value is absent.
pub const NIL_ATTRIBUTE: &str = "nil";

/// Attribute carrying a value's kind, or a record's type name.
pub const TYPE_ATTRIBUTE: &str = "type";

/// `type` value for collection wrapper elements.
pub const ARRAY_TYPE: &str = "array";
