//! Thin XML tree builder used by the record serializer.
//!
//! The serializer never writes text directly. It builds an [`XmlDocument`]
//! (an arena of elements addressed by [`NodeId`]), and the document is turned into
//! text once, at the end, by [`to_xml_string`].
//!
//! ## Output shape
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <posts type="array">
//!   <post>
//!     <id type="integer">1</id>
//!     <title>Hello</title>
//!     <published type="boolean">true</published>
//!     <body nil="true"/>
//!   </post>
//! </posts>
//! ```
//!
//! [`from_xml_str`] reads that shape back into an [`XmlValue`] tree.

pub mod de;
pub mod document;
pub mod ser;
pub mod utils;

pub use de::{XmlValue, from_xml_str};
pub use document::{Element, NodeId, XmlDocument};
pub use ser::{to_xml_string, to_xml_vec, to_xml_writer};
