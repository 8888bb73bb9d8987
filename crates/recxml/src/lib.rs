//! # Helios Record XML
//!
//! Direct tree-construction XML serialization for database records and their
//! associations.
//!
//! Records are described through two capability traits a data-access layer
//! implements ([`Schema`] per type, [`Record`] per instance). The serializer
//! queries them and builds an [`XmlDocument`] element by element, with no
//! template rendering in between.
//!
//! ## Output
//!
//! | Value | XML |
//! |-------|-----|
//! | `title: "Hello"` | `<title>Hello</title>` |
//! | `id: 1` | `<id type="integer">1</id>` |
//! | `published: true` | `<published type="boolean">true</published>` |
//! | `body: nil` | `<body nil="true"/>` |
//! | `comments: [..]` | `<comments type="array"><comment>..</comment></comments>` |
//! | `author: nil` | `<author nil="true"/>` |
//!
//! Column names are hyphenated (`created_at` becomes `<created-at>`); type names
//! are underscored and hyphenated (`BlogPost` becomes `<blog-post>`), and
//! pluralized for collections.
//!
//! ## Example
//!
//! ```
//! use helios_recxml::memory::MemoryStore;
//! use helios_recxml::{XmlOptions, serialize_many};
//!
//! let store = MemoryStore::from_json_str(r#"{
//!     "types": [
//!         { "name": "Post",
//!           "columns": [ { "name": "id", "kind": "integer" },
//!                        { "name": "title", "kind": "string" } ],
//!           "associations": [ { "name": "comments", "kind": "has_many", "target": "Comment" } ] },
//!         { "name": "Comment",
//!           "columns": [ { "name": "id", "kind": "integer" },
//!                        { "name": "post_id", "kind": "integer" } ] }
//!     ],
//!     "records": {
//!         "Post": [ { "id": 1, "title": "Hello" } ],
//!         "Comment": [ { "id": 7, "post_id": 1 } ]
//!     }
//! }"#)?;
//!
//! let posts = store.all("Post")?;
//! let post_type = store.type_def("Post").unwrap();
//! let xml = serialize_many(&posts, post_type, &XmlOptions::new().include("comments"))?;
//!
//! assert!(xml.contains(r#"<posts type="array"><post><id type="integer">1</id>"#));
//! assert!(xml.contains(r#"<comments type="array"><comment><id type="integer">7</id>"#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod descriptor;
pub mod error;
pub mod include;
pub mod inflect;
pub mod memory;
pub mod model;
pub mod options;
pub mod render;
pub mod ser;
pub mod xml;

pub use descriptor::{Describable, DescriptorResolver, FieldDescriptor, TypeDescriptors};
pub use error::{Result, SerializeError, StoreError};
pub use model::{AssociationKind, AssociationValue, Column, Kind, Record, Schema, Value};
pub use options::{Include, XmlOptions};
pub use ser::{Serializable, XmlSerializer, serialize_many, serialize_one};
pub use xml::{NodeId, XmlDocument, XmlValue, from_xml_str};
