//! Reads serialized record XML back into a generic value tree.
//!
//! The mapping mirrors what the serializer writes:
//!
//! | XML | [`XmlValue`] |
//! |-----|--------------|
//! | `<body nil="true"/>` | `Nil` |
//! | `<title>Hello</title>` | `Text("Hello")` |
//! | `<comments type="array">...</comments>` | `List([...])` |
//! | `<post><id>1</id></post>` | `Map([("id", Text("1"))])` |
//!
//! Values stay strings; `type` attributes other than `array` are not used to cast.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, SerializeError};
use crate::xml::utils;

/// Generic value tree produced by [`from_xml_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    Nil,
    Text(String),
    /// Child elements in document order.
    Map(Vec<(String, XmlValue)>),
    List(Vec<XmlValue>),
}

impl XmlValue {
    /// First entry named `key` of a map.
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        match self {
            XmlValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            XmlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[XmlValue]> {
        match self {
            XmlValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, XmlValue::Nil)
    }

    /// Keys of a map, in document order.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            XmlValue::Map(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Parse XML text into a single-entry map of root element name to its value.
///
/// # Examples
///
/// ```
/// use helios_recxml::xml::{from_xml_str, XmlValue};
///
/// let parsed = from_xml_str(r#"<post><id type="integer">1</id><body nil="true"/></post>"#)?;
/// let post = parsed.get("post").unwrap();
/// assert_eq!(post.get("id").and_then(XmlValue::as_str), Some("1"));
/// assert!(post.get("body").unwrap().is_nil());
/// # Ok::<(), helios_recxml::SerializeError>(())
/// ```
pub fn from_xml_str(xml: &str) -> Result<XmlValue> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, XmlValue)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                close(frame, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| SerializeError::parse("unbalanced closing tag"))?;
                close(frame, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&text);
                    frame.text.push_str(&unescape(&raw).map_err(SerializeError::parse)?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(frame) = stack.last_mut() {
                    let entity = format!("&{};", String::from_utf8_lossy(&reference));
                    frame.text.push_str(&unescape(&entity).map_err(SerializeError::parse)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(SerializeError::parse("unexpected end of document"));
    }
    let (name, value) = root.ok_or_else(|| SerializeError::parse("document has no root element"))?;
    Ok(XmlValue::Map(vec![(name, value)]))
}

/// An element being read.
struct Frame {
    name: String,
    nil: bool,
    array: bool,
    text: String,
    children: Vec<(String, XmlValue)>,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let mut frame = Frame {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            nil: false,
            array: false,
            text: String::new(),
            children: Vec::new(),
        };
        for attr in start.attributes() {
            let attr = attr.map_err(SerializeError::parse)?;
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape(&raw).map_err(SerializeError::parse)?;
            match attr.key.as_ref() {
                k if k == utils::NIL_ATTRIBUTE.as_bytes() => frame.nil = value == "true",
                k if k == utils::TYPE_ATTRIBUTE.as_bytes() => {
                    frame.array = value == utils::ARRAY_TYPE
                }
                _ => {}
            }
        }
        Ok(frame)
    }

    fn into_value(self) -> XmlValue {
        if self.nil {
            XmlValue::Nil
        } else if self.array {
            XmlValue::List(self.children.into_iter().map(|(_, v)| v).collect())
        } else if !self.children.is_empty() {
            XmlValue::Map(self.children)
        } else {
            XmlValue::Text(self.text)
        }
    }
}

fn close(
    frame: Frame,
    stack: &mut [Frame],
    root: &mut Option<(String, XmlValue)>,
) -> Result<()> {
    let name = frame.name.clone();
    let value = frame.into_value();
    match stack.last_mut() {
        Some(parent) => parent.children.push((name, value)),
        None if root.is_none() => *root = Some((name, value)),
        None => return Err(SerializeError::parse("multiple root elements")),
    }
    Ok(())
}
