//! Records implemented directly against the capability traits, without the
//! in-memory store.

use chrono::NaiveDate;
use helios_recxml::{
    AssociationKind, AssociationValue, Column, FieldDescriptor, Kind, Record, Result, Schema,
    Serializable, Value, XmlOptions, serialize_many,
};

struct BookSchema;

impl Schema for BookSchema {
    fn type_name(&self) -> &str {
        "Library::BookEdition"
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("id", Kind::Integer),
            Column::new("title", Kind::String),
            Column::new("in_print", Kind::Boolean),
            Column::new("released_on", Kind::Date),
        ]
    }

    fn method_fields(&self) -> Vec<Column> {
        vec![Column::new("page_count", Kind::Integer)]
    }

    fn association(&self, name: &str) -> Option<AssociationKind> {
        match name {
            "author" => Some(AssociationKind::BelongsTo),
            "chapters" => Some(AssociationKind::HasMany),
            _ => None,
        }
    }
}

struct WriterSchema;

impl Schema for WriterSchema {
    fn type_name(&self) -> &str {
        "Writer"
    }

    fn columns(&self) -> Vec<Column> {
        vec![Column::new("name", Kind::String)]
    }

    fn association(&self, _name: &str) -> Option<AssociationKind> {
        None
    }
}

struct ChapterSchema;

impl Schema for ChapterSchema {
    fn type_name(&self) -> &str {
        "Chapter"
    }

    fn columns(&self) -> Vec<Column> {
        vec![Column::new("number", Kind::Integer), Column::new("heading", Kind::String)]
    }

    fn association(&self, _name: &str) -> Option<AssociationKind> {
        None
    }
}

struct Writer {
    name: &'static str,
}

impl Record for Writer {
    fn schema(&self) -> &dyn Schema {
        &WriterSchema
    }

    fn read_attribute(&self, name: &str) -> Value {
        match name {
            "name" => self.name.into(),
            _ => Value::Nil,
        }
    }
}

struct Chapter {
    number: i64,
    heading: Option<&'static str>,
}

impl Record for Chapter {
    fn schema(&self) -> &dyn Schema {
        &ChapterSchema
    }

    fn read_attribute(&self, name: &str) -> Value {
        match name {
            "number" => self.number.into(),
            "heading" => self.heading.into(),
            _ => Value::Nil,
        }
    }
}

struct Book {
    id: i64,
    title: &'static str,
    in_print: bool,
    released_on: Option<NaiveDate>,
    writer: Option<Writer>,
    chapters: Vec<Chapter>,
}

impl Record for Book {
    fn schema(&self) -> &dyn Schema {
        &BookSchema
    }

    fn read_attribute(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "title" => self.title.into(),
            "in_print" => self.in_print.into(),
            "released_on" => self.released_on.into(),
            _ => Value::Nil,
        }
    }

    fn call_method(&self, name: &str) -> Value {
        match name {
            "page_count" => (self.chapters.len() as i64 * 20).into(),
            _ => Value::Nil,
        }
    }

    fn association(&self, name: &str) -> AssociationValue<'_> {
        match name {
            "author" => match &self.writer {
                Some(writer) => AssociationValue::One(Box::new(writer)),
                None => AssociationValue::Nil,
            },
            "chapters" => AssociationValue::Many {
                item_type: &ChapterSchema,
                records: self
                    .chapters
                    .iter()
                    .map(|chapter| Box::new(chapter) as Box<dyn Record + '_>)
                    .collect(),
            },
            _ => AssociationValue::Nil,
        }
    }
}

fn sample_book() -> Book {
    Book {
        id: 5,
        title: "Rivers <& Roads>",
        in_print: true,
        released_on: NaiveDate::from_ymd_opt(1999, 4, 1),
        writer: Some(Writer { name: "Ada" }),
        chapters: vec![
            Chapter { number: 1, heading: Some("Source") },
            Chapter { number: 2, heading: None },
        ],
    }
}

#[test]
fn test_namespaced_type_element_name() -> Result<()> {
    let xml = sample_book().to_xml(&XmlOptions::new())?;
    println!("XML output:\n{}", xml);

    assert!(xml.ends_with(
        "<book-edition>\
         <id type=\"integer\">5</id>\
         <title>Rivers &lt;&amp; Roads&gt;</title>\
         <in-print type=\"boolean\">true</in-print>\
         <released-on>1999-04-01</released-on>\
         <page-count type=\"integer\">40</page-count>\
         </book-edition>"
    ));

    Ok(())
}

#[test]
fn test_custom_associations() -> Result<()> {
    let options = XmlOptions::new()
        .with_fields(vec![FieldDescriptor::new("id", Kind::Integer)])
        .with_methods(Vec::new())
        .include("author")
        .include("chapters");
    let xml = sample_book().to_xml(&options)?;

    assert!(xml.contains("<book-edition><id type=\"integer\">5</id><author type=\"Writer\"><name>Ada</name></author>"));
    assert!(xml.contains(
        "<chapters type=\"array\">\
         <chapter><number type=\"integer\">1</number><heading>Source</heading></chapter>\
         <chapter><number type=\"integer\">2</number><heading nil=\"true\"/></chapter>\
         </chapters>"
    ));

    Ok(())
}

#[test]
fn test_custom_nil_association() -> Result<()> {
    let book = Book {
        writer: None,
        chapters: Vec::new(),
        ..sample_book()
    };
    let options = XmlOptions::new().include("author").include("chapters");
    let xml = book.to_xml(&options)?;

    assert!(xml.contains("<author nil=\"true\"/>"));
    assert!(xml.contains("<chapters type=\"array\"/>"));

    Ok(())
}

#[test]
fn test_custom_collection() -> Result<()> {
    let chapters = sample_book().chapters;
    let xml = serialize_many(&chapters, &ChapterSchema, &XmlOptions::new().with_only(["number"]))?;

    assert!(xml.ends_with(
        "<chapters type=\"array\">\
         <chapter><number type=\"integer\">1</number></chapter>\
         <chapter><number type=\"integer\">2</number></chapter>\
         </chapters>"
    ));

    Ok(())
}
