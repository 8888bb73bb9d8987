mod common;

use common::{blog_store, post_type};
use helios_recxml::{Result, XmlDocument, XmlOptions, XmlSerializer, XmlValue, from_xml_str, serialize_many};

#[test]
fn test_collection_wrapper() -> Result<()> {
    let store = blog_store();
    let posts = store.all("Post")?;
    let xml = serialize_many(&posts, post_type(&store), &XmlOptions::new())?;
    println!("XML output:\n{}", xml);

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><posts type=\"array\"><post>"));
    assert!(xml.ends_with("</post></posts>"));
    assert_eq!(xml.matches("<post>").count(), 3);

    let first = xml.find("<id type=\"integer\">1</id>").unwrap();
    let second = xml.find("<id type=\"integer\">2</id>").unwrap();
    let third = xml.find("<id type=\"integer\">3</id>").unwrap();
    assert!(first < second && second < third);

    Ok(())
}

#[test]
fn test_only_applies_to_every_item() -> Result<()> {
    let store = blog_store();
    let posts = store.all("Post")?;
    let options = XmlOptions::new().with_only(["id"]).with_methods(Vec::new());
    let xml = serialize_many(&posts, post_type(&store), &options)?;

    assert!(xml.ends_with(
        "<posts type=\"array\">\
         <post><id type=\"integer\">1</id></post>\
         <post><id type=\"integer\">2</id></post>\
         <post><id type=\"integer\">3</id></post>\
         </posts>"
    ));

    Ok(())
}

#[test]
fn test_root_names_wrapper_and_items() -> Result<()> {
    let store = blog_store();
    let posts = store.all("Post")?;
    let options = XmlOptions::new().with_root("entries").with_only(["id"]).with_methods(Vec::new());
    let xml = serialize_many(&posts, post_type(&store), &options)?;

    assert!(xml.contains("<entries type=\"array\"><entry type=\"Post\"><id type=\"integer\">1</id></entry>"));
    assert_eq!(xml.matches("<entry type=\"Post\">").count(), 3);

    Ok(())
}

#[test]
fn test_empty_collection() -> Result<()> {
    let store = blog_store();
    let posts = store.all("Post")?;
    let xml = serialize_many(&posts[..0], post_type(&store), &XmlOptions::new())?;

    assert!(xml.ends_with("<posts type=\"array\"/>"));

    Ok(())
}

#[test]
fn test_indented_collection() -> Result<()> {
    let store = blog_store();
    let posts = store.all("Post")?;
    let options = XmlOptions::new()
        .with_only(["id"])
        .with_methods(Vec::new())
        .with_indent(true);
    let xml = serialize_many(&posts[..1], post_type(&store), &options)?;

    assert_eq!(
        xml,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <posts type=\"array\">\n  \
         <post>\n    \
         <id type=\"integer\">1</id>\n  \
         </post>\n\
         </posts>"
    );

    Ok(())
}

#[test]
fn test_collection_with_includes() -> Result<()> {
    let store = blog_store();
    let posts = store.all("Post")?;
    let options = XmlOptions::new()
        .with_only(["id"])
        .include("author")
        .include("comments");
    let xml = serialize_many(&posts, post_type(&store), &options)?;

    // only propagates: nested records keep just their id
    assert!(xml.contains("<author type=\"User\"><id type=\"integer\">1</id></author>"));
    assert!(xml.contains("<author nil=\"true\"/>"));
    assert!(xml.contains("<comments type=\"array\"><comment><id type=\"integer\">11</id></comment></comments>"));

    Ok(())
}

#[test]
fn test_collection_under_parent() -> Result<()> {
    let store = blog_store();
    let users = store.all("User")?;
    let user_type = store.type_def("User").unwrap();

    let mut doc = XmlDocument::new();
    let export = doc.create_element("export");
    doc.set_root(export);

    let options = XmlOptions::new().with_parent(export).with_only(["name"]);
    let wrapper = XmlSerializer::new().serialize_many_into(&mut doc, &users, user_type, &options)?;

    assert_eq!(doc.root(), Some(export));
    assert_eq!(doc.children(export), &[wrapper]);
    assert_eq!(doc.name(wrapper), "users");
    assert_eq!(doc.attribute(wrapper, "type"), Some("array"));
    assert_eq!(doc.children(wrapper).len(), 2);

    let xml = doc.to_xml_string(false)?;
    assert!(xml.ends_with(
        "<export><users type=\"array\">\
         <user><name>Ann</name></user>\
         <user><name>Bob</name></user>\
         </users></export>"
    ));

    Ok(())
}

#[test]
fn test_collection_reads_back() -> Result<()> {
    let store = blog_store();
    let posts = store.all("Post")?;
    let options = XmlOptions::new().with_only(["id", "title"]).include("comments");
    let xml = serialize_many(&posts, post_type(&store), &options)?;

    let parsed = from_xml_str(&xml)?;
    let items = parsed.get("posts").and_then(XmlValue::as_list).unwrap();
    assert_eq!(items.len(), 3);

    let titles: Vec<_> = items
        .iter()
        .filter_map(|item| item.get("title").and_then(XmlValue::as_str))
        .collect();
    assert_eq!(titles, vec!["Hello & welcome", "Draft", "Third"]);

    let comments = items[0].get("comments").and_then(XmlValue::as_list).unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].get("id").and_then(XmlValue::as_str), Some("12"));

    Ok(())
}

#[test]
fn test_isolated_resolver() -> Result<()> {
    let store = blog_store();
    let resolver = helios_recxml::DescriptorResolver::new();
    let serializer = XmlSerializer::with_resolver(&resolver);
    let users = store.all("User")?;

    serializer.serialize_many(&users, store.type_def("User").unwrap(), &XmlOptions::new())?;
    serializer.serialize_many(&users, store.type_def("User").unwrap(), &XmlOptions::new())?;

    assert_eq!(resolver.len(), 1);

    Ok(())
}
