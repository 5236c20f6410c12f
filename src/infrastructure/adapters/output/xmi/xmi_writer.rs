/*
XMI writer

Serializes a CAS back to XMI 2.0. Namespace prefixes of the source document are reused;
types introduced by predictions get a prefix derived from their package.
*/

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use super::namespace::{namespace_for, NamespaceRegistry, CAS_NAMESPACE};
use crate::core::platform::container::cas::{Cas, CasError};

pub fn write_cas(cas: &Cas) -> Result<String, CasError> {
    let mut registry = NamespaceRegistry::new(cas.namespaces());
    let cas_prefix = registry.prefix_for(CAS_NAMESPACE);

    // Element names are resolved up front so that every prefix is declared on the root.
    let element_names: Vec<String> = cas
        .structures()
        .iter()
        .map(|fs| {
            let (uri, local_name) = namespace_for(fs.type_name());
            format!("{}:{}", registry.prefix_for(&uri), local_name)
        })
        .collect();

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let write_error = |e: quick_xml::Error| CasError::Xml(e.to_string());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;

    let mut root = BytesStart::new("xmi:XMI");
    for (prefix, uri) in registry.bindings() {
        push_escaped(&mut root, &format!("xmlns:{}", prefix), uri);
    }
    push_escaped(&mut root, "xmi:version", "2.0");
    writer.write_event(Event::Start(root)).map_err(write_error)?;

    let mut null = BytesStart::new(format!("{}:NULL", cas_prefix));
    push_escaped(&mut null, "xmi:id", "0");
    writer.write_event(Event::Empty(null)).map_err(write_error)?;

    for (fs, name) in cas.structures().iter().zip(&element_names) {
        let mut element = BytesStart::new(name.as_str());
        push_escaped(&mut element, "xmi:id", &fs.id().to_string());
        for (key, value) in fs.features() {
            push_escaped(&mut element, key, value);
        }

        if !fs.has_children() {
            writer.write_event(Event::Empty(element)).map_err(write_error)?;
            continue;
        }

        writer.write_event(Event::Start(element)).map_err(write_error)?;
        for (key, value) in fs.children() {
            writer
                .write_event(Event::Start(BytesStart::new(key)))
                .map_err(write_error)?;
            writer
                .write_event(Event::Text(BytesText::new(value)))
                .map_err(write_error)?;
            writer
                .write_event(Event::End(BytesEnd::new(key)))
                .map_err(write_error)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(name.as_str())))
            .map_err(write_error)?;
    }

    for view in cas.views() {
        let members = view
            .members
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        let mut element = BytesStart::new(format!("{}:View", cas_prefix));
        push_escaped(&mut element, "sofa", &view.sofa.to_string());
        push_escaped(&mut element, "members", &members);
        writer.write_event(Event::Empty(element)).map_err(write_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("xmi:XMI")))
        .map_err(write_error)?;

    String::from_utf8(writer.into_inner()).map_err(|e| CasError::Xml(e.to_string()))
}

/// Line breaks and tabs are written as character references so they survive attribute
/// value normalization when the document is read again.
fn push_escaped(element: &mut BytesStart, key: &str, value: &str) {
    element.push_attribute(Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escape_attribute(value).into_bytes()),
    });
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
