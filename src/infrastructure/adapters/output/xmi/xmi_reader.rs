/*
XMI reader

Reads a CAS from its XMI form. Every direct child of the root is either XMI bookkeeping,
the cas:NULL placeholder, a cas:View or a feature structure. Feature structure attributes
are kept verbatim; multi-valued features written as child elements are kept as children.
*/

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::namespace::{type_name_for, CAS_NAMESPACE, XMI_NAMESPACE};
use super::xml_error;
use crate::core::platform::container::cas::{Cas, CasError, View};
use crate::core::platform::container::feature_structure::FeatureStructure;
use crate::core::platform::container::type_system::TypeSystem;

const XMI_ID: &[u8] = b"xmi:id";
const MAX_XMI_ID: u64 = i32::MAX as u64;

enum Element {
    Structure(FeatureStructure),
    View(View),
    Ignored,
}

pub fn read_cas(document: &str, type_system: &TypeSystem) -> Result<Cas, CasError> {
    let mut reader = Reader::from_str(document);

    let mut namespaces: Vec<(String, String)> = Vec::new();
    let mut structures = Vec::new();
    let mut views = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut current: Option<FeatureStructure> = None;
    let mut child: Option<(String, String)> = None;

    loop {
        let event = reader.read_event().map_err(|e| xml_error(&reader, e))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match depth {
                    0 => {
                        namespaces = read_root(e)?;
                        saw_root = true;
                    }
                    1 => match read_element(e, &namespaces, type_system)? {
                        Element::Structure(fs) if is_empty => structures.push(fs),
                        Element::Structure(fs) => current = Some(fs),
                        Element::View(view) => views.push(view),
                        Element::Ignored => {}
                    },
                    2 => {
                        if let Some(fs) = current.as_mut() {
                            let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                            if is_empty {
                                fs.push_child(name, "");
                            } else {
                                child = Some((name, String::new()));
                            }
                        }
                    }
                    _ => {}
                }
                if !is_empty {
                    depth += 1;
                }
            }
            Event::Text(ref t) => {
                if let Some((_, ref mut text)) = child {
                    let unescaped = t.unescape().map_err(|e| xml_error(&reader, e))?;
                    text.push_str(&unescaped);
                }
            }
            Event::CData(ref c) => {
                if let Some((_, ref mut text)) = child {
                    text.push_str(&String::from_utf8_lossy(c));
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    2 => {
                        if let (Some(fs), Some((name, text))) = (current.as_mut(), child.take()) {
                            fs.push_child(name, text);
                        }
                    }
                    1 => {
                        if let Some(fs) = current.take() {
                            structures.push(fs);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(CasError::InvalidXmi("Document has no root element".to_string()));
    }
    if depth != 0 {
        return Err(CasError::InvalidXmi("Document ends before the root element is closed".to_string()));
    }

    Ok(Cas::new(namespaces, structures, views))
}

fn read_root(element: &BytesStart) -> Result<Vec<(String, String)>, CasError> {
    if element.local_name().as_ref() != b"XMI" {
        return Err(CasError::InvalidXmi(format!(
            "Expected <xmi:XMI> root but found <{}>",
            String::from_utf8_lossy(element.name().as_ref())
        )));
    }

    let mut namespaces = Vec::new();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| CasError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| CasError::Xml(e.to_string()))?
            .into_owned();

        if let Some(prefix) = key.strip_prefix("xmlns:") {
            namespaces.push((prefix.to_string(), value));
        } else if key == "xmlns" {
            namespaces.push((String::new(), value));
        }
    }

    Ok(namespaces)
}

fn read_element(
    element: &BytesStart,
    namespaces: &[(String, String)],
    type_system: &TypeSystem,
) -> Result<Element, CasError> {
    let qualified = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let (prefix, local_name) = qualified.split_once(':').unwrap_or(("", qualified.as_str()));
    let uri = namespaces
        .iter()
        .find(|(p, _)| p == prefix)
        .map(|(_, uri)| uri.as_str())
        .ok_or_else(|| CasError::InvalidXmi(format!("Undeclared namespace prefix in <{}>", qualified)))?;

    if uri == XMI_NAMESPACE || (uri == CAS_NAMESPACE && local_name == "NULL") {
        return Ok(Element::Ignored);
    }

    if uri == CAS_NAMESPACE && local_name == "View" {
        return read_view(element).map(Element::View);
    }

    let type_name = type_name_for(uri, local_name)?;
    if !type_system.contains_type(&type_name) {
        return Err(CasError::InvalidXmi(format!(
            "Document uses type [{}] which the type system does not declare",
            type_name
        )));
    }

    let mut id = None;
    let mut features = Vec::new();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| CasError::Xml(e.to_string()))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| CasError::Xml(e.to_string()))?
            .into_owned();

        if attribute.key.as_ref() == XMI_ID {
            id = Some(parse_id(&value)?);
        } else {
            features.push((String::from_utf8_lossy(attribute.key.as_ref()).into_owned(), value));
        }
    }

    let id = id.ok_or_else(|| CasError::InvalidXmi(format!("<{}> has no xmi:id", qualified)))?;
    let structure = features
        .into_iter()
        .fold(FeatureStructure::new(id, type_name), |fs, (name, value)| fs.with_feature(name, value));

    Ok(Element::Structure(structure))
}

fn read_view(element: &BytesStart) -> Result<View, CasError> {
    let mut sofa = None;
    let mut members = Vec::new();

    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| CasError::Xml(e.to_string()))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| CasError::Xml(e.to_string()))?;

        match attribute.key.as_ref() {
            b"sofa" => sofa = Some(parse_id(&value)?),
            b"members" => {
                members = value
                    .split_whitespace()
                    .map(parse_id)
                    .collect::<Result<Vec<_>, _>>()?;
            }
            _ => {}
        }
    }

    let sofa = sofa.ok_or_else(|| CasError::InvalidXmi("<cas:View> has no sofa".to_string()))?;
    Ok(View { sofa, members })
}

/// xmi:ids are UIMA int addresses, so anything past `i32::MAX` is rejected.
fn parse_id(value: &str) -> Result<u64, CasError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id <= MAX_XMI_ID)
        .ok_or_else(|| CasError::InvalidXmi(format!("Invalid xmi:id reference [{}]", value)))
}
