/*
Type system descriptor reader

Parses a UIMA `typeSystemDescription` document. Only the parts that shape annotations are
read: type names, supertypes, descriptions and feature declarations. Imports are not
resolved.
*/

use quick_xml::events::Event;
use quick_xml::Reader;

use super::xml_error;
use crate::core::platform::container::cas::CasError;
use crate::core::platform::container::type_system::{
    FeatureDescription, TypeDescription, TypeSystem, TYPE_NAME_TOP,
};

const ROOT_ELEMENT: &str = "typeSystemDescription";

pub fn read_type_system(descriptor: &str) -> Result<TypeSystem, CasError> {
    let mut reader = Reader::from_str(descriptor);
    let mut type_system = TypeSystem::with_builtins();

    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut current_type: Option<TypeDescription> = None;
    let mut current_feature: Option<FeatureDescription> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event().map_err(|e| xml_error(&reader, e))? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if path.is_empty() {
                    check_root(&name)?;
                    saw_root = true;
                }
                match name.as_str() {
                    "typeDescription" => {
                        current_type = Some(TypeDescription {
                            name: String::new(),
                            supertype_name: None,
                            description: None,
                            features: Vec::new(),
                        })
                    }
                    "featureDescription" => current_feature = Some(FeatureDescription::new("", "")),
                    _ => {}
                }
                path.push(name);
                text.clear();
            }
            Event::Empty(e) => {
                if path.is_empty() {
                    check_root(&String::from_utf8_lossy(e.local_name().as_ref()))?;
                    saw_root = true;
                }
            }
            Event::Text(t) => {
                let unescaped = t.unescape().map_err(|e| xml_error(&reader, e))?;
                text.push_str(&unescaped);
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::End(_) => {
                let name = path.pop().unwrap_or_default();
                let parent = path.last().map(String::as_str);
                let value = text.trim().to_string();
                text.clear();

                match (name.as_str(), parent) {
                    ("name", Some("typeDescription")) => {
                        if let Some(t) = current_type.as_mut() {
                            t.name = value;
                        }
                    }
                    ("description", Some("typeDescription")) => {
                        if let Some(t) = current_type.as_mut() {
                            t.description = Some(value).filter(|v| !v.is_empty());
                        }
                    }
                    ("supertypeName", Some("typeDescription")) => {
                        if let Some(t) = current_type.as_mut() {
                            t.supertype_name = Some(value);
                        }
                    }
                    ("name", Some("featureDescription")) => {
                        if let Some(f) = current_feature.as_mut() {
                            f.name = value;
                        }
                    }
                    ("description", Some("featureDescription")) => {
                        if let Some(f) = current_feature.as_mut() {
                            f.description = Some(value).filter(|v| !v.is_empty());
                        }
                    }
                    ("rangeTypeName", Some("featureDescription")) => {
                        if let Some(f) = current_feature.as_mut() {
                            f.range_type_name = value;
                        }
                    }
                    ("elementType", Some("featureDescription")) => {
                        if let Some(f) = current_feature.as_mut() {
                            f.element_type = Some(value).filter(|v| !v.is_empty());
                        }
                    }
                    ("featureDescription", _) => {
                        if let (Some(feature), Some(t)) = (current_feature.take(), current_type.as_mut()) {
                            if feature.name.is_empty() || feature.range_type_name.is_empty() {
                                return Err(CasError::TypeSystem(format!(
                                    "Feature of type [{}] is missing a name or range",
                                    t.name
                                )));
                            }
                            t.features.push(feature);
                        }
                    }
                    ("typeDescription", _) => {
                        if let Some(mut t) = current_type.take() {
                            if t.name.is_empty() {
                                return Err(CasError::TypeSystem("Type without a name".to_string()));
                            }
                            if t.supertype_name.is_none() {
                                t.supertype_name = Some(TYPE_NAME_TOP.to_string());
                            }
                            type_system.add_type(t)?;
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
        return Err(CasError::TypeSystem(format!("Missing <{}> element", ROOT_ELEMENT)));
    }
    if !path.is_empty() {
        return Err(CasError::TypeSystem(format!("Descriptor ends inside <{}>", path.join("/"))));
    }

    type_system.validate()?;
    Ok(type_system)
}

fn check_root(name: &str) -> Result<(), CasError> {
    if name != ROOT_ELEMENT {
        return Err(CasError::TypeSystem(format!(
            "Expected <{}> but found <{}>",
            ROOT_ELEMENT, name
        )));
    }
    Ok(())
}
