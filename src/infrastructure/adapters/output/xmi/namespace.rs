/*
XMI namespace mapping

UIMA serializes a type `a.b.C` as the element `prefix:C` where `prefix` is bound to the
namespace `http:///a/b.ecore`. Types without a package live in `http:///noNamespace.ecore`.
*/

use crate::core::platform::container::cas::CasError;

pub const XMI_NAMESPACE: &str = "http://www.omg.org/XMI";
pub const CAS_NAMESPACE: &str = "http:///uima/cas.ecore";

const URI_SCHEME: &str = "http:///";
const URI_EXTENSION: &str = ".ecore";
const NO_NAMESPACE: &str = "noNamespace";

/// Resolves an element's namespace and local name into a fully qualified type name.
pub fn type_name_for(uri: &str, local_name: &str) -> Result<String, CasError> {
    let package = uri
        .strip_prefix(URI_SCHEME)
        .and_then(|rest| rest.strip_suffix(URI_EXTENSION))
        .ok_or_else(|| CasError::InvalidXmi(format!("Unsupported namespace [{}]", uri)))?;

    if package == NO_NAMESPACE {
        return Ok(local_name.to_string());
    }

    Ok(format!("{}.{}", package.replace('/', "."), local_name))
}

/// Splits a type name into its namespace uri and local element name.
pub fn namespace_for(type_name: &str) -> (String, &str) {
    match type_name.rsplit_once('.') {
        Some((package, local_name)) => (
            format!("{}{}{}", URI_SCHEME, package.replace('.', "/"), URI_EXTENSION),
            local_name,
        ),
        None => (
            format!("{}{}{}", URI_SCHEME, NO_NAMESPACE, URI_EXTENSION),
            type_name,
        ),
    }
}

/// Prefix bindings for serialization, seeded with the declarations of the source document.
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    bindings: Vec<(String, String)>,
}

impl NamespaceRegistry {
    pub fn new(declared: &[(String, String)]) -> Self {
        let mut registry = Self::default();
        registry.bind("xmi", XMI_NAMESPACE);
        registry.bind("cas", CAS_NAMESPACE);
        for (prefix, uri) in declared {
            if !prefix.is_empty() {
                registry.bind(prefix, uri);
            }
        }
        registry
    }

    fn bind(&mut self, prefix: &str, uri: &str) {
        let taken = self.bindings.iter().any(|(p, u)| p == prefix || u == uri);
        if !taken {
            self.bindings.push((prefix.to_string(), uri.to_string()));
        }
    }

    /// Returns the prefix bound to `uri`, binding a fresh one derived from the last
    /// package segment if necessary.
    pub fn prefix_for(&mut self, uri: &str) -> String {
        if let Some((prefix, _)) = self.bindings.iter().find(|(_, u)| u == uri) {
            return prefix.clone();
        }

        let base = uri
            .trim_end_matches(URI_EXTENSION)
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("ns")
            .to_string();

        let mut candidate = base.clone();
        let mut counter = 1;
        while self.bindings.iter().any(|(p, _)| *p == candidate) {
            candidate = format!("{}{}", base, counter);
            counter += 1;
        }

        self.bindings.push((candidate.clone(), uri.to_string()));
        candidate
    }

    pub fn bindings(&self) -> &[(String, String)] {
        &self.bindings
    }
}
