/*
Feature Structure Container

A feature structure is a single typed record inside a CAS. Annotations are feature
structures whose type descends from uima.tcas.Annotation and therefore carry begin/end
character offsets over the sofa text.

Feature values are kept exactly as they appear in the XMI attributes so that records this
service never touches are written back unchanged.
*/

use crate::core::platform::container::type_system::{FEATURE_BEGIN, FEATURE_END, FEATURE_SOFA};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureStructure {
    id: u64,
    type_name: String,
    features: Vec<(String, String)>,
    /// Multi-valued features serialized as child elements, in document order.
    children: Vec<(String, String)>,
}

impl FeatureStructure {
    pub fn new(id: u64, type_name: impl Into<String>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            features: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_feature(name, value);
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn feature(&self, name: &str) -> Option<&str> {
        self.features
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replaces the value if the feature is already set, otherwise appends it.
    pub fn set_feature(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.features.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.features.push((name, value)),
        }
    }

    pub fn features(&self) -> impl Iterator<Item = (&str, &str)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &str)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn push_child(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.children.push((name.into(), value.into()));
    }

    pub fn begin(&self) -> Option<usize> {
        self.feature(FEATURE_BEGIN).and_then(|v| v.parse().ok())
    }

    pub fn end(&self) -> Option<usize> {
        self.feature(FEATURE_END).and_then(|v| v.parse().ok())
    }

    pub fn span(&self) -> Option<(usize, usize)> {
        Some((self.begin()?, self.end()?))
    }

    /// The xmi:id of the sofa this annotation is anchored on.
    pub fn sofa(&self) -> Option<u64> {
        self.feature(FEATURE_SOFA).and_then(|v| v.parse().ok())
    }
}
