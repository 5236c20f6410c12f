/*
CAS Container

The Common Analysis Structure holds a document's text (the sofa) together with every
feature structure recorded over it. Views list which feature structures are indexed on
which sofa. A CAS is owned by exactly one request: it is parsed from XMI, receives the
predicted annotations and is serialized again.
*/

use std::cmp::Reverse;
use thiserror::Error;

use crate::core::platform::container::feature_structure::FeatureStructure;
use crate::core::platform::container::type_system::{TypeSystem, TYPE_NAME_SOFA};

pub const INITIAL_VIEW: &str = "_InitialView";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CasError {
    #[error("Malformed XML: {0}")]
    Xml(String),
    #[error("Invalid type system: {0}")]
    TypeSystem(String),
    #[error("Type [{0}] is not declared in the type system")]
    UnknownType(String),
    #[error("Type [{0}] is not an annotation type")]
    NotAnAnnotationType(String),
    #[error("Feature [{feature}] is not declared on type [{type_name}]")]
    UndeclaredFeature { type_name: String, feature: String },
    #[error("Feature [{feature}] on type [{type_name}] has range [{range}] and cannot hold a label")]
    FeatureNotString { type_name: String, feature: String, range: String },
    #[error("Invalid XMI: {0}")]
    InvalidXmi(String),
    #[error("CAS has no sofa for the initial view")]
    MissingSofa,
    #[error("Annotation {id} has invalid offsets [{begin}, {end}) for a text of length {length}")]
    InvalidOffsets { id: u64, begin: usize, end: usize, length: usize },
}

impl CasError {
    /// Errors caused by the caller's type system rather than by the document.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            CasError::TypeSystem(_)
                | CasError::UnknownType(_)
                | CasError::NotAnAnnotationType(_)
                | CasError::UndeclaredFeature { .. }
                | CasError::FeatureNotString { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub sofa: u64,
    pub members: Vec<u64>,
}

/// Char-offset index over a text, so repeated slicing stays linear.
pub struct TextIndex<'a> {
    text: &'a str,
    boundaries: Vec<usize>,
}

impl<'a> TextIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let boundaries = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, boundaries }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slice(&self, begin: usize, end: usize) -> Option<&'a str> {
        if begin > end || end > self.len() {
            return None;
        }
        Some(&self.text[self.boundaries[begin]..self.boundaries[end]])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cas {
    /// Namespace declarations of the source document as (prefix, uri).
    namespaces: Vec<(String, String)>,
    structures: Vec<FeatureStructure>,
    views: Vec<View>,
    next_id: u64,
}

impl Cas {
    pub fn new(
        namespaces: Vec<(String, String)>,
        structures: Vec<FeatureStructure>,
        views: Vec<View>,
    ) -> Self {
        let max_id = structures
            .iter()
            .map(FeatureStructure::id)
            .chain(views.iter().map(|v| v.sofa))
            .max()
            .unwrap_or(0);

        Self {
            namespaces,
            structures,
            views,
            next_id: max_id + 1,
        }
    }

    pub fn namespaces(&self) -> &[(String, String)] {
        &self.namespaces
    }

    pub fn structures(&self) -> &[FeatureStructure] {
        &self.structures
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn get(&self, id: u64) -> Option<&FeatureStructure> {
        self.structures.iter().find(|fs| fs.id() == id)
    }

    /// The sofa of the initial view, or the only sofa if none is named.
    pub fn sofa(&self) -> Result<&FeatureStructure, CasError> {
        let sofas: Vec<&FeatureStructure> = self
            .structures
            .iter()
            .filter(|fs| fs.type_name() == TYPE_NAME_SOFA)
            .collect();

        sofas
            .iter()
            .find(|fs| fs.feature("sofaID") == Some(INITIAL_VIEW))
            .or_else(|| sofas.first())
            .copied()
            .ok_or(CasError::MissingSofa)
    }

    pub fn document_text(&self) -> Result<&str, CasError> {
        Ok(self.sofa()?.feature("sofaString").unwrap_or(""))
    }

    /// Annotations of the given type (or its subtypes) on the initial view, in document
    /// order: ascending begin, then descending end, then insertion order.
    pub fn select(&self, type_system: &TypeSystem, type_name: &str) -> Result<Vec<&FeatureStructure>, CasError> {
        let sofa = self.sofa()?.id();
        let mut selected: Vec<&FeatureStructure> = self
            .structures
            .iter()
            .filter(|fs| fs.sofa() == Some(sofa))
            .filter(|fs| type_system.is_subtype(fs.type_name(), type_name))
            .collect();

        selected.sort_by_key(|fs| (fs.begin().unwrap_or(0), Reverse(fs.end().unwrap_or(0))));
        Ok(selected)
    }

    pub fn covered_text(&self, annotation: &FeatureStructure) -> Result<String, CasError> {
        let index = TextIndex::new(self.document_text()?);
        covered_text_in(&index, annotation).map(str::to_string)
    }

    /// Inserts a new feature structure, assigns its xmi:id and indexes it in the view of
    /// its sofa. Existing annotations are never consulted, so duplicates are kept.
    pub fn add_annotation(&mut self, mut annotation: FeatureStructure) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        annotation.set_id(id);

        if let Some(sofa) = annotation.sofa() {
            match self.views.iter_mut().find(|v| v.sofa == sofa) {
                Some(view) => view.members.push(id),
                None => self.views.push(View {
                    sofa,
                    members: vec![id],
                }),
            }
        }

        self.structures.push(annotation);
        id
    }
}

pub fn covered_text_in<'a>(index: &TextIndex<'a>, annotation: &FeatureStructure) -> Result<&'a str, CasError> {
    let invalid = |begin, end| CasError::InvalidOffsets {
        id: annotation.id(),
        begin,
        end,
        length: index.len(),
    };

    let (begin, end) = annotation.span().ok_or_else(|| invalid(0, 0))?;
    index.slice(begin, end).ok_or_else(|| invalid(begin, end))
}
