/*
Type System Container

A type system declares the annotation types a CAS may contain and the features each
type carries. Types form a single-inheritance hierarchy rooted at uima.cas.TOP; a type
inherits every feature of its supertypes. Callers supply a fresh type system with every
request, so nothing here is cached beyond the lifetime of a single prediction.
*/

use std::collections::{BTreeMap, HashSet};

use crate::core::platform::container::cas::CasError;
use crate::core::platform::container::feature_structure::FeatureStructure;

pub const TYPE_NAME_TOP: &str = "uima.cas.TOP";
pub const TYPE_NAME_STRING: &str = "uima.cas.String";
pub const TYPE_NAME_SOFA: &str = "uima.cas.Sofa";
pub const TYPE_NAME_ANNOTATION_BASE: &str = "uima.cas.AnnotationBase";
pub const TYPE_NAME_ANNOTATION: &str = "uima.tcas.Annotation";
pub const TYPE_NAME_DOCUMENT_ANNOTATION: &str = "uima.tcas.DocumentAnnotation";

pub const FEATURE_BEGIN: &str = "begin";
pub const FEATURE_END: &str = "end";
pub const FEATURE_SOFA: &str = "sofa";

const PRIMITIVE_TYPES: &[&str] = &[
    "uima.cas.Boolean",
    "uima.cas.Byte",
    "uima.cas.Short",
    "uima.cas.Integer",
    "uima.cas.Long",
    "uima.cas.Float",
    "uima.cas.Double",
    TYPE_NAME_STRING,
];

const ARRAY_AND_LIST_TYPES: &[&str] = &[
    "uima.cas.ArrayBase",
    "uima.cas.FSArray",
    "uima.cas.BooleanArray",
    "uima.cas.ByteArray",
    "uima.cas.ShortArray",
    "uima.cas.IntegerArray",
    "uima.cas.LongArray",
    "uima.cas.FloatArray",
    "uima.cas.DoubleArray",
    "uima.cas.StringArray",
    "uima.cas.ListBase",
    "uima.cas.FSList",
    "uima.cas.EmptyFSList",
    "uima.cas.NonEmptyFSList",
    "uima.cas.StringList",
    "uima.cas.EmptyStringList",
    "uima.cas.NonEmptyStringList",
    "uima.cas.IntegerList",
    "uima.cas.EmptyIntegerList",
    "uima.cas.NonEmptyIntegerList",
    "uima.cas.FloatList",
    "uima.cas.EmptyFloatList",
    "uima.cas.NonEmptyFloatList",
];

/// A feature declared on a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDescription {
    pub name: String,
    pub range_type_name: String,
    pub element_type: Option<String>,
    pub description: Option<String>,
}

impl FeatureDescription {
    pub fn new(name: impl Into<String>, range_type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range_type_name: range_type_name.into(),
            element_type: None,
            description: None,
        }
    }
}

/// A type declared in the type system, holding only its own (not inherited) features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescription {
    pub name: String,
    pub supertype_name: Option<String>,
    pub description: Option<String>,
    pub features: Vec<FeatureDescription>,
}

impl TypeDescription {
    pub fn new(name: impl Into<String>, supertype_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertype_name: Some(supertype_name.into()),
            description: None,
            features: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: FeatureDescription) -> Self {
        self.features.push(feature);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSystem {
    types: BTreeMap<String, TypeDescription>,
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TypeSystem {
    /// Creates a type system containing only the UIMA built-in types.
    pub fn with_builtins() -> Self {
        let mut types = BTreeMap::new();
        let mut insert = |t: TypeDescription| {
            types.insert(t.name.clone(), t);
        };

        insert(TypeDescription {
            name: TYPE_NAME_TOP.to_string(),
            supertype_name: None,
            description: None,
            features: Vec::new(),
        });
        for name in PRIMITIVE_TYPES.iter().chain(ARRAY_AND_LIST_TYPES) {
            insert(TypeDescription::new(*name, TYPE_NAME_TOP));
        }
        insert(
            TypeDescription::new(TYPE_NAME_SOFA, TYPE_NAME_TOP)
                .with_feature(FeatureDescription::new("sofaNum", "uima.cas.Integer"))
                .with_feature(FeatureDescription::new("sofaID", TYPE_NAME_STRING))
                .with_feature(FeatureDescription::new("mimeType", TYPE_NAME_STRING))
                .with_feature(FeatureDescription::new("sofaString", TYPE_NAME_STRING))
                .with_feature(FeatureDescription::new("sofaURI", TYPE_NAME_STRING)),
        );
        insert(
            TypeDescription::new(TYPE_NAME_ANNOTATION_BASE, TYPE_NAME_TOP)
                .with_feature(FeatureDescription::new(FEATURE_SOFA, TYPE_NAME_SOFA)),
        );
        insert(
            TypeDescription::new(TYPE_NAME_ANNOTATION, TYPE_NAME_ANNOTATION_BASE)
                .with_feature(FeatureDescription::new(FEATURE_BEGIN, "uima.cas.Integer"))
                .with_feature(FeatureDescription::new(FEATURE_END, "uima.cas.Integer")),
        );
        insert(
            TypeDescription::new(TYPE_NAME_DOCUMENT_ANNOTATION, TYPE_NAME_ANNOTATION)
                .with_feature(FeatureDescription::new("language", TYPE_NAME_STRING)),
        );

        Self { types }
    }

    /// Adds a user type. Built-in types cannot be redeclared, but a descriptor may
    /// legitimately restate DocumentAnnotation with extra features, which are merged.
    pub fn add_type(&mut self, type_description: TypeDescription) -> Result<(), CasError> {
        if type_description.name == TYPE_NAME_DOCUMENT_ANNOTATION {
            if let Some(existing) = self.types.get_mut(TYPE_NAME_DOCUMENT_ANNOTATION) {
                for feature in type_description.features {
                    if !existing.features.iter().any(|f| f.name == feature.name) {
                        existing.features.push(feature);
                    }
                }
            }
            return Ok(());
        }

        if self.types.contains_key(&type_description.name) {
            return Err(CasError::TypeSystem(format!(
                "Type [{}] is declared more than once",
                type_description.name
            )));
        }

        self.types.insert(type_description.name.clone(), type_description);
        Ok(())
    }

    /// Checks that every supertype and feature range resolves and that the
    /// hierarchy is acyclic.
    pub fn validate(&self) -> Result<(), CasError> {
        for type_description in self.types.values() {
            if let Some(ref supertype) = type_description.supertype_name {
                if !self.types.contains_key(supertype) {
                    return Err(CasError::TypeSystem(format!(
                        "Supertype [{}] of [{}] is not declared",
                        supertype, type_description.name
                    )));
                }
            }
            self.ancestors(&type_description.name)?;

            for feature in &type_description.features {
                let ranges = std::iter::once(&feature.range_type_name).chain(feature.element_type.as_ref());
                for range in ranges {
                    if !self.types.contains_key(range) {
                        return Err(CasError::TypeSystem(format!(
                            "Range [{}] of feature [{}:{}] is not declared",
                            range, type_description.name, feature.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn get_type(&self, name: &str) -> Result<&TypeDescription, CasError> {
        self.types
            .get(name)
            .ok_or_else(|| CasError::UnknownType(name.to_string()))
    }

    /// Returns the type itself followed by its supertypes up to TOP.
    pub fn ancestors(&self, name: &str) -> Result<Vec<&TypeDescription>, CasError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(name);

        while let Some(type_name) = current {
            if !seen.insert(type_name) {
                return Err(CasError::TypeSystem(format!(
                    "Type hierarchy of [{}] contains a cycle",
                    name
                )));
            }
            let type_description = self.get_type(type_name)?;
            chain.push(type_description);
            current = type_description.supertype_name.as_deref();
        }

        Ok(chain)
    }

    pub fn is_subtype(&self, name: &str, ancestor: &str) -> bool {
        self.ancestors(name)
            .map(|chain| chain.iter().any(|t| t.name == ancestor))
            .unwrap_or(false)
    }

    /// All features of a type including inherited ones, most general first.
    pub fn all_features(&self, name: &str) -> Result<Vec<&FeatureDescription>, CasError> {
        let chain = self.ancestors(name)?;
        Ok(chain
            .iter()
            .rev()
            .flat_map(|t| t.features.iter())
            .collect())
    }

    pub fn find_feature(&self, type_name: &str, feature: &str) -> Result<Option<&FeatureDescription>, CasError> {
        Ok(self
            .all_features(type_name)?
            .into_iter()
            .find(|f| f.name == feature))
    }

    /// Resolves a layer and feature into a builder for new annotations, failing fast if
    /// the layer is not an annotation type or the feature cannot hold a string label.
    pub fn annotation_builder(&self, layer: &str, feature: &str) -> Result<AnnotationBuilder, CasError> {
        self.get_type(layer)?;

        if !self.is_subtype(layer, TYPE_NAME_ANNOTATION) {
            return Err(CasError::NotAnAnnotationType(layer.to_string()));
        }

        let declared = self
            .find_feature(layer, feature)?
            .ok_or_else(|| CasError::UndeclaredFeature {
                type_name: layer.to_string(),
                feature: feature.to_string(),
            })?;

        if !self.is_subtype(&declared.range_type_name, TYPE_NAME_STRING) {
            return Err(CasError::FeatureNotString {
                type_name: layer.to_string(),
                feature: feature.to_string(),
                range: declared.range_type_name.clone(),
            });
        }

        Ok(AnnotationBuilder {
            type_name: layer.to_string(),
            feature: feature.to_string(),
        })
    }
}

/// Builds annotations of one validated type with one validated string feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationBuilder {
    type_name: String,
    feature: String,
}

impl AnnotationBuilder {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// The id is assigned by the CAS on insertion.
    pub fn build(&self, sofa: u64, begin: usize, end: usize, label: &str) -> FeatureStructure {
        FeatureStructure::new(0, self.type_name.clone())
            .with_feature(FEATURE_SOFA, sofa.to_string())
            .with_feature(FEATURE_BEGIN, begin.to_string())
            .with_feature(FEATURE_END, end.to_string())
            .with_feature(self.feature.clone(), label)
    }
}
