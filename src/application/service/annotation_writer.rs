/*
Annotation Writer

Creates annotations of the caller's layer and inserts them into the CAS. The layer and
feature are resolved against the type system once, before any prediction runs, so a bad
layer or feature name fails the request before the model is invoked.
*/

use crate::core::platform::container::cas::{Cas, CasError};
use crate::core::platform::container::type_system::{AnnotationBuilder, TypeSystem};

#[derive(Debug)]
pub struct AnnotationWriter {
    builder: AnnotationBuilder,
    sofa: u64,
    written: usize,
}

impl AnnotationWriter {
    pub fn for_layer(type_system: &TypeSystem, cas: &Cas, layer: &str, feature: &str) -> Result<Self, CasError> {
        let builder = type_system.annotation_builder(layer, feature)?;
        let sofa = cas.sofa()?.id();

        Ok(Self {
            builder,
            sofa,
            written: 0,
        })
    }

    /// Adds one annotation and returns its xmi:id. Insertion order is call order; existing
    /// annotations with the same span and label are not deduplicated.
    pub fn write(&mut self, cas: &mut Cas, begin: usize, end: usize, label: &str) -> u64 {
        let annotation = self.builder.build(self.sofa, begin, end, label);
        self.written += 1;
        cas.add_annotation(annotation)
    }

    pub fn written(&self) -> usize {
        self.written
    }
}
