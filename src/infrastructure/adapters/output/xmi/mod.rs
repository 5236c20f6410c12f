/*
XMI Document Store Adapter

Implements the DocumentStorePort for UIMA XMI documents and type system descriptors using
quick-xml. Each call works on its own input; nothing is cached between requests.
*/

pub mod namespace;
pub mod type_system_reader;
pub mod xmi_reader;
pub mod xmi_writer;

use std::fmt::Display;

use quick_xml::Reader;

use crate::application::ports::output::document_store_port::DocumentStorePort;
use crate::core::platform::container::cas::{Cas, CasError};
use crate::core::platform::container::type_system::TypeSystem;

#[derive(Debug, Clone, Copy, Default)]
pub struct XmiDocumentStore;

impl XmiDocumentStore {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStorePort for XmiDocumentStore {
    fn parse_type_system(&self, descriptor: &str) -> Result<TypeSystem, CasError> {
        type_system_reader::read_type_system(descriptor)
    }

    fn parse_cas(&self, document: &str, type_system: &TypeSystem) -> Result<Cas, CasError> {
        xmi_reader::read_cas(document, type_system)
    }

    fn serialize(&self, cas: &Cas) -> Result<String, CasError> {
        xmi_writer::write_cas(cas)
    }
}

pub(crate) fn xml_error(reader: &Reader<&[u8]>, error: impl Display) -> CasError {
    CasError::Xml(format!("{} (at byte {})", error, reader.buffer_position()))
}
