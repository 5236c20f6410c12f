/*
Document Store Port

Defines how the application reads and writes annotated documents. A store adapter turns a
caller-supplied type system descriptor and a serialized CAS into in-memory containers and
serializes the CAS again once predictions have been added.

The port deliberately exposes only the three conversions the prediction use case needs;
selection, covered text and insertion live on the Cas container itself.
*/

use crate::core::platform::container::cas::{Cas, CasError};
use crate::core::platform::container::type_system::TypeSystem;

pub trait DocumentStorePort: Send + Sync {
    fn parse_type_system(&self, descriptor: &str) -> Result<TypeSystem, CasError>;

    fn parse_cas(&self, document: &str, type_system: &TypeSystem) -> Result<Cas, CasError>;

    fn serialize(&self, cas: &Cas) -> Result<String, CasError>;
}
