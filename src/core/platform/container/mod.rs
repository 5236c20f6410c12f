pub mod cas;
pub mod feature_structure;
pub mod prediction;
pub mod type_system;
