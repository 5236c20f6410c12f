pub mod annotation_writer;
pub mod token_bridge;
