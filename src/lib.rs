// src/lib.rs
pub mod core;
pub mod application;
pub mod infrastructure;
pub mod config;
pub mod error;
pub mod setup;

#[cfg(test)]
pub mod test_utils;

pub use crate::config::*;
pub use error::ServiceError;
