/*
NLP port

A port that defines how the application interacts with the NLP (Natural Language Processing) model.

The prediction use case hands the model a sequence of already tokenized words and receives
either entity spans expressed in token indices or one coarse part-of-speech tag per word.
Mapping those results back onto character offsets is the application's job, so adapters
never see the CAS.

The model is loaded once at startup and shared read-only between all requests, which is
why implementations must be Send + Sync and take &self.
*/

use thiserror::Error;

/// An entity over the token range [start, end).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl EntitySpan {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NlpModelInfo {
    pub name: String,
    pub language: String,
}

#[derive(Debug, Error)]
pub enum NlpError {
    #[error("Model loading error: {0}")]
    ModelLoading(String),
    #[error("Failed to read model: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to parse YAML model: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),
}

pub trait NlpPort: Send + Sync {
    fn model_info(&self) -> NlpModelInfo;

    /// Non-overlapping entity spans in document order.
    fn recognize_entities(&self, words: &[String]) -> Result<Vec<EntitySpan>, NlpError>;

    /// Exactly one coarse tag per word.
    fn tag(&self, words: &[String]) -> Result<Vec<String>, NlpError>;
}
