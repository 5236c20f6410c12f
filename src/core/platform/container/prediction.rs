/*
Prediction Container

A prediction request names the layer (annotation type) and feature that should receive
predicted labels, and carries the document and its type system as decoded XMI text. The
wire envelope the request arrived in is irrelevant at this level.
*/

use std::fmt;

/// Well-known DKPro token type that predictions are computed over.
pub const TOKEN_TYPE: &str = "de.tudarmstadt.ukp.dkpro.core.api.segmentation.type.Token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionTask {
    Ner,
    Pos,
}

impl fmt::Display for PredictionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionTask::Ner => write!(f, "ner"),
            PredictionTask::Pos => write!(f, "pos"),
        }
    }
}

/// Identifiers some clients send along. They are passed through for logging only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestMetadata {
    pub project_id: serde_json::Value,
    pub document_id: serde_json::Value,
    pub user_id: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub layer: String,
    pub feature: String,
    pub document: String,
    pub type_system: String,
    pub metadata: Option<RequestMetadata>,
}

/// Result of running one prediction over a CAS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionOutcome {
    pub document: String,
    pub tokens: usize,
    pub annotations_created: usize,
}
