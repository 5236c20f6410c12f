use std::sync::Arc;

use log::{debug, info};
use thiserror::Error;

use crate::application::ports::input::nlp_port::{NlpError, NlpPort};
use crate::application::ports::output::document_store_port::DocumentStorePort;
use crate::application::service::annotation_writer::AnnotationWriter;
use crate::application::service::token_bridge::TokenBridge;
use crate::core::platform::container::cas::{Cas, CasError};
use crate::core::platform::container::prediction::{PredictionOutcome, PredictionRequest, PredictionTask};

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Type system could not be loaded: {0}")]
    TypeSystem(CasError),
    #[error(transparent)]
    Cas(#[from] CasError),
    #[error(transparent)]
    Nlp(#[from] NlpError),
    #[error("Entity span [{start}, {end}) does not fit {tokens} tokens")]
    InvalidEntitySpan { start: usize, end: usize, tokens: usize },
    #[error("Tagger returned {actual} tags for {expected} tokens")]
    TagCountMismatch { expected: usize, actual: usize },
    #[error("Document could not be serialized: {0}")]
    Serialization(CasError),
}

/// Decodes a document, predicts NER or POS labels over its tokens and writes them back as
/// annotations of the requested layer.
pub struct PredictAnnotationsUseCase<S: DocumentStorePort> {
    store: S,
    nlp: Arc<dyn NlpPort>,
}

impl<S: DocumentStorePort> PredictAnnotationsUseCase<S> {
    pub fn new(store: S, nlp: Arc<dyn NlpPort>) -> Self {
        Self { store, nlp }
    }

    pub fn nlp(&self) -> &Arc<dyn NlpPort> {
        &self.nlp
    }

    pub fn execute(&self, task: PredictionTask, request: &PredictionRequest) -> Result<PredictionOutcome, PredictionError> {
        let type_system = self
            .store
            .parse_type_system(&request.type_system)
            .map_err(PredictionError::TypeSystem)?;
        let mut cas = self.store.parse_cas(&request.document, &type_system)?;

        let mut writer = AnnotationWriter::for_layer(&type_system, &cas, &request.layer, &request.feature)?;
        let tokens = TokenBridge::from_cas(&cas, &type_system)?;

        if tokens.is_empty() {
            debug!("No tokens in document, skipping {} prediction", task);
        } else {
            match task {
                PredictionTask::Ner => self.predict_entities(&tokens, &mut writer, &mut cas)?,
                PredictionTask::Pos => self.predict_tags(&tokens, &mut writer, &mut cas)?,
            }
        }

        let document = self
            .store
            .serialize(&cas)
            .map_err(PredictionError::Serialization)?;

        info!(
            "{} prediction on layer {} (feature {}): {} tokens, {} annotations created",
            task,
            request.layer,
            request.feature,
            tokens.len(),
            writer.written()
        );

        Ok(PredictionOutcome {
            document,
            tokens: tokens.len(),
            annotations_created: writer.written(),
        })
    }

    fn predict_entities(&self, tokens: &TokenBridge, writer: &mut AnnotationWriter, cas: &mut Cas) -> Result<(), PredictionError> {
        let entities = self.nlp.recognize_entities(&tokens.words())?;

        // Validate every span before touching the CAS so a bad model output adds nothing.
        let resolved = entities
            .iter()
            .map(|entity| {
                tokens
                    .span(entity.start, entity.end)
                    .map(|(begin, end)| (begin, end, entity.label.as_str()))
                    .ok_or(PredictionError::InvalidEntitySpan {
                        start: entity.start,
                        end: entity.end,
                        tokens: tokens.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (begin, end, label) in resolved {
            writer.write(cas, begin, end, label);
        }
        Ok(())
    }

    fn predict_tags(&self, tokens: &TokenBridge, writer: &mut AnnotationWriter, cas: &mut Cas) -> Result<(), PredictionError> {
        let tags = self.nlp.tag(&tokens.words())?;
        if tags.len() != tokens.len() {
            return Err(PredictionError::TagCountMismatch {
                expected: tokens.len(),
                actual: tags.len(),
            });
        }

        for (token, tag) in tokens.tokens().iter().zip(&tags) {
            writer.write(cas, token.begin, token.end, tag);
        }
        Ok(())
    }
}
