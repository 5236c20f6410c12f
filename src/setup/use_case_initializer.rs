use std::sync::Arc;
use crate::application::ports::input::nlp_port::NlpPort;
use crate::application::use_cases::predict_annotations::PredictAnnotationsUseCase;
use crate::infrastructure::adapters::output::xmi::XmiDocumentStore;

#[derive(Clone)]
pub struct UseCases {
    pub predict_annotations: Arc<PredictAnnotationsUseCase<XmiDocumentStore>>,
}

pub fn initialize_use_cases(nlp: Arc<dyn NlpPort>) -> UseCases {
    let predict_annotations = Arc::new(PredictAnnotationsUseCase::new(XmiDocumentStore::new(), nlp));

    UseCases { predict_annotations }
}
