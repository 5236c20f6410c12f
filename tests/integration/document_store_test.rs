/*
Document Store Integration Tests

Round trips through the XMI store and the prediction use case without the HTTP layer.
*/
use std::sync::Arc;

use crate::common::{tokenized_xmi, NAMED_ENTITY_TYPE, TYPE_SYSTEM};
use xmi_annotator::application::ports::output::document_store_port::DocumentStorePort;
use xmi_annotator::application::use_cases::predict_annotations::PredictAnnotationsUseCase;
use xmi_annotator::core::platform::container::prediction::{PredictionRequest, PredictionTask};
use xmi_annotator::infrastructure::adapters::input::lexicon_nlp_adapter::LexiconNlpAdapter;
use xmi_annotator::infrastructure::adapters::output::xmi::XmiDocumentStore;

fn request(xmi: String) -> PredictionRequest {
    PredictionRequest {
        layer: NAMED_ENTITY_TYPE.to_string(),
        feature: "value".to_string(),
        document: xmi,
        type_system: TYPE_SYSTEM.to_string(),
        metadata: None,
    }
}

fn use_case() -> PredictAnnotationsUseCase<XmiDocumentStore> {
    let nlp = Arc::new(LexiconNlpAdapter::bundled().unwrap());
    PredictAnnotationsUseCase::new(XmiDocumentStore::new(), nlp)
}

#[test]
fn test_zero_predictions_preserve_content() {
    let store = XmiDocumentStore::new();
    let ts = store.parse_type_system(TYPE_SYSTEM).unwrap();
    let xmi = tokenized_xmi("dogs run fast", &[(0, 4), (5, 8), (9, 13)]);

    let outcome = use_case().execute(PredictionTask::Ner, &request(xmi.clone())).unwrap();
    assert_eq!(outcome.annotations_created, 0);

    let before = store.parse_cas(&xmi, &ts).unwrap();
    let after = store.parse_cas(&outcome.document, &ts).unwrap();
    assert_eq!(after.document_text().unwrap(), "dogs run fast");
    assert_eq!(after.structures(), before.structures());
    assert_eq!(after.views(), before.views());
}

#[test]
fn test_serialize_is_stable() {
    let store = XmiDocumentStore::new();
    let ts = store.parse_type_system(TYPE_SYSTEM).unwrap();
    let xmi = tokenized_xmi("Barack Obama was president", &[(0, 6), (7, 12), (13, 16), (17, 26)]);

    let first = store.serialize(&store.parse_cas(&xmi, &ts).unwrap()).unwrap();
    let second = store.serialize(&store.parse_cas(&first, &ts).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_repeated_predictions_keep_duplicates() {
    let store = XmiDocumentStore::new();
    let ts = store.parse_type_system(TYPE_SYSTEM).unwrap();
    let xmi = tokenized_xmi("Barack Obama was president", &[(0, 6), (7, 12), (13, 16), (17, 26)]);

    let use_case = use_case();
    let first = use_case.execute(PredictionTask::Ner, &request(xmi)).unwrap();
    let second = use_case.execute(PredictionTask::Ner, &request(first.document)).unwrap();
    assert_eq!(second.annotations_created, 1);

    let cas = store.parse_cas(&second.document, &ts).unwrap();
    let entities = cas.select(&ts, NAMED_ENTITY_TYPE).unwrap();
    assert_eq!(entities.len(), 2);
    assert!(entities.iter().all(|fs| fs.span() == Some((0, 12))));
    assert_ne!(entities[0].id(), entities[1].id());
}

#[test]
fn test_new_annotations_join_the_initial_view() {
    let store = XmiDocumentStore::new();
    let ts = store.parse_type_system(TYPE_SYSTEM).unwrap();
    let xmi = tokenized_xmi("Barack Obama was president", &[(0, 6), (7, 12), (13, 16), (17, 26)]);

    let outcome = use_case().execute(PredictionTask::Ner, &request(xmi)).unwrap();
    assert!(outcome.document.contains("xmlns:custom=\"http:///webanno/custom.ecore\""));

    let cas = store.parse_cas(&outcome.document, &ts).unwrap();
    let entity = cas.select(&ts, NAMED_ENTITY_TYPE).unwrap()[0].id();
    assert!(entity > 5);
    assert!(cas.views()[0].members.contains(&entity));
}
