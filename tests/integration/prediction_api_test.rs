/*
Prediction API Integration Tests

Drive the full HTTP stack (envelope, XMI store, lexicon model, annotation writer) through
both API variants.
*/
use actix_web::http::StatusCode;
use actix_web::{test, App};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use crate::common::{labels, state, state_with, tokenized_xmi, NAMED_ENTITY_TYPE, POS_TYPE, TYPE_SYSTEM};
use xmi_annotator::infrastructure::web::prediction_controller::configure;
use xmi_annotator::{ApiVariant, Settings};

fn base64_body(layer: &str, feature: &str, xmi: &str) -> Value {
    json!({
        "layer": layer,
        "feature": feature,
        "document": STANDARD.encode(xmi),
        "typeSystem": STANDARD.encode(TYPE_SYSTEM),
    })
}

fn inception_body(layer: &str, feature: &str, xmi: &str) -> Value {
    json!({
        "metadata": { "layer": layer, "feature": feature, "projectId": 3 },
        "document": { "xmi": xmi, "documentId": 17, "userId": "annotator" },
        "typeSystem": TYPE_SYSTEM,
    })
}

fn decode_document(body: &Value) -> String {
    let bytes = STANDARD.decode(body["document"].as_str().unwrap()).unwrap();
    String::from_utf8(bytes).unwrap()
}

#[actix_web::test]
async fn test_ner_barack_obama() {
    let app = test::init_service(App::new().app_data(state(ApiVariant::Base64)).configure(configure)).await;
    let xmi = tokenized_xmi("Barack Obama was president", &[(0, 6), (7, 12), (13, 16), (17, 26)]);

    let req = test::TestRequest::post()
        .uri("/ner/predict")
        .set_json(base64_body(NAMED_ENTITY_TYPE, "value", &xmi))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let document = decode_document(&body);
    assert_eq!(
        labels(&document, NAMED_ENTITY_TYPE, "value"),
        vec![((0, 12), "PERSON".to_string())]
    );
}

#[actix_web::test]
async fn test_pos_dogs_run() {
    let app = test::init_service(App::new().app_data(state(ApiVariant::Base64)).configure(configure)).await;
    let xmi = tokenized_xmi("dogs run", &[(0, 4), (5, 8)]);

    let req = test::TestRequest::post()
        .uri("/pos/predict")
        .set_json(base64_body(POS_TYPE, "PosValue", &xmi))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        labels(&decode_document(&body), POS_TYPE, "PosValue"),
        vec![((0, 4), "NOUN".to_string()), ((5, 8), "VERB".to_string())]
    );
}

#[actix_web::test]
async fn test_offsets_count_characters() {
    let app = test::init_service(App::new().app_data(state(ApiVariant::Inception)).configure(configure)).await;
    let xmi = tokenized_xmi("Café in Paris", &[(0, 4), (5, 7), (8, 13)]);

    let req = test::TestRequest::post()
        .uri("/ner/predict")
        .set_json(inception_body(NAMED_ENTITY_TYPE, "value", &xmi))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let document = body["document"].as_str().unwrap();
    assert!(document.contains("sofaString=\"Café in Paris\""));
    assert_eq!(
        labels(document, NAMED_ENTITY_TYPE, "value"),
        vec![((8, 13), "GPE".to_string())]
    );
}

#[actix_web::test]
async fn test_empty_token_layer_adds_nothing() {
    let app = test::init_service(App::new().app_data(state(ApiVariant::Base64)).configure(configure)).await;
    let xmi = tokenized_xmi("Barack Obama was president", &[]);

    for uri in ["/ner/predict", "/pos/predict"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(base64_body(NAMED_ENTITY_TYPE, "value", &xmi))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert!(labels(&decode_document(&body), NAMED_ENTITY_TYPE, "value").is_empty());
    }
}

#[actix_web::test]
async fn test_pos_annotates_every_token() {
    let app = test::init_service(App::new().app_data(state(ApiVariant::Inception)).configure(configure)).await;
    let text = "The quick dogs run to Berlin";
    let spans = [(0, 3), (4, 9), (10, 14), (15, 18), (19, 21), (22, 28)];
    let xmi = tokenized_xmi(text, &spans);

    let req = test::TestRequest::post()
        .uri("/pos/predict")
        .set_json(inception_body(POS_TYPE, "PosValue", &xmi))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let created = labels(body["document"].as_str().unwrap(), POS_TYPE, "PosValue");
    let created_spans: Vec<(usize, usize)> = created.iter().map(|(span, _)| *span).collect();
    assert_eq!(created_spans, spans.to_vec());
}

#[actix_web::test]
async fn test_ner_spans_are_token_unions() {
    let app = test::init_service(App::new().app_data(state(ApiVariant::Base64)).configure(configure)).await;
    let text = "Angela Merkel visited New York City";
    let spans = [(0, 6), (7, 13), (14, 21), (22, 25), (26, 30), (31, 35)];
    let xmi = tokenized_xmi(text, &spans);

    let req = test::TestRequest::post()
        .uri("/ner/predict")
        .set_json(base64_body(NAMED_ENTITY_TYPE, "value", &xmi))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let created = labels(&decode_document(&body), NAMED_ENTITY_TYPE, "value");
    assert_eq!(
        created,
        vec![((0, 13), "PERSON".to_string()), ((22, 35), "GPE".to_string())]
    );
    for pair in created.windows(2) {
        assert!(pair[0].0 .1 <= pair[1].0 .0);
    }
}

#[actix_web::test]
async fn test_malformed_requests_are_rejected() {
    let app = test::init_service(App::new().app_data(state(ApiVariant::Base64)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/ner/predict")
        .set_json(json!({ "layer": NAMED_ENTITY_TYPE, "feature": "value", "typeSystem": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "MALFORMED_REQUEST");

    let req = test::TestRequest::post()
        .uri("/pos/predict")
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unknown_layer_is_a_schema_error() {
    let app = test::init_service(App::new().app_data(state(ApiVariant::Base64)).configure(configure)).await;
    let xmi = tokenized_xmi("dogs run", &[(0, 4), (5, 8)]);

    let req = test::TestRequest::post()
        .uri("/pos/predict")
        .set_json(base64_body("webanno.custom.Missing", "value", &xmi))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "SCHEMA_ERROR");
}

#[actix_web::test]
async fn test_broken_document_is_a_store_error() {
    let app = test::init_service(App::new().app_data(state(ApiVariant::Inception)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/ner/predict")
        .set_json(inception_body(NAMED_ENTITY_TYPE, "value", "<xmi:XMI"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "STORE_ERROR");
}

#[actix_web::test]
async fn test_train_endpoints_ignore_their_body() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("train.json");
    let mut settings = Settings::default();
    settings.api.variant = ApiVariant::Inception;
    settings.api.train_dump_path = dump.to_string_lossy().into_owned();

    let app = test::init_service(App::new().app_data(state_with(settings)).configure(configure)).await;

    for (uri, payload) in [("/ner/train", "{\"documents\": [1, 2]}"), ("/pos/train", "")] {
        let req = test::TestRequest::post().uri(uri).set_payload(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(test::read_body(resp).await.is_empty());
    }

    assert_eq!(std::fs::read_to_string(&dump).unwrap(), "{\"documents\": [1, 2]}");
}

#[actix_web::test]
async fn test_failed_train_dump_still_returns_no_content() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.api.variant = ApiVariant::Inception;
    settings.api.train_dump_path = dir.path().join("missing").join("train.json").to_string_lossy().into_owned();

    let app = test::init_service(App::new().app_data(state_with(settings)).configure(configure)).await;
    let req = test::TestRequest::post().uri("/ner/train").set_payload("{}").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
