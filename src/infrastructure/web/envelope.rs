/*
Request and response envelopes

Two wire shapes carry the same prediction request. The `base64` variant sends the layer and
feature at the top level with base64 encoded XMI and type system. The `inception` variant
nests them under `metadata` and `document` and sends raw text. Decoding finishes before any
document parsing starts.
*/

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Map, Value};

use crate::config::application_settings::ApiVariant;
use crate::core::platform::container::prediction::{PredictionRequest, RequestMetadata};
use crate::error::ServiceError;

pub fn decode_request(variant: ApiVariant, body: &[u8]) -> Result<PredictionRequest, ServiceError> {
    let json: Value = serde_json::from_slice(body)
        .map_err(|e| ServiceError::MalformedRequest(format!("Body is not valid JSON: {}", e)))?;
    let root = json
        .as_object()
        .ok_or_else(|| ServiceError::MalformedRequest("Body must be a JSON object".to_string()))?;

    match variant {
        ApiVariant::Base64 => decode_base64_request(root),
        ApiVariant::Inception => decode_inception_request(root),
    }
}

pub fn encode_response(variant: ApiVariant, xmi: &str) -> Value {
    let document = match variant {
        ApiVariant::Base64 => STANDARD.encode(xmi.as_bytes()),
        ApiVariant::Inception => xmi.to_string(),
    };
    json!({ "document": document })
}

fn decode_base64_request(root: &Map<String, Value>) -> Result<PredictionRequest, ServiceError> {
    Ok(PredictionRequest {
        layer: string_field(root, "layer", "layer")?.to_string(),
        feature: string_field(root, "feature", "feature")?.to_string(),
        document: decode_text(string_field(root, "document", "document")?, "document")?,
        type_system: decode_text(string_field(root, "typeSystem", "typeSystem")?, "typeSystem")?,
        metadata: None,
    })
}

fn decode_inception_request(root: &Map<String, Value>) -> Result<PredictionRequest, ServiceError> {
    let metadata = object_field(root, "metadata")?;
    let document = object_field(root, "document")?;

    Ok(PredictionRequest {
        layer: string_field(metadata, "layer", "metadata.layer")?.to_string(),
        feature: string_field(metadata, "feature", "metadata.feature")?.to_string(),
        document: string_field(document, "xmi", "document.xmi")?.to_string(),
        type_system: string_field(root, "typeSystem", "typeSystem")?.to_string(),
        metadata: Some(RequestMetadata {
            project_id: metadata.get("projectId").cloned().unwrap_or(Value::Null),
            document_id: document.get("documentId").cloned().unwrap_or(Value::Null),
            user_id: document.get("userId").cloned().unwrap_or(Value::Null),
        }),
    })
}

fn object_field<'a>(parent: &'a Map<String, Value>, key: &str) -> Result<&'a Map<String, Value>, ServiceError> {
    match parent.get(key) {
        Some(Value::Object(object)) => Ok(object),
        Some(_) => Err(ServiceError::MalformedRequest(format!("Key [{}] must be an object", key))),
        None => Err(ServiceError::MalformedRequest(format!("Missing key [{}]", key))),
    }
}

fn string_field<'a>(parent: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a str, ServiceError> {
    match parent.get(key) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(ServiceError::MalformedRequest(format!("Key [{}] must be a string", path))),
        None => Err(ServiceError::MalformedRequest(format!("Missing key [{}]", path))),
    }
}

fn decode_text(encoded: &str, path: &str) -> Result<String, ServiceError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| ServiceError::MalformedRequest(format!("Key [{}] is not valid base64: {}", path, e)))?;
    String::from_utf8(bytes)
        .map_err(|_| ServiceError::MalformedRequest(format!("Key [{}] does not decode to UTF-8 text", path)))
}
