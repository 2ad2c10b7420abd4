//! HTTP client for the `/predict` endpoint of the intent model service.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::http_client;
use crate::predict::FieldSet;

/// Path of the prediction route on the configured endpoint.
pub const PREDICT_PATH: &str = "/predict";

const MAX_PREDICT_RESPONSE_BYTES: usize = 256 * 1024;

/// A well-formed prediction returned by the model service.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionReply {
    /// Categorical outcome of the random-forest model, e.g. `Purchase`.
    pub label: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// The endpoint rejected the submitted values; message shown verbatim.
    #[error("{0}")]
    Rejected(String),
    /// Non-2xx status without a usable prediction body.
    #[error("Server error: {0}")]
    ServerError(String),
    /// The network exchange itself did not complete.
    #[error("HTTP error: {0}")]
    Transport(String),
    /// The body could not be read or decoded as a prediction reply.
    #[error("Invalid reply: {0}")]
    Json(String),
}

/// Submit the field values and await the model's classification.
///
/// Every field becomes one multipart form part, name and value stringified,
/// in the order the endpoint reads them. This call blocks and is expected to
/// run on a background job thread, never on the UI thread.
pub fn request_prediction(
    base_url: &str,
    fields: &FieldSet,
) -> Result<PredictionReply, PredictError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), PREDICT_PATH);
    let boundary = format!("intentdesk-{}", Uuid::new_v4().simple());
    let body = encode_multipart(fields, &boundary);

    let request = http_client::agent()
        .post(&url)
        .set("Accept", "application/json")
        .set(
            "Content-Type",
            &format!("multipart/form-data; boundary={boundary}"),
        );

    let response = match request.send_bytes(&body) {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            let body = read_body_limited(response).unwrap_or_else(|err| err);
            return Err(PredictError::ServerError(format!("HTTP {code}: {body}")));
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(PredictError::Transport(err.to_string()));
        }
    };

    let body = read_body_limited(response).map_err(PredictError::Json)?;
    parse_prediction_reply(&body)
}

/// Assemble a `multipart/form-data` body with one part per field.
pub(crate) fn encode_multipart(fields: &FieldSet, boundary: &str) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, value) in fields.iter() {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                field.wire_name()
            )
            .as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[derive(Clone, Debug, Deserialize)]
struct PredictionReplyWire {
    #[serde(default)]
    final_prediction: Value,
    #[serde(default)]
    rf_model_prediction: Value,
    error: Option<String>,
}

/// Decode the reply body into a prediction or a surfaced failure.
///
/// A truthy `final_prediction` selects the success branch regardless of any
/// `error` field. Otherwise the server-supplied message is surfaced verbatim
/// when present.
fn parse_prediction_reply(body: &str) -> Result<PredictionReply, PredictError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(PredictError::Json("Empty response body".to_string()));
    }
    let parsed: PredictionReplyWire = serde_json::from_str(trimmed)
        .map_err(|err| PredictError::Json(format!("{err}: {trimmed}")))?;

    if is_truthy(&parsed.final_prediction) {
        let label = label_from_value(&parsed.rf_model_prediction);
        if label.is_empty() {
            return Err(PredictError::Json(
                "Reply marked final but carried no prediction label".to_string(),
            ));
        }
        return Ok(PredictionReply { label });
    }

    let message = parsed
        .error
        .unwrap_or_else(|| "Prediction service returned no result".to_string());
    Err(PredictError::Rejected(message))
}

/// JSON truthiness: everything except `null`, `false`, `0`, and empty
/// strings/arrays/objects counts as a positive prediction flag.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Extract a display label from the model output field.
///
/// The service serializes the raw model output, so the label may arrive as a
/// bare string, a number, or a single-element array of either.
fn label_from_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items.first().map(label_from_value).unwrap_or_default(),
        _ => String::new(),
    }
}

fn read_body_limited(response: ureq::Response) -> Result<String, String> {
    let bytes = http_client::read_response_bytes(response, MAX_PREDICT_RESPONSE_BYTES)
        .map_err(|err| err.to_string())?;
    String::from_utf8(bytes).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::FeatureField;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn parses_success_reply() {
        let reply = parse_prediction_reply(
            r#"{ "final_prediction": true, "rf_model_prediction": "Purchase" }"#,
        )
        .unwrap();
        assert_eq!(reply.label, "Purchase");
    }

    #[test]
    fn success_wins_over_error_field() {
        let reply = parse_prediction_reply(
            r#"{ "final_prediction": 1, "rf_model_prediction": "Purchase", "error": "ignored" }"#,
        )
        .unwrap();
        assert_eq!(reply.label, "Purchase");
    }

    #[test]
    fn label_may_arrive_as_single_element_array() {
        let reply = parse_prediction_reply(
            r#"{ "final_prediction": true, "rf_model_prediction": ["No Purchase"] }"#,
        )
        .unwrap();
        assert_eq!(reply.label, "No Purchase");
    }

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let err = parse_prediction_reply(
            r#"{ "final_prediction": false, "error": "Invalid Month value" }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PredictError::Rejected(_)));
        assert_eq!(err.to_string(), "Invalid Month value");
    }

    #[test]
    fn falsy_reply_without_message_gets_a_generic_one() {
        let err = parse_prediction_reply(r#"{ "final_prediction": null }"#).unwrap_err();
        assert!(matches!(err, PredictError::Rejected(_)));
        assert!(err.to_string().contains("no result"));
    }

    #[test]
    fn truthy_reply_without_label_is_invalid() {
        let err = parse_prediction_reply(r#"{ "final_prediction": true }"#).unwrap_err();
        assert!(matches!(err, PredictError::Json(_)));
    }

    #[test]
    fn empty_and_malformed_bodies_are_invalid() {
        assert!(matches!(
            parse_prediction_reply("  "),
            Err(PredictError::Json(_))
        ));
        assert!(matches!(
            parse_prediction_reply("<html>busy</html>"),
            Err(PredictError::Json(_))
        ));
    }

    #[test]
    fn multipart_body_has_one_part_per_field_in_wire_order() {
        let mut fields = FieldSet::default();
        fields.set(FeatureField::Month, "5");
        fields.set(FeatureField::VisitorType, "2");

        let body = encode_multipart(&fields, "test-boundary");
        let text = String::from_utf8(body).unwrap();

        let parts: Vec<&str> = text.split("--test-boundary").collect();
        // 15 field parts plus the leading empty split and terminal marker.
        assert_eq!(parts.len(), 17);
        assert!(text.contains("Content-Disposition: form-data; name=\"Month\"\r\n\r\n5\r\n"));
        assert!(text.contains("Content-Disposition: form-data; name=\"VisitorType\"\r\n\r\n2\r\n"));
        let month_at = text.find("name=\"Month\"").unwrap();
        let admin_at = text.find("name=\"Administrative\"").unwrap();
        assert!(admin_at < month_at);
        assert!(text.ends_with("--test-boundary--\r\n"));
    }

    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 8192];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn request_round_trips_against_local_server() {
        let body = r#"{"final_prediction": true, "rf_model_prediction": "Purchase"}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let url = serve_once(response);
        let reply = request_prediction(&url, &FieldSet::default()).unwrap();
        assert_eq!(reply.label, "Purchase");
    }

    #[test]
    fn refused_connection_maps_to_transport_error() {
        // Bind then drop to obtain a port nothing listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = request_prediction(&format!("http://127.0.0.1:{port}"), &FieldSet::default())
            .unwrap_err();
        assert!(matches!(err, PredictError::Transport(_)));
    }

    #[test]
    fn http_error_status_maps_to_server_error() {
        let body = "model unavailable";
        let response = format!(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let url = serve_once(response);
        let err = request_prediction(&url, &FieldSet::default()).unwrap_err();
        match err {
            PredictError::ServerError(message) => {
                assert!(message.contains("500"));
                assert!(message.contains("model unavailable"));
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }
}
