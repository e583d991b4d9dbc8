//! Interpreting a raw response according to the expected shape.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::{ApiEnvelope, FileResult, HttpResponse, ResponseShape, TransportError};
use crate::config::Messages;
use crate::facade::errors::RequestError;

/// The value a successful dispatch resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatched {
    /// The `data` member of a successful JSON envelope.
    Data(Value),
    /// A downloaded file.
    File(FileResult),
}

impl Dispatched {
    /// Returns the envelope data, if this is a JSON result.
    #[must_use]
    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Data(data) => Some(data),
            Self::File(_) => None,
        }
    }

    /// Returns the file, if this is a download result.
    #[must_use]
    pub fn into_file(self) -> Option<FileResult> {
        match self {
            Self::File(file) => Some(file),
            Self::Data(_) => None,
        }
    }

    /// Deserializes the envelope data into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UnexpectedShape`] for a download result and
    /// [`RequestError::Decode`] if the data does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, RequestError> {
        match self {
            Self::Data(data) => Ok(serde_json::from_value(data)?),
            Self::File(_) => Err(RequestError::UnexpectedShape {
                expected: ResponseShape::Json,
            }),
        }
    }
}

/// Interprets `response` as the `shape` the caller expects.
///
/// - **Binary**: a JSON-typed response is an error report; its envelope is
///   decoded (an unreadable one becomes `{code: -1, msg: unknown_error}`) and
///   rejected unless its `code` is 200. Any other 2xx response resolves to a
///   [`FileResult`] named from `Content-Disposition`, else `fallback_file_name`.
/// - **Json**: the body's envelope resolves to its `data` when `code` is 200
///   and rejects with its `msg` otherwise.
///
/// A non-2xx response that carries no readable envelope is a transport
/// failure.
///
/// # Errors
///
/// Returns [`RequestError::Api`] for a non-success envelope and
/// [`RequestError::Transport`] for a non-2xx response without one.
pub fn interpret(
    response: HttpResponse,
    shape: ResponseShape,
    fallback_file_name: &str,
    messages: &Messages,
) -> Result<Dispatched, RequestError> {
    match shape {
        ResponseShape::Binary => interpret_binary(response, fallback_file_name, messages),
        ResponseShape::Json => interpret_json(&response, messages),
    }
}

fn interpret_binary(
    response: HttpResponse,
    fallback_file_name: &str,
    messages: &Messages,
) -> Result<Dispatched, RequestError> {
    if response.is_json() {
        let envelope = response
            .text()
            .ok()
            .and_then(|text| ApiEnvelope::from_body(text.as_bytes()).ok())
            .unwrap_or_else(|| ApiEnvelope::unknown(messages.unknown_error.as_str()));

        if !envelope.is_success() {
            return Err(api_error(envelope));
        }
    }

    if !response.is_ok() {
        return Err(TransportError::status(response.code).into());
    }

    let file_name = response
        .file_name()
        .unwrap_or_else(|| fallback_file_name.to_string());

    Ok(Dispatched::File(FileResult {
        file_name,
        file_blob: response.body,
    }))
}

fn interpret_json(response: &HttpResponse, messages: &Messages) -> Result<Dispatched, RequestError> {
    let has_body = !response.body.iter().all(u8::is_ascii_whitespace);
    let parsed = ApiEnvelope::from_body(&response.body).ok();

    if !response.is_ok() && !(has_body && parsed.is_some()) {
        return Err(TransportError::status(response.code).into());
    }

    let envelope = parsed.unwrap_or_else(|| ApiEnvelope::unknown(messages.unknown_error.as_str()));
    if envelope.is_success() {
        Ok(Dispatched::Data(envelope.data))
    } else {
        Err(api_error(envelope))
    }
}

fn api_error(envelope: ApiEnvelope) -> RequestError {
    RequestError::Api {
        code: envelope.code,
        msg: envelope.msg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn binary_response(code: u16, headers: &[(&str, &str)], body: &[u8]) -> HttpResponse {
        let headers = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect();
        HttpResponse::new(code, headers, body.to_vec())
    }

    #[test]
    fn test_json_success_resolves_data() {
        let response = HttpResponse::json(200, &json!({"code": 200, "data": {"id": 1}, "msg": ""}));

        let result = interpret(response, ResponseShape::Json, "", &Messages::default()).unwrap();

        assert_eq!(result, Dispatched::Data(json!({"id": 1})));
    }

    #[test]
    fn test_json_failure_rejects_with_msg() {
        let response = HttpResponse::json(200, &json!({"code": 500, "msg": "bad input"}));

        let error = interpret(response, ResponseShape::Json, "", &Messages::default()).unwrap_err();

        assert!(matches!(error, RequestError::Api { code: 500, ref msg } if msg == "bad input"));
    }

    #[test]
    fn test_json_empty_body_is_a_failure() {
        let response = HttpResponse::new(200, HashMap::new(), Vec::new());

        let error = interpret(response, ResponseShape::Json, "", &Messages::default()).unwrap_err();

        assert!(matches!(error, RequestError::Api { code: 0, ref msg } if msg.is_empty()));
    }

    #[test]
    fn test_json_unreadable_body_is_unknown_error() {
        let response = HttpResponse::new(200, HashMap::new(), b"<html>".to_vec());

        let error = interpret(response, ResponseShape::Json, "", &Messages::default()).unwrap_err();

        assert!(matches!(error, RequestError::Api { code: -1, ref msg } if msg == "Unknown error"));
    }

    #[test]
    fn test_non_2xx_with_envelope_uses_envelope() {
        let response = HttpResponse::json(400, &json!({"code": 400, "msg": "invalid name"}));

        let error = interpret(response, ResponseShape::Json, "", &Messages::default()).unwrap_err();

        assert_eq!(error.api_message(), Some("invalid name"));
    }

    #[test]
    fn test_non_2xx_without_envelope_is_transport_failure() {
        let response = HttpResponse::new(502, HashMap::new(), b"Bad Gateway".to_vec());

        let error = interpret(response, ResponseShape::Json, "", &Messages::default()).unwrap_err();

        assert!(matches!(
            error,
            RequestError::Transport(TransportError::Status { code: 502, .. })
        ));
        assert_eq!(error.to_string(), "Request failed with status code 502");
    }

    #[test]
    fn test_binary_uses_content_disposition_name() {
        let response = binary_response(
            200,
            &[
                ("Content-Type", "text/csv"),
                ("Content-Disposition", "attachment; fileName=report.csv"),
            ],
            b"a,b\n1,2\n",
        );

        let result = interpret(response, ResponseShape::Binary, "fallback", &Messages::default())
            .unwrap();

        assert_eq!(
            result,
            Dispatched::File(FileResult {
                file_name: "report.csv".to_string(),
                file_blob: b"a,b\n1,2\n".to_vec(),
            })
        );
    }

    #[test]
    fn test_binary_falls_back_to_default_name() {
        let response = binary_response(200, &[("Content-Type", "application/pdf")], b"%PDF");

        let file = interpret(response, ResponseShape::Binary, "invoice.pdf", &Messages::default())
            .unwrap()
            .into_file()
            .unwrap();

        assert_eq!(file.file_name, "invoice.pdf");
    }

    #[test]
    fn test_binary_is_not_envelope_checked() {
        let response = binary_response(200, &[("Content-Type", "application/octet-stream")], br#"{"code":500}"#);

        let result = interpret(response, ResponseShape::Binary, "", &Messages::default());

        assert!(result.is_ok());
    }

    #[test]
    fn test_binary_json_error_envelope_rejects() {
        let response = HttpResponse::json(200, &json!({"code": 403, "msg": "no access"}));

        let error = interpret(response, ResponseShape::Binary, "", &Messages::default()).unwrap_err();

        assert!(matches!(error, RequestError::Api { code: 403, ref msg } if msg == "no access"));
    }

    #[test]
    fn test_binary_unreadable_json_error_is_unknown() {
        let response = binary_response(200, &[("Content-Type", "application/json")], &[0xff, 0xfe]);

        let error = interpret(response, ResponseShape::Binary, "", &Messages::default()).unwrap_err();

        assert!(matches!(error, RequestError::Api { code: -1, ref msg } if msg == "Unknown error"));
    }

    #[test]
    fn test_binary_json_success_envelope_resolves_file() {
        let response = HttpResponse::json(200, &json!({"code": 200, "data": null}));

        let result = interpret(response, ResponseShape::Binary, "data.json", &Messages::default());

        assert_eq!(result.unwrap().into_file().unwrap().file_name, "data.json");
    }

    #[test]
    fn test_binary_non_2xx_is_transport_failure() {
        let response = binary_response(404, &[("Content-Type", "text/html")], b"not found");

        let error = interpret(response, ResponseShape::Binary, "", &Messages::default()).unwrap_err();

        assert!(matches!(
            error,
            RequestError::Transport(TransportError::Status { code: 404, .. })
        ));
    }

    #[test]
    fn test_dispatched_accessors() {
        assert_eq!(Dispatched::Data(json!(1)).into_data(), Some(json!(1)));
        assert!(Dispatched::Data(json!(1)).into_file().is_none());
        assert!(Dispatched::File(FileResult::default()).into_data().is_none());
    }

    #[test]
    fn test_dispatched_deserialize() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct User {
            id: u32,
        }

        let user: User = Dispatched::Data(json!({"id": 7})).deserialize().unwrap();
        assert_eq!(user, User { id: 7 });

        let error = Dispatched::File(FileResult::default())
            .deserialize::<User>()
            .unwrap_err();
        assert!(matches!(error, RequestError::UnexpectedShape { .. }));
    }
}
