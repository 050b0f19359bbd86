use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Shown when a 2xx body matches none of the four known payload shapes.
pub const FORMAT_ERROR: &str =
    "😾 *yawns* Ugh, something went wrong with my response format. 🙄";

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Error)]
pub enum AskError {
    #[error("ask-blip request failed with status: {0}")]
    Status(StatusCode),
    #[error("ask-blip request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct BlipClient {
    client: Client,
    base_url: String,
}

impl BlipClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send one question to the answering server and extract the reply text.
    /// Any non-2xx status is a failure regardless of body; a 2xx body that
    /// matches none of the known shapes degrades to a fixed fallback string
    /// rather than an error.
    pub async fn ask(&self, question: &str) -> Result<String, AskError> {
        let url = format!("{}/api/ask-blip", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AskError::Status(response.status()));
        }

        let body: Value = response.json().await?;
        Ok(extract_answer(&body))
    }
}

/// Pull the answer string out of a response body. The server's payload shape
/// was never pinned down, so four shapes are accepted, in order: `response`
/// as a string, `response.text`, nested `response.response`, then a
/// top-level `message`. The `success` flag some payloads carry does not
/// change which field wins, and a `response` envelope that matches none of
/// the known forms degrades to the fixed fallback rather than falling
/// through to `message`. No fifth shape exists.
pub fn extract_answer(body: &Value) -> String {
    if let Some(response) = body.get("response").filter(|v| !v.is_null()) {
        return answer_field(response).unwrap_or_else(|| FORMAT_ERROR.to_string());
    }
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return message.to_string();
    }
    FORMAT_ERROR.to_string()
}

fn answer_field(response: &Value) -> Option<String> {
    if let Some(text) = response.as_str() {
        return Some(text.to_string());
    }
    response
        .get("text")
        .and_then(Value::as_str)
        .or_else(|| response.get("response").and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_successful_string_response() {
        let body = json!({"success": true, "response": "hello"});
        assert_eq!(extract_answer(&body), "hello");
    }

    #[test]
    fn extracts_text_field() {
        let body = json!({"response": {"text": "hello"}});
        assert_eq!(extract_answer(&body), "hello");
    }

    #[test]
    fn extracts_nested_response_field() {
        let body = json!({"response": {"response": "hello"}});
        assert_eq!(extract_answer(&body), "hello");
    }

    #[test]
    fn extracts_message_field() {
        let body = json!({"message": "hello"});
        assert_eq!(extract_answer(&body), "hello");
    }

    #[test]
    fn unrecognized_success_shape_falls_back() {
        let body = json!({"success": true, "response": {}});
        assert_eq!(extract_answer(&body), FORMAT_ERROR);
    }

    #[test]
    fn empty_body_falls_back() {
        assert_eq!(extract_answer(&json!({})), FORMAT_ERROR);
    }

    #[test]
    fn non_string_message_falls_back() {
        let body = json!({"message": 42});
        assert_eq!(extract_answer(&body), FORMAT_ERROR);
    }

    #[test]
    fn success_flag_without_response_still_reads_message() {
        let body = json!({"success": true, "message": "hi"});
        assert_eq!(extract_answer(&body), "hi");
    }

    #[test]
    fn null_response_falls_through_to_message() {
        let body = json!({"response": null, "message": "hi"});
        assert_eq!(extract_answer(&body), "hi");
    }

    #[test]
    fn unrecognized_envelope_does_not_fall_through_to_message() {
        let body = json!({"success": true, "response": {}, "message": "hi"});
        assert_eq!(extract_answer(&body), FORMAT_ERROR);
    }
}
