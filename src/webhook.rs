use crate::error::Error;
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Free text that passed the non-empty check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput(String);

impl UserInput {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        if raw.trim().is_empty() {
            Err(Error::EmptyInput)
        } else {
            Ok(Self(raw.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize)]
struct WebhookRequest<'a> {
    user_input: &'a str,
}

/// The `result` field of whatever came back, if there was one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub result: Option<String>,
}

impl Analysis {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            result: Some(text.into()),
        }
    }

    fn from_envelope(value: Value) -> Self {
        let result = match value {
            Value::Object(mut map) => map.remove("result").map(|result| match result {
                Value::String(text) => text,
                other => other.to_string(),
            }),
            _ => None,
        };

        Self { result }
    }
}

#[derive(Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create webhook HTTP client")?;

        Ok(Self { http, url })
    }

    /// Sends the input and folds every failure into result text.
    pub async fn analyze(&self, input: &UserInput) -> Analysis {
        match self.send(input).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Webhook request failed: {e}");
                Analysis::message(format!(
                    "❌ Failed to send the request, please check the network or server status\n{e}"
                ))
            }
        }
    }

    async fn send(&self, input: &UserInput) -> Result<Analysis, reqwest::Error> {
        let response = self
            .http
            .post(&self.url)
            .json(&WebhookRequest {
                user_input: input.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Webhook responded with {status}");
            return Ok(Analysis::message(format!(
                "❌ The server responded with an error: HTTP code {}",
                status.as_u16()
            )));
        }

        let body = response.bytes().await?;
        Ok(decode_body(&body))
    }
}

pub fn decode_body(body: &[u8]) -> Analysis {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => return Analysis::from_envelope(value),
        Err(e) => debug!("Response is not strict JSON ({e}), retrying as text"),
    }

    let text = String::from_utf8_lossy(body);
    let cleaned = text.trim_start_matches('\u{feff}').trim();

    match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => Analysis::from_envelope(value),
        Err(e) => {
            warn!("Could not decode webhook response: {e}");
            Analysis::message(format!("⚠️ Could not parse the response content:\n\n{text}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> WebhookClient {
        WebhookClient::new(format!("{}/hook", server.uri()), Duration::from_secs(5)).unwrap()
    }

    fn input(text: &str) -> UserInput {
        UserInput::parse(text).unwrap()
    }

    #[test]
    fn blank_input_is_rejected() {
        assert!(matches!(UserInput::parse(""), Err(Error::EmptyInput)));
        assert!(matches!(UserInput::parse("  \n\t "), Err(Error::EmptyInput)));
        assert_eq!(
            UserInput::parse(" I sleep 5 hours ").unwrap().as_str(),
            " I sleep 5 hours "
        );
    }

    #[test]
    fn decodes_result_envelope() {
        let analysis = decode_body(br#"{"result": "plain text, no link"}"#);
        assert_eq!(analysis.result.as_deref(), Some("plain text, no link"));
    }

    #[test]
    fn missing_result_is_none() {
        assert_eq!(decode_body(br#"{"answer": "x"}"#).result, None);
        assert_eq!(decode_body(br#"["result"]"#).result, None);
    }

    #[test]
    fn non_string_result_is_rendered_as_json() {
        let analysis = decode_body(br#"{"result": {"score": 3}}"#);
        assert_eq!(analysis.result.as_deref(), Some(r#"{"score":3}"#));
    }

    #[test]
    fn second_attempt_tolerates_a_byte_order_mark() {
        let body = "\u{feff}  {\"result\": \"ok\"}\n".as_bytes();
        assert_eq!(decode_body(body).result.as_deref(), Some("ok"));
    }

    #[test]
    fn undecodable_body_is_wrapped_with_a_warning() {
        let result = decode_body(b"oops").result.unwrap();
        assert!(result.starts_with("⚠️"));
        assert!(result.contains("oops"));
    }

    #[tokio::test]
    async fn posts_the_user_input_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"user_input": "I keep waking up at 3am"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": "Try a wind-down routine"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let analysis = client(&server).analyze(&input("I keep waking up at 3am")).await;

        assert_eq!(analysis.result.as_deref(), Some("Try a wind-down routine"));
    }

    #[tokio::test]
    async fn server_error_reports_the_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client(&server).analyze(&input("hello")).await.result.unwrap();

        assert!(result.starts_with("❌"));
        assert!(result.contains("500"));
    }

    #[tokio::test]
    async fn plain_text_body_is_wrapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
            .mount(&server)
            .await;

        let result = client(&server).analyze(&input("hello")).await.result.unwrap();

        assert!(result.contains("⚠️"));
        assert!(result.contains("oops"));
    }

    #[tokio::test]
    async fn connection_failure_becomes_result_text() {
        let url = "http://127.0.0.1:1/hook".to_owned();
        let client = WebhookClient::new(url, Duration::from_secs(5)).unwrap();

        let result = client.analyze(&input("hello")).await.result.unwrap();

        assert!(result.starts_with("❌ Failed to send the request"));
        assert!(result.contains("127.0.0.1:1"));
    }

    #[tokio::test]
    async fn timeout_becomes_result_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": "late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;
        let url = format!("{}/hook", server.uri());
        let client = WebhookClient::new(url, Duration::from_millis(100)).unwrap();

        let result = client.analyze(&input("hello")).await.result.unwrap();

        assert!(result.starts_with("❌ Failed to send the request"));
        assert!(!result.contains("late"));
    }
}
