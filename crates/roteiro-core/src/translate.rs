//! Dialogue translation client.
//!
//! Sends text to a MyMemory-compatible endpoint as a form POST
//! (`q=<text>&langpair=pt|es`) and reads `responseData.translatedText`
//! from the JSON reply.

use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::TranslationConfig;

/// Default translation endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.mymemory.translated.net/get";

/// Environment override for the endpoint.
pub const BASE_URL_ENV: &str = "ROTEIRO_TRANSLATE_URL";

/// Standard User-Agent header for roteiro requests.
pub const USER_AGENT: &str = concat!("roteiro/", env!("CARGO_PKG_VERSION"));

/// Resolves the endpoint with precedence: env > config > default.
///
/// # Errors
/// Returns an error if the chosen URL is malformed.
pub fn resolve_base_url(
    config_base_url: Option<&str>,
    env_var: &str,
    default_url: &str,
) -> Result<String> {
    if let Ok(env_url) = std::env::var(env_var) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(default_url.to_string())
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid translation URL: {url}"))?;
    Ok(())
}

/// Category of a translation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationErrorKind {
    /// Non-success HTTP status
    Http,
    /// Timeout, connection or other request failure
    Transport,
    /// Response body was not the expected JSON
    Decode,
    /// Response decoded but carried no translated text
    MissingText,
}

impl fmt::Display for TranslationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationErrorKind::Http => write!(f, "http"),
            TranslationErrorKind::Transport => write!(f, "transport"),
            TranslationErrorKind::Decode => write!(f, "decode"),
            TranslationErrorKind::MissingText => write!(f, "missing_text"),
        }
    }
}

/// Structured translation error.
#[derive(Debug, Clone)]
pub struct TranslationError {
    pub kind: TranslationErrorKind,
    /// HTTP status, for [`TranslationErrorKind::Http`]
    pub status: Option<u16>,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional raw response body
    pub details: Option<String>,
}

impl TranslationError {
    pub fn new(kind: TranslationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            details: None,
        }
    }

    pub fn http_status(status: u16, body: &str) -> Self {
        Self {
            kind: TranslationErrorKind::Http,
            status: Some(status),
            message: format!("HTTP {status}"),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TranslationError {}

fn classify_reqwest_error(e: &reqwest::Error) -> TranslationError {
    let message = if e.is_timeout() {
        format!("Request timed out: {e}")
    } else if e.is_connect() {
        format!("Connection failed: {e}")
    } else if e.is_request() {
        format!("Request error: {e}")
    } else {
        format!("Network error: {e}")
    };
    TranslationError::new(TranslationErrorKind::Transport, message)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    response_data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

/// Translation client configuration.
#[derive(Debug, Clone)]
pub struct TranslationClientConfig {
    pub base_url: String,
    pub langpair: String,
    pub timeout: Option<std::time::Duration>,
}

impl TranslationClientConfig {
    /// Builds a client config from the user configuration, honoring
    /// the `ROTEIRO_TRANSLATE_URL` override.
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let base_url =
            resolve_base_url(config.effective_base_url(), BASE_URL_ENV, DEFAULT_BASE_URL)?;
        Ok(Self {
            base_url,
            langpair: config.langpair(),
            timeout: config.timeout(),
        })
    }
}

/// HTTP translation client.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    config: TranslationClientConfig,
    http: reqwest::Client,
}

impl TranslationClient {
    pub fn new(config: TranslationClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build translation HTTP client")?;
        Ok(Self { config, http })
    }

    /// Translates `text`, returning the translated text.
    pub async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        tracing::debug!(
            url = %self.config.base_url,
            langpair = %self.config.langpair,
            chars = text.len(),
            "sending translation request"
        );

        let response = self
            .http
            .post(&self.config.base_url)
            .form(&[("q", text), ("langpair", self.config.langpair.as_str())])
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::http_status(status.as_u16(), &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        let parsed: TranslateResponse = serde_json::from_str(&body).map_err(|e| TranslationError {
            kind: TranslationErrorKind::Decode,
            status: None,
            message: format!("Invalid translation response: {e}"),
            details: Some(body.clone()),
        })?;

        parsed
            .response_data
            .and_then(|data| data.translated_text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| TranslationError {
                kind: TranslationErrorKind::MissingText,
                status: None,
                message: "Translation response had no translated text".to_string(),
                details: Some(body),
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> TranslationClient {
        TranslationClient::new(TranslationClientConfig {
            base_url: format!("{}/get", server.uri()),
            langpair: "pt|es".to_string(),
            timeout: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_translate_posts_form_and_reads_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get"))
            .and(body_string_contains("langpair=pt%7Ces"))
            .and(body_string_contains("q=1%0AANA%0A-+bom+dia"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseData": { "translatedText": "1\nANA\n- buenos días", "match": 1 },
                "responseStatus": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server)
            .translate("1\nANA\n- bom dia")
            .await
            .unwrap();
        assert_eq!(text, "1\nANA\n- buenos días");
    }

    #[tokio::test]
    async fn test_missing_translated_text_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "responseData": {} })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).translate("oi").await.unwrap_err();
        assert_eq!(err.kind, TranslationErrorKind::MissingText);
    }

    #[tokio::test]
    async fn test_http_error_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let err = client_for(&server).translate("oi").await.unwrap_err();
        assert_eq!(err.kind, TranslationErrorKind::Http);
        assert_eq!(err.status, Some(503));
        assert_eq!(err.to_string(), "HTTP 503");
        assert_eq!(err.details.as_deref(), Some("busy"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).translate("oi").await.unwrap_err();
        assert_eq!(err.kind, TranslationErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = TranslationClient::new(TranslationClientConfig {
            base_url: "http://127.0.0.1:1/get".to_string(),
            langpair: "pt|es".to_string(),
            timeout: Some(std::time::Duration::from_secs(5)),
        })
        .unwrap();

        let err = client.translate("oi").await.unwrap_err();
        assert_eq!(err.kind, TranslationErrorKind::Transport);
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_resolve_base_url_precedence() {
        let env = "ROTEIRO_TEST_UNSET_TRANSLATE_URL";
        assert_eq!(
            resolve_base_url(None, env, DEFAULT_BASE_URL).unwrap(),
            DEFAULT_BASE_URL
        );
        assert_eq!(
            resolve_base_url(Some(" http://localhost:9/t "), env, DEFAULT_BASE_URL).unwrap(),
            "http://localhost:9/t"
        );
        assert!(resolve_base_url(Some("not a url"), env, DEFAULT_BASE_URL).is_err());
    }

    #[test]
    fn test_client_config_uses_langpair() {
        let config = TranslationConfig {
            target: "en".to_string(),
            ..Default::default()
        };
        let client_config = TranslationClientConfig::from_config(&config).unwrap();
        assert_eq!(client_config.langpair, "pt|en");
    }
}
