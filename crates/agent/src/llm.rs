use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use frajola_core::config::CompletionConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, message: &str, context: &str) -> Result<String>;
}

#[async_trait]
impl CompletionClient for Box<dyn CompletionClient> {
    async fn complete(&self, message: &str, context: &str) -> Result<String> {
        (**self).complete(message, context).await
    }
}

/// Stand-in used when no completion endpoint is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledCompletionClient;

#[async_trait]
impl CompletionClient for DisabledCompletionClient {
    async fn complete(&self, _message: &str, _context: &str) -> Result<String> {
        Err(anyhow!("text completion is not configured"))
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    message: &'a str,
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    response: Option<String>,
    error: Option<serde_json::Value>,
}

/// POSTs `{message, context}` as JSON and reads `{response}` back.
#[derive(Clone, Debug)]
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint_url: String,
    api_key: Option<SecretString>,
}

impl HttpCompletionClient {
    pub fn new(
        endpoint_url: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build completion HTTP client")?;

        Ok(Self { client, endpoint_url: endpoint_url.into(), api_key })
    }

    /// HTTP client for the configured endpoint, or `None` when delegation is
    /// disabled.
    pub fn from_config(config: &CompletionConfig) -> Result<Option<Self>> {
        config
            .endpoint_url
            .as_ref()
            .map(|url| {
                Self::new(url, config.api_key.clone(), Duration::from_secs(config.timeout_secs))
            })
            .transpose()
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, message: &str, context: &str) -> Result<String> {
        let mut request =
            self.client.post(&self.endpoint_url).json(&CompletionRequest { message, context });
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.context("completion request failed")?;
        let status = response.status();
        debug!(
            event_name = "completion.response_received",
            status = %status,
            "completion response received"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("completion endpoint returned {status}: {body}");
        }

        let payload: CompletionResponse =
            response.json().await.context("completion response is not valid JSON")?;
        if let Some(error) = payload.error {
            bail!("completion endpoint reported an error: {error}");
        }
        payload.response.ok_or_else(|| anyhow!("completion response has no `response` field"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{CompletionClient, DisabledCompletionClient, HttpCompletionClient};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> HttpCompletionClient {
        HttpCompletionClient::new(
            format!("{}/chat", server.uri()),
            api_key.map(|key| key.to_string().into()),
            Duration::from_secs(5),
        )
        .expect("client builds")
    }

    #[tokio::test]
    async fn posts_message_and_context_and_reads_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({"message": "oi", "context": "Conversa recente: oi"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": "Olá! Tudo ótimo."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server, Some("sk-test"))
            .complete("oi", "Conversa recente: oi")
            .await
            .expect("completion succeeds");
        assert_eq!(reply, "Olá! Tudo ótimo.");
    }

    #[tokio::test]
    async fn error_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "quota exceeded"})))
            .mount(&server)
            .await;

        let error = client_for(&server, None).complete("oi", "").await.expect_err("must fail");
        assert!(error.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let error = client_for(&server, None).complete("oi", "").await.expect_err("must fail");
        assert!(error.to_string().contains("503"));
    }

    #[tokio::test]
    async fn missing_response_field_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "oi"})))
            .mount(&server)
            .await;

        let error = client_for(&server, None).complete("oi", "").await.expect_err("must fail");
        assert!(error.to_string().contains("response"));
    }

    #[tokio::test]
    async fn disabled_client_always_fails() {
        assert!(DisabledCompletionClient.complete("oi", "").await.is_err());
    }
}
