//! HTTPS chat-completion gateway built on `reqwest`.

use async_trait::async_trait;
use duet_application::{ChatGateway, ChatRequest, GatewayError};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors building the HTTP client
#[derive(Error, Debug)]
pub enum HttpGatewayError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Sends chat-completion requests as JSON over HTTP.
#[derive(Clone)]
pub struct HttpChatGateway {
    client: reqwest::Client,
}

impl HttpChatGateway {
    /// Create a gateway with separate connect and read timeouts.
    pub fn new(
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, HttpGatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .user_agent(concat!("duet/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    fn map_error(error: reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            GatewayError::Timeout(error.to_string())
        } else if error.is_connect() {
            GatewayError::ConnectionError(error.to_string())
        } else {
            GatewayError::RequestFailed(error.to_string())
        }
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn complete(
        &self,
        endpoint: &str,
        credential: &str,
        request: &ChatRequest,
    ) -> Result<String, GatewayError> {
        debug!("POST {} (model: {})", endpoint, request.model);

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(credential)
            .json(request)
            .send()
            .await
            .map_err(Self::map_error)?;

        let status = response.status();
        let body = response.text().await;

        if !status.is_success() {
            return match body {
                Ok(body) if !body.trim().is_empty() => Err(GatewayError::Api {
                    status: status.as_u16(),
                    body,
                }),
                _ => Err(GatewayError::Status {
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or("Unknown").to_string(),
                }),
            };
        }

        let body = body.map_err(Self::map_error)?;
        debug!("{} returned {} bytes", endpoint, body.len());
        Ok(body)
    }
}
