//! HTTP transport over `reqwest` with rustls.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use super::{FilePart, Transport, TransportError};
use crate::config::{ClientConfig, API_KEY_HEADER};

/// Talks JSON over HTTP to one node.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport from client configuration. The API key, when set,
    /// is attached to every request.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(key)
                .map_err(|_| TransportError::InvalidConfig("API key is not a valid header".into()))?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .user_agent(concat!("rubix-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.node_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn finish(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, TransportError> {
        let response = request.send().await.map_err(|e| request_error(endpoint, e))?;
        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "node responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    endpoint: endpoint.to_string(),
                }
            } else {
                TransportError::Decode {
                    endpoint: endpoint.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError> {
        debug!(endpoint, "POST");
        let request = self.client.post(self.url(endpoint)).json(body);
        self.finish(endpoint, request).await
    }

    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        debug!(endpoint, "GET");
        let request = self.client.get(self.url(endpoint)).query(query);
        self.finish(endpoint, request).await
    }

    async fn post_multipart(
        &self,
        endpoint: &str,
        files: &[FilePart],
        fields: &[(&str, &str)],
    ) -> Result<Value, TransportError> {
        debug!(endpoint, files = files.len(), "POST multipart");
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name.to_string(), value.to_string());
        }
        for file in files {
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|source| TransportError::File {
                    path: file.path.clone(),
                    source,
                })?;
            let file_name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.field.clone());
            form = form.part(file.field.clone(), Part::bytes(bytes).file_name(file_name));
        }
        let request = self.client.post(self.url(endpoint)).multipart(form);
        self.finish(endpoint, request).await
    }
}

fn request_error(endpoint: &str, e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        TransportError::Request {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        }
    }
}
