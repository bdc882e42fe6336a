//! Mail endpoint client
//!
//! The contact form posts its fields to a mail-sending endpoint that
//! answers with JSON `{"success": bool, "message": string}`. The endpoint is
//! abstracted behind [`MailTransport`] so forms can be driven by a fake in
//! tests and by [`HttpMailTransport`] in real builds.

use std::future::Future;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Form fields in document order
pub type FormFields = IndexMap<String, String>;

/// Body returned by the mail endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl MailResponse {
    /// Turn an unsuccessful response into [`MailError::Rejected`]
    pub fn into_result(self) -> Result<Self, MailError> {
        if self.success {
            Ok(self)
        } else {
            Err(MailError::Rejected(self.message))
        }
    }
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("message rejected: {0}")]
    Rejected(String),
}

/// Sends form fields to the mail endpoint
pub trait MailTransport {
    fn send(&self, fields: &FormFields) -> impl Future<Output = Result<MailResponse, MailError>>;
}

/// [`MailTransport`] posting form-encoded fields over HTTP
#[cfg(feature = "network")]
#[derive(Clone, Debug)]
pub struct HttpMailTransport {
    client: reqwest::Client,
    endpoint: String,
}

#[cfg(feature = "network")]
impl HttpMailTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(feature = "network")]
impl MailTransport for HttpMailTransport {
    async fn send(&self, fields: &FormFields) -> Result<MailResponse, MailError> {
        tracing::debug!(endpoint = %self.endpoint, fields = fields.len(), "posting form");
        let response = self
            .client
            .post(&self.endpoint)
            .form(fields)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_response() {
        let ok: MailResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(ok.success);
        assert!(ok.message.is_empty());
        assert!(ok.into_result().is_ok());

        let rejected: MailResponse =
            serde_json::from_str(r#"{"success": false, "message": "quota"}"#).unwrap();
        match rejected.into_result() {
            Err(MailError::Rejected(message)) => assert_eq!(message, "quota"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_converts() {
        let err: MailError = serde_json::from_str::<MailResponse>("<html>")
            .unwrap_err()
            .into();
        assert!(matches!(err, MailError::Decode(_)));
        assert_eq!(MailError::Status(502).to_string(), "HTTP error: 502");
    }

    #[cfg(feature = "network")]
    #[test]
    fn test_http_transport_endpoint() {
        let transport = HttpMailTransport::new("mailer/sendmail.php");
        assert_eq!(transport.endpoint(), "mailer/sendmail.php");
    }
}
