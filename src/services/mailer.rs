use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail request failed: {0}")]
    Request(String),

    #[error("Mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl Email {
    pub fn password_reset(to: &str, reset_url: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "Jobbee Reset Password Recovery".to_string(),
            text: format!(
                "Your password link is as follows:\n{}\n\nIf you have not requested this then please ignore.",
                reset_url
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Picks the HTTP mailer when an API URL is configured, the log mailer otherwise.
pub fn from_config(config: &MailConfig) -> Arc<dyn Mailer> {
    match config.api_url.as_deref() {
        Some(url) => Arc::new(HttpMailer::new(url, config)),
        None => {
            tracing::warn!("MAIL_API_URL not set, outgoing mail will only be logged");
            Arc::new(LogMailer)
        }
    }
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

/// Sends mail through a JSON transactional mail API (MailChannels-style payload)
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    from_name: String,
    from_email: String,
}

impl HttpMailer {
    pub fn new(api_url: &str, config: &MailConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Mail client without timeout: {}", e);
                Client::new()
            });
        Self {
            client,
            api_url: api_url.to_string(),
            api_key: config.api_key.clone(),
            from_name: config.from_name.clone(),
            from_email: config.from_email.clone(),
        }
    }

    fn request<'a>(&'a self, email: &'a Email) -> SendRequest<'a> {
        SendRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: &email.to,
                    name: &email.to,
                }],
            }],
            from: Address {
                email: &self.from_email,
                name: &self.from_name,
            },
            subject: &email.subject,
            content: vec![Content {
                content_type: "text/plain",
                value: &email.text,
            }],
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let mut request = self.client.post(&self.api_url).json(&self.request(email));
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await.map_err(|e| MailError::Request(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            tracing::info!("Sent \"{}\" to {}", email.subject, email.to);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Development mailer: writes the message to the log
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, "{}", email.text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mail_config(api_url: Option<&str>) -> MailConfig {
        MailConfig {
            api_url: api_url.map(str::to_string),
            api_key: Some("key".to_string()),
            from_name: "Jobbee".to_string(),
            from_email: "noreply@jobbee.com".to_string(),
        }
    }

    #[test]
    fn reset_email_contains_link() {
        let email = Email::password_reset("ada@example.com", "http://localhost:5000/api/v1/password/reset/abc");
        assert_eq!(email.subject, "Jobbee Reset Password Recovery");
        assert!(email.text.contains("\nhttp://localhost:5000/api/v1/password/reset/abc\n"));
    }

    #[test]
    fn payload_has_sender_and_recipient() {
        let mailer = HttpMailer::new("http://mail.invalid/send", &mail_config(None));
        let email = Email::password_reset("ada@example.com", "http://x/reset/1");
        let value = serde_json::to_value(mailer.request(&email)).unwrap();
        assert_eq!(value["from"], json!({ "email": "noreply@jobbee.com", "name": "Jobbee" }));
        assert_eq!(value["personalizations"][0]["to"][0]["email"], json!("ada@example.com"));
        assert_eq!(value["content"][0]["type"], json!("text/plain"));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let email = Email::password_reset("ada@example.com", "http://x/reset/1");
        assert!(LogMailer.send(&email).await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_request_error() {
        let mailer = from_config(&mail_config(Some("http://127.0.0.1:1/send")));
        let email = Email::password_reset("ada@example.com", "http://x/reset/1");
        assert!(matches!(mailer.send(&email).await, Err(MailError::Request(_))));
    }
}
