use async_trait::async_trait;
use serde::Serialize;

use super::{MailError, Mailer};
use crate::core::config::MailConfig;

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: String,
}

/// Mailer that posts JSON messages to an HTTP mail relay
pub struct HttpMailer {
    api_url: String,
    api_key: Option<String>,
    from: String,
    frontend_url: String,
    http_client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(api_url: String, config: &MailConfig) -> Self {
        Self {
            api_url,
            api_key: config.api_key.clone(),
            from: config.from.clone(),
            frontend_url: config.frontend_url.clone(),
            http_client: reqwest::Client::new(),
        }
    }
}

fn validation_body(name: &str, frontend_url: &str) -> String {
    format!(
        "<h1>Hola {name}</h1>\
         <p>Tu registro fue recibido y está pendiente de validación por el 911.</p>\
         <p>Te avisaremos cuando tu cuenta esté activa. Podés ingresar en \
         <a href=\"{url}\">{url}</a>.</p>",
        name = name,
        url = frontend_url
    )
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_validation_email(&self, email: &str, name: &str) -> Result<(), MailError> {
        let message = OutboundMessage {
            from: &self.from,
            to: email,
            subject: "Registro recibido - validación pendiente",
            html: validation_body(name, &self.frontend_url),
        };

        tracing::debug!("Sending validation email via {}", self.api_url);

        let mut request = self.http_client.post(&self.api_url).json(&message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status, body });
        }

        Ok(())
    }
}

/// Mailer used when no relay is configured; only logs the send
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_validation_email(&self, email: &str, name: &str) -> Result<(), MailError> {
        tracing::info!(
            "Mail relay not configured, skipping validation email to {} ({})",
            email,
            name
        );
        Ok(())
    }
}
