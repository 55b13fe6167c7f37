use std::sync::Arc;

use identa_core::{EmailAddress, EmailClient, OutgoingEmail};
use secrecy::ExposeSecret;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    /// HTML body.
    pub content: String,
    pub text: String,
    pub tag: &'static str,
}

/// Email client that keeps every message in memory instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    outbox: Arc<RwLock<Vec<SentEmail>>>,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn outbox(&self) -> Vec<SentEmail> {
        self.outbox.read().await.clone()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &EmailAddress,
        email: &OutgoingEmail,
    ) -> Result<(), String> {
        self.outbox.write().await.push(SentEmail {
            recipient: recipient.as_ref().expose_secret().clone(),
            subject: email.subject.clone(),
            content: email.html_body.clone(),
            text: email.text_body.clone(),
            tag: email.tag,
        });
        Ok(())
    }
}
