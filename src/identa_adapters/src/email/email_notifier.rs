use askama::Template;
use identa_core::{
    EmailAddress, EmailClient, Notifier, OutgoingEmail, UserId, VerificationToken,
};
use secrecy::ExposeSecret;

pub const VERIFY_EMAIL_SUBJECT: &str = "Verify your email";
pub const EMAIL_CHANGE_SUBJECT: &str = "Confirm your email change";

pub const VERIFY_EMAIL_TAG: &str = "account-verification";
pub const EMAIL_CHANGE_TAG: &str = "email-change";

const VERIFY_EMAIL_PATH: &str = "/api/users/verify";
const EMAIL_CHANGE_PATH: &str = "/api/users/verify-email-change";

#[derive(Template)]
#[template(path = "verify_email.html")]
struct VerifyEmailHtml<'a> {
    link: &'a str,
}

#[derive(Template)]
#[template(path = "verify_email.txt")]
struct VerifyEmailText<'a> {
    link: &'a str,
}

#[derive(Template)]
#[template(path = "email_change.html")]
struct EmailChangeHtml<'a> {
    link: &'a str,
}

#[derive(Template)]
#[template(path = "email_change.txt")]
struct EmailChangeText<'a> {
    link: &'a str,
}

/// Notifier that renders account emails and hands them to an `EmailClient`.
#[derive(Debug, Clone)]
pub struct EmailNotifier<E> {
    email_client: E,
    app_base_url: String,
}

impl<E: EmailClient> EmailNotifier<E> {
    pub fn new(email_client: E, app_base_url: impl Into<String>) -> Self {
        let app_base_url: String = app_base_url.into();
        Self {
            email_client,
            app_base_url: app_base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn email_client(&self) -> &E {
        &self.email_client
    }

    fn link(&self, path: &str, user_id: &UserId, token: &VerificationToken) -> String {
        format!(
            "{}{}?userId={}&token={}",
            self.app_base_url,
            path,
            user_id,
            token.as_ref().expose_secret()
        )
    }
}

#[async_trait::async_trait]
impl<E: EmailClient> Notifier for EmailNotifier<E> {
    #[tracing::instrument(name = "Sending verification email", skip_all, fields(user_id = %user_id))]
    async fn send_verification_email(
        &self,
        user_id: &UserId,
        to: &EmailAddress,
        token: &VerificationToken,
    ) -> Result<(), String> {
        let link = self.link(VERIFY_EMAIL_PATH, user_id, token);
        let email = OutgoingEmail {
            subject: VERIFY_EMAIL_SUBJECT.to_owned(),
            html_body: VerifyEmailHtml { link: &link }
                .render()
                .map_err(|e| e.to_string())?,
            text_body: VerifyEmailText { link: &link }
                .render()
                .map_err(|e| e.to_string())?,
            tag: VERIFY_EMAIL_TAG,
        };

        self.email_client.send_email(to, &email).await
    }

    #[tracing::instrument(name = "Sending email change confirmation", skip_all, fields(user_id = %user_id))]
    async fn send_email_change_notification(
        &self,
        user_id: &UserId,
        to: &EmailAddress,
        token: &VerificationToken,
    ) -> Result<(), String> {
        let link = self.link(EMAIL_CHANGE_PATH, user_id, token);
        let email = OutgoingEmail {
            subject: EMAIL_CHANGE_SUBJECT.to_owned(),
            html_body: EmailChangeHtml { link: &link }
                .render()
                .map_err(|e| e.to_string())?,
            text_body: EmailChangeText { link: &link }
                .render()
                .map_err(|e| e.to_string())?,
            tag: EMAIL_CHANGE_TAG,
        };

        self.email_client.send_email(to, &email).await
    }
}

#[cfg(test)]
mod tests {
    use crate::email::MockEmailClient;

    use super::*;

    #[tokio::test]
    async fn test_verification_email_links_to_verify_endpoint() {
        let notifier = EmailNotifier::new(MockEmailClient::new(), "https://identa.test/");
        let user_id = UserId::new();
        let to = EmailAddress::create("jane@example.com").unwrap();
        let token = VerificationToken::generate();

        notifier
            .send_verification_email(&user_id, &to, &token)
            .await
            .unwrap();

        let outbox = notifier.email_client().outbox().await;
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].recipient, "jane@example.com");
        assert_eq!(outbox[0].subject, VERIFY_EMAIL_SUBJECT);
        assert_eq!(outbox[0].tag, VERIFY_EMAIL_TAG);
        let link = format!(
            "https://identa.test/api/users/verify?userId={}&token={}",
            user_id,
            token.as_ref().expose_secret()
        );
        assert!(outbox[0].text.contains(&link));
        assert!(outbox[0].content.contains(&link.replace('&', "&amp;")));
    }

    #[tokio::test]
    async fn test_email_change_links_to_change_endpoint() {
        let notifier = EmailNotifier::new(MockEmailClient::new(), "https://identa.test");
        let user_id = UserId::new();
        let to = EmailAddress::create("new@example.com").unwrap();
        let token = VerificationToken::generate();

        notifier
            .send_email_change_notification(&user_id, &to, &token)
            .await
            .unwrap();

        let outbox = notifier.email_client().outbox().await;
        assert_eq!(outbox[0].recipient, "new@example.com");
        assert_eq!(outbox[0].subject, EMAIL_CHANGE_SUBJECT);
        assert_eq!(outbox[0].tag, EMAIL_CHANGE_TAG);
        let link = format!(
            "https://identa.test/api/users/verify-email-change?userId={}&token={}",
            user_id,
            token.as_ref().expose_secret()
        );
        assert!(outbox[0].text.contains(&link));
        assert!(!outbox[0].text.contains('<'));
        assert!(outbox[0].content.contains(&link.replace('&', "&amp;")));
    }
}
