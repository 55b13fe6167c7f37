use identa_core::{EmailAddress, EmailClient, OutgoingEmail};
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

#[derive(Debug, Error)]
pub enum PostmarkError {
    #[error("Invalid Postmark base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Postmark request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Postmark rejected the message with {status}: {message}")]
    Rejected { status: StatusCode, message: String },
}

/// Postmark reports failures as `{"ErrorCode": .., "Message": ..}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkErrorBody {
    error_code: i64,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    tag: &'a str,
    message_stream: &'a str,
}

/// `EmailClient` backed by the Postmark `/email` endpoint.
pub struct PostmarkEmailClient {
    http_client: Client,
    base_url: String,
    sender: EmailAddress,
    authorization_token: Secret<String>,
}

impl PostmarkEmailClient {
    pub fn new(
        base_url: String,
        sender: EmailAddress,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        }
    }

    fn endpoint(&self) -> Result<Url, PostmarkError> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join("/email"))
            .map_err(|e| PostmarkError::InvalidBaseUrl(e.to_string()))
    }

    /// Delivers one message, surfacing Postmark's own error message when the
    /// API refuses it.
    pub async fn deliver(
        &self,
        recipient: &EmailAddress,
        email: &OutgoingEmail,
    ) -> Result<(), PostmarkError> {
        let request_body = SendEmailRequest {
            from: self.sender.as_ref().expose_secret(),
            to: recipient.as_ref().expose_secret(),
            subject: &email.subject,
            html_body: &email.html_body,
            text_body: &email.text_body,
            tag: email.tag,
            message_stream: MESSAGE_STREAM,
        };

        let response = self
            .http_client
            .post(self.endpoint()?)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = match response.json::<PostmarkErrorBody>().await {
            Ok(body) => format!("{} (code {})", body.message, body.error_code),
            Err(_) => String::from("no error body"),
        };
        Err(PostmarkError::Rejected { status, message })
    }
}

#[async_trait::async_trait]
impl EmailClient for PostmarkEmailClient {
    #[tracing::instrument(name = "Sending email", skip_all, fields(tag = email.tag))]
    async fn send_email(
        &self,
        recipient: &EmailAddress,
        email: &OutgoingEmail,
    ) -> Result<(), String> {
        self.deliver(recipient, email).await.map_err(|e| {
            tracing::warn!(error = %e, "email delivery failed");
            e.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fake::{
        Fake, Faker,
        faker::{
            internet::en::SafeEmail,
            lorem::en::{Paragraph, Sentence},
        },
    };
    use wiremock::{
        Mock, MockServer, Request, ResponseTemplate,
        matchers::{any, body_partial_json, header, header_exists, method, path},
    };

    use super::*;
    use crate::config::test::email_client::{SENDER, TIMEOUT};

    struct SendEmailBodyMatcher;

    impl wiremock::Match for SendEmailBodyMatcher {
        fn matches(&self, request: &Request) -> bool {
            let result: Result<serde_json::Value, _> = serde_json::from_slice(&request.body);
            if let Ok(body) = result {
                body.get("From") == Some(&serde_json::json!(SENDER))
                    && body.get("To").is_some()
                    && body.get("Subject").is_some()
                    && body.get("HtmlBody").is_some()
                    && body.get("TextBody").is_some()
                    && body.get("Tag").is_some()
                    && body.get("MessageStream") == Some(&serde_json::json!("outbound"))
            } else {
                false
            }
        }
    }

    fn outgoing() -> OutgoingEmail {
        let text: String = Paragraph(1..10).fake();
        OutgoingEmail {
            subject: Sentence(1..2).fake(),
            html_body: format!("<p>{text}</p>"),
            text_body: text,
            tag: "account-verification",
        }
    }

    fn email() -> EmailAddress {
        let raw: String = SafeEmail().fake();
        EmailAddress::create(&raw).unwrap()
    }

    fn email_client(base_url: String) -> PostmarkEmailClient {
        let http_client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .unwrap();
        PostmarkEmailClient::new(
            base_url,
            EmailAddress::create(SENDER).unwrap(),
            Secret::new(Faker.fake::<String>()),
            http_client,
        )
    }

    #[tokio::test]
    async fn send_email_sends_the_expected_request() {
        let mock_server = MockServer::start().await;
        let email_client = email_client(mock_server.uri());

        Mock::given(header_exists(POSTMARK_AUTH_HEADER))
            .and(header("Content-Type", "application/json"))
            .and(path("/email"))
            .and(method("POST"))
            .and(SendEmailBodyMatcher)
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = email_client.send_email(&email(), &outgoing()).await;

        assert!(outcome.is_ok());
    }

    #[tokio::test]
    async fn send_email_keeps_text_body_apart_from_html_and_tags_the_message() {
        let mock_server = MockServer::start().await;
        let email_client = email_client(mock_server.uri());
        let outgoing = outgoing();

        Mock::given(path("/email"))
            .and(body_partial_json(serde_json::json!({
                "HtmlBody": outgoing.html_body,
                "TextBody": outgoing.text_body,
                "Tag": "account-verification",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        email_client.deliver(&email(), &outgoing).await.unwrap();
    }

    #[tokio::test]
    async fn send_email_reports_postmark_rejection_message() {
        let mock_server = MockServer::start().await;
        let email_client = email_client(mock_server.uri());

        Mock::given(any())
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "ErrorCode": 300,
                "Message": "Invalid email request",
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let error = email_client
            .deliver(&email(), &outgoing())
            .await
            .unwrap_err();

        match error {
            PostmarkError::Rejected { status, message } => {
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(message, "Invalid email request (code 300)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn send_email_fails_if_the_server_returns_500() {
        let mock_server = MockServer::start().await;
        let email_client = email_client(mock_server.uri());

        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = email_client.deliver(&email(), &outgoing()).await;

        assert!(matches!(
            outcome,
            Err(PostmarkError::Rejected {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn send_email_times_out_if_the_server_takes_too_long() {
        let mock_server = MockServer::start().await;
        let email_client = email_client(mock_server.uri());

        let response = ResponseTemplate::new(200).set_delay(Duration::from_secs(180));
        Mock::given(any())
            .respond_with(response)
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = email_client.deliver(&email(), &outgoing()).await;

        assert!(matches!(outcome, Err(PostmarkError::Transport(_))));
    }

    #[tokio::test]
    async fn send_email_rejects_an_unparseable_base_url() {
        let email_client = email_client("not a url".to_owned());

        let outcome = email_client.deliver(&email(), &outgoing()).await;

        assert!(matches!(outcome, Err(PostmarkError::InvalidBaseUrl(_))));
    }
}
