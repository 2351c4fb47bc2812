//! Outbound form submissions: newsletter subscribe and contact requests.
//!
//! Both forms validate locally first and only then issue a single JSON
//! `POST` to a configured webhook. There is no retry and no queuing; any
//! non-2xx status or transport failure is reported as a network error.

mod validate;

use std::time::Duration;

use avagenc_shared::{AvagencError, Result, WebhookConfig};
use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument, warn};
use url::Url;

pub use validate::{is_valid_email, validate_email};

/// User-Agent string for webhook requests.
const USER_AGENT: &str = concat!("Avagenc/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Body of the newsletter webhook call.
#[derive(Debug, Serialize)]
struct SubscribeBody<'a> {
    email: &'a str,
}

/// A contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub company: String,
    pub message: String,
}

impl ContactRequest {
    /// Trim every field and check the required ones.
    pub fn validated(&self) -> Result<Self> {
        let req = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: self.company.trim().to_string(),
            message: self.message.trim().to_string(),
        };

        if req.name.is_empty() {
            return Err(AvagencError::validation("Please enter your name."));
        }
        validate_email(&req.email)?;
        if req.message.is_empty() {
            return Err(AvagencError::validation("Please enter a message."));
        }
        Ok(req)
    }
}

// ---------------------------------------------------------------------------
// WebhookClient
// ---------------------------------------------------------------------------

/// Posts validated form payloads to the configured webhooks.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    newsletter_url: Url,
    contact_url: Option<Url>,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            newsletter_url: config.newsletter_url.clone(),
            contact_url: config.contact_url.clone(),
        })
    }

    /// Subscribe an email address to the newsletter.
    ///
    /// The address is trimmed and validated first; a malformed address
    /// fails with a validation error and no request is sent.
    #[instrument(skip_all)]
    pub async fn subscribe(&self, email: &str) -> Result<()> {
        let email = validate_email(email)?;
        post_json(&self.client, &self.newsletter_url, &SubscribeBody { email }).await?;
        info!("newsletter subscription accepted");
        Ok(())
    }

    /// Submit a contact request.
    #[instrument(skip_all)]
    pub async fn submit_contact(&self, request: &ContactRequest) -> Result<()> {
        let request = request.validated()?;
        let url = self
            .contact_url
            .as_ref()
            .ok_or_else(|| AvagencError::config("webhooks.contact_url is not configured"))?;
        post_json(&self.client, url, &request).await?;
        info!("contact request accepted");
        Ok(())
    }
}

async fn post_json<T: Serialize + ?Sized>(client: &Client, url: &Url, body: &T) -> Result<()> {
    let response = client
        .post(url.as_str())
        .json(body)
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "webhook request failed");
            AvagencError::Network(format!("{url}: {e}"))
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!(%status, "webhook rejected request");
        return Err(AvagencError::Network(format!("{url}: HTTP {status}")));
    }
    Ok(())
}

fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AvagencError::Network(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &wiremock::MockServer) -> WebhookClient {
        let config = WebhookConfig {
            newsletter_url: Url::parse(&format!("{}/webhook/newsletter", server.uri())).unwrap(),
            contact_url: Some(Url::parse(&format!("{}/webhook/contact", server.uri())).unwrap()),
            timeout: None,
        };
        WebhookClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn subscribe_posts_trimmed_email_as_json() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/webhook/newsletter"))
            .and(wiremock::matchers::header("content-type", "application/json"))
            .and(wiremock::matchers::body_json(serde_json::json!({ "email": "a@b.co" })))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).subscribe("  a@b.co ").await.unwrap();
    }

    #[tokio::test]
    async fn invalid_email_sends_nothing() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::any())
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for bad in ["not-an-email", "a@b", "@b.co", ""] {
            let err = client.subscribe(bad).await.unwrap_err();
            assert!(err.is_validation(), "{bad} should fail validation");
        }
    }

    #[tokio::test]
    async fn non_ok_status_is_network_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).subscribe("a@b.co").await.unwrap_err();
        assert!(matches!(err, AvagencError::Network(_)));
    }

    #[tokio::test]
    async fn unreachable_webhook_is_network_error() {
        let config = WebhookConfig {
            newsletter_url: Url::parse("http://127.0.0.1:9/webhook").unwrap(),
            contact_url: None,
            timeout: Some(Duration::from_secs(2)),
        };
        let err = WebhookClient::new(&config)
            .unwrap()
            .subscribe("a@b.co")
            .await
            .unwrap_err();
        assert!(matches!(err, AvagencError::Network(_)));
    }

    #[tokio::test]
    async fn contact_posts_all_fields() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/webhook/contact"))
            .and(wiremock::matchers::body_json(serde_json::json!({
                "name": "Sari",
                "email": "sari@example.com",
                "company": "Kopi Co",
                "message": "We need an invoice bot."
            })))
            .respond_with(wiremock::ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let request = ContactRequest {
            name: " Sari ".into(),
            email: "sari@example.com".into(),
            company: "Kopi Co".into(),
            message: "We need an invoice bot.".into(),
        };
        client_for(&server).submit_contact(&request).await.unwrap();
    }

    #[tokio::test]
    async fn contact_without_webhook_is_config_error() {
        let config = WebhookConfig {
            newsletter_url: Url::parse("https://example.com/newsletter").unwrap(),
            contact_url: None,
            timeout: None,
        };
        let request = ContactRequest {
            name: "Sari".into(),
            email: "sari@example.com".into(),
            company: String::new(),
            message: "Hello".into(),
        };
        let err = WebhookClient::new(&config)
            .unwrap()
            .submit_contact(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, AvagencError::Config { .. }));
    }

    #[test]
    fn contact_requires_name_email_and_message() {
        let mut request = ContactRequest {
            name: "Sari".into(),
            email: "sari@example.com".into(),
            company: String::new(),
            message: "Hello".into(),
        };
        assert!(request.validated().is_ok());

        request.message = "   ".into();
        assert!(request.validated().unwrap_err().is_validation());

        request.message = "Hello".into();
        request.email = "sari@example".into();
        assert!(request.validated().unwrap_err().is_validation());

        request.email = "sari@example.com".into();
        request.name.clear();
        assert!(request.validated().unwrap_err().is_validation());
    }
}
