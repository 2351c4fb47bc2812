//! Form state for the newsletter and contact forms.
//!
//! Each form holds its field values, a submit-in-progress flag, and the last
//! user-facing notice. Submission is split into `begin_submit` (local
//! validation, no I/O) and `finish_submit` (apply the webhook outcome) so an
//! event loop can run the request elsewhere; `submit` does both in one call.

use avagenc_forms::{ContactRequest, WebhookClient, validate_email};
use avagenc_shared::{AvagencError, Result};
use tracing::warn;

pub const SUBSCRIBE_SUCCESS: &str = "Subscription successful!";
pub const SUBSCRIBE_FAILED: &str = "Failed to subscribe. Please try again.";
pub const CONTACT_SUCCESS: &str = "Thank you! We'll get back to you within 24 hours.";
pub const CONTACT_FAILED: &str = "Could not send your message. Please try again later.";

/// Feedback shown under a form after a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(s) | Self::Error(s) => s,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Validation errors carry their own user-facing text; everything else
/// collapses into `generic`.
fn failure_notice(err: &AvagencError, generic: &str) -> Notice {
    match err {
        AvagencError::Validation { message } => Notice::Error(message.clone()),
        other => {
            warn!(error = %other, "form submission failed");
            Notice::Error(generic.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Newsletter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SubscribeForm {
    pub email: String,
    submitting: bool,
    notice: Option<Notice>,
}

impl SubscribeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Validate the field. Returns the address to send, or `None` when the
    /// form is already submitting or the address is malformed (a notice is set).
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.submitting {
            return None;
        }
        match validate_email(&self.email) {
            Ok(email) => {
                let email = email.to_string();
                self.notice = None;
                self.submitting = true;
                Some(email)
            }
            Err(e) => {
                self.notice = Some(failure_notice(&e, SUBSCRIBE_FAILED));
                None
            }
        }
    }

    /// Apply the webhook outcome. Success clears the field.
    pub fn finish_submit(&mut self, result: Result<()>) {
        self.submitting = false;
        self.notice = Some(match result {
            Ok(()) => {
                self.email.clear();
                Notice::Success(SUBSCRIBE_SUCCESS.to_string())
            }
            Err(e) => failure_notice(&e, SUBSCRIBE_FAILED),
        });
    }

    /// Validate and send in one step.
    pub async fn submit(&mut self, client: &WebhookClient) -> Option<&Notice> {
        if let Some(email) = self.begin_submit() {
            let result = client.subscribe(&email).await;
            self.finish_submit(result);
        }
        self.notice.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub fields: ContactRequest,
    submitting: bool,
    notice: Option<Notice>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Validate every field. Returns the trimmed request to send.
    pub fn begin_submit(&mut self) -> Option<ContactRequest> {
        if self.submitting {
            return None;
        }
        match self.fields.validated() {
            Ok(request) => {
                self.notice = None;
                self.submitting = true;
                Some(request)
            }
            Err(e) => {
                self.notice = Some(failure_notice(&e, CONTACT_FAILED));
                None
            }
        }
    }

    /// Apply the webhook outcome. Success resets every field.
    pub fn finish_submit(&mut self, result: Result<()>) {
        self.submitting = false;
        self.notice = Some(match result {
            Ok(()) => {
                self.fields = ContactRequest::default();
                Notice::Success(CONTACT_SUCCESS.to_string())
            }
            Err(e) => failure_notice(&e, CONTACT_FAILED),
        });
    }

    pub async fn submit(&mut self, client: &WebhookClient) -> Option<&Notice> {
        if let Some(request) = self.begin_submit() {
            let result = client.submit_contact(&request).await;
            self.finish_submit(result);
        }
        self.notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avagenc_shared::WebhookConfig;
    use url::Url;

    fn client_for(server: &wiremock::MockServer) -> WebhookClient {
        WebhookClient::new(&WebhookConfig {
            newsletter_url: Url::parse(&format!("{}/newsletter", server.uri())).unwrap(),
            contact_url: Some(Url::parse(&format!("{}/contact", server.uri())).unwrap()),
            timeout: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn successful_subscribe_clears_field() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/newsletter"))
            .and(wiremock::matchers::body_json(serde_json::json!({ "email": "a@b.co" })))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut form = SubscribeForm::new();
        form.email = " a@b.co ".into();
        let notice = form.submit(&client_for(&server)).await.cloned();

        assert_eq!(notice, Some(Notice::Success(SUBSCRIBE_SUCCESS.into())));
        assert!(form.email.is_empty());
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn invalid_email_makes_no_request() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::any())
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for bad in ["not-an-email", "a@b", "@b.co"] {
            let mut form = SubscribeForm::new();
            form.email = bad.into();
            let notice = form.submit(&client).await.cloned();
            assert_eq!(
                notice,
                Some(Notice::Error("Please enter a valid email address.".into()))
            );
            assert_eq!(form.email, bad, "field is kept for correction");
        }
    }

    #[tokio::test]
    async fn webhook_failure_shows_generic_message() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut form = SubscribeForm::new();
        form.email = "a@b.co".into();
        let notice = form.submit(&client_for(&server)).await.cloned();

        assert_eq!(notice, Some(Notice::Error(SUBSCRIBE_FAILED.into())));
        assert_eq!(form.email, "a@b.co");
    }

    #[test]
    fn begin_submit_is_exclusive() {
        let mut form = SubscribeForm::new();
        form.email = "a@b.co".into();
        assert_eq!(form.begin_submit().as_deref(), Some("a@b.co"));
        assert!(form.is_submitting());
        assert!(form.begin_submit().is_none());

        form.finish_submit(Err(AvagencError::Network("timeout".into())));
        assert!(!form.is_submitting());
        assert_eq!(form.notice().map(Notice::text), Some(SUBSCRIBE_FAILED));
    }

    #[tokio::test]
    async fn contact_success_resets_fields() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/contact"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut form = ContactForm::new();
        form.fields.name = "Sari".into();
        form.fields.email = "sari@example.com".into();
        form.fields.message = "Hello".into();

        let notice = form.submit(&client_for(&server)).await.cloned();
        assert!(notice.is_some_and(|n| n.is_success()));
        assert_eq!(form.fields, ContactRequest::default());
    }

    #[test]
    fn contact_validation_message_is_specific() {
        let mut form = ContactForm::new();
        form.fields.email = "sari@example.com".into();
        form.fields.message = "Hello".into();
        assert!(form.begin_submit().is_none());
        assert_eq!(form.notice().map(Notice::text), Some("Please enter your name."));
        assert!(!form.is_submitting());
    }
}
