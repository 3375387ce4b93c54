// Contact form handling.
// Validates submissions and forwards them by SMTP to the site owner.

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::config::MailConfig;
use crate::error::{FolioError, Result};

pub const MISSING_FIELDS: &str = "All fields are required.";
pub const SEND_FAILED: &str = "There was an error sending your message. Please try again later.";
pub const SENT: &str = "Your message has been sent successfully!";

/// Form body posted to `/contact`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty() && !self.message.is_empty()
    }
}

/// Where a submission ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Empty,
    ValidationError,
    TransportError,
    Sent,
}

/// Everything the contact page needs to render.
#[derive(Debug, Clone)]
pub struct ContactView {
    pub outcome: ContactOutcome,
    pub form: ContactForm,
}

impl ContactView {
    /// Blank form for a GET request.
    pub fn empty() -> Self {
        Self {
            outcome: ContactOutcome::Empty,
            form: ContactForm::default(),
        }
    }

    pub fn success(&self) -> Option<&'static str> {
        (self.outcome == ContactOutcome::Sent).then_some(SENT)
    }

    pub fn error(&self) -> Option<&'static str> {
        match self.outcome {
            ContactOutcome::ValidationError => Some(MISSING_FIELDS),
            ContactOutcome::TransportError => Some(SEND_FAILED),
            _ => None,
        }
    }
}

/// Outbound mail transport for contact submissions.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, form: &ContactForm) -> Result<()>;
}

/// Validate a submission and send it.
///
/// Entered values are kept on failure so the visitor can retry; the form is
/// cleared once the message is sent.
pub async fn submit(form: ContactForm, mailer: &dyn Mailer) -> ContactView {
    if !form.is_complete() {
        warn!("contact form submission failed: missing fields");
        return ContactView {
            outcome: ContactOutcome::ValidationError,
            form,
        };
    }

    match mailer.send(&form).await {
        Ok(()) => {
            info!(from = %form.email, "contact email sent");
            ContactView {
                outcome: ContactOutcome::Sent,
                form: ContactForm::default(),
            }
        }
        Err(err) => {
            error!(error = %err, "error sending contact email");
            ContactView {
                outcome: ContactOutcome::TransportError,
                form,
            }
        }
    }
}

/// Sends through the SMTP server from `mail.config.json`.
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Build the outgoing message, addressed from the visitor to the site owner.
    pub fn build_message(&self, form: &ContactForm) -> Result<Message> {
        let from = Mailbox::new(
            Some(form.name.trim().to_string()),
            form.email
                .trim()
                .parse()
                .map_err(|e| FolioError::Mail(format!("invalid sender address: {e}")))?,
        );
        let to: Mailbox = self
            .config
            .recipient_email
            .parse()
            .map_err(|e| FolioError::Mail(format!("invalid recipient address: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(format!("New contact form submission from {}", form.name.trim()))
            .header(ContentType::TEXT_PLAIN)
            .body(form.message.clone())
            .map_err(|e| FolioError::Mail(e.to_string()))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let tls = TlsParameters::new(self.config.host.clone())
            .map_err(|e| FolioError::Mail(e.to_string()))?;
        // `secure` means TLS from the first byte (usually port 465); otherwise upgrade with STARTTLS when offered.
        let tls = if self.config.secure {
            Tls::Wrapper(tls)
        } else {
            Tls::Opportunistic(tls)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.host)
            .tls(tls)
            .credentials(Credentials::new(
                self.config.auth.user.clone(),
                self.config.auth.pass.clone(),
            ));
        if self.config.port != 0 {
            builder = builder.port(self.config.port);
        }
        Ok(builder.build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, form: &ContactForm) -> Result<()> {
        let message = self.build_message(form)?;
        self.transport()?
            .send(message)
            .await
            .map_err(|e| FolioError::Mail(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailAuth;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingMailer {
        sent: AtomicUsize,
        fail: bool,
    }

    impl CountingMailer {
        fn new(fail: bool) -> Self {
            Self {
                sent: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl Mailer for CountingMailer {
        async fn send(&self, _form: &ContactForm) -> Result<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(FolioError::Mail("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_field_never_sends() {
        let mailer = CountingMailer::new(false);
        for blank in [
            form("", "a@b.c", "hi"),
            form("Ann", "", "hi"),
            form("Ann", "a@b.c", ""),
        ] {
            let view = submit(blank.clone(), &mailer).await;
            assert_eq!(view.outcome, ContactOutcome::ValidationError);
            assert_eq!(view.error(), Some(MISSING_FIELDS));
            assert_eq!(view.form.name, blank.name);
        }
        assert_eq!(mailer.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_whitespace_counts_as_filled() {
        let mailer = CountingMailer::new(false);
        let view = submit(form("Ann", "ann@example.com", "   "), &mailer).await;
        assert_eq!(view.outcome, ContactOutcome::Sent);
        assert_eq!(mailer.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_clears_form() {
        let mailer = CountingMailer::new(false);
        let view = submit(form("Ann", "ann@example.com", "Hello"), &mailer).await;
        assert_eq!(view.outcome, ContactOutcome::Sent);
        assert_eq!(view.success(), Some(SENT));
        assert!(view.form.name.is_empty());
        assert_eq!(mailer.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_values() {
        let mailer = CountingMailer::new(true);
        let view = submit(form("Ann", "ann@example.com", "Hello"), &mailer).await;
        assert_eq!(view.outcome, ContactOutcome::TransportError);
        assert_eq!(view.error(), Some(SEND_FAILED));
        assert_eq!(view.form.message, "Hello");
    }

    fn smtp() -> SmtpMailer {
        SmtpMailer::new(MailConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            secure: false,
            auth: MailAuth {
                user: "me@example.com".to_string(),
                pass: "secret".to_string(),
            },
            recipient_email: "owner@example.com".to_string(),
        })
    }

    #[test]
    fn test_build_message_headers() {
        let message = smtp()
            .build_message(&form("Ann Lee", "ann@example.com", "Hello there"))
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Ann Lee"));
        assert!(raw.contains("<ann@example.com>"));
        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("Subject: New contact form submission from Ann Lee"));
    }

    #[test]
    fn test_build_message_rejects_bad_sender() {
        let err = smtp()
            .build_message(&form("Ann", "not an address", "hi"))
            .unwrap_err();
        assert!(matches!(err, FolioError::Mail(_)));
    }
}
