//! Outbound email. Messages are composed here; delivery sits behind [`Mailer`].

use async_trait::async_trait;
use configs::SmtpSettings;
use thiserror::Error;
use tracing::info;

/// Content id the HTML body uses to reference the embedded logo.
pub const LOGO_CID: &str = "logo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    /// Path of the inline image attached under [`LOGO_CID`].
    pub logo_path: Option<String>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),
    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the status email sent alongside a notification.
pub fn compose(settings: &SmtpSettings, to: &str, subject: &str, message: &str) -> EmailMessage {
    let html_body = format!(
        "<html><body>\
         <img src=\"cid:{LOGO_CID}\" alt=\"Prestar\" style=\"max-height:64px\"/>\
         <h2>{}</h2><p>{}</p>\
         </body></html>",
        escape_html(subject),
        escape_html(message),
    );
    EmailMessage {
        from: settings.from_address.clone(),
        to: to.to_string(),
        subject: subject.to_string(),
        html_body,
        logo_path: Some(settings.logo_path.clone()).filter(|p| !p.is_empty()),
    }
}

/// Mailer that records the composed message in the log instead of talking SMTP.
#[derive(Debug, Clone, Default)]
pub struct TracingMailer {
    pub smtp_host: String,
}

impl TracingMailer {
    pub fn from_settings(settings: &SmtpSettings) -> Self {
        Self { smtp_host: settings.host.clone() }
    }
}

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if !message.to.contains('@') {
            return Err(MailError::InvalidRecipient(message.to));
        }
        info!(smtp_host = %self.smtp_host, to = %message.to, subject = %message.subject, bytes = message.html_body.len(), "email_dispatched");
        Ok(())
    }
}

/// Recording mailer for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<EmailMessage>>,
        pub fail: bool,
    }

    impl RecordingMailer {
        pub fn failing() -> Self { Self { sent: Mutex::default(), fail: true } }

        pub fn sent(&self) -> Vec<EmailMessage> { self.sent.lock().unwrap().clone() }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Transport("connection refused".into()));
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".into(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: "no-reply@prestar.pt".into(),
            logo_path: "assets/logo.png".into(),
        }
    }

    #[test]
    fn compose_embeds_logo_and_escapes() {
        let msg = compose(&settings(), "ana@example.com", "Requisição aceite", "<b>ok</b> & done");
        assert!(msg.html_body.contains("cid:logo"));
        assert!(msg.html_body.contains("&lt;b&gt;ok&lt;/b&gt; &amp; done"));
        assert_eq!(msg.from, "no-reply@prestar.pt");
        assert_eq!(msg.logo_path.as_deref(), Some("assets/logo.png"));
    }

    #[tokio::test]
    async fn tracing_mailer_rejects_bad_recipient() {
        let mailer = TracingMailer::from_settings(&settings());
        let msg = compose(&settings(), "not-an-address", "s", "m");
        assert!(matches!(mailer.send(msg).await, Err(MailError::InvalidRecipient(_))));
    }

    #[tokio::test]
    async fn recording_mailer_keeps_messages() {
        let mailer = mock::RecordingMailer::default();
        mailer.send(compose(&settings(), "a@b.pt", "s", "m")).await.unwrap();
        assert_eq!(mailer.sent().len(), 1);
    }
}
