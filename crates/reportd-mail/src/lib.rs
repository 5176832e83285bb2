//! SMTP mail sender with typed report attachments.
//!
//! The sender is a small state machine over an SMTP transport: it is
//! constructed without performing any I/O, `connect` establishes and
//! verifies the connection, `quit` releases it. Illegal transitions
//! (connecting twice, quitting while disconnected, sending while
//! disconnected) are errors rather than silent recoveries.
//!
//! A sender instance is not shared across concurrent requests; each
//! request that needs mail constructs its own.

use std::time::Duration;

use bytes::Bytes;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use reportd_core::ArtifactKind;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("already connected, no need to connect again")]
    AlreadyConnected,

    #[error("not connected, cannot {0}")]
    NotConnected(&'static str),

    #[error("attachment file type {0} is currently not supported")]
    UnsupportedAttachmentType(String),

    #[error("envelope has no recipient; write the mail before sending")]
    EmptyEnvelope,

    #[error("invalid mail address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    #[error("failed to build mail message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("SMTP server at {0} rejected the connection test")]
    ConnectFailed(String),

    #[error("invalid attachment content type: {0}")]
    ContentType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionState {
    Disconnected,
    Connected,
}

/// A single attachment staged on the current envelope.
#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub file_name: String,
    pub kind: ArtifactKind,
    pub bytes: Bytes,
}

/// The envelope under composition. `write` replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct MailDraft {
    pub to: Option<String>,
    pub subject: String,
    pub body: String,
    pub attachment: Option<MailAttachment>,
}

/// SMTP mail sender.
///
/// The transport authenticates with STARTTLS using the account/password
/// pair; `send` uses the transport's own socket timeout, independent of any
/// request-level ceiling.
pub struct MailSender {
    account: String,
    host: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    state: ConnectionState,
    draft: MailDraft,
}

impl MailSender {
    /// Build a sender for the default provider (`smtp.gmail.com:587`).
    pub fn new(account: impl Into<String>, password: impl Into<String>) -> Result<Self, MailError> {
        Self::with_host(account, password, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT)
    }

    /// Build a sender against an explicit SMTP host and port. Performs no
    /// I/O; call [`connect`](Self::connect) before sending.
    pub fn with_host(
        account: impl Into<String>,
        password: impl Into<String>,
        host: &str,
        port: u16,
    ) -> Result<Self, MailError> {
        Self::with_timeout(account, password, host, port, DEFAULT_SEND_TIMEOUT)
    }

    pub fn with_timeout(
        account: impl Into<String>,
        password: impl Into<String>,
        host: &str,
        port: u16,
        send_timeout: Duration,
    ) -> Result<Self, MailError> {
        let account = account.into();
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(port)
            .credentials(Credentials::new(account.clone(), password.into()))
            .timeout(Some(send_timeout))
            .build();
        Ok(Self {
            account,
            host: host.to_string(),
            transport,
            state: ConnectionState::Disconnected,
            draft: MailDraft::default(),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Establish and verify the SMTP connection. Connecting while already
    /// connected is an error.
    pub async fn connect(&mut self) -> Result<(), MailError> {
        if self.state == ConnectionState::Connected {
            return Err(MailError::AlreadyConnected);
        }
        if !self.transport.test_connection().await? {
            return Err(MailError::ConnectFailed(self.host.clone()));
        }
        self.state = ConnectionState::Connected;
        info!(host = %self.host, "SMTP connection established");
        Ok(())
    }

    /// Release the connection. Quitting while not connected is an error.
    /// Pooled sockets are closed when the transport is dropped.
    pub fn quit(&mut self) -> Result<(), MailError> {
        if self.state == ConnectionState::Disconnected {
            return Err(MailError::NotConnected("quit"));
        }
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    /// Reset the envelope and populate recipient, subject, and body.
    pub fn write(&mut self, to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) {
        self.draft = MailDraft {
            to: Some(to.into()),
            subject: subject.into(),
            body: body.into(),
            attachment: None,
        };
    }

    /// Attach a binary blob of the given file type (`excel` or `pdf`) to
    /// the current envelope. Unknown types are rejected.
    pub fn attach(
        &mut self,
        blob: impl Into<Bytes>,
        file_name: impl Into<String>,
        file_type: &str,
    ) -> Result<(), MailError> {
        let kind = match file_type {
            "excel" => ArtifactKind::Excel,
            "pdf" => ArtifactKind::Pdf,
            other => return Err(MailError::UnsupportedAttachmentType(other.to_string())),
        };
        self.draft.attachment = Some(MailAttachment {
            file_name: file_name.into(),
            kind,
            bytes: blob.into(),
        });
        Ok(())
    }

    /// The envelope under composition.
    pub fn draft(&self) -> &MailDraft {
        &self.draft
    }

    /// Transmit the current envelope.
    pub async fn send(&self) -> Result<(), MailError> {
        if self.state == ConnectionState::Disconnected {
            return Err(MailError::NotConnected("send"));
        }
        let to = self.draft.to.as_deref().ok_or(MailError::EmptyEnvelope)?;
        let from: Mailbox = self.account.parse()?;
        let to: Mailbox = to.parse()?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(self.draft.subject.clone());
        let message = match &self.draft.attachment {
            Some(attachment) => {
                let (maintype, subtype) = attachment.kind.mime_parts();
                let content_type = ContentType::parse(&format!("{}/{}", maintype, subtype))
                    .map_err(|e| MailError::ContentType(e.to_string()))?;
                let part = Attachment::new(attachment.file_name.clone())
                    .body(Body::new(attachment.bytes.to_vec()), content_type);
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(self.draft.body.clone()))
                        .singlepart(part),
                )?
            }
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(self.draft.body.clone())?,
        };

        self.transport.send(message).await?;
        info!(host = %self.host, "Mail sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> MailSender {
        MailSender::new("reports@example.com", "app-password").unwrap()
    }

    #[test]
    fn constructor_does_not_connect() {
        let sender = sender();
        assert!(!sender.is_connected());
    }

    #[test]
    fn quit_while_disconnected_is_an_error() {
        let mut sender = sender();
        let err = sender.quit().unwrap_err();
        assert!(matches!(err, MailError::NotConnected("quit")));
    }

    #[tokio::test]
    async fn send_while_disconnected_is_an_error() {
        let mut sender = sender();
        sender.write("nurse@example.com", "Report", "attached");
        let err = sender.send().await.unwrap_err();
        assert!(matches!(err, MailError::NotConnected("send")));
    }

    #[test]
    fn write_resets_the_envelope() {
        let mut sender = sender();
        sender.write("a@example.com", "first", "body one");
        sender.attach(vec![1u8, 2, 3], "report.xlsx", "excel").unwrap();
        sender.write("b@example.com", "second", "body two");

        let draft = sender.draft();
        assert_eq!(draft.to.as_deref(), Some("b@example.com"));
        assert_eq!(draft.subject, "second");
        assert!(draft.attachment.is_none());
    }

    #[test]
    fn attach_maps_excel_to_fixed_mime_parts() {
        let mut sender = sender();
        sender.write("a@example.com", "subject", "body");
        sender.attach(vec![0u8; 4], "x.xlsx", "excel").unwrap();

        let attachment = sender.draft().attachment.as_ref().unwrap();
        assert_eq!(
            attachment.kind.mime_parts(),
            (
                "application",
                "vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            )
        );
        assert_eq!(attachment.file_name, "x.xlsx");
    }

    #[test]
    fn attach_rejects_unknown_file_type() {
        let mut sender = sender();
        sender.write("a@example.com", "subject", "body");
        let err = sender.attach(vec![0u8; 4], "x.bin", "zip").unwrap_err();
        assert_eq!(
            err.to_string(),
            "attachment file type zip is currently not supported"
        );
    }

    #[test]
    fn attach_accepts_pdf() {
        let mut sender = sender();
        sender.write("a@example.com", "subject", "body");
        sender.attach(vec![0u8; 4], "x.pdf", "pdf").unwrap();
        let attachment = sender.draft().attachment.as_ref().unwrap();
        assert_eq!(attachment.kind.mime_parts(), ("application", "pdf"));
    }
}
