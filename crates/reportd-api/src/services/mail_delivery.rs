//! Mail delivery of generated report artifacts.
//!
//! Each delivery constructs its own sender, walks the full
//! connect/write/attach/send/quit cycle, and maps transport failures onto
//! the platform error taxonomy. The caller decides whether a failure is
//! fatal (mail is the only sink) or merely logged (inline delivery also
//! requested).

use reportd_core::{AppError, Artifact};
use reportd_mail::MailSender;

use crate::state::MailSettings;

/// Send `artifact` as an attachment to `recipient`.
pub async fn deliver_by_mail(
    settings: &MailSettings,
    recipient: &str,
    subject: &str,
    body: &str,
    file_name: &str,
    artifact: &Artifact,
) -> Result<(), AppError> {
    let mut sender = MailSender::with_timeout(
        settings.account.clone(),
        settings.password.clone(),
        &settings.host,
        settings.port,
        settings.send_timeout,
    )
    .map_err(|e| AppError::Mailing(e.to_string()))?;

    sender
        .connect()
        .await
        .map_err(|e| AppError::Mailing(e.to_string()))?;
    sender.write(recipient, subject, body);
    sender
        .attach(artifact.bytes.clone(), file_name, artifact.kind.tag())
        .map_err(|e| AppError::Mailing(e.to_string()))?;

    let sent = sender.send().await;
    // Release the connection even when the send failed.
    if let Err(e) = sender.quit() {
        tracing::warn!(error = %e, "Failed to release SMTP connection");
    }
    sent.map_err(|e| AppError::Mailing(e.to_string()))?;

    tracing::info!(recipient = %recipient, file_name = %file_name, "Report mailed");
    Ok(())
}
