//! Generated report artifacts.
//!
//! A generator produces an in-memory binary blob tagged as excel or pdf.
//! The tag decides the response content type and the MIME parts used when
//! the artifact is attached to a mail.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Binary type of a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Excel,
    Pdf,
}

impl ArtifactKind {
    /// Full content type for HTTP responses.
    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ArtifactKind::Pdf => "application/pdf",
        }
    }

    /// Fixed `(maintype, subtype)` pair used for mail attachments.
    pub fn mime_parts(&self) -> (&'static str, &'static str) {
        match self {
            ArtifactKind::Excel => (
                "application",
                "vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            ArtifactKind::Pdf => ("application", "pdf"),
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            ArtifactKind::Excel => "xlsx",
            ArtifactKind::Pdf => "pdf",
        }
    }

    /// Lowercase tag as it appears in mail attachment requests.
    pub fn tag(&self) -> &'static str {
        match self {
            ArtifactKind::Excel => "excel",
            ArtifactKind::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// In-memory binary output of a generator invocation.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub bytes: Bytes,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, bytes: impl Into<Bytes>) -> Self {
        Self {
            kind,
            bytes: bytes.into(),
        }
    }

    pub fn excel(bytes: impl Into<Bytes>) -> Self {
        Self::new(ArtifactKind::Excel, bytes)
    }

    pub fn pdf(bytes: impl Into<Bytes>) -> Self {
        Self::new(ArtifactKind::Pdf, bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
