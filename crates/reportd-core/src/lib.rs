//! Reportd Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! shared report helpers (age arithmetic, date normalization) used across
//! all reportd components.

pub mod config;
pub mod error;
pub mod models;
pub mod reporting;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    Artifact, ArtifactKind, MemoryOrgDirectory, OrgDirectory, Organization, ReportRequest,
    UpdateOrgNameRequest, UpdateOrgNicknameRequest,
};
