//! Organization records and the opaque directory surface.
//!
//! The production organization directory lives in the document store and is
//! an external collaborator; the service only needs a narrow read/update
//! surface for name lookups and the two name-maintenance endpoints.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;
use crate::models::request::validate_object_id;

/// A single organization record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub nickname: String,
}

/// Body for `POST /org/nickname`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrgNicknameRequest {
    #[validate(custom(function = "validate_object_id"))]
    pub org: String,
    /// The organization's nickname, at least 2 characters.
    #[validate(length(min = 2))]
    pub nickname: String,
}

/// Body for `POST /org/name`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrgNameRequest {
    #[validate(custom(function = "validate_object_id"))]
    pub org: String,
    /// The organization's official name, at least 4 characters.
    #[validate(length(min = 4))]
    pub name: String,
}

/// Read/update surface over the organization collection.
#[async_trait]
pub trait OrgDirectory: Send + Sync {
    /// Display name of the organization, if it exists.
    async fn org_name(&self, org: &str) -> Result<Option<String>, AppError>;

    async fn update_nickname(&self, org: &str, nickname: &str) -> Result<Organization, AppError>;

    async fn update_name(&self, org: &str, name: &str) -> Result<Organization, AppError>;
}

/// In-memory organization directory used in tests and single-process
/// deployments without a document store.
#[derive(Default)]
pub struct MemoryOrgDirectory {
    orgs: RwLock<HashMap<String, Organization>>,
}

impl MemoryOrgDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orgs(orgs: impl IntoIterator<Item = Organization>) -> Self {
        let map = orgs
            .into_iter()
            .map(|org| (org.id.clone(), org))
            .collect();
        Self {
            orgs: RwLock::new(map),
        }
    }
}

#[async_trait]
impl OrgDirectory for MemoryOrgDirectory {
    async fn org_name(&self, org: &str) -> Result<Option<String>, AppError> {
        Ok(self.orgs.read().await.get(org).map(|o| o.name.clone()))
    }

    async fn update_nickname(&self, org: &str, nickname: &str) -> Result<Organization, AppError> {
        let mut orgs = self.orgs.write().await;
        let record = orgs
            .get_mut(org)
            .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", org)))?;
        record.nickname = nickname.to_string();
        Ok(record.clone())
    }

    async fn update_name(&self, org: &str, name: &str) -> Result<Organization, AppError> {
        let mut orgs = self.orgs.write().await;
        let record = orgs
            .get_mut(org)
            .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", org)))?;
        record.name = name.to_string();
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorMetadata;

    fn sample_org() -> Organization {
        Organization {
            id: "5c10bdf47b43650f407de7d6".to_string(),
            name: "仁愛護理之家".to_string(),
            nickname: "仁愛".to_string(),
        }
    }

    #[tokio::test]
    async fn updates_nickname_in_place() {
        let directory = MemoryOrgDirectory::with_orgs([sample_org()]);
        let updated = directory
            .update_nickname("5c10bdf47b43650f407de7d6", "仁愛之家")
            .await
            .unwrap();
        assert_eq!(updated.nickname, "仁愛之家");
        assert_eq!(updated.name, "仁愛護理之家");
    }

    #[tokio::test]
    async fn update_of_missing_org_is_not_found() {
        let directory = MemoryOrgDirectory::new();
        let err = directory
            .update_name("5c10bdf47b43650f407de7d6", "新名稱機構")
            .await
            .unwrap_err();
        assert_eq!(err.http_status_code(), 404);
    }

    #[tokio::test]
    async fn org_name_lookup() {
        let directory = MemoryOrgDirectory::with_orgs([sample_org()]);
        assert_eq!(
            directory
                .org_name("5c10bdf47b43650f407de7d6")
                .await
                .unwrap()
                .as_deref(),
            Some("仁愛護理之家")
        );
        assert!(directory.org_name("missing").await.unwrap().is_none());
    }

    #[test]
    fn nickname_request_enforces_min_length() {
        let request = UpdateOrgNicknameRequest {
            org: "5c10bdf47b43650f407de7d6".to_string(),
            nickname: "x".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn name_request_enforces_min_length() {
        let request = UpdateOrgNameRequest {
            org: "5c10bdf47b43650f407de7d6".to_string(),
            name: "abc".to_string(),
        };
        assert!(request.validate().is_err());
        let request = UpdateOrgNameRequest {
            org: "5c10bdf47b43650f407de7d6".to_string(),
            name: "abcd".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
