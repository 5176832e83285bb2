//! Generator registration table.
//!
//! Generators are pluggable collaborators: each one turns an organization
//! id and a half-open `[start, end_exclusive)` date window into a binary
//! artifact. The registry is populated by explicit registration at process
//! start; the dispatcher resolves report ids through it at request time.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reportd_core::Artifact;

/// Failure kinds a generator may signal. Anything that is not an empty
/// data set or a frequency mismatch is a generic generation failure.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("report has no valid data: {0}")]
    Empty(String),

    #[error("unsupported report frequency: {0}")]
    Frequency(String),

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// A pluggable report generator.
///
/// `end_exclusive` is the day after the requested end date; the dispatcher
/// applies the `+1 day` uniformly so implementations can use half-open
/// windows throughout.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(
        &self,
        org: &str,
        start: NaiveDate,
        end_exclusive: NaiveDate,
        suffix: Option<&str>,
    ) -> Result<Artifact, GenerateError>;
}

/// Immutable id → generator table.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: HashMap<String, Arc<dyn ReportGenerator>>,
}

impl GeneratorRegistry {
    pub fn builder() -> GeneratorRegistryBuilder {
        GeneratorRegistryBuilder::default()
    }

    pub fn resolve(&self, id: &str) -> Option<Arc<dyn ReportGenerator>> {
        self.generators.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.generators.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

#[derive(Default)]
pub struct GeneratorRegistryBuilder {
    generators: HashMap<String, Arc<dyn ReportGenerator>>,
}

impl GeneratorRegistryBuilder {
    /// Register a generator under a report id. Registering the same id
    /// twice replaces the earlier generator and logs a warning.
    pub fn register(
        mut self,
        id: impl Into<String>,
        generator: Arc<dyn ReportGenerator>,
    ) -> Self {
        let id = id.into();
        if self.generators.insert(id.clone(), generator).is_some() {
            tracing::warn!(report = %id, "Generator registered twice; keeping the later one");
        }
        self
    }

    pub fn build(self) -> GeneratorRegistry {
        GeneratorRegistry {
            generators: self.generators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticGenerator(&'static [u8]);

    #[async_trait]
    impl ReportGenerator for StaticGenerator {
        async fn generate(
            &self,
            _org: &str,
            _start: NaiveDate,
            _end_exclusive: NaiveDate,
            _suffix: Option<&str>,
        ) -> Result<Artifact, GenerateError> {
            Ok(Artifact::excel(self.0.to_vec()))
        }
    }

    #[tokio::test]
    async fn resolves_registered_generator() {
        let registry = GeneratorRegistry::builder()
            .register("host_amount", Arc::new(StaticGenerator(b"xlsx-bytes")))
            .build();
        let generator = registry.resolve("host_amount").expect("registered");
        let artifact = generator
            .generate(
                "5c10bdf47b43650f407de7d6",
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(&artifact.bytes[..], b"xlsx-bytes");
    }

    #[test]
    fn unknown_id_does_not_resolve() {
        let registry = GeneratorRegistry::builder().build();
        assert!(registry.resolve("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn error_kinds_render_their_messages() {
        let empty = GenerateError::Empty("no rows in period".to_string());
        assert_eq!(
            empty.to_string(),
            "report has no valid data: no rows in period"
        );
        let freq = GenerateError::Frequency("monthly report asked weekly".to_string());
        assert!(freq.to_string().contains("unsupported report frequency"));
    }
}
