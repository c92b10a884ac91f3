//! Source producer contract and in-process registry.
//!
//! # Responsibility
//! - Define how an external source hands a partial daily record to core.
//! - Keep producers addressable by a stable id for config and reporting.
//!
//! # Invariants
//! - Source ids are lowercase `[a-z0-9_-]` and unique per registry.
//! - A failing producer yields an error, never a partially filled update.

use crate::model::daily::PartialDailyStats;
use crate::model::keys::DayKey;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

pub type SourceResult<T> = Result<T, SourceError>;

/// Failure reported by a source producer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The source cannot be used right now (permissions, missing token).
    #[error("source `{source_id}` unavailable: {message}")]
    Unavailable { source_id: String, message: String },
    /// The source was reachable but fetching failed.
    #[error("source `{source_id}` fetch failed: {message}")]
    Fetch { source_id: String, message: String },
}

impl SourceError {
    pub fn unavailable(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    pub fn fetch(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            source_id: source_id.into(),
            message: message.into(),
        }
    }
}

/// Failure reported by an external API client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ClientError(pub String);

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Produces category entries for one date from an external source.
#[async_trait]
pub trait SourceProducer: Send + Sync {
    /// Stable id, e.g. `apple_health` or `discord`.
    fn source_id(&self) -> &str;

    /// Fetches every entry the source has for `date`.
    async fn produce(&self, date: DayKey) -> SourceResult<PartialDailyStats>;
}

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceRegistryError {
    #[error("source id is invalid: {0}")]
    InvalidSourceId(String),
    #[error("source id already registered: {0}")]
    DuplicateSourceId(String),
}

/// Runtime registry of source producers, ordered by id.
#[derive(Default)]
pub struct SourceRegistry {
    producers: BTreeMap<String, Arc<dyn SourceProducer>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        producer: Arc<dyn SourceProducer>,
    ) -> Result<(), SourceRegistryError> {
        let source_id = producer.source_id().trim().to_string();
        if !is_valid_source_id(&source_id) {
            return Err(SourceRegistryError::InvalidSourceId(source_id));
        }
        if self.producers.contains_key(source_id.as_str()) {
            return Err(SourceRegistryError::DuplicateSourceId(source_id));
        }

        self.producers.insert(source_id, producer);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Returns sorted source ids.
    pub fn source_ids(&self) -> Vec<String> {
        self.producers.keys().cloned().collect()
    }

    pub fn get(&self, source_id: &str) -> Option<Arc<dyn SourceProducer>> {
        self.producers.get(source_id.trim()).cloned()
    }

    /// Iterates producers in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn SourceProducer>)> {
        self.producers.iter().map(|(id, producer)| (id.as_str(), producer))
    }
}

fn is_valid_source_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::{SourceError, SourceProducer, SourceRegistry, SourceRegistryError, SourceResult};
    use crate::model::daily::PartialDailyStats;
    use crate::model::keys::DayKey;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StubSource(&'static str);

    #[async_trait]
    impl SourceProducer for StubSource {
        fn source_id(&self) -> &str {
            self.0
        }

        async fn produce(&self, _date: DayKey) -> SourceResult<PartialDailyStats> {
            Err(SourceError::unavailable(self.0, "stub"))
        }
    }

    #[test]
    fn registers_sources_in_sorted_order() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StubSource("discord"))).unwrap();
        registry.register(Arc::new(StubSource("apple_health"))).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.source_ids(), vec!["apple_health", "discord"]);
        assert!(registry.get(" discord ").is_some());
    }

    #[test]
    fn rejects_invalid_or_duplicate_source_id() {
        let mut registry = SourceRegistry::new();
        assert!(matches!(
            registry.register(Arc::new(StubSource("Apple Health"))),
            Err(SourceRegistryError::InvalidSourceId(_))
        ));
        assert!(matches!(
            registry.register(Arc::new(StubSource("   "))),
            Err(SourceRegistryError::InvalidSourceId(_))
        ));

        registry.register(Arc::new(StubSource("discord"))).unwrap();
        assert!(matches!(
            registry.register(Arc::new(StubSource("discord"))),
            Err(SourceRegistryError::DuplicateSourceId(_))
        ));
    }
}
