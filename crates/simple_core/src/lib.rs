//! Core logic for the SimpleModel service.
//! Persists entities and publishes a change notification after each mutation.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ServiceConfig};
pub use logging::{default_log_level, init_logging, logging_status, EventLog};
pub use model::simple_model::{
    parse_simple_model_id, SimpleModel, SimpleModelId, SimpleModelValidationError,
};
pub use notify::{
    list_outbox, InMemoryTransport, MessageOp, MessageTransport, Notifier, NotifyError,
    NotifyResult, OutboxRecord, PublishedMessage, SimpleProducer, SqliteOutboxTransport,
    SIMPLE_MODEL_TOPIC,
};
pub use repo::simple_repo::{RepoError, RepoResult, SimpleRepository, SqliteSimpleRepository};
pub use service::simple_service::{ServiceError, ServiceResult, SimpleService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
