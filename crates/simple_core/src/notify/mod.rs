//! Change notification publishing.
//!
//! # Responsibility
//! - Serialize post-mutation entity state and hand it to a message transport.
//! - Keep transport details (in-memory, SQLite outbox) behind one trait.
//!
//! # Invariants
//! - Every message targets a single fixed topic per producer.
//! - The message key is the entity id's hyphenated string form.
//! - A `None` payload is a tombstone: the keyed entity was deleted.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod producer;
pub mod transport;

pub use producer::{Notifier, SimpleProducer, SIMPLE_MODEL_TOPIC};
pub use transport::{
    list_outbox, InMemoryTransport, MessageOp, MessageTransport, OutboxRecord, PublishedMessage,
    SqliteOutboxTransport,
};

pub type NotifyResult<T> = Result<T, NotifyError>;

/// Failures raised while serializing or sending a notification.
#[derive(Debug)]
pub enum NotifyError {
    Serialize(serde_json::Error),
    Db(DbError),
    InvalidData(String),
    /// Transport refused the message; carries the transport's reason.
    Transport(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to serialize message payload: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid outbox data: {message}"),
            Self::Transport(reason) => write!(f, "message transport failed: {reason}"),
        }
    }
}

impl Error for NotifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<rusqlite::Error> for NotifyError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
