//! Message transports.
//!
//! # Responsibility
//! - Deliver `(topic, key, payload)` triples in send order.
//! - Provide an in-process recorder and a durable SQLite outbox.
//!
//! # Invariants
//! - Messages for one key are observed in the order they were sent.
//! - `op` is `delete` exactly when `payload` is `None`.

use super::{NotifyError, NotifyResult};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Explicit form of the tombstone convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageOp {
    /// Payload carries the entity's current state.
    Upsert,
    /// Entity was deleted; payload is null.
    Delete,
}

impl MessageOp {
    pub fn for_payload(payload: Option<&str>) -> Self {
        match payload {
            Some(_) => Self::Upsert,
            None => Self::Delete,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upsert => "upsert",
            Self::Delete => "delete",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "upsert" => Some(Self::Upsert),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Fire-and-forget delivery of a keyed string payload to a topic.
pub trait MessageTransport {
    fn send(&self, topic: &str, key: &str, payload: Option<&str>) -> NotifyResult<()>;
}

impl<T: MessageTransport + ?Sized> MessageTransport for &T {
    fn send(&self, topic: &str, key: &str, payload: Option<&str>) -> NotifyResult<()> {
        (**self).send(topic, key, payload)
    }
}

/// One message captured by [`InMemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedMessage {
    pub topic: String,
    pub key: String,
    pub payload: Option<String>,
}

impl PublishedMessage {
    pub fn op(&self) -> MessageOp {
        MessageOp::for_payload(self.payload.as_deref())
    }
}

/// Thread-safe transport that keeps every message in memory.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    messages: Mutex<Vec<PublishedMessage>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in send order.
    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.lock().clone()
    }

    pub fn messages_for_key(&self, key: &str) -> Vec<PublishedMessage> {
        self.lock()
            .iter()
            .filter(|message| message.key == key)
            .cloned()
            .collect()
    }

    /// Compacted view per `(topic, key)`: the last payload wins and a
    /// tombstone removes the key.
    pub fn latest_by_key(&self, topic: &str) -> HashMap<String, String> {
        let mut latest = HashMap::new();
        for message in self.lock().iter().filter(|message| message.topic == topic) {
            match &message.payload {
                Some(payload) => {
                    latest.insert(message.key.clone(), payload.clone());
                }
                None => {
                    latest.remove(&message.key);
                }
            }
        }
        latest
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PublishedMessage>> {
        // A panicking sender cannot leave the vector half-written.
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MessageTransport for InMemoryTransport {
    fn send(&self, topic: &str, key: &str, payload: Option<&str>) -> NotifyResult<()> {
        self.lock().push(PublishedMessage {
            topic: topic.to_string(),
            key: key.to_string(),
            payload: payload.map(str::to_string),
        });
        Ok(())
    }
}

/// Row of the `outbox_messages` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxRecord {
    /// Monotonic sequence; defines delivery order.
    pub seq: i64,
    pub topic: String,
    pub key: String,
    pub op: MessageOp,
    pub payload: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Transport appending messages to the SQLite outbox table.
///
/// A relay process can tail `outbox_messages` by `seq` and forward rows to a
/// broker; this crate only writes and reads them.
pub struct SqliteOutboxTransport<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOutboxTransport<'conn> {
    /// `conn` must come from `db::open_db` / `db::open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MessageTransport for SqliteOutboxTransport<'_> {
    fn send(&self, topic: &str, key: &str, payload: Option<&str>) -> NotifyResult<()> {
        if topic.trim().is_empty() {
            return Err(NotifyError::Transport("topic must not be empty".to_string()));
        }

        self.conn.execute(
            "INSERT INTO outbox_messages (topic, message_key, op, payload)
             VALUES (?1, ?2, ?3, ?4);",
            params![topic, key, MessageOp::for_payload(payload).as_str(), payload],
        )?;
        Ok(())
    }
}

/// Reads outbox rows for `topic` in delivery order.
pub fn list_outbox(conn: &Connection, topic: &str) -> NotifyResult<Vec<OutboxRecord>> {
    let mut stmt = conn.prepare(
        "SELECT seq, topic, message_key, op, payload, created_at
         FROM outbox_messages
         WHERE topic = ?1
         ORDER BY seq ASC;",
    )?;
    let mut rows = stmt.query([topic])?;
    let mut records = Vec::new();

    while let Some(row) = rows.next()? {
        records.push(parse_outbox_row(row)?);
    }

    Ok(records)
}

fn parse_outbox_row(row: &Row<'_>) -> NotifyResult<OutboxRecord> {
    let op_text: String = row.get("op")?;
    let op = MessageOp::parse(&op_text).ok_or_else(|| {
        NotifyError::InvalidData(format!("invalid op `{op_text}` in outbox_messages.op"))
    })?;
    let payload: Option<String> = row.get("payload")?;
    if MessageOp::for_payload(payload.as_deref()) != op {
        return Err(NotifyError::InvalidData(format!(
            "op `{op_text}` does not match payload presence in outbox_messages"
        )));
    }

    Ok(OutboxRecord {
        seq: row.get("seq")?,
        topic: row.get("topic")?,
        key: row.get("message_key")?,
        op,
        payload,
        created_at: row.get("created_at")?,
    })
}
