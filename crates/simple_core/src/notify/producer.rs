//! Notifier contract and the JSON producer.

use super::transport::MessageTransport;
use super::NotifyResult;
use crate::model::simple_model::{SimpleModel, SimpleModelId};
use log::{debug, error};

/// Topic receiving every SimpleModel change.
pub const SIMPLE_MODEL_TOPIC: &str = "simple-model-fact";

/// Publishes the post-mutation state of one entity.
pub trait Notifier {
    /// Sends `model` keyed by `key`; `None` signals that `key` was deleted.
    fn send_message(&self, model: Option<&SimpleModel>, key: SimpleModelId) -> NotifyResult<()>;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn send_message(&self, model: Option<&SimpleModel>, key: SimpleModelId) -> NotifyResult<()> {
        (**self).send_message(model, key)
    }
}

/// Serializes models to JSON and sends them to a fixed topic.
pub struct SimpleProducer<T: MessageTransport> {
    transport: T,
    topic: String,
}

impl<T: MessageTransport> SimpleProducer<T> {
    /// Producer writing to [`SIMPLE_MODEL_TOPIC`].
    pub fn new(transport: T) -> Self {
        Self::with_topic(transport, SIMPLE_MODEL_TOPIC)
    }

    pub fn with_topic(transport: T, topic: impl Into<String>) -> Self {
        Self {
            transport,
            topic: topic.into(),
        }
    }
}

impl<T: MessageTransport> Notifier for SimpleProducer<T> {
    fn send_message(&self, model: Option<&SimpleModel>, key: SimpleModelId) -> NotifyResult<()> {
        let payload = model.map(serde_json::to_string).transpose()?;
        let key = key.to_string();
        debug!(
            "event=message_produce module=notify status=start topic={} key={} tombstone={}",
            self.topic,
            key,
            payload.is_none()
        );

        self.transport
            .send(&self.topic, &key, payload.as_deref())
            .inspect_err(|err| {
                error!(
                    "event=message_produce module=notify status=error topic={} key={} error={}",
                    self.topic, key, err
                );
            })
    }
}
