//! In-memory mailbox backend.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::infra::mailbox::{DeliveryError, Mailbox};
use crate::protocol::Response;

#[derive(Default)]
struct Inner {
    messages: HashMap<String, Vec<Response>>,
    closed: HashSet<String>,
}

/// Mailbox that keeps responses in memory, for tests and embedding.
///
/// Clones share storage, so a test can keep one handle while the gateway
/// owns another.
#[derive(Clone, Default)]
pub struct InMemoryMailbox {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryMailbox {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Responses delivered to `channel_id`, oldest first.
    pub fn fetch(&self, channel_id: &str) -> Vec<Response> {
        self.inner
            .lock()
            .messages
            .get(channel_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Simulate a requester that stopped listening on `channel_id`.
    pub fn close(&self, channel_id: &str) {
        self.inner.lock().closed.insert(channel_id.to_owned());
    }

    /// Total responses delivered across all channels.
    pub fn len(&self) -> usize {
        self.inner.lock().messages.values().map(Vec::len).sum()
    }

    /// Whether nothing has been delivered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Mailbox for InMemoryMailbox {
    fn deliver(&mut self, channel_id: &str, response: &Response) -> Result<(), DeliveryError> {
        let mut inner = self.inner.lock();
        if inner.closed.contains(channel_id) {
            return Err(DeliveryError::NoListener(channel_id.to_owned()));
        }
        inner
            .messages
            .entry(channel_id.to_owned())
            .or_default()
            .push(*response);
        Ok(())
    }
}
