//! Bounded in-memory queue of raw inbound frames.
//!
//! Transport readers push undecoded lines; the gateway pops them. Keeping
//! the queue in between lets the gateway run against plain in-memory frames
//! in tests, with no channel on disk.
//!
//! A line the transport could not turn into text (over-long, not UTF-8)
//! still travels through the queue as [`InboundFrame::Rejected`], so the
//! gateway counts and logs it like any other malformed frame.

use crossbeam_channel::{bounded, Receiver, SendError, Sender, TrySendError};

use crate::protocol::ProtocolError;

/// One line taken off an inbound transport.
#[derive(Debug)]
pub enum InboundFrame {
    /// Line text, line terminator stripped.
    Line(String),
    /// Line the transport refused before decoding.
    Rejected(ProtocolError),
}

impl InboundFrame {
    /// Line text, if the transport accepted it.
    pub fn as_line(&self) -> Option<&str> {
        match self {
            Self::Line(line) => Some(line),
            Self::Rejected(_) => None,
        }
    }
}

impl From<String> for InboundFrame {
    fn from(line: String) -> Self {
        Self::Line(line)
    }
}

impl From<&str> for InboundFrame {
    fn from(line: &str) -> Self {
        Self::Line(line.to_owned())
    }
}

/// Default queue depth for inbound frames.
pub const DEFAULT_INBOUND_DEPTH: usize = 1024;

/// Multi-producer, single-consumer queue of inbound frames.
#[derive(Clone)]
pub struct InboundQueue {
    max_depth: usize,
    tx: Sender<InboundFrame>,
    rx: Receiver<InboundFrame>,
}

impl Default for InboundQueue {
    fn default() -> Self {
        Self::new(DEFAULT_INBOUND_DEPTH)
    }
}

impl InboundQueue {
    /// Create a queue holding at most `max_depth` pending frames.
    pub fn new(max_depth: usize) -> Self {
        let (tx, rx) = bounded(max_depth.max(1));
        Self { max_depth, tx, rx }
    }

    /// Producer handle for transport readers.
    pub fn sender(&self) -> Sender<InboundFrame> {
        self.tx.clone()
    }

    /// Consumer handle for the gateway.
    pub fn receiver(&self) -> Receiver<InboundFrame> {
        self.rx.clone()
    }

    /// Push a frame, blocking while the queue is full.
    pub fn push(&self, frame: impl Into<InboundFrame>) -> Result<(), SendError<InboundFrame>> {
        self.tx.send(frame.into())
    }

    /// Push a frame without blocking.
    pub fn try_push(&self, frame: impl Into<InboundFrame>) -> Result<(), TrySendError<InboundFrame>> {
        self.tx.try_send(frame.into())
    }

    /// Maximum depth allowed for this queue.
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Current depth.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no frame is pending.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue = InboundQueue::new(4);
        queue.push("one").expect("push");
        queue.push("two").expect("push");
        assert_eq!(queue.len(), 2);

        let rx = queue.receiver();
        assert_eq!(rx.recv().ok().as_ref().and_then(InboundFrame::as_line), Some("one"));
        assert_eq!(rx.recv().ok().as_ref().and_then(InboundFrame::as_line), Some("two"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_try_push_full() {
        let queue = InboundQueue::new(1);
        queue.try_push("a").expect("first fits");
        assert!(matches!(queue.try_push("b"), Err(TrySendError::Full(_))));
        assert_eq!(queue.max_depth(), 1);
    }

    #[test]
    fn test_rejected_frame_has_no_line() {
        let queue = InboundQueue::new(2);
        queue
            .push(InboundFrame::Rejected(ProtocolError::InvalidUtf8 { valid_up_to: 3 }))
            .expect("push");
        let frame = queue.receiver().recv().expect("recv");
        assert!(frame.as_line().is_none());
    }
}
