//! Messaging seam
//!
//! The real publish/subscribe transport is an external collaborator; the
//! synchronization core only needs a way to send a request and learn its
//! id. Inbound deliveries are plain method calls on the scene manager, made
//! by whatever callback machinery the transport provides.

use crate::msgs::RequestMsg;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Request id handed out by a [`RequestSender`]
pub type RequestId = u64;

/// Outbound request channel
pub trait RequestSender: Send + Sync {
    /// Publish a request and return its id; ids are unique per sender
    fn send_request(&self, kind: &str, data: &str) -> RequestId;
}

/// In-process transport that records outbound requests
///
/// Stands in for the network transport in tests and headless tooling; the
/// recorded [`RequestMsg`] stream is what a live system would publish.
#[derive(Debug, Default)]
pub struct ChannelTransport {
    next_id: AtomicU64,
    sent: Mutex<Vec<RequestMsg>>,
}

impl ChannelTransport {
    /// Create a transport with no recorded traffic
    pub fn new() -> Self {
        Self::default()
    }

    /// All requests sent so far, oldest first
    pub fn sent_requests(&self) -> Vec<RequestMsg> {
        self.sent.lock().expect("transport lock poisoned").clone()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<RequestMsg> {
        self.sent
            .lock()
            .expect("transport lock poisoned")
            .last()
            .cloned()
    }
}

impl RequestSender for ChannelTransport {
    fn send_request(&self, kind: &str, data: &str) -> RequestId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let msg = RequestMsg {
            id,
            request: kind.to_string(),
            data: data.to_string(),
        };
        self.sent.lock().expect("transport lock poisoned").push(msg);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let transport = ChannelTransport::new();
        let a = transport.send_request("scene_info", "");
        let b = transport.send_request("scene_info", "");
        assert!(b > a);
        assert_eq!(transport.sent_requests().len(), 2);
    }

    #[test]
    fn test_recorded_request_carries_payload() {
        let transport = ChannelTransport::new();
        let id = transport.send_request("entity_delete", "box_1");
        let last = transport.last_request().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.request, "entity_delete");
        assert_eq!(last.data, "box_1");
    }
}
