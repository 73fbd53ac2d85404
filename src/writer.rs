//! Response writer abstraction — the capability the middleware decorates
//!
//! Transport adapters implement [`ResponseWriter`] over whatever actually
//! sends bytes to the client; [`ResponseTracker`](crate::ResponseTracker)
//! implements it as a pass-through decorator. Handlers only ever see the
//! trait, never a concrete sink type.

use crate::error::Result;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use tokio::sync::watch;

/// Client-disconnect signal. The receiver observes `true` once the peer
/// has gone away. Only transports that can detect disconnects provide one.
pub type CloseNotify = watch::Receiver<bool>;

/// Response-writing capability
///
/// Header mutations are only transmitted if they happen before the first
/// body write; afterwards the header collection stays readable but changes
/// no longer reach the client.
#[async_trait]
pub trait ResponseWriter: Send {
    /// Response headers set so far
    fn headers(&self) -> &HeaderMap;

    /// Mutable access to the response headers
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Set the response status line
    fn set_status(&mut self, status: StatusCode);

    /// Write a chunk of the response body.
    /// Returns the number of bytes the sink accepted.
    async fn write_body(&mut self, data: &[u8]) -> Result<usize>;

    /// Observe client disconnect, when the transport supports it.
    /// Returns `None` when the capability is unavailable.
    fn close_notify(&self) -> Option<CloseNotify> {
        None
    }
}

/// In-memory response writer — captures status, headers, and body bytes
///
/// Used by the test suite and by embedders that want to materialize a
/// response before handing it to a transport. The first explicit status
/// wins; a status set after body bytes have been written is ignored,
/// matching typical transport behavior.
pub struct BufferedResponseWriter {
    headers: HeaderMap,
    status: Option<StatusCode>,
    body: BytesMut,
    wrote_body: bool,
    close_rx: Option<CloseNotify>,
}

impl BufferedResponseWriter {
    /// Create an empty writer with no close-notification support
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
            status: None,
            body: BytesMut::new(),
            wrote_body: false,
            close_rx: None,
        }
    }

    /// Create a writer wired to a close channel. Sending `true` on the
    /// returned sender simulates a client disconnect.
    pub fn with_close_notify() -> (Self, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let mut writer = Self::new();
        writer.close_rx = Some(rx);
        (writer, tx)
    }

    /// Effective status: the explicit value if one was set, 200 otherwise
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Body bytes accepted so far
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the writer, returning the captured body
    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}

impl Default for BufferedResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseWriter for BufferedResponseWriter {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn set_status(&mut self, status: StatusCode) {
        // First explicit status wins; late status after body bytes is a no-op
        if self.status.is_none() && !self.wrote_body {
            self.status = Some(status);
        }
    }

    async fn write_body(&mut self, data: &[u8]) -> Result<usize> {
        self.wrote_body = true;
        self.body.extend_from_slice(data);
        Ok(data.len())
    }

    fn close_notify(&self) -> Option<CloseNotify> {
        self.close_rx.clone()
    }
}
