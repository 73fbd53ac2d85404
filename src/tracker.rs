//! Response tracker — observes status, size, and first-byte latency
//! without altering the response
//!
//! The tracker decorates the real response writer for the lifetime of one
//! request. Every operation passes through unmodified; along the way it
//! records the status code, the cumulative body size, and the time from
//! request start to the first body byte.

use crate::error::Result;
use crate::writer::{CloseNotify, ResponseWriter};
use async_trait::async_trait;
use http::header::HeaderName;
use http::{HeaderMap, StatusCode};
use std::time::{Duration, Instant};

/// Decorating response writer that records what the handler sent
///
/// Status is kept as `None` until the handler sets one explicitly and is
/// collapsed to 200 only when read back, so "never set" and "set to 200"
/// stay distinguishable internally. The stat tag is snapshotted at the
/// first body write: once transmission begins, header mutations are no
/// longer observable.
pub struct ResponseTracker<'a> {
    inner: &'a mut dyn ResponseWriter,
    stat_header: HeaderName,
    status: Option<StatusCode>,
    bytes_written: u64,
    started: Instant,
    first_byte: Option<Duration>,
    tag: Option<String>,
}

impl<'a> ResponseTracker<'a> {
    /// Wrap `inner`, starting the latency clock now
    pub fn new(inner: &'a mut dyn ResponseWriter, stat_header: HeaderName) -> Self {
        Self {
            inner,
            stat_header,
            status: None,
            bytes_written: 0,
            started: Instant::now(),
            first_byte: None,
            tag: None,
        }
    }

    /// Final status for logging: the explicit value if one was set,
    /// 200 otherwise
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Status as recorded, `None` when the handler never set one
    pub fn recorded_status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Total body bytes the sink accepted
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Time from tracker creation to the first body write,
    /// `None` when no body was ever written
    pub fn time_to_first_byte(&self) -> Option<Duration> {
        self.first_byte
    }

    /// Stat tag visible to the logging layer: the snapshot taken at the
    /// first body write, or the live header value when no body was written
    pub fn stat_tag(&self) -> Option<String> {
        if self.first_byte.is_some() {
            self.tag.clone()
        } else {
            read_tag(self.inner.headers(), &self.stat_header)
        }
    }
}

fn read_tag(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl ResponseWriter for ResponseTracker<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn set_status(&mut self, status: StatusCode) {
        self.inner.set_status(status);
        // Always record the most recent value; the transport decides
        // whether a late status takes effect on the wire
        self.status = Some(status);
    }

    async fn write_body(&mut self, data: &[u8]) -> Result<usize> {
        if self.first_byte.is_none() {
            self.first_byte = Some(self.started.elapsed());
            self.tag = read_tag(self.inner.headers(), &self.stat_header);
        }
        let size = self.inner.write_body(data).await?;
        self.bytes_written += size as u64;
        Ok(size)
    }

    fn close_notify(&self) -> Option<CloseNotify> {
        self.inner.close_notify()
    }
}
