//! Logging handler — wraps a handler and emits one access-log line
//! (and optional stats) per request
//!
//! The handler chain composes as decorators: [`LoggingHandler`] itself
//! implements [`Handler`], substitutes a fresh
//! [`ResponseTracker`](crate::ResponseTracker) for the real writer on
//! every request, and only formats and emits after the wrapped handler
//! has fully completed. Observability failures never affect the response
//! already sent to the client.

use crate::config::AccessLogConfig;
use crate::error::Result;
use crate::format;
use crate::stats::StatsSink;
use crate::tracker::ResponseTracker;
use crate::writer::ResponseWriter;
use async_trait::async_trait;
use chrono::Local;
use http::header::{HeaderName, HeaderValue};
use http::request::Parts;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Per-request facts supplied by the dispatch layer
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Client remote address, with or without a port suffix
    pub remote_addr: String,
}

/// A request handler in the decorator chain
///
/// Handlers receive the request head, the per-request context, and a
/// response writer. Write errors surface through the writer and may be
/// propagated with `?`.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Serve one request, writing the response through `res`
    async fn handle(
        &self,
        req: &Parts,
        ctx: &RequestContext,
        res: &mut dyn ResponseWriter,
    ) -> Result<()>;
}

/// Attach a stat name to the response, keying the timing sample and
/// counter emitted for this request. Must be called before the first body
/// write; later calls are not observed. The header never reaches the
/// client — transports strip the reserved key.
pub fn set_stat(res: &mut dyn ResponseWriter, name: &str) {
    if let Ok(value) = HeaderValue::from_str(name) {
        res.headers_mut()
            .insert(HeaderName::from_static(crate::STAT_HEADER), value);
    }
}

/// Access-logging middleware
///
/// Wraps a handler and writes one Common Log Format line per request to a
/// shared byte sink. Lines are written atomically (line granularity) so
/// concurrent requests never interleave mid-line. With a stats sink
/// attached, each request additionally emits one timing sample keyed by
/// the stat tag and one counter increment keyed by `<tag>.<status>`.
pub struct LoggingHandler {
    sink: Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>,
    stats: Option<Arc<dyn StatsSink>>,
    inner: Arc<dyn Handler>,
    stat_header: HeaderName,
}

impl LoggingHandler {
    /// Wrap `inner`, logging to `sink` in Common Log Format
    pub fn new<W>(sink: W, inner: Arc<dyn Handler>) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
            stats: None,
            inner,
            stat_header: HeaderName::from_static(crate::STAT_HEADER),
        }
    }

    /// Build from configuration, validating the stat-header key
    pub fn from_config<W>(
        config: &AccessLogConfig,
        sink: W,
        inner: Arc<dyn Handler>,
    ) -> Result<Self>
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let stat_header = config.stat_header_name()?;
        Ok(Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
            stats: None,
            inner,
            stat_header,
        })
    }

    /// Attach a stats sink; one timing sample and one counter increment
    /// are emitted per request
    pub fn with_stats(mut self, stats: Arc<dyn StatsSink>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Write one line to the log sink, best-effort. The full line goes
    /// out in a single call under the lock so concurrent requests cannot
    /// interleave mid-line.
    async fn write_line(&self, mut line: String) {
        line.push('\n');
        let mut sink = self.sink.lock().await;
        if let Err(e) = sink.write_all(line.as_bytes()).await {
            tracing::debug!(error = %e, "access log write failed");
            return;
        }
        if let Err(e) = sink.flush().await {
            tracing::debug!(error = %e, "access log flush failed");
        }
    }
}

#[async_trait]
impl Handler for LoggingHandler {
    async fn handle(
        &self,
        req: &Parts,
        ctx: &RequestContext,
        res: &mut dyn ResponseWriter,
    ) -> Result<()> {
        let arrived = Local::now();
        let mut tracker = ResponseTracker::new(res, self.stat_header.clone());
        let outcome = self.inner.handle(req, ctx, &mut tracker).await;

        let status = tracker.status();
        let duration = tracker.time_to_first_byte().unwrap_or(Duration::ZERO);
        let tag = tracker.stat_tag();
        let line = format::common_log_line(
            req,
            ctx,
            arrived,
            status,
            tracker.bytes_written(),
            duration,
        );
        self.write_line(line).await;

        if let Some(stats) = &self.stats {
            let tag = tag.unwrap_or_default();
            stats.timing(&tag, duration);
            stats.incr_by(&format!("{}.{}", tag, status.as_u16()), 1);
        }

        outcome
    }
}
