//! # accesslog
//!
//! Access-log middleware: wraps a request handler and emits one Apache
//! Common Log Format line per request, plus optional statsd-style timing
//! and counter samples, without altering the wrapped handler's behavior
//! or response body.
//!
//! ## Architecture
//!
//! ```text
//! Dispatch → LoggingHandler → ResponseTracker → real ResponseWriter
//!                 │                  │
//!                 │                  └─ records status / size / first-byte latency
//!                 └─ formats one log line + optional stats after the handler returns
//! ```
//!
//! ## Core Features
//!
//! - **Transparent tracking**: the [`ResponseTracker`] decorator passes
//!   every write through unmodified while recording status code, body
//!   size, and time to first byte
//! - **Common Log Format**: one newline-terminated line per request,
//!   written atomically to any shared byte sink
//! - **Stat tagging**: handlers attach a stat name via [`set_stat`];
//!   with a [`StatsSink`] configured, each request emits one timing
//!   sample and one `<tag>.<status>` counter increment
//! - **Best-effort observability**: log and stats failures never affect
//!   the response already delivered to the client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use accesslog::{set_stat, Handler, LoggingHandler, RequestContext, ResponseWriter};
//! use std::sync::Arc;
//!
//! struct DoWork;
//!
//! #[async_trait::async_trait]
//! impl Handler for DoWork {
//!     async fn handle(
//!         &self,
//!         _req: &http::request::Parts,
//!         _ctx: &RequestContext,
//!         res: &mut dyn ResponseWriter,
//!     ) -> accesslog::Result<()> {
//!         set_stat(res, "do.work");
//!         res.write_body(b"Hello!").await?;
//!         Ok(())
//!     }
//! }
//!
//! let handler = LoggingHandler::new(tokio::io::stdout(), Arc::new(DoWork));
//! ```

pub mod config;
pub mod error;
pub(crate) mod format;
pub mod handler;
pub mod stats;
pub mod tracker;
pub mod writer;

// Re-export main types
pub use config::AccessLogConfig;
pub use error::{AccessLogError, Result};
pub use handler::{set_stat, Handler, LoggingHandler, RequestContext};
pub use stats::{MemoryStats, StatsSink, StatsSnapshot};
pub use tracker::ResponseTracker;
pub use writer::{BufferedResponseWriter, CloseNotify, ResponseWriter};

/// Reserved response-header key carrying the stat name. Set by handlers
/// (see [`set_stat`]), read back by [`LoggingHandler`] after the handler
/// returns, and stripped by transports before the response reaches the
/// client.
pub const STAT_HEADER: &str = "x-stat";
