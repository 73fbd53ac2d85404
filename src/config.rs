//! Configuration for the access-log middleware

use crate::error::{AccessLogError, Result};
use http::header::HeaderName;
use serde::{Deserialize, Serialize};

/// Access-log middleware configuration
///
/// # Example
///
/// ```toml
/// [access-log]
/// stat-header = "x-stat"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogConfig {
    /// Reserved response-header key read back as the stat name
    #[serde(rename = "stat-header", default = "default_stat_header")]
    pub stat_header: String,
}

fn default_stat_header() -> String {
    crate::STAT_HEADER.to_string()
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            stat_header: default_stat_header(),
        }
    }
}

impl AccessLogConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.stat_header_name().map(|_| ())
    }

    /// Parse the configured stat header into a typed header name
    pub fn stat_header_name(&self) -> Result<HeaderName> {
        HeaderName::from_bytes(self.stat_header.as_bytes()).map_err(|e| {
            AccessLogError::Config(format!(
                "invalid stat header '{}': {}",
                self.stat_header, e
            ))
        })
    }
}
