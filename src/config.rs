//! Run configuration
//!
//! `CopierConfig` is the immutable value handed to the paginator and the
//! upload driver. It can be built in code or loaded from a YAML tuning file.

use crate::error::{Error, Result, ResultExt};
use crate::upload::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Browser user agent; Philomena instances commonly block bot-like agents
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:77.0) Gecko/20100101 Firefox/77.0";

/// Images requested per search page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Configuration for a copy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopierConfig {
    /// Images per search page
    pub page_size: u32,
    /// Upload retry and pacing policy
    pub retry: RetryPolicy,
    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for CopierConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(120),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl CopierConfig {
    /// Create a new config builder
    pub fn builder() -> CopierConfigBuilder {
        CopierConfigBuilder::default()
    }

    /// Load a YAML tuning file on top of the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse a YAML tuning document on top of the defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: FileConfig = serde_yaml::from_str(content)?;
        let config = file.apply(Self::default());
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or spin the pipeline
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }
        if self.retry.base_delay.is_zero() {
            return Err(Error::config("base delay must be greater than zero"));
        }
        if self.retry.max_delay < self.retry.base_delay {
            return Err(Error::config(
                "max delay must not be smaller than the base delay",
            ));
        }
        if self.retry.max_attempts == Some(0) {
            return Err(Error::config("max_attempts must be at least 1"));
        }
        Ok(())
    }
}

/// Builder for the run config
#[derive(Default)]
pub struct CopierConfigBuilder {
    config: CopierConfig,
}

impl CopierConfigBuilder {
    /// Set the search page size
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Set base and maximum delays
    #[must_use]
    pub fn delays(mut self, base: Duration, max: Duration) -> Self {
        self.config.retry.base_delay = base;
        self.config.retry.max_delay = max;
        self
    }

    /// Cap the number of upload attempts per image
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = Some(attempts);
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> CopierConfig {
        self.config
    }
}

/// On-disk shape of the tuning file; every key is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub base_delay_secs: Option<u64>,
    #[serde(default)]
    pub max_delay_secs: Option<u64>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl FileConfig {
    fn apply(self, mut config: CopierConfig) -> CopierConfig {
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(secs) = self.base_delay_secs {
            config.retry.base_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.max_delay_secs {
            config.retry.max_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = self.user_agent {
            config.user_agent = agent;
        }
        if self.max_attempts.is_some() {
            config.retry.max_attempts = self.max_attempts;
        }
        config
    }
}
