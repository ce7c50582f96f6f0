use anyhow::{Context, Result};

/// Deployed endpoint of the scripted environment feed. Overridable with
/// `FEED_URL`, so tests and alternate deployments can point elsewhere.
const DEFAULT_FEED_URL: &str =
    "https://script.google.com/macros/s/AKfycbzbKmO_4sx-0X6JuMeDkRaTu--xAp1RhHXBaz8xgL6qdM81seRB3SF5AUB9NAm4GP4P/exec";

#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Acquisition polling interval in seconds
    pub poll_interval_secs: u64,
    /// Header clock tick interval in seconds
    pub clock_interval_secs: u64,
    /// Per-request timeout for the feed in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            feed_url: optional("FEED_URL", DEFAULT_FEED_URL),
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            poll_interval_secs: optional("POLL_INTERVAL_SECS", "300")
                .parse()
                .context("POLL_INTERVAL_SECS must be a positive integer")?,
            clock_interval_secs: optional("CLOCK_INTERVAL_SECS", "60")
                .parse()
                .context("CLOCK_INTERVAL_SECS must be a positive integer")?,
            request_timeout_secs: optional("REQUEST_TIMEOUT_SECS", "30")
                .parse()
                .context("REQUEST_TIMEOUT_SECS must be a positive integer")?,
        })
    }
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
