// src/transport/mod.rs
//! Pluggable artifact transport
//!
//! A `Fetcher` wraps one download strategy; the strategy is picked once
//! at construction from configuration and never swapped mid-batch. The
//! provided `fetch` adds the idempotence check: an already-present
//! destination is reported as such with zero network activity.

mod http;
mod powershell;

use std::path::Path;

use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

pub use http::HttpFetcher;
pub use powershell::PowershellFetcher;

/// What a fetch call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The artifact was downloaded to the destination
    Fetched,
    /// The destination already existed; nothing was transferred
    AlreadyPresent,
}

/// One download strategy
pub trait Fetcher {
    /// Transfer `url` to `dest` unconditionally, overwriting anything
    /// already there. Strategy-specific.
    fn download(&self, url: &Url, dest: &Path) -> Result<()>;

    /// Idempotent fetch: skip the network entirely when `dest` exists.
    ///
    /// Repeated invocations over a large resolved set must not re-fetch
    /// completed artifacts; this is a correctness requirement, not an
    /// optimization.
    fn fetch(&self, url: &Url, dest: &Path) -> Result<FetchOutcome> {
        if dest.exists() {
            debug!("Already present, skipping: {}", dest.display());
            return Ok(FetchOutcome::AlreadyPresent);
        }
        self.download(url, dest)?;
        Ok(FetchOutcome::Fetched)
    }
}

/// Construct the fetcher named by the configuration.
///
/// `validate()` has already rejected unknown names at the boundary;
/// this re-checks so a hand-built `Config` cannot sneak one through.
pub fn fetcher_from_config(config: &Config) -> Result<Box<dyn Fetcher>> {
    match config.downloader.as_str() {
        "powershell" => Ok(Box::new(PowershellFetcher::new())),
        "http" => Ok(Box::new(HttpFetcher::new(
            config.proxy_url.as_deref(),
            config.skip_tls_verify,
        )?)),
        other => Err(Error::InvalidConfig(format!(
            "Unknown downloader '{}' (allowed: powershell, http)",
            other
        ))),
    }
}
