// src/transport/powershell.rs
//! System-credential-aware download strategy
//!
//! Shells out to PowerShell's `System.Net.WebClient` with the default
//! network credentials attached to the proxy. This is the path that
//! works on managed Windows hosts behind NTLM-authenticating proxies,
//! where a plain HTTP client cannot negotiate.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};
use crate::transport::Fetcher;

/// Fetcher backed by `powershell -NoProfile -Command`
#[derive(Debug, Default)]
pub struct PowershellFetcher;

impl PowershellFetcher {
    pub fn new() -> Self {
        Self
    }
}

/// Escape a value for a single-quoted PowerShell string literal
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl Fetcher for PowershellFetcher {
    fn download(&self, url: &Url, dest: &Path) -> Result<()> {
        let script = format!(
            "$wc = New-Object System.Net.WebClient; \
             $wc.Proxy.Credentials = [System.Net.CredentialCache]::DefaultNetworkCredentials; \
             $wc.DownloadFile({}, {});",
            ps_quote(url.as_str()),
            ps_quote(&dest.to_string_lossy()),
        );
        debug!("Invoking PowerShell WebClient for {}", url);

        let output = Command::new("powershell")
            .args(["-NoProfile", "-Command", &script])
            .output()
            .map_err(|e| Error::DownloadError(format!("Failed to invoke powershell: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::DownloadError(format!(
                "PowerShell download of {} failed: {}",
                url,
                stderr.trim()
            )));
        }

        info!("Downloaded {} via PowerShell", dest.display());
        Ok(())
    }
}
