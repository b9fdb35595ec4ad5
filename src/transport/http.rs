// src/transport/http.rs
//! Direct HTTP download strategy
//!
//! Blocking reqwest client with explicit proxy and TLS-verification
//! configuration. Bodies stream to a `.part` file and are renamed into
//! place on success, so an interrupted transfer never leaves a
//! plausible-looking destination behind.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::transport::Fetcher;

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Direct-HTTP fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the given proxy and TLS settings.
    ///
    /// Both values are resolved here, once; changing them means
    /// constructing a new fetcher.
    pub fn new(proxy_url: Option<&str>, skip_tls_verify: bool) -> Result<Self> {
        let mut builder = Client::builder().timeout(HTTP_TIMEOUT);

        if skip_tls_verify {
            warn!("TLS verification disabled; HTTPS transfers are not authenticated");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy) = proxy_url {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| Error::InvalidConfig(format!("Invalid proxy URL '{proxy}': {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn download(&self, url: &Url, dest: &Path) -> Result<()> {
        debug!("GET {}", url);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::IoError(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|e| Error::DownloadError(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let total = response.content_length().unwrap_or(0);
        let display_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());

        let pb = byte_progress_bar(total, &display_name);

        // Stream to a temp file beside the destination, rename at the end
        let part_path = dest.with_extension("part");
        let result = stream_to_file(&mut response, &part_path, &pb);
        pb.finish_and_clear();

        match result {
            Ok(bytes) => {
                fs::rename(&part_path, dest).map_err(|e| {
                    Error::IoError(format!("Failed to move {} into place: {e}", dest.display()))
                })?;
                info!("Downloaded {} ({} bytes)", display_name, bytes);
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_file(&part_path);
                Err(e)
            }
        }
    }
}

fn byte_progress_bar(total: u64, name: &str) -> ProgressBar {
    let pb = if total > 0 {
        ProgressBar::new(total)
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(
        ProgressStyle::with_template("{msg:30} {bytes}/{total_bytes} [{bar:30}] {bytes_per_sec}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(name.to_string());
    pb
}

fn stream_to_file(
    response: &mut reqwest::blocking::Response,
    path: &Path,
    pb: &ProgressBar,
) -> Result<u64> {
    let mut file = File::create(path)
        .map_err(|e| Error::IoError(format!("Failed to create {}: {e}", path.display())))?;

    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {e}")))?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;
        downloaded += bytes_read as u64;
        pb.set_position(downloaded);
    }

    Ok(downloaded)
}
