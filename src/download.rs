// src/download.rs
//! Batch artifact download with partial-failure isolation
//!
//! Each item in a resolved batch is fetched independently: a failure is
//! recorded and the batch moves on, because an incomplete download set
//! is still useful and reportable. Sequential by design.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::locator::ResolvedDownload;
use crate::transport::{FetchOutcome, Fetcher};

/// Per-batch outcome counts, reported after the batch completes
#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub fetched: Vec<String>,
    pub already_present: Vec<String>,
    pub failed: Vec<(String, Error)>,
}

impl DownloadSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Destination file name for one download: the last URL path segment.
fn artifact_file_name(download: &ResolvedDownload) -> String {
    download
        .url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .unwrap_or_else(|| format!("{}.rpm", download.package))
}

/// Fetch every resolved download into `dest_dir`.
///
/// The directory is created on demand; failure to create it is the only
/// hard error. Individual fetch failures land in the summary and never
/// abort sibling fetches.
pub fn download_batch(
    fetcher: &dyn Fetcher,
    downloads: &[ResolvedDownload],
    dest_dir: &Path,
) -> Result<DownloadSummary> {
    fs::create_dir_all(dest_dir).map_err(|e| {
        Error::IoError(format!(
            "Failed to create download directory {}: {e}",
            dest_dir.display()
        ))
    })?;

    let pb = ProgressBar::new(downloads.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{msg:20} {pos}/{len} [{bar:30}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("Downloading");

    let mut summary = DownloadSummary::default();
    for download in downloads {
        let file_name = artifact_file_name(download);
        let dest: PathBuf = dest_dir.join(&file_name);

        match fetcher.fetch(&download.url, &dest) {
            Ok(FetchOutcome::Fetched) => {
                info!("Downloaded {}", file_name);
                summary.fetched.push(file_name);
            }
            Ok(FetchOutcome::AlreadyPresent) => {
                info!("Already downloaded: {}", file_name);
                summary.already_present.push(file_name);
            }
            Err(e) => {
                error!("Failed to download {}: {}", file_name, e);
                summary.failed.push((file_name, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if !summary.failed.is_empty() {
        warn!(
            "{} of {} downloads failed",
            summary.failed.len(),
            downloads.len()
        );
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn download(package: &str, url: &str) -> ResolvedDownload {
        ResolvedDownload {
            package: package.to_string(),
            url: Url::parse(url).unwrap(),
        }
    }

    #[test]
    fn test_artifact_file_name_from_url() {
        let d = download("pkg", "https://repo.example.com/Packages/p/pkg-1.0-1.rpm");
        assert_eq!(artifact_file_name(&d), "pkg-1.0-1.rpm");
    }

    #[test]
    fn test_artifact_file_name_fallback_without_path() {
        let d = download("pkg", "https://repo.example.com/");
        assert_eq!(artifact_file_name(&d), "pkg.rpm");
    }
}
