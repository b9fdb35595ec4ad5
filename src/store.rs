// src/store.rs
//! Persisted metadata files and the in-memory index snapshot
//!
//! Three flat files make up the persisted state: the repository
//! description, the compressed primary index, and the decompressed
//! primary index. Their presence or absence is the only signal for
//! whether re-ingestion is needed; their content is the repository's
//! external schema.

use std::fs;

use tracing::{info, warn};
use url::Url;

use crate::compression::decompress_auto;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::graph::CapabilityGraph;
use crate::primary::{parse_primary, PackageRecord};
use crate::repomd;
use crate::transport::Fetcher;

/// Everything derived from one loaded index.
///
/// Built whole, then swapped in; a failed refresh leaves the previous
/// snapshot untouched. Never partially mutated.
#[derive(Debug)]
pub struct IndexSnapshot {
    pub records: Vec<PackageRecord>,
    pub graph: CapabilityGraph,
    /// Sorted unique package names, for listing and filtering
    pub names: Vec<String>,
}

/// Owns the metadata file layout and the current snapshot
pub struct MetadataStore {
    config: Config,
    base_url: Url,
    snapshot: Option<IndexSnapshot>,
}

impl MetadataStore {
    pub fn new(config: Config) -> Result<Self> {
        let base_url = config.base_url()?;
        Ok(Self {
            config,
            base_url,
            snapshot: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn snapshot(&self) -> Option<&IndexSnapshot> {
        self.snapshot.as_ref()
    }

    /// Make sure an index snapshot is loaded.
    ///
    /// When any of the three metadata files is missing, or `force` is
    /// set, the full ingestion runs: fetch the repository description,
    /// follow its primary href, fetch and decompress the index, parse,
    /// and build a fresh snapshot. Otherwise the existing decompressed
    /// file is parsed only if no snapshot is loaded yet.
    ///
    /// Metadata fetches use `Fetcher::download` directly: a refresh
    /// must overwrite stale files, so the idempotence skip does not
    /// apply here.
    pub fn ensure_loaded(&mut self, fetcher: &dyn Fetcher, force: bool) -> Result<()> {
        let required = [
            &self.config.repomd_file,
            &self.config.compressed_index_file,
            &self.config.index_file,
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|f| !f.exists())
            .map(|f| f.display().to_string())
            .collect();

        if !missing.is_empty() || force {
            if !missing.is_empty() {
                warn!("Missing metadata files: {}", missing.join(", "));
            }
            info!("Refreshing metadata from {}", self.base_url);

            let repomd_url = self.join(&self.config.repomd_path)?;
            fetcher.download(&repomd_url, &self.config.repomd_file)?;

            let repomd_xml = fs::read_to_string(&self.config.repomd_file).map_err(|e| {
                Error::IoError(format!(
                    "Failed to read {}: {e}",
                    self.config.repomd_file.display()
                ))
            })?;
            let primary_href = repomd::primary_location(&repomd_xml)?;
            let primary_url = self.join(&primary_href)?;

            fetcher.download(&primary_url, &self.config.compressed_index_file)?;
            let compressed = fs::read(&self.config.compressed_index_file).map_err(|e| {
                Error::IoError(format!(
                    "Failed to read {}: {e}",
                    self.config.compressed_index_file.display()
                ))
            })?;

            let decompressed = decompress_auto(&compressed)?;
            fs::write(&self.config.index_file, &decompressed).map_err(|e| {
                Error::IoError(format!(
                    "Failed to write {}: {e}",
                    self.config.index_file.display()
                ))
            })?;

            let xml = String::from_utf8(decompressed)
                .map_err(|e| Error::ParseError(format!("Primary index is not UTF-8: {e}")))?;
            let snapshot = self.build_snapshot(&xml)?;
            self.snapshot = Some(snapshot);
        } else if self.snapshot.is_none() {
            info!("All metadata files present, skipping refresh");
            let xml = fs::read_to_string(&self.config.index_file).map_err(|e| {
                Error::IoError(format!(
                    "Failed to read {}: {e}",
                    self.config.index_file.display()
                ))
            })?;
            let snapshot = self.build_snapshot(&xml)?;
            self.snapshot = Some(snapshot);
        }
        Ok(())
    }

    /// Remove the three metadata files and drop the snapshot
    pub fn cleanup(&mut self) {
        let files = [
            &self.config.repomd_file,
            &self.config.compressed_index_file,
            &self.config.index_file,
        ];
        let mut deleted_any = false;
        for file in files {
            if file.exists() {
                match fs::remove_file(file) {
                    Ok(()) => {
                        info!("Removed {}", file.display());
                        deleted_any = true;
                    }
                    Err(e) => warn!("Failed to remove {}: {}", file.display(), e),
                }
            }
        }
        if !deleted_any {
            warn!("No metadata files to remove");
        }
        self.snapshot = None;
    }

    fn build_snapshot(&self, xml: &str) -> Result<IndexSnapshot> {
        let records = parse_primary(xml)?;
        // Flag read once, here; the builder never consults the config
        let graph = CapabilityGraph::build(&records, self.config.support_weak_deps);
        let names = graph.package_names();
        info!("Loaded index: {} packages", names.len());
        Ok(IndexSnapshot {
            records,
            graph,
            names,
        })
    }

    fn join(&self, href: &str) -> Result<Url> {
        self.base_url
            .join(href)
            .map_err(|e| Error::ParseError(format!("Cannot resolve '{href}': {e}")))
    }
}
