// src/locator.rs
//! Mapping resolved package names to artifact URLs
//!
//! Gathers the indexed artifact entries for each requested name, applies
//! the version-selection policy, and joins relative location hrefs
//! against the repository base URL.

use std::collections::{HashMap, HashSet};

use tracing::warn;
use url::Url;

use crate::primary::PackageRecord;
use crate::version::Evr;

/// One downloadable artifact after version selection and URL resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub package: String,
    pub url: Url,
}

/// The outcome of locating a batch of package names
#[derive(Debug, Default)]
pub struct LocatedArtifacts {
    pub downloads: Vec<ResolvedDownload>,
    /// Requested names with no usable artifact entry; reported, never
    /// aborting the batch.
    pub unresolved: Vec<String>,
}

/// Locate artifact URLs for a set of package names.
///
/// Only entries carrying both a version and a location are candidates.
/// Under `only_latest` the entry with the maximum (epoch, ver, rel) key
/// is selected; exact ties go to the entry appearing last in index
/// order (`Iterator::max_by` keeps the last maximum). Names are
/// processed in sorted order so output is stable for a fixed input.
pub fn locate(
    names: &HashSet<String>,
    records: &[PackageRecord],
    base_url: &Url,
    only_latest: bool,
) -> LocatedArtifacts {
    // Group candidate entries by name, keeping index order within each
    // group so tie-breaking stays deterministic.
    let mut candidates: HashMap<&str, Vec<(&Evr, &str)>> = HashMap::new();
    for record in records {
        if !names.contains(&record.name) {
            continue;
        }
        if let (Some(version), Some(href)) = (&record.version, &record.location_href) {
            candidates
                .entry(record.name.as_str())
                .or_default()
                .push((version, href));
        }
    }

    let mut sorted_names: Vec<&String> = names.iter().collect();
    sorted_names.sort();

    let mut located = LocatedArtifacts::default();
    for name in sorted_names {
        let entries = candidates.get(name.as_str()).cloned().unwrap_or_default();
        if entries.is_empty() {
            located.unresolved.push(name.clone());
            continue;
        }

        let selected: Vec<(&Evr, &str)> = if only_latest {
            entries
                .into_iter()
                .max_by(|a, b| a.0.cmp(b.0))
                .into_iter()
                .collect()
        } else {
            entries
        };

        let mut resolved_any = false;
        for (version, href) in selected {
            match base_url.join(href) {
                Ok(url) => {
                    located.downloads.push(ResolvedDownload {
                        package: name.clone(),
                        url,
                    });
                    resolved_any = true;
                }
                Err(e) => {
                    warn!("Skipping {} {}: bad location '{}': {}", name, version, href, e);
                }
            }
        }
        if !resolved_any {
            located.unresolved.push(name.clone());
        }
    }

    located
}
