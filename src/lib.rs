// src/lib.rs

//! repodeps
//!
//! Repository-metadata client for RPM-style repositories: fetches the
//! repository description and primary package index, builds a capability
//! graph (who provides / who requires which named capability), resolves
//! transitive dependency closures, selects the authoritative artifact
//! version per package, and downloads the resolved artifacts with
//! idempotent skip-if-present semantics.
//!
//! # Architecture
//!
//! - Index ingestion: `repomd` + `primary` parse the metadata documents,
//!   `compression` handles the compressed index payload
//! - Engine: `graph` builds the capability maps, `resolver` computes
//!   closures, `locator` maps names to artifact URLs
//! - Transport: pluggable `Fetcher` strategies behind one idempotence
//!   contract, `download` runs batches with partial-failure isolation
//! - `store` owns the persisted metadata files and the immutable
//!   `IndexSnapshot`, replaced whole on refresh

pub mod compression;
pub mod config;
pub mod download;
mod error;
pub mod graph;
pub mod locator;
pub mod primary;
pub mod repomd;
pub mod resolver;
pub mod store;
pub mod transport;
pub mod version;

pub use config::Config;
pub use download::{download_batch, DownloadSummary};
pub use error::{Error, Result};
pub use graph::CapabilityGraph;
pub use locator::{locate, LocatedArtifacts, ResolvedDownload};
pub use primary::PackageRecord;
pub use resolver::resolve;
pub use store::{IndexSnapshot, MetadataStore};
pub use transport::{fetcher_from_config, FetchOutcome, Fetcher, HttpFetcher, PowershellFetcher};
pub use version::Evr;
