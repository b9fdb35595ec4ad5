// tests/workflow.rs

//! End-to-end workflow against an in-memory repository: metadata
//! ingestion, snapshot lifecycle, batch downloads with partial-failure
//! isolation, and idempotent re-fetches.

mod common;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use repodeps::{download_batch, locate, resolve, Config, FetchOutcome, Fetcher, MetadataStore};
use tempfile::TempDir;
use url::Url;

use common::MockFetcher;

const BASE: &str = "https://repo.test/el9/x86_64/";

/// Config with all file paths under a scratch directory
fn test_config(dir: &Path) -> Config {
    Config {
        base_url: BASE.to_string(),
        repomd_file: dir.join("repomd.xml"),
        compressed_index_file: dir.join("primary.xml.gz"),
        index_file: dir.join("primary.xml"),
        download_dir: dir.join("rpms"),
        ..Config::default()
    }
}

/// Fetcher serving the fixture repository
fn repo_fetcher() -> MockFetcher {
    MockFetcher::new()
        .with_response(
            &format!("{BASE}repodata/repomd.xml"),
            common::repomd_xml("repodata/primary.xml.gz"),
        )
        .with_response(
            &format!("{BASE}repodata/primary.xml.gz"),
            common::gzip(common::primary_xml().as_bytes()),
        )
        .with_response(&format!("{BASE}Packages/a/app-1.0-1.x86_64.rpm"), "app-bytes")
        .with_response(
            &format!("{BASE}Packages/l/libx-2.0-3.x86_64.rpm"),
            "libx-bytes",
        )
        .with_response(
            &format!("{BASE}Packages/s/standalone-0.5-1.noarch.rpm"),
            "standalone-bytes",
        )
}

fn setup() -> (TempDir, MetadataStore, MockFetcher) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let store = MetadataStore::new(config).unwrap();
    (dir, store, repo_fetcher())
}

#[test]
fn ingestion_builds_a_snapshot_and_persists_three_files() {
    let (dir, mut store, fetcher) = setup();
    store.ensure_loaded(&fetcher, false).unwrap();

    // All three metadata files are on disk
    assert!(dir.path().join("repomd.xml").exists());
    assert!(dir.path().join("primary.xml.gz").exists());
    assert!(dir.path().join("primary.xml").exists());

    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.names, vec!["app", "libx", "standalone"]);

    // The end-to-end spec scenario
    let closure = resolve("app", &snapshot.graph.deps).unwrap();
    assert_eq!(
        closure,
        ["app".to_string(), "libx".to_string()].into_iter().collect()
    );
    assert!(resolve("no-such", &snapshot.graph.deps).is_none());
}

#[test]
fn present_files_skip_the_network_entirely() {
    let (_dir, mut store, fetcher) = setup();
    store.ensure_loaded(&fetcher, false).unwrap();
    let calls_after_ingest = fetcher.call_count();
    assert_eq!(calls_after_ingest, 2); // repomd + compressed index

    // Files exist and a snapshot is loaded: nothing more to do
    store.ensure_loaded(&fetcher, false).unwrap();
    assert_eq!(fetcher.call_count(), calls_after_ingest);
}

#[test]
fn force_refresh_refetches_and_replaces_the_snapshot() {
    let (_dir, mut store, fetcher) = setup();
    store.ensure_loaded(&fetcher, false).unwrap();
    store.ensure_loaded(&fetcher, true).unwrap();
    assert_eq!(fetcher.call_count(), 4);
    assert!(store.snapshot().is_some());
}

#[test]
fn failed_refresh_keeps_the_previous_snapshot() {
    let (dir, mut store, fetcher) = setup();
    store.ensure_loaded(&fetcher, false).unwrap();

    // Second refresh serves an uncompressed (unsupported) index payload
    let broken = MockFetcher::new()
        .with_response(
            &format!("{BASE}repodata/repomd.xml"),
            common::repomd_xml("repodata/primary.xml.gz"),
        )
        .with_response(&format!("{BASE}repodata/primary.xml.gz"), "plain text");
    assert!(store.ensure_loaded(&broken, true).is_err());

    // The earlier snapshot is still there and still answers queries
    let snapshot = store.snapshot().unwrap();
    assert!(resolve("app", &snapshot.graph.deps).is_some());
    drop(dir);
}

#[test]
fn cleanup_removes_files_and_drops_the_snapshot() {
    let (dir, mut store, fetcher) = setup();
    store.ensure_loaded(&fetcher, false).unwrap();
    store.cleanup();

    assert!(store.snapshot().is_none());
    assert!(!dir.path().join("repomd.xml").exists());
    assert!(!dir.path().join("primary.xml.gz").exists());
    assert!(!dir.path().join("primary.xml").exists());
}

#[test]
fn batch_download_isolates_per_item_failures() {
    let (dir, mut store, fetcher) = setup();
    store.ensure_loaded(&fetcher, false).unwrap();
    let snapshot = store.snapshot().unwrap();

    let names: HashSet<String> = ["app", "libx", "standalone"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let located = locate(&names, &snapshot.records, store.base_url(), true);
    assert_eq!(located.downloads.len(), 3);
    assert!(located.unresolved.is_empty());

    // The middle item (libx, by sorted order) is unreachable
    let flaky = repo_fetcher().with_failure(&format!("{BASE}Packages/l/libx-2.0-3.x86_64.rpm"));
    let summary = download_batch(&flaky, &located.downloads, &dir.path().join("rpms")).unwrap();

    assert_eq!(summary.fetched.len(), 2);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "libx-2.0-3.x86_64.rpm");
    assert!(!summary.is_complete());

    // Items one and three completed despite the failure in between
    let rpms = dir.path().join("rpms");
    assert!(rpms.join("app-1.0-1.x86_64.rpm").exists());
    assert!(rpms.join("standalone-0.5-1.noarch.rpm").exists());
    assert!(!rpms.join("libx-2.0-3.x86_64.rpm").exists());
}

#[test]
fn repeating_a_batch_skips_completed_artifacts() {
    let (dir, mut store, fetcher) = setup();
    store.ensure_loaded(&fetcher, false).unwrap();
    let snapshot = store.snapshot().unwrap();

    let names: HashSet<String> = ["app", "libx"].iter().map(|s| s.to_string()).collect();
    let located = locate(&names, &snapshot.records, store.base_url(), true);
    let rpms = dir.path().join("rpms");

    let first = download_batch(&fetcher, &located.downloads, &rpms).unwrap();
    assert_eq!(first.fetched.len(), 2);
    let calls_after_first = fetcher.call_count();

    // Second run: everything already present, zero network activity
    let second = download_batch(&fetcher, &located.downloads, &rpms).unwrap();
    assert_eq!(second.already_present.len(), 2);
    assert!(second.fetched.is_empty());
    assert_eq!(fetcher.call_count(), calls_after_first);
}

#[test]
fn fetch_is_idempotent_per_destination() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = repo_fetcher();
    let url = Url::parse(&format!("{BASE}Packages/a/app-1.0-1.x86_64.rpm")).unwrap();
    let dest = dir.path().join("app-1.0-1.x86_64.rpm");

    assert_eq!(fetcher.fetch(&url, &dest).unwrap(), FetchOutcome::Fetched);
    assert_eq!(
        fetcher.fetch(&url, &dest).unwrap(),
        FetchOutcome::AlreadyPresent
    );
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(fs::read(&dest).unwrap(), b"app-bytes");
}
