// tests/common/mod.rs

//! Shared fixtures and helpers for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::Path;

use repodeps::{Error, Fetcher, Result};
use url::Url;

/// In-memory transport: a URL-to-bytes map plus a recorded call log.
///
/// `download` writes the mapped bytes to the destination; URLs marked
/// as failing return a `DownloadError`; unmapped URLs behave like 404s.
pub struct MockFetcher {
    responses: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    pub calls: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            failing: HashSet::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.to_string(), body.into());
        self
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Fetcher for MockFetcher {
    fn download(&self, url: &Url, dest: &Path) -> Result<()> {
        self.calls.borrow_mut().push(url.to_string());
        if self.failing.contains(url.as_str()) {
            return Err(Error::DownloadError(format!("unreachable: {url}")));
        }
        let body = self
            .responses
            .get(url.as_str())
            .ok_or_else(|| Error::DownloadError(format!("HTTP 404 from {url}")))?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, body)?;
        Ok(())
    }
}

/// Repository description pointing at one primary index
pub fn repomd_xml(primary_href: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<repomd xmlns="http://linux.duke.edu/metadata/repo">
  <revision>1700000000</revision>
  <data type="filelists">
    <location href="repodata/filelists.xml.gz"/>
  </data>
  <data type="primary">
    <checksum type="sha256">0000</checksum>
    <location href="{primary_href}"/>
  </data>
</repomd>"#
    )
}

/// Primary index with three packages:
/// - `app` requires the capability `libx.so` and provides `app`
/// - `libx` provides `libx.so`, requires nothing
/// - `standalone` has no format block at all
pub fn primary_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://linux.duke.edu/metadata/common"
          xmlns:rpm="http://linux.duke.edu/metadata/rpm" packages="3">
  <package type="rpm">
    <name>app</name>
    <arch>x86_64</arch>
    <version epoch="0" ver="1.0" rel="1"/>
    <location href="Packages/a/app-1.0-1.x86_64.rpm"/>
    <format>
      <rpm:provides>
        <rpm:entry name="app"/>
      </rpm:provides>
      <rpm:requires>
        <rpm:entry name="libx.so"/>
      </rpm:requires>
    </format>
  </package>
  <package type="rpm">
    <name>libx</name>
    <arch>x86_64</arch>
    <version epoch="0" ver="2.0" rel="3"/>
    <location href="Packages/l/libx-2.0-3.x86_64.rpm"/>
    <format>
      <rpm:provides>
        <rpm:entry name="libx.so"/>
      </rpm:provides>
    </format>
  </package>
  <package type="rpm">
    <name>standalone</name>
    <arch>noarch</arch>
    <version epoch="0" ver="0.5" rel="1"/>
    <location href="Packages/s/standalone-0.5-1.noarch.rpm"/>
  </package>
</metadata>"#
        .to_string()
}

/// Gzip a payload the way a repository would publish its index
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
