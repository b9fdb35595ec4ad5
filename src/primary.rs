// src/primary.rs
//! Primary package index parsing
//!
//! Parses the decompressed primary index into flat `PackageRecord`s. The
//! whole document is read into memory before resolution begins; there is
//! no streaming path. Records without a `<name>` are skipped entirely.

use std::collections::HashSet;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::repomd::attribute;
use crate::version::Evr;

/// One `<package>` element of the primary index.
///
/// Multiple records may share a name (distinct published versions).
/// `version` is `None` when the version element is absent or carries a
/// malformed epoch; such a record still participates in the capability
/// graph but cannot be located for download.
#[derive(Debug, Clone, Default)]
pub struct PackageRecord {
    pub name: String,
    pub version: Option<Evr>,
    pub location_href: Option<String>,
    /// Whether the record carried a `<format>` block at all
    pub has_format: bool,
    pub provides: HashSet<String>,
    pub requires: HashSet<String>,
    pub weak_requires: HashSet<String>,
}

/// Which capability list an `<entry>` element belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Provides,
    Requires,
    WeakRequires,
}

/// Parse the decompressed primary index document.
///
/// Malformed XML aborts the whole load; a previously built snapshot is
/// the caller's to keep.
pub fn parse_primary(xml: &str) -> Result<Vec<PackageRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();

    let mut current: Option<PackageRecord> = None;
    let mut section: Option<Section> = None;
    let mut in_name = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::ParseError(format!(
                "Malformed primary index at offset {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        let is_start = matches!(&event, Event::Start(_));
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"package" => {
                        current = Some(PackageRecord::default());
                        section = None;
                    }
                    // The package name is the bare <name> element with text
                    // content; a self-closing <name/> has none to capture.
                    b"name" if section.is_none() => {
                        in_name = current.is_some() && is_start;
                    }
                    b"version" => {
                        if let Some(record) = current.as_mut() {
                            record.version = parse_version(e)?;
                        }
                    }
                    b"location" => {
                        if let Some(record) = current.as_mut() {
                            record.location_href = attribute(e, b"href")?;
                        }
                    }
                    b"format" => {
                        if let Some(record) = current.as_mut() {
                            record.has_format = true;
                        }
                    }
                    b"provides" => section = Some(Section::Provides),
                    b"requires" => section = Some(Section::Requires),
                    b"weakrequires" => section = Some(Section::WeakRequires),
                    b"entry" => {
                        if let (Some(record), Some(section)) = (current.as_mut(), section) {
                            if let Some(capability) = attribute(e, b"name")? {
                                let set = match section {
                                    Section::Provides => &mut record.provides,
                                    Section::Requires => &mut record.requires,
                                    Section::WeakRequires => &mut record.weak_requires,
                                };
                                set.insert(capability);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                if in_name {
                    let text = e.unescape().map_err(|e| {
                        Error::ParseError(format!("Malformed text in primary index: {}", e))
                    })?;
                    if let Some(record) = current.as_mut() {
                        record.name.push_str(text.trim());
                    }
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"package" => {
                    if let Some(record) = current.take() {
                        if record.name.is_empty() {
                            debug!("Skipping package record without a name");
                        } else {
                            records.push(record);
                        }
                    }
                    section = None;
                    in_name = false;
                }
                b"name" => in_name = false,
                b"provides" | b"requires" | b"weakrequires" => section = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    debug!("Parsed {} package records from primary index", records.len());
    Ok(records)
}

/// Read the (epoch, ver, rel) attributes of a `<version>` element.
///
/// A missing epoch defaults to 0; a malformed epoch makes the whole
/// version unusable (the record stays, its artifact cannot be located).
fn parse_version(e: &quick_xml::events::BytesStart<'_>) -> Result<Option<Evr>> {
    let ver = match attribute(e, b"ver")? {
        Some(v) => v,
        None => return Ok(None),
    };
    let rel = attribute(e, b"rel")?.unwrap_or_default();
    let epoch = match attribute(e, b"epoch")? {
        Some(raw) => match raw.parse::<u64>() {
            Ok(epoch) => epoch,
            Err(_) => {
                warn!("Ignoring version with malformed epoch '{}'", raw);
                return Ok(None);
            }
        },
        None => 0,
    };
    Ok(Some(Evr::new(epoch, ver, rel)))
}
