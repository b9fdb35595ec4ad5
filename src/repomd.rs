// src/repomd.rs
//! Repository-description (`repomd.xml`) parsing
//!
//! The repository description lists the repository's metadata documents.
//! The engine only needs one thing from it: the location href of the
//! entry whose declared type is "primary".

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::error::{Error, Result};

/// Extract the `<location href>` of the `<data type="primary">` entry.
///
/// Namespace prefixes are ignored; elements are matched by local name.
/// A missing primary entry is a hard parse failure: without it the
/// package index cannot be located.
pub fn primary_location(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut in_primary = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                match e.local_name().as_ref() {
                    b"data" => {
                        in_primary = attribute(e, b"type")?.as_deref() == Some("primary");
                    }
                    b"location" if in_primary => {
                        if let Some(href) = attribute(e, b"href")? {
                            debug!("Primary index location: {}", href);
                            return Ok(href);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"data" {
                    in_primary = false;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::ParseError(format!(
                    "Malformed repomd.xml at offset {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    Err(Error::ParseError(
        "No primary entry found in repomd.xml".to_string(),
    ))
}

/// Read one attribute from an element by local key name, unescaped.
pub(crate) fn attribute(
    e: &quick_xml::events::BytesStart<'_>,
    key: &[u8],
) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr =
            attr.map_err(|e| Error::ParseError(format!("Malformed XML attribute: {}", e)))?;
        if attr.key.local_name().as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::ParseError(format!("Malformed XML attribute value: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
