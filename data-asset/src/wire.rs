//! Textual wire format between the encoder and the runtime.
//!
//! A generated buffer is a program of at most two statements:
//!
//! ```text
//! BLITTER.useObjectURLs();BLITTER.parseBuffer(["a","image/png","data:image/png;base64,..."]);
//! ```
//!
//! The first statement is optional. The argument of `parseBuffer` is a
//! flat array of `id, mime, content` triples in scan order. Every element
//! is a JSON string literal, which also makes the argument a JSON array.

use std::fmt;

use data_error::{BlitError, Result};

use crate::{data_uri_prefix, AssetRecord};

/// Global object the runtime is exposed under
pub const NAMESPACE: &str = "BLITTER";
/// Statement switching the runtime into object-URL mode
pub const OBJECT_URL_STATEMENT: &str = "BLITTER.useObjectURLs();";
/// Opening of the ingestion statement
pub const INGEST_OPEN: &str = "BLITTER.parseBuffer([";
/// Closing of the ingestion statement
pub const INGEST_CLOSE: &str = "]);";

pub const SCRIPT_OPEN: &str = r#"<script type="text/javascript">"#;
pub const SCRIPT_CLOSE: &str = "</script>";

/// Text written before the first record
pub fn preamble(use_object_urls: bool, inline: bool) -> String {
    let mut out = String::new();
    if inline {
        out.push_str(SCRIPT_OPEN);
    }
    if use_object_urls {
        out.push_str(OBJECT_URL_STATEMENT);
    }
    out.push_str(INGEST_OPEN);
    out
}

/// Text written after the last record
pub fn epilogue(inline: bool) -> String {
    let mut out = INGEST_CLOSE.to_owned();
    if inline {
        out.push_str(SCRIPT_CLOSE);
    }
    out
}

/// Everything of a record up to its base64 payload: the separator from the
/// previous record, the quoted id and MIME, and the opening of the quoted
/// data URI.
pub fn record_header(id: &str, mime: &str, first: bool) -> Result<String> {
    let mut out = String::new();
    if !first {
        out.push(',');
    }
    out.push_str(&serde_json::to_string(id)?);
    out.push(',');
    out.push_str(&serde_json::to_string(mime)?);
    out.push(',');

    let prefix = serde_json::to_string(&data_uri_prefix(mime))?;
    // keep the string literal open for the payload
    out.push_str(&prefix[..prefix.len() - 1]);
    Ok(out)
}

/// Closes the data URI literal opened by [`record_header`]
pub const RECORD_TRAILER: &str = "\"";

/// A decoded generated buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireBuffer {
    pub use_object_urls: bool,
    pub records: Vec<AssetRecord>,
}

impl WireBuffer {
    pub fn new(use_object_urls: bool, records: Vec<AssetRecord>) -> Self {
        WireBuffer {
            use_object_urls,
            records,
        }
    }

    /// Decode a generated program, with or without `<script>` wrapping
    pub fn parse(program: &str) -> Result<Self> {
        let mut rest = program.trim();
        if let Some(inner) = rest
            .strip_prefix(SCRIPT_OPEN)
            .and_then(|s| s.strip_suffix(SCRIPT_CLOSE))
        {
            rest = inner.trim();
        }

        let use_object_urls = match rest.strip_prefix(OBJECT_URL_STATEMENT) {
            Some(after) => {
                rest = after;
                true
            }
            None => false,
        };

        let array = rest
            .strip_prefix("BLITTER.parseBuffer(")
            .and_then(|s| s.strip_suffix(");"))
            .ok_or_else(|| {
                BlitError::Parse(
                    "Buffer is not a single parseBuffer invocation".to_owned(),
                )
            })?;

        let flat: Vec<String> = serde_json::from_str(array)?;
        if flat.len() % 3 != 0 {
            return Err(BlitError::Parse(format!(
                "Buffer holds {} strings, expected triples",
                flat.len()
            )));
        }

        let mut records = Vec::with_capacity(flat.len() / 3);
        let mut strings = flat.into_iter();
        while let (Some(id), Some(mime), Some(content)) =
            (strings.next(), strings.next(), strings.next())
        {
            records.push(AssetRecord::new(id, mime, content));
        }

        log::debug!(
            "Parsed buffer with {} records (object URLs: {})",
            records.len(),
            use_object_urls
        );

        Ok(WireBuffer {
            use_object_urls,
            records,
        })
    }
}

impl fmt::Display for WireBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&preamble(self.use_object_urls, false))?;
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            let triple = [
                record.id.as_str(),
                record.mime.as_str(),
                record.content.as_str(),
            ];
            let quoted =
                serde_json::to_string(&triple).map_err(|_| fmt::Error)?;
            // strip the brackets, the triple is spliced into the flat array
            f.write_str(&quoted[1..quoted.len() - 1])?;
        }
        f.write_str(&epilogue(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WireBuffer {
        WireBuffer::new(
            true,
            vec![
                AssetRecord::from_bytes("a", "image/png", b"png bytes"),
                AssetRecord::from_bytes("b", "image/gif", b"gif bytes"),
            ],
        )
    }

    #[test]
    fn program_has_at_most_two_statements() {
        let program = sample().to_string();
        assert!(program.starts_with(
            "BLITTER.useObjectURLs();BLITTER.parseBuffer([\"a\",\"image/png\",\"data:image/png;base64,"
        ));
        assert!(program.ends_with("\"]);"));
        assert_eq!(program.matches(");").count(), 2);

        let plain = WireBuffer::new(false, vec![]).to_string();
        assert_eq!(plain, "BLITTER.parseBuffer([]);");
    }

    #[test]
    fn parse_reads_back_displayed_buffer() {
        let buffer = sample();
        let parsed = WireBuffer::parse(&buffer.to_string()).unwrap();
        assert_eq!(parsed, buffer);
    }

    #[test]
    fn parse_accepts_script_wrapping() {
        let program = format!(
            "{}BLITTER.parseBuffer([\"x\",\"image/png\",\"data:image/png;base64,AA==\"]);{}\n",
            SCRIPT_OPEN, SCRIPT_CLOSE
        );
        let parsed = WireBuffer::parse(&program).unwrap();
        assert!(!parsed.use_object_urls);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].id.as_str(), "x");
    }

    #[test]
    fn parse_rejects_incomplete_triples() {
        let program = "BLITTER.parseBuffer([\"x\",\"image/png\"]);";
        assert!(matches!(
            WireBuffer::parse(program),
            Err(BlitError::Parse(_))
        ));
        assert!(WireBuffer::parse("alert(1);").is_err());
    }

    #[test]
    fn header_escapes_awkward_ids() {
        let header = record_header("say \"hi\"", "image/png", false).unwrap();
        assert_eq!(
            header,
            r#","say \"hi\"","image/png","data:image/png;base64,"#
        );

        let program = format!(
            "{}{}AA=={}{}",
            INGEST_OPEN,
            &header[1..],
            RECORD_TRAILER,
            INGEST_CLOSE
        );
        let parsed = WireBuffer::parse(&program).unwrap();
        assert_eq!(parsed.records[0].id.as_str(), "say \"hi\"");
    }
}
