//! # Data Asset
//!
//! `data-asset` holds the types shared by the build-time encoder and the
//! page runtime: asset identifiers, asset records, the extension based MIME
//! table and the textual wire format that carries records from one side to
//! the other.
//!
//! The two sides never share state. The encoder writes a [`WireBuffer`]
//! program, the runtime executes it.

use core::{fmt::Display, str::FromStr};
use std::{borrow::Borrow, path::Path};

use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};

use data_error::{BlitError, Result};

pub mod mime;
pub mod wire;

pub use mime::{is_image, mime_for_path, OCTET_STREAM};
pub use wire::WireBuffer;

/// A 1x1 transparent GIF, shown by placeholder nodes until their asset
/// is attached.
pub const NEUTRAL_PLACEHOLDER: &str = "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

/// Identifier shared by a source image, its encoded record and every
/// placeholder node that asks for it.
///
/// Ids are derived from the file name of the source image with the
/// extension stripped, so `icons/logo.png` becomes `logo`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        AssetId(id.into())
    }

    /// Derive the id of the asset stored at the given path
    pub fn from_path<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let path = file_path.as_ref();
        let stem = path.file_stem().ok_or_else(|| {
            BlitError::Config(format!(
                "{} has no file name to derive an asset id from",
                path.display()
            ))
        })?;
        let stem = stem.to_str().ok_or_else(|| {
            BlitError::Config(format!(
                "File name of {} is not valid UTF-8",
                path.display()
            ))
        })?;

        Ok(AssetId(stem.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssetId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(AssetId(s.to_owned()))
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        AssetId(id.to_owned())
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        AssetId(id)
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One encoded image: `(id, mime, content)`.
///
/// At rest `content` is always a complete `data:<mime>;base64,<payload>`
/// URI. Turning it into an object URL is the runtime's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: AssetId,
    pub mime: String,
    pub content: String,
}

impl AssetRecord {
    pub fn new(
        id: impl Into<AssetId>,
        mime: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        AssetRecord {
            id: id.into(),
            mime: mime.into(),
            content: content.into(),
        }
    }

    /// Build a record from raw image bytes held in memory
    pub fn from_bytes(
        id: impl Into<AssetId>,
        mime: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        let mime = mime.into();
        let content = format!(
            "{}{}",
            data_uri_prefix(&mime),
            general_purpose::STANDARD.encode(bytes)
        );
        AssetRecord {
            id: id.into(),
            mime,
            content,
        }
    }

    /// Return the base64 payload of the data URI, if `content` is one
    pub fn payload(&self) -> Option<&str> {
        split_data_uri(&self.content).map(|(_, payload)| payload)
    }

    /// Decode the base64 payload into the original image bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        let payload = self.payload().ok_or_else(|| {
            BlitError::Parse(format!(
                "Content of {} is not a base64 data URI",
                self.id
            ))
        })?;
        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| BlitError::Parse(format!("{}: {}", self.id, e)))
    }
}

/// The `data:<mime>;base64,` prefix every record content starts with
pub fn data_uri_prefix(mime: &str) -> String {
    format!("data:{};base64,", mime)
}

/// Split a base64 data URI into its MIME and payload
pub fn split_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/icons/logo.png", "logo")]
    #[case("/icons/nested/dir/a.b.jpeg", "a.b")]
    #[case("relative/no_extension", "no_extension")]
    fn id_is_file_stem(#[case] path: &str, #[case] expected: &str) {
        let id = AssetId::from_path(path).unwrap();
        assert_eq!(id.as_str(), expected);
    }

    #[test]
    fn id_requires_file_name() {
        assert!(matches!(
            AssetId::from_path("/"),
            Err(BlitError::Config(_))
        ));
    }

    #[test]
    fn record_from_bytes_builds_data_uri() {
        let record = AssetRecord::from_bytes("dot", "image/png", b"\x89PNG");
        assert_eq!(record.content, "data:image/png;base64,iVBORw==");
        assert_eq!(record.payload(), Some("iVBORw=="));
        assert_eq!(record.decode().unwrap(), b"\x89PNG");
    }

    #[test]
    fn split_data_uri_rejects_non_base64() {
        assert_eq!(
            split_data_uri("data:image/gif;base64,AAAA"),
            Some(("image/gif", "AAAA"))
        );
        assert_eq!(split_data_uri("data:text/plain,hello"), None);
        assert_eq!(split_data_uri("blob:https://x/123"), None);
    }

    #[test]
    fn neutral_placeholder_is_a_gif() {
        let (mime, payload) = split_data_uri(NEUTRAL_PLACEHOLDER).unwrap();
        assert_eq!(mime, "image/gif");
        let bytes = general_purpose::STANDARD.decode(payload).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }
}
