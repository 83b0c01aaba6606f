use std::collections::HashMap;

use data_asset::{AssetId, AssetRecord, NEUTRAL_PLACEHOLDER};

use crate::document::Document;

/// Decoded assets of one page session, keyed by id.
///
/// The first record seen for an id wins; later records with the same id
/// are ignored, so parsing a buffer twice costs no extra decoding.
#[derive(Debug)]
pub struct AssetRegistry<B> {
    /// Value assigned to `src`: the data URI, or an object URL
    sources: HashMap<AssetId, String>,
    mimes: HashMap<AssetId, String>,
    blobs: HashMap<AssetId, B>,
    using_object_urls: bool,
    placeholder_src: String,
}

impl<B> Default for AssetRegistry<B> {
    fn default() -> Self {
        AssetRegistry {
            sources: HashMap::new(),
            mimes: HashMap::new(),
            blobs: HashMap::new(),
            using_object_urls: false,
            placeholder_src: NEUTRAL_PLACEHOLDER.to_owned(),
        }
    }
}

impl<B> AssetRegistry<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store assets as object URLs from now on
    ///
    /// One-way. Assets ingested before the switch keep their data URIs, so
    /// callers must switch before ingesting.
    pub fn enable_object_urls<D>(&mut self, document: &D)
    where
        D: Document<Blob = B>,
    {
        if self.using_object_urls {
            return;
        }
        self.using_object_urls = true;

        if !self.sources.is_empty() {
            log::warn!(
                "Object URLs enabled after {} assets were stored as data URIs",
                self.sources.len()
            );
        }

        let placeholder = AssetRecord::new("", "image/gif", NEUTRAL_PLACEHOLDER);
        if let Some((_blob, url)) = materialize(&placeholder, document) {
            self.placeholder_src = url;
        }
    }

    /// Store every record whose id is not known yet
    ///
    /// Returns the number of newly stored assets.
    pub fn ingest<D, I>(&mut self, records: I, document: &D) -> usize
    where
        D: Document<Blob = B>,
        I: IntoIterator<Item = AssetRecord>,
    {
        let mut added = 0;
        for record in records {
            if self.sources.contains_key(&record.id) {
                log::trace!("Asset {} is already registered", record.id);
                continue;
            }

            let source = if self.using_object_urls {
                match materialize(&record, document) {
                    Some((blob, url)) => {
                        self.blobs.insert(record.id.clone(), blob);
                        url
                    }
                    None => {
                        log::warn!(
                            "Could not create an object URL for {}, keeping its data URI",
                            record.id
                        );
                        record.content
                    }
                }
            } else {
                record.content
            };

            self.sources.insert(record.id.clone(), source);
            self.mimes.insert(record.id, record.mime);
            added += 1;
        }

        log::debug!("{} assets added, {} known", added, self.sources.len());
        added
    }

    pub fn is_using_object_urls(&self) -> bool {
        self.using_object_urls
    }

    /// Source shown by placeholders until their asset arrives
    pub fn placeholder_src(&self) -> &str {
        &self.placeholder_src
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn has_image_data(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn image_data(&self, id: &str) -> Option<&str> {
        self.sources.get(id).map(String::as_str)
    }

    pub fn has_mime(&self, id: &str) -> bool {
        self.mimes.contains_key(id)
    }

    pub fn mime(&self, id: &str) -> Option<&str> {
        self.mimes.get(id).map(String::as_str)
    }

    pub fn has_blob(&self, id: &str) -> bool {
        self.blobs.contains_key(id)
    }

    pub fn blob(&self, id: &str) -> Option<&B> {
        self.blobs.get(id)
    }
}

fn materialize<D: Document>(
    record: &AssetRecord,
    document: &D,
) -> Option<(D::Blob, String)> {
    let bytes = record
        .decode()
        .map_err(|e| log::warn!("{}", e))
        .ok()?;
    let blob = document.create_blob(&record.mime, &bytes)?;
    let url = document.create_object_url(&blob)?;
    Some((blob, url))
}
