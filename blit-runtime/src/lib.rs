//! # Blit Runtime
//!
//! Page-side half of deferred image delivery. A [`Blitter`] scans the
//! document for `<img blit-id="...">` placeholders as soon as it is
//! created, shows a neutral transparent image on each of them, and
//! attaches the real image data whenever a generated buffer is ingested.
//!
//! Placeholders and assets may turn up in any order. Every node is
//! rewritten exactly twice over its lifetime: once to the neutral image,
//! once to its asset. Ids whose asset never arrives simply stay pending.
//!
//! The host page is reached through the [`Document`] and [`Placeholder`]
//! traits. With the `web` feature, [`web::WebDocument`] implements them on
//! top of `web-sys`.

use data_asset::{AssetId, AssetRecord, WireBuffer};

mod assets;
mod document;
mod placeholders;
mod reconcile;
#[cfg(feature = "web")]
pub mod web;

pub use assets::AssetRegistry;
pub use document::{Document, Placeholder};
pub use placeholders::PlaceholderRegistry;
pub use reconcile::reconcile;

/// Attribute declaring which asset a placeholder waits for
pub const ID_ATTRIBUTE: &str = "blit-id";
/// Selector matching every placeholder node
pub const PLACEHOLDER_SELECTOR: &str = "img[blit-id]";

/// Result of one ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Number of assets stored by the ingestion
    pub added: usize,
    /// Ids attached to their placeholders by the following pass
    pub resolved: Vec<AssetId>,
}

/// One page session: the placeholder registry, the asset registry and the
/// document they act on.
///
/// A single instance per page is enough. On a multi-threaded host, wrap
/// the whole session in one lock so every public operation runs under the
/// same exclusion.
pub struct Blitter<D: Document> {
    document: D,
    placeholders: PlaceholderRegistry<D::Node>,
    assets: AssetRegistry<D::Blob>,
}

impl<D: Document> Blitter<D> {
    /// Create the session and scan the document right away
    pub fn new(document: D) -> Self {
        let mut placeholders = PlaceholderRegistry::new();
        let assets = AssetRegistry::new();
        placeholders.scan(&document, assets.placeholder_src());

        Blitter {
            document,
            placeholders,
            assets,
        }
    }

    /// Switch to object-URL storage, see [`AssetRegistry::enable_object_urls`]
    pub fn use_object_urls(&mut self) {
        self.assets.enable_object_urls(&self.document);
    }

    pub fn is_using_object_urls(&self) -> bool {
        self.assets.is_using_object_urls()
    }

    /// Store new assets, then attach whatever became available
    ///
    /// The reconciliation pass runs even when nothing new was stored.
    pub fn ingest<I>(&mut self, records: I) -> Reconciliation
    where
        I: IntoIterator<Item = AssetRecord>,
    {
        let added = self.assets.ingest(records, &self.document);
        let resolved = self.reconcile();
        Reconciliation { added, resolved }
    }

    /// Execute a generated buffer: optional mode switch, then ingestion
    pub fn run(&mut self, buffer: WireBuffer) -> Reconciliation {
        if buffer.use_object_urls {
            self.use_object_urls();
        }
        self.ingest(buffer.records)
    }

    /// Attach available assets to pending placeholders
    pub fn reconcile(&mut self) -> Vec<AssetId> {
        reconcile(&mut self.placeholders, &self.assets)
    }

    /// Ids with waiting placeholders and no asset yet
    pub fn pending(&self) -> &[AssetId] {
        self.placeholders.pending()
    }

    pub fn has_mime(&self, id: &str) -> bool {
        self.assets.has_mime(id)
    }

    /// Original MIME of an asset, whatever the storage mode
    pub fn get_mime(&self, id: &str) -> Option<&str> {
        self.assets.mime(id)
    }

    pub fn has_blob(&self, id: &str) -> bool {
        self.assets.has_blob(id)
    }

    pub fn get_blob(&self, id: &str) -> Option<&D::Blob> {
        self.assets.blob(id)
    }

    pub fn has_image_data(&self, id: &str) -> bool {
        self.assets.has_image_data(id)
    }

    /// Source of an asset, or the neutral placeholder if it is unknown
    pub fn get_image_data(&self, id: &str) -> &str {
        self.assets
            .image_data(id)
            .unwrap_or_else(|| self.assets.placeholder_src())
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn placeholders(&self) -> &PlaceholderRegistry<D::Node> {
        &self.placeholders
    }

    pub fn assets(&self) -> &AssetRegistry<D::Blob> {
        &self.assets
    }
}
