use std::{collections::HashMap, mem};

use data_asset::AssetId;

use crate::document::{Document, Placeholder};

/// Placeholder nodes found in the document, grouped by the asset they wait
/// for.
///
/// An id sits in the pending queue for as long as it has nodes waiting and
/// no asset has been attached to them. Ids are queued once, the first time
/// a node declaring them is seen.
#[derive(Debug)]
pub struct PlaceholderRegistry<N> {
    nodes: HashMap<AssetId, Vec<N>>,
    pending: Vec<AssetId>,
    scanned: bool,
}

impl<N> Default for PlaceholderRegistry<N> {
    fn default() -> Self {
        PlaceholderRegistry {
            nodes: HashMap::new(),
            pending: Vec::new(),
            scanned: false,
        }
    }
}

impl<N: Placeholder> PlaceholderRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every placeholder currently in the document and show the
    /// neutral image on each of them
    ///
    /// Runs once. Nodes added to the document later are not discovered.
    /// Returns the number of nodes registered.
    pub fn scan<D>(&mut self, document: &D, placeholder_src: &str) -> usize
    where
        D: Document<Node = N>,
    {
        if self.scanned {
            log::warn!("Document has already been scanned for placeholders");
            return 0;
        }
        self.scanned = true;

        let mut registered = 0;
        for node in document.placeholders() {
            if self.register(node, placeholder_src) {
                registered += 1;
            }
        }

        log::debug!(
            "{} placeholders found for {} ids",
            registered,
            self.pending.len()
        );
        registered
    }

    fn register(&mut self, node: N, placeholder_src: &str) -> bool {
        let id = match node.asset_id() {
            Some(id) => AssetId::from(id),
            None => return false,
        };

        // keeps the default broken-image border from rendering
        node.set_src(placeholder_src);

        match self.nodes.get_mut(&id) {
            Some(nodes) => nodes.push(node),
            None => {
                self.pending.push(id.clone());
                self.nodes.insert(id, vec![node]);
            }
        }
        true
    }

    /// Whether the document has been scanned
    pub fn is_scanned(&self) -> bool {
        self.scanned
    }

    /// Ids still waiting for an asset, in first-seen order
    pub fn pending(&self) -> &[AssetId] {
        &self.pending
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes waiting for the given id
    pub fn nodes(&self, id: &str) -> Option<&[N]> {
        self.nodes.get(id).map(Vec::as_slice)
    }

    pub(crate) fn take_pending(&mut self) -> Vec<AssetId> {
        mem::take(&mut self.pending)
    }

    pub(crate) fn requeue(&mut self, pending: Vec<AssetId>) {
        debug_assert!(self.pending.is_empty());
        self.pending = pending;
    }

    /// Release the nodes of a resolved id, they are not tracked any more
    pub(crate) fn release(&mut self, id: &AssetId) -> Vec<N> {
        self.nodes.remove(id).unwrap_or_default()
    }
}
