use data_asset::AssetId;

use crate::{
    assets::AssetRegistry,
    document::Placeholder,
    placeholders::PlaceholderRegistry,
};

/// Attach every available asset to the nodes waiting for it.
///
/// Walks the pending queue once. Resolved ids lose their node entries and
/// are never visited again; the rest are carried into the next queue in
/// their current order. Returns the ids resolved by this pass.
pub fn reconcile<N, B>(
    placeholders: &mut PlaceholderRegistry<N>,
    assets: &AssetRegistry<B>,
) -> Vec<AssetId>
where
    N: Placeholder,
{
    let pending = placeholders.take_pending();
    if pending.is_empty() {
        return Vec::new();
    }

    let mut carried = Vec::with_capacity(pending.len());
    let mut resolved = Vec::new();
    for id in pending {
        match assets.image_data(id.as_str()) {
            Some(src) => {
                for node in placeholders.release(&id) {
                    node.set_src(src);
                }
                log::trace!("Asset {} attached", id);
                resolved.push(id);
            }
            None => carried.push(id),
        }
    }

    log::debug!(
        "{} ids resolved, {} still pending",
        resolved.len(),
        carried.len()
    );
    placeholders.requeue(carried);
    resolved
}
