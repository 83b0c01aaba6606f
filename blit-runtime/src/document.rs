/// A placeholder image element owned by the host document.
///
/// The registry holds these as non-owning handles: it never creates or
/// destroys elements, it only reads the id attribute and rewrites `src`.
pub trait Placeholder {
    /// Value of the `blit-id` attribute, `None` when it is absent
    fn asset_id(&self) -> Option<String>;

    /// Point the element at a new image source
    fn set_src(&self, src: &str);
}

/// The host capabilities the runtime needs from a page.
pub trait Document {
    type Node: Placeholder;
    /// Binary object backing an object URL
    type Blob;

    /// All elements matching [`crate::PLACEHOLDER_SELECTOR`], in document
    /// order
    fn placeholders(&self) -> Vec<Self::Node>;

    /// Wrap decoded image bytes in a binary document resource
    fn create_blob(&self, mime: &str, bytes: &[u8]) -> Option<Self::Blob>;

    /// Register a transient URL for a blob, scoped to the document
    fn create_object_url(&self, blob: &Self::Blob) -> Option<String>;
}
