//! Browser bindings, enabled with the `web` feature.
//!
//! The generated buffer calls into a global `BLITTER` object. The page
//! creates it before the buffer script runs:
//!
//! ```text
//! window.BLITTER = new Blitter();
//! ```

use js_sys::{Array, Uint8Array};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{Blob, BlobPropertyBag, Element, Url};

use data_asset::AssetRecord;

use crate::{
    Blitter, Document, Placeholder, ID_ATTRIBUTE, PLACEHOLDER_SELECTOR,
};

/// The page document, reached through `web-sys`
#[derive(Clone, Debug)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        WebDocument { document }
    }

    /// Document of the current window, if there is one
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(WebDocument::new(document))
    }
}

impl Placeholder for Element {
    fn asset_id(&self) -> Option<String> {
        self.get_attribute(ID_ATTRIBUTE)
    }

    fn set_src(&self, src: &str) {
        if let Err(err) = self.set_attribute("src", src) {
            log::warn!("Could not set src: {:?}", err);
        }
    }
}

impl Document for WebDocument {
    type Node = Element;
    type Blob = Blob;

    fn placeholders(&self) -> Vec<Element> {
        let nodes = match self.document.query_selector_all(PLACEHOLDER_SELECTOR)
        {
            Ok(nodes) => nodes,
            Err(err) => {
                log::warn!("Placeholder query failed: {:?}", err);
                return Vec::new();
            }
        };

        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn create_blob(&self, mime: &str, bytes: &[u8]) -> Option<Blob> {
        let parts = Array::of1(&Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(mime);

        Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|err| log::warn!("Could not create blob: {:?}", err))
            .ok()
    }

    fn create_object_url(&self, blob: &Blob) -> Option<String> {
        Url::create_object_url_with_blob(blob)
            .map_err(|err| log::warn!("Could not create object URL: {:?}", err))
            .ok()
    }
}

/// JavaScript face of a [`Blitter`] session, mirroring the calls a
/// generated buffer makes.
#[wasm_bindgen(js_name = Blitter)]
pub struct BlitterHandle {
    inner: Blitter<WebDocument>,
}

#[wasm_bindgen(js_class = Blitter)]
impl BlitterHandle {
    /// Scan the current document for placeholders
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<BlitterHandle, JsValue> {
        let document = WebDocument::from_window()
            .ok_or_else(|| JsValue::from_str("No document to scan"))?;
        Ok(BlitterHandle {
            inner: Blitter::new(document),
        })
    }

    #[wasm_bindgen(js_name = useObjectURLs)]
    pub fn use_object_urls(&mut self) {
        self.inner.use_object_urls();
    }

    #[wasm_bindgen(js_name = isUsingObjectURLs)]
    pub fn is_using_object_urls(&self) -> bool {
        self.inner.is_using_object_urls()
    }

    /// Ingest a flat `[id, mime, content, ...]` array
    #[wasm_bindgen(js_name = parseBuffer)]
    pub fn parse_buffer(&mut self, buffer: Array) {
        let strings: Vec<String> =
            buffer.iter().filter_map(|v| v.as_string()).collect();
        let records = strings
            .chunks_exact(3)
            .map(|triple| {
                AssetRecord::new(
                    triple[0].as_str(),
                    triple[1].as_str(),
                    triple[2].as_str(),
                )
            })
            .collect::<Vec<_>>();

        self.inner.ingest(records);
    }

    #[wasm_bindgen(js_name = hasMIME)]
    pub fn has_mime(&self, id: &str) -> bool {
        self.inner.has_mime(id)
    }

    /// MIME of an asset, empty when unknown
    #[wasm_bindgen(js_name = getMIME)]
    pub fn get_mime(&self, id: &str) -> String {
        self.inner
            .get_mime(id)
            .unwrap_or_default()
            .to_owned()
    }

    #[wasm_bindgen(js_name = hasBlob)]
    pub fn has_blob(&self, id: &str) -> bool {
        self.inner.has_blob(id)
    }

    #[wasm_bindgen(js_name = getBlob)]
    pub fn get_blob(&self, id: &str) -> Option<Blob> {
        self.inner.get_blob(id).cloned()
    }

    #[wasm_bindgen(js_name = hasImageData)]
    pub fn has_image_data(&self, id: &str) -> bool {
        self.inner.has_image_data(id)
    }

    #[wasm_bindgen(js_name = getImageData)]
    pub fn get_image_data(&self, id: &str) -> String {
        self.inner.get_image_data(id).to_owned()
    }
}
