use std::path::Path;

/// MIME used for image files whose extension has no registered type
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extensions treated as images, with the MIME each one is served as.
///
/// Entries without a MIME are still images, they are just encoded as
/// [`OCTET_STREAM`].
const IMAGE_EXTENSIONS: &[(&str, Option<&str>)] = &[
    ("apng", Some("image/apng")),
    ("avif", Some("image/avif")),
    ("bmp", Some("image/bmp")),
    ("cur", Some("image/x-icon")),
    ("dds", None),
    ("dib", Some("image/bmp")),
    ("gif", Some("image/gif")),
    ("heic", Some("image/heic")),
    ("heif", Some("image/heif")),
    ("icns", Some("image/icns")),
    ("ico", Some("image/x-icon")),
    ("jfif", Some("image/jpeg")),
    ("jng", Some("image/x-jng")),
    ("jp2", Some("image/jp2")),
    ("jpe", Some("image/jpeg")),
    ("jpeg", Some("image/jpeg")),
    ("jpg", Some("image/jpeg")),
    ("jxl", Some("image/jxl")),
    ("ktx", Some("image/ktx")),
    ("pbm", Some("image/x-portable-bitmap")),
    ("pgm", Some("image/x-portable-graymap")),
    ("pjp", Some("image/jpeg")),
    ("pjpeg", Some("image/jpeg")),
    ("png", Some("image/png")),
    ("ppm", Some("image/x-portable-pixmap")),
    ("psd", Some("image/vnd.adobe.photoshop")),
    ("svg", Some("image/svg+xml")),
    ("tga", Some("image/x-tga")),
    ("tif", Some("image/tiff")),
    ("tiff", Some("image/tiff")),
    ("webp", Some("image/webp")),
    ("xbm", Some("image/x-xbitmap")),
];

fn lookup(path: &Path) -> Option<Option<&'static str>> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .binary_search_by(|(ext, _)| (*ext).cmp(extension.as_str()))
        .ok()
        .map(|i| IMAGE_EXTENSIONS[i].1)
}

/// Whether the file at `path` is an image, judged by its extension only
pub fn is_image<P: AsRef<Path>>(path: P) -> bool {
    lookup(path.as_ref()).is_some()
}

/// MIME type of the file at `path`, [`OCTET_STREAM`] when unknown
pub fn mime_for_path<P: AsRef<Path>>(path: P) -> &'static str {
    lookup(path.as_ref())
        .flatten()
        .unwrap_or(OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn table_is_sorted() {
        assert!(IMAGE_EXTENSIONS
            .windows(2)
            .all(|pair| pair[0].0 < pair[1].0));
    }

    #[rstest]
    #[case("a.png", "image/png")]
    #[case("a.PNG", "image/png")]
    #[case("dir/b.jpg", "image/jpeg")]
    #[case("c.svg", "image/svg+xml")]
    #[case("d.dds", OCTET_STREAM)]
    #[case("e.txt", OCTET_STREAM)]
    #[case("no_extension", OCTET_STREAM)]
    fn mime_lookup(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(mime_for_path(path), expected);
    }

    #[rstest]
    #[case("a.png", true)]
    #[case("a.Jpeg", true)]
    #[case("d.dds", true)]
    #[case("notes.txt", false)]
    #[case(".hidden", false)]
    #[case("README", false)]
    fn image_classification(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_image(path), expected);
    }
}
