use std::path::Path;

/// Extension of the layered source documents
pub const SOURCE_EXTENSION: &str = "psd";

/// Extension of the exported raster images
pub const TARGET_EXTENSION: &str = "png";

/// Return true if the file name ends with `.psd`, ignoring ASCII case
pub fn has_source_extension(path: &Path) -> bool {
    path.file_name().is_some_and(|name| {
        let bytes = name.as_encoded_bytes();
        let suffix = SOURCE_EXTENSION.len() + 1;
        bytes.len() >= suffix && {
            let tail = &bytes[bytes.len() - suffix..];
            tail[0] == b'.' && tail[1..].eq_ignore_ascii_case(SOURCE_EXTENSION.as_bytes())
        }
    })
}
