use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::discovery::filter::{has_source_extension, SOURCE_EXTENSION, TARGET_EXTENSION};
use crate::discovery::DiscoveredFile;

/// Where a converted document is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// Mirrored folder under the output root, created before writing
    pub folder: PathBuf,
    /// PNG file inside `folder`
    pub file: PathBuf,
}

/// Directory of `input_file` relative to `input_root`.
/// Files outside the root keep their own parent directory.
pub fn relative_dir(input_root: &Path, input_file: &Path) -> PathBuf {
    let parent = input_file.parent().unwrap_or(Path::new(""));
    parent
        .strip_prefix(input_root)
        .unwrap_or(parent)
        .to_path_buf()
}

/// Replace a trailing `.psd` (any case) with `.png`
pub fn target_file_name(name: &OsStr) -> OsString {
    let path = Path::new(name);
    if !has_source_extension(path) {
        return name.to_os_string();
    }
    if name.len() == SOURCE_EXTENSION.len() + 1 {
        // bare ".psd" has no stem for with_extension to keep
        return OsString::from(format!(".{}", TARGET_EXTENSION));
    }
    path.with_extension(TARGET_EXTENSION).into_os_string()
}

/// Map a discovered document onto its output folder and PNG path.
/// This preserves the input directory structure relative to the input root.
pub fn output_target(output_root: &Path, file: &DiscoveredFile) -> OutputTarget {
    let folder = output_root.join(&file.relative_dir);
    let file = folder.join(target_file_name(&file.name));
    OutputTarget { folder, file }
}

/// Map an input document path straight to its PNG path
pub fn map_input_to_output(input_root: &Path, input_file: &Path, output_root: &Path) -> PathBuf {
    let name = input_file.file_name().unwrap_or_default();
    output_root
        .join(relative_dir(input_root, input_file))
        .join(target_file_name(name))
}
