use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::cli::path_mapping::relative_dir;
use crate::discovery::filter::has_source_extension;
use crate::error::{ConversionError, ConversionResult};

/// A source document found under the input root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute (or root-joined) path of the document
    pub path: PathBuf,
    /// File name including the source extension
    pub name: OsString,
    /// Directory of the document relative to the input root
    pub relative_dir: PathBuf,
}

impl DiscoveredFile {
    /// Describe a file found under `input_root`. Returns `None` for paths without a file name.
    pub fn new(input_root: &Path, path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_os_string();
        Some(Self {
            path: path.to_path_buf(),
            name,
            relative_dir: relative_dir(input_root, path),
        })
    }
}

/// Counters collected while walking the input tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub directories: usize,
    pub matched: usize,
    pub skipped: usize,
}

/// Walk `input_root` depth-first and hand every PSD file to `visit` as soon as it is found.
///
/// Entries within a directory are visited in file-name order and subdirectories are
/// descended into when encountered. Symbolic links are not followed. Any directory that
/// cannot be listed aborts the walk.
pub fn walk<F>(input_root: &Path, mut visit: F) -> ConversionResult<WalkStats>
where
    F: FnMut(DiscoveredFile),
{
    let metadata = fs::metadata(input_root).map_err(|e| {
        ConversionError::directory_enumeration(Some(input_root.to_path_buf()), e)
    })?;
    if !metadata.is_dir() {
        return Err(ConversionError::directory_enumeration(
            Some(input_root.to_path_buf()),
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let mut stats = WalkStats::default();

    for entry in WalkDir::new(input_root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf);
            ConversionError::directory_enumeration(path, e.into())
        })?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            stats.directories += 1;
            continue;
        }

        let path = entry.path();
        if file_type.is_file() && has_source_extension(path) {
            if let Some(file) = DiscoveredFile::new(input_root, path) {
                stats.matched += 1;
                visit(file);
                continue;
            }
        }

        debug!("Skipping {}", path.display());
        stats.skipped += 1;
    }

    Ok(stats)
}

/// Collect every PSD file under `input_root` without converting anything
pub fn find_psd_files(input_root: &Path) -> ConversionResult<Vec<DiscoveredFile>> {
    let mut files = Vec::new();
    walk(input_root, |file| files.push(file))?;
    Ok(files)
}
