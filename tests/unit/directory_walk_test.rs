use std::fs::{self, File};
use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use psd2png::discovery::{find_psd_files, walk};
use psd2png::ConversionError;
use tempfile::TempDir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    File::create(path).unwrap();
}

#[test]
fn test_every_matching_file_found_once_regardless_of_depth() {
    let td = TempDir::new().unwrap();
    touch(td.path(), "one.psd");
    touch(td.path(), "d1/two.PSD");
    touch(td.path(), "d1/d2/d3/d4/three.psd");
    touch(td.path(), "d1/readme.md");
    touch(td.path(), "d1/d2/image.png");
    fs::create_dir_all(td.path().join("empty/child")).unwrap();

    let mut names: Vec<String> = find_psd_files(td.path())
        .unwrap()
        .into_iter()
        .map(|f| f.name.to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(names, vec!["one.psd", "three.psd", "two.PSD"]);
}

#[test]
fn test_relative_dirs_are_recorded() {
    let td = TempDir::new().unwrap();
    touch(td.path(), "a/b/pic.psd");

    let files = find_psd_files(td.path()).unwrap();
    assert_eq!(files[0].relative_dir, PathBuf::from("a/b"));
    assert_eq!(files[0].path, td.path().join("a/b/pic.psd"));
}

#[test]
fn test_empty_tree_yields_nothing() {
    let td = TempDir::new().unwrap();
    let mut visits = 0;
    let stats = walk(td.path(), |_| visits += 1).unwrap();

    assert_eq!(visits, 0);
    assert_eq!(stats.matched, 0);
}

#[test]
fn test_missing_root_reports_enumeration_failure() {
    let td = TempDir::new().unwrap();
    let result = find_psd_files(&td.path().join("nope"));
    assert_matches!(result, Err(ConversionError::DirectoryEnumeration { .. }));
}

#[cfg(unix)]
#[test]
fn test_symlinked_directories_are_not_followed() {
    let td = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    touch(outside.path(), "linked.psd");
    std::os::unix::fs::symlink(outside.path(), td.path().join("link")).unwrap();
    touch(td.path(), "real.psd");

    let files = find_psd_files(td.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "real.psd");
}
