//! Loading zipped `.idml` packages and temporary directory lifecycle

mod common;

use std::fs;

use common::{init_logging, Fixture};
use idml_layout::error::ErrorPhase;
use idml_layout::{load_idml, DocumentSummary, IdmlError, IdmlLoader};

#[test]
fn test_package_matches_directory() {
    init_logging();
    let (_zip_dir, package) = Fixture::sample().write_zip();
    let from_zip = load_idml(&package).unwrap();

    let dir = Fixture::sample().write_dir();
    let from_dir = load_idml(dir.path()).unwrap();

    assert_eq!(from_zip.spreads, from_dir.spreads);
    assert_eq!(from_zip.stories, from_dir.stories);
    assert_eq!(from_zip.colors, from_dir.colors);
}

#[test]
fn test_release_removes_temp_dir_once() {
    let (_zip_dir, package) = Fixture::sample().write_zip();
    let mut doc = IdmlLoader::new().load_package(&package).unwrap();

    let temp = doc.temp_dir().unwrap().to_path_buf();
    assert!(temp.join("designmap.xml").is_file());
    assert_eq!(doc.base_path, temp);
    assert!(temp
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("idml_")));

    doc.release().unwrap();
    assert!(!temp.exists());
    assert!(doc.temp_dir().is_none());

    // second release is a no-op
    doc.release().unwrap();
}

#[test]
fn test_drop_removes_temp_dir() {
    let (_zip_dir, package) = Fixture::sample().write_zip();
    let doc = load_idml(&package).unwrap();
    let temp = doc.temp_dir().unwrap().to_path_buf();
    drop(doc);
    assert!(!temp.exists());
}

#[test]
fn test_document_usable_until_release() {
    let (_zip_dir, package) = Fixture::sample().write_zip();
    let mut doc = load_idml(&package).unwrap();
    let temp = doc.temp_dir().unwrap().to_path_buf();

    let summary = DocumentSummary::from_document(&doc);
    assert_eq!(summary.total_pages, 3);
    assert!(temp.join("Stories/Story_u10.xml").is_file());

    doc.release().unwrap();
    // the model itself stays readable
    assert_eq!(doc.total_page_count(), 3);
}

#[test]
fn test_missing_package() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_idml(dir.path().join("absent.idml")).unwrap_err();
    assert!(matches!(err, IdmlError::PackageNotFound(_)));
    assert_eq!(err.phase(), ErrorPhase::Loading);
}

#[test]
fn test_not_a_zip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.idml");
    fs::write(&path, "plain text").unwrap();
    let err = load_idml(&path).unwrap_err();
    assert!(matches!(err, IdmlError::Extract(_)));
    assert_eq!(err.phase(), ErrorPhase::Loading);
}

#[test]
fn test_package_without_designmap() {
    let (_zip_dir, package) = Fixture::sample().without_file("designmap.xml").write_zip();
    let err = load_idml(&package).unwrap_err();
    assert!(matches!(err, IdmlError::MissingDesignMap(_)));
}
