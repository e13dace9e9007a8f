//! Zip package extraction

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{IdmlError, Result};

/// Prefix of extraction directories
pub const TEMP_DIR_PREFIX: &str = "idml_";

/// Sanitize a zip entry name to prevent path traversal
///
/// Keeps only normal components: `..`, `.`, roots and drive prefixes are
/// dropped. Returns `None` if nothing is left.
fn sanitize_path(name: &str) -> Option<PathBuf> {
    let mut sanitized = PathBuf::new();
    for component in Path::new(name).components() {
        if let Component::Normal(part) = component {
            sanitized.push(part);
        }
    }
    if sanitized.as_os_str().is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// Extract an `.idml` package into a fresh temporary directory
///
/// The directory is deleted when the returned [`TempDir`] is dropped, so an
/// error part-way through extraction leaves nothing behind.
///
/// # Errors
///
/// - `IdmlError::PackageNotFound` if `path` does not exist
/// - `IdmlError::Extract` if the file is not a readable zip archive
/// - `IdmlError::Io` if the directory or an entry cannot be written
#[must_use = "extraction returns the directory that holds the package"]
pub fn extract_package(path: &Path) -> Result<TempDir> {
    if !path.is_file() {
        return Err(IdmlError::PackageNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let temp_dir = tempfile::Builder::new()
        .prefix(TEMP_DIR_PREFIX)
        .tempdir()?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let raw_name = entry.name().to_string();
        let Some(relative) = sanitize_path(&raw_name) else {
            log::warn!("Skipping invalid zip entry: {raw_name}");
            continue;
        };
        let target = temp_dir.path().join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
    }

    log::debug!(
        "Extracted {} entries from {} into {}",
        archive.len(),
        path.display(),
        temp_dir.path().display()
    );
    Ok(temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("Stories/Story_u1.xml"),
            Some(PathBuf::from("Stories/Story_u1.xml"))
        );
        assert_eq!(
            sanitize_path("../../etc/passwd"),
            Some(PathBuf::from("etc/passwd"))
        );
        assert_eq!(sanitize_path("/abs/file.xml"), Some(PathBuf::from("abs/file.xml")));
        assert_eq!(sanitize_path(".."), None);
        assert_eq!(sanitize_path(""), None);
    }

    #[test]
    fn test_extract_package() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("doc.idml");
        let mut zip = ZipWriter::new(File::create(&zip_path).unwrap());
        let options = SimpleFileOptions::default();
        zip.start_file("mimetype", options).unwrap();
        zip.write_all(b"application/vnd.adobe.indesign-idml-package")
            .unwrap();
        zip.add_directory("Stories/", options).unwrap();
        zip.start_file("Stories/Story_u1.xml", options).unwrap();
        zip.write_all(b"<Story/>").unwrap();
        zip.start_file("../escape.xml", options).unwrap();
        zip.write_all(b"<X/>").unwrap();
        zip.finish().unwrap();

        let extracted = extract_package(&zip_path).unwrap();
        let root = extracted.path();
        assert!(root
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(TEMP_DIR_PREFIX));
        assert_eq!(
            fs::read_to_string(root.join("Stories/Story_u1.xml")).unwrap(),
            "<Story/>"
        );
        assert!(root.join("escape.xml").exists());
        assert!(!dir.path().join("escape.xml").exists());
    }

    #[test]
    fn test_extract_missing_package() {
        let err = extract_package(Path::new("/nonexistent/doc.idml")).unwrap_err();
        assert!(matches!(err, IdmlError::PackageNotFound(_)));
    }

    #[test]
    fn test_extract_not_a_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.idml");
        fs::write(&path, b"not a zip").unwrap();
        let err = extract_package(&path).unwrap_err();
        assert!(matches!(err, IdmlError::Extract(_)));
    }
}
