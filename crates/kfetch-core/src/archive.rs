//! Zip extraction for competition and dataset archives.

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::ZipArchive;

/// Extracts every entry of `archive` into `dest`, creating `dest` if needed.
/// Returns the number of files written (directories not counted).
///
/// Entries whose names would resolve outside `dest` abort the extraction.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    let mut zip =
        ZipArchive::new(file).with_context(|| format!("read zip {}", archive.display()))?;

    fs::create_dir_all(dest).with_context(|| format!("create {}", dest.display()))?;

    let mut written = 0usize;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(rel) = entry.enclosed_name() else {
            bail!(
                "zip entry {:?} in {} escapes the extraction directory",
                entry.name(),
                archive.display()
            );
        };
        let out_path = dest.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out =
            File::create(&out_path).with_context(|| format!("create {}", out_path.display()))?;
        io::copy(&mut entry, &mut out).with_context(|| format!("write {}", out_path.display()))?;
        written += 1;
    }

    tracing::debug!(
        "extracted {} files from {} into {}",
        written,
        archive.display(),
        dest.display()
    );
    Ok(written)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Writes a zip at `path` holding `(name, contents)` pairs.
    pub(crate) fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, contents) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(contents).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn extracts_nested_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("titanic.zip");
        write_zip(
            &archive,
            &[
                ("train.csv", &b"a,b\n1,2\n"[..]),
                ("extra/test.csv", &b"a,b\n"[..]),
            ],
        );

        let dest = dir.path().join("input");
        let n = extract_zip(&archive, &dest).unwrap();
        assert_eq!(n, 2);
        assert_eq!(fs::read(dest.join("train.csv")).unwrap(), b"a,b\n1,2\n");
        assert!(dest.join("extra").join("test.csv").is_file());
        assert!(archive.exists(), "archive is left in place");
    }

    #[test]
    fn rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.zip");
        write_zip(&archive, &[("../escape.txt", &b"x"[..])]);
        let dest = dir.path().join("input");
        assert!(extract_zip(&archive, &dest).is_err());
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[test]
    fn not_a_zip_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bogus.zip");
        fs::write(&archive, b"not a zip").unwrap();
        assert!(extract_zip(&archive, &dir.path().join("input")).is_err());
    }
}
