#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use roster_import::{EmployeeRecord, ImportPayload, TabularFormat, import_payload};
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Imports a fixture, detecting its format from the name and contents.
pub fn import_fixture(name: &str) -> Vec<EmployeeRecord> {
    let path = fixture_path(name);
    let bytes = fs::read(&path).expect("read fixture");
    let payload = ImportPayload::from_named_bytes(&path, bytes, Default::default());
    import_payload(&payload).expect("import fixture")
}

pub fn import_csv(text: &str) -> Vec<EmployeeRecord> {
    import_payload(&ImportPayload::new(
        text.as_bytes().to_vec(),
        TabularFormat::Csv,
    ))
    .expect("import csv text")
}

pub fn ids<'a>(records: impl IntoIterator<Item = &'a EmployeeRecord>) -> Vec<String> {
    records.into_iter().map(|record| record.id.clone()).collect()
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    /// Creates a sparse file of exactly `len` bytes.
    pub fn sized(&self, name: &str, len: u64) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let file = File::create(&path).expect("create temp file");
        file.set_len(len).expect("size temp file");
        path
    }
}
