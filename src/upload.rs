//! Acceptance rules applied before a file reaches the import pipeline.

use std::path::Path;

use thiserror::Error;

pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;
pub const ACCEPTED_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Unsupported file type '{0}' (expected .csv, .xls or .xlsx)")]
    UnsupportedExtension(String),
    #[error("File is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

pub fn check_upload(path: &Path, size: u64) -> Result<(), UploadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if !ACCEPTED_EXTENSIONS
        .iter()
        .any(|accepted| extension.eq_ignore_ascii_case(accepted))
    {
        return Err(UploadError::UnsupportedExtension(
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_extensions_in_any_case() {
        for name in ["staff.csv", "staff.XLS", "Staff.Xlsx"] {
            assert_eq!(check_upload(Path::new(name), 10), Ok(()), "{name}");
        }
    }

    #[test]
    fn rejects_other_extensions() {
        assert_eq!(
            check_upload(Path::new("staff.ods"), 10),
            Err(UploadError::UnsupportedExtension("staff.ods".to_string()))
        );
        assert!(check_upload(Path::new("staff"), 10).is_err());
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(check_upload(Path::new("a.csv"), MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(
            check_upload(Path::new("a.csv"), MAX_UPLOAD_BYTES + 1),
            Err(UploadError::TooLarge {
                size: MAX_UPLOAD_BYTES + 1,
                limit: MAX_UPLOAD_BYTES,
            })
        );
    }
}
