use crate::error::ReportError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the report file inside the output directory.
pub const OUTPUT_FILE_NAME: &str = "relatorio_alertas.pdf";

/// Where the report lands for a given output directory.
pub fn output_path(dir: &Path) -> Result<PathBuf, ReportError> {
    std::path::absolute(dir.join(OUTPUT_FILE_NAME)).map_err(|source| ReportError::IoError {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes `pdf` to `dir`, creating the directory and its parents when
/// needed, and returns the absolute path of the file.
///
/// The bytes go to a temporary file in `dir` that is then renamed over the
/// report, so an existing report is replaced whole or left untouched.
pub fn write_report(dir: &Path, pdf: &[u8]) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::IoError {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = output_path(dir)?;
    let mut staged = staging_file(dir).map_err(|source| ReportError::IoError {
        path: dir.to_path_buf(),
        source,
    })?;
    staged
        .write_all(pdf)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|source| ReportError::IoError {
            path: staged.path().to_path_buf(),
            source,
        })?;
    // On failure the temporary file is dropped, which deletes it.
    staged.persist(&path).map_err(|e| ReportError::IoError {
        path: path.clone(),
        source: e.error,
    })?;

    tracing::info!(path = %path.display(), bytes = pdf.len(), "Report written.");
    Ok(path)
}

/// A hidden temporary file next to the report, readable like a plain
/// `fs::write` result would be.
fn staging_file(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".relatorio_alertas").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    builder.tempfile_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("output");

        let path = write_report(&dir, b"%PDF-1.3 test").unwrap();

        assert_eq!(path, dir.join(OUTPUT_FILE_NAME));
        assert!(path.is_absolute());
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.3 test");
    }

    #[test]
    fn rerun_overwrites_at_the_same_path() {
        let tmp = tempfile::tempdir().unwrap();

        let first = write_report(tmp.path(), b"first run, longer content").unwrap();
        let second = write_report(tmp.path(), b"second").unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&second).unwrap(), b"second");
    }

    #[test]
    fn relative_directories_resolve_to_absolute_paths() {
        let path = output_path(Path::new("relatorios")).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with(Path::new("relatorios").join(OUTPUT_FILE_NAME)));
    }

    #[test]
    fn unwritable_target_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();

        let result = write_report(&blocker, b"%PDF");
        assert!(matches!(result, Err(ReportError::IoError { .. })));
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn successful_writes_leave_only_the_report() {
        let tmp = tempfile::tempdir().unwrap();

        write_report(tmp.path(), b"first").unwrap();
        write_report(tmp.path(), b"second").unwrap();

        assert_eq!(entries(tmp.path()), vec![OUTPUT_FILE_NAME.to_string()]);
    }

    #[test]
    fn failed_replace_leaves_no_partial_file() {
        let tmp = tempfile::tempdir().unwrap();
        // A non-empty directory at the report path cannot be renamed over.
        let occupied = tmp.path().join(OUTPUT_FILE_NAME);
        fs::create_dir(&occupied).unwrap();
        fs::write(occupied.join("keep"), b"previous").unwrap();

        let result = write_report(tmp.path(), b"%PDF-1.3 new");

        match result {
            Err(ReportError::IoError { path, .. }) => assert!(path.ends_with(OUTPUT_FILE_NAME)),
            other => panic!("expected an IO error, got {other:?}"),
        }
        assert_eq!(entries(tmp.path()), vec![OUTPUT_FILE_NAME.to_string()]);
        assert_eq!(fs::read(occupied.join("keep")).unwrap(), b"previous");
    }

    #[cfg(unix)]
    #[test]
    fn report_keeps_regular_file_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();

        let path = write_report(tmp.path(), b"%PDF").unwrap();
        let plain = tmp.path().join("plain");
        fs::write(&plain, b"%PDF").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }
}
