//! Chart discovery
//!
//! Charts are the immediate subdirectories of the source charts folder.
//! Hidden directories and plain files are skipped. Enumeration order from
//! the filesystem is unspecified, so the result is sorted lexicographically
//! to keep runs and tests deterministic.

use std::path::Path;

use crate::error::Result;

/// List chart directory names under `dir`, sorted.
pub fn discover_charts(dir: &Path) -> Result<Vec<String>> {
    let mut charts = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if !entry.file_type()?.is_dir() {
            continue;
        }
        charts.push(name);
    }

    charts.sort();
    Ok(charts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn skips_hidden_directories_and_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("mychart")).unwrap();
        fs::create_dir(tmp.path().join(".hidden")).unwrap();
        fs::write(tmp.path().join("README.md"), "docs").unwrap();

        let charts = discover_charts(tmp.path()).unwrap();
        assert_eq!(charts, ["mychart"]);
    }

    #[test]
    fn result_is_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha", "mid"] {
            fs::create_dir(tmp.path().join(name)).unwrap();
        }

        let charts = discover_charts(tmp.path()).unwrap();
        assert_eq!(charts, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn empty_directory_yields_no_charts() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(discover_charts(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(discover_charts(&tmp.path().join("nope")).is_err());
    }
}
