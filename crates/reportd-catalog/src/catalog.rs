//! Report catalog discovery.
//!
//! Report modules live in a single directory. The file name without its
//! extension is the canonical report id, and the first ten lines of the
//! file must contain a `ReportName: <display name>` line. The catalog is
//! built once at startup and is immutable afterwards; a file without a
//! display name makes the whole build fail.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Files whose name starts with this prefix are not reports.
pub const RESERVED_PREFIX: &str = "__";

/// Sentinel keyword announcing the display name inside a report header.
pub const NAME_KEYWORD: &str = "ReportName";

/// How many header lines are searched for the sentinel keyword.
const HEADER_SCAN_LINES: usize = 10;

/// Identity of a single discovered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDescriptor {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read reports directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read report file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No ReportName found in file {}", files.join(", "))]
    MissingDisplayName { files: Vec<String> },
}

/// Immutable id → descriptor mapping, ordered by report id.
#[derive(Debug)]
pub struct Catalog {
    reports: Vec<ReportDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Scan the reports directory and build the catalog. All-or-nothing: a
    /// single file without a display name fails the build, naming every
    /// offending file.
    pub fn build(reports_dir: &Path) -> Result<Self, CatalogError> {
        let mut entries = Vec::new();
        let dir = std::fs::read_dir(reports_dir).map_err(|source| CatalogError::ReadDir {
            path: reports_dir.to_path_buf(),
            source,
        })?;
        for entry in dir {
            let entry = entry.map_err(|source| CatalogError::ReadDir {
                path: reports_dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.starts_with(RESERVED_PREFIX) {
                continue;
            }
            entries.push((file_name, path));
        }
        // read_dir order is platform dependent; sort for a stable catalog.
        entries.sort();

        let mut reports = Vec::with_capacity(entries.len());
        let mut missing = Vec::new();
        for (file_name, path) in entries {
            let id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_name.clone());
            match read_display_name(&path)? {
                Some(display_name) => reports.push(ReportDescriptor { id, display_name }),
                None => missing.push(file_name),
            }
        }
        if !missing.is_empty() {
            return Err(CatalogError::MissingDisplayName { files: missing });
        }

        let index = reports
            .iter()
            .enumerate()
            .map(|(pos, report)| (report.id.clone(), pos))
            .collect();
        tracing::info!(reports = reports.len(), "Report catalog built");
        Ok(Self { reports, index })
    }

    /// Valid report identifiers.
    pub fn list_ids(&self) -> BTreeSet<String> {
        self.reports.iter().map(|r| r.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.index
            .get(id)
            .map(|pos| self.reports[*pos].display_name.as_str())
    }

    /// Ordered `(id, display_name)` pairs for the readme/reports endpoints.
    pub fn display_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reports
            .iter()
            .map(|r| (r.id.as_str(), r.display_name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Search the first ten lines of a report file for the sentinel keyword and
/// return the trimmed remainder after the first colon. A keyword line
/// without a colon or with an empty remainder yields no display name.
fn read_display_name(path: &Path) -> Result<Option<String>, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    for line in reader.lines().take(HEADER_SCAN_LINES) {
        let line = line.map_err(|source| CatalogError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        if !line.contains(NAME_KEYWORD) {
            continue;
        }
        let display_name = line
            .split_once(':')
            .map(|(_, rest)| rest.trim().to_string())
            .filter(|name| !name.is_empty());
        return Ok(display_name);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_report(dir: &Path, file_name: &str, contents: &str) {
        let mut file = File::create(dir.join(file_name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn builds_catalog_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "pain_level.py", "\"\"\"\nReportName: 疼痛評估\nPOC: Shen\n\"\"\"\n");
        write_report(dir.path(), "fall_events.py", "# ReportName: 跌倒事件\n");
        write_report(dir.path(), "__init__.py", "");

        let catalog = Catalog::build(dir.path()).unwrap();
        assert_eq!(
            catalog.list_ids(),
            BTreeSet::from(["fall_events".to_string(), "pain_level".to_string()])
        );
        assert_eq!(catalog.display_name("pain_level"), Some("疼痛評估"));
        assert_eq!(catalog.display_name("fall_events"), Some("跌倒事件"));
        assert!(!catalog.contains("__init__"));
    }

    #[test]
    fn display_names_are_ordered_by_id() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "b_report.py", "ReportName: Beta\n");
        write_report(dir.path(), "a_report.py", "ReportName: Alpha\n");

        let catalog = Catalog::build(dir.path()).unwrap();
        let pairs: Vec<_> = catalog.display_names().collect();
        assert_eq!(pairs, vec![("a_report", "Alpha"), ("b_report", "Beta")]);
    }

    #[test]
    fn build_fails_naming_files_without_display_name() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "a.py", "ReportName: Alpha\n");
        write_report(dir.path(), "b.py", "just a comment\n");

        let err = Catalog::build(dir.path()).unwrap_err();
        match err {
            CatalogError::MissingDisplayName { ref files } => {
                assert_eq!(files, &["b.py".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("b.py"));
        assert!(!err.to_string().contains("a.py"));
    }

    #[test]
    fn keyword_must_appear_within_first_ten_lines() {
        let dir = tempfile::tempdir().unwrap();
        let contents = format!("{}ReportName: Too Late\n", "#\n".repeat(10));
        write_report(dir.path(), "late.py", &contents);

        let err = Catalog::build(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingDisplayName { .. }));
    }

    #[test]
    fn keyword_line_without_colon_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "odd.py", "ReportName without a colon\n");

        let err = Catalog::build(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingDisplayName { .. }));
    }

    #[test]
    fn display_name_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        write_report(dir.path(), "spaced.py", "ReportName:   Host Amount  \n");

        let catalog = Catalog::build(dir.path()).unwrap();
        assert_eq!(catalog.display_name("spaced"), Some("Host Amount"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(matches!(
            Catalog::build(&missing),
            Err(CatalogError::ReadDir { .. })
        ));
    }
}
