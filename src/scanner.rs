use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use walkdir::WalkDir;

/// File scanner for traversing project directories.
///
/// The `FileScanner` recursively walks a project directory and collects every Rust source file
/// that may carry directive comments or `@@struct` declarations. `target` and hidden directories
/// (those starting with `.`) are skipped.
///
/// Files are returned in sorted path order so that repeated runs see directives in the same
/// order.
///
/// # Example
///
/// ```no_run
/// use swagify::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
#[derive(Debug)]
pub struct ScanResult {
    /// Paths of all discovered `.rs` files, sorted
    pub rust_files: Vec<PathBuf>,
    /// Warning messages for entries that could not be accessed
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    ///
    /// # Arguments
    ///
    /// * `root_path` - The root directory to scan for Rust files
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all `.rs` files.
    ///
    /// Inaccessible entries are reported in [`ScanResult::warnings`]; scanning continues past
    /// them.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path is not a readable directory.
    pub fn scan(&self) -> Result<ScanResult> {
        std::fs::read_dir(&self.root_path)
            .with_context(|| format!("Failed to read directory: {}", self.root_path.display()))?;

        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }
                let file_name = e.file_name().to_string_lossy();
                !file_name.starts_with('.') && file_name != "target"
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file()
                        && path.extension().and_then(|s| s.to_str()) == Some("rs")
                    {
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    debug!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        debug!(
            "Scanned {}: {} Rust files",
            self.root_path.display(),
            rust_files.len()
        );

        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }
}
