use crate::error::{Error, Result};
use crate::warnings::Warnings;
use anyhow::Context;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Raw text of one source file.
///
/// Directive comments are extracted from `source`; the same text is then handed to
/// [`AstParser`] for struct declarations.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the source file
    pub path: PathBuf,
    /// File content
    pub source: String,
}

impl SourceFile {
    /// Reads a source file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read. A run cannot continue without its sources,
    /// so callers treat this as fatal.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        debug!("Reading file: {}", path.display());
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// AST (Abstract Syntax Tree) parser for Rust source files.
///
/// The `AstParser` uses the `syn` crate to parse source text so that struct declarations named
/// by `@@struct` directives can be introspected.
///
/// # Example
///
/// ```no_run
/// use swagify::parser::{AstParser, SourceFile};
/// use std::path::Path;
///
/// let file = SourceFile::read(Path::new("src/models.rs")).unwrap();
/// let parsed = AstParser::parse_source(&file).unwrap();
/// println!("Parsed {} items", parsed.syntax_tree.items.len());
/// ```
pub struct AstParser;

/// A successfully parsed Rust file with its abstract syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parses the text of a single source file into an AST.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the file contains invalid Rust syntax.
    pub fn parse_source(file: &SourceFile) -> Result<ParsedFile> {
        debug!("Parsing file: {}", file.path.display());

        let syntax_tree = syn::parse_file(&file.source).map_err(|e| Error::ParseError {
            file: file.path.clone(),
            message: e.to_string(),
        })?;

        Ok(ParsedFile {
            path: file.path.clone(),
            syntax_tree,
        })
    }

    /// Parses every file, continuing past files with syntax errors.
    ///
    /// A file that fails to parse is recorded as a warning and left out of the result; its
    /// directive comments are unaffected because they are read from the raw text.
    pub fn parse_all(files: &[SourceFile], warnings: &mut Warnings) -> Vec<ParsedFile> {
        debug!("Parsing {} files", files.len());

        let mut parsed = Vec::with_capacity(files.len());
        for file in files {
            match Self::parse_source(file) {
                Ok(p) => parsed.push(p),
                Err(Error::ParseError { file, message }) => warnings.add(format!(
                    "[Warning] unable to parse {}: {}",
                    file.display(),
                    message
                )),
                Err(e) => warnings.add(format!("[Warning] {}", e)),
            }
        }

        debug!(
            "Parsing complete: {} succeeded, {} failed",
            parsed.len(),
            files.len() - parsed.len()
        );
        parsed
    }
}
