//! Locating and parsing configuration files.

use crate::document::ConfigDocument;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File extension of HCL-native Terraform files.
pub const DEFAULT_EXTENSION: &str = "tf";

/// Errors that abort a run before any rule is checked.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The path to analyze does not exist.
    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error reading a file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A file is not valid HCL.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

/// Source of parsed configuration documents.
///
/// Reading is all-or-nothing: an implementation returns either every
/// document under `path` or an error.
pub trait Reader {
    /// Reads and parses all configuration documents under `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be located, read, or parsed.
    fn read(&self, path: &Path) -> Result<Vec<ConfigDocument>, ReadError>;
}

/// Type alias for boxed Reader trait objects.
pub type ReaderBox = Box<dyn Reader>;

/// Reads a Terraform module from disk.
///
/// A file path is parsed on its own. A directory path yields every `*.tf`
/// file directly inside it, or below it when `recursive` is set.
#[derive(Debug, Clone)]
pub struct ModuleReader {
    recursive: bool,
    exclude_patterns: Vec<String>,
}

impl Default for ModuleReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleReader {
    /// Creates a reader for a single, non-recursive module directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            recursive: false,
            exclude_patterns: Vec::new(),
        }
    }

    /// Sets whether subdirectories are scanned as well.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Adds exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Discovers the files to parse under `root`, sorted by path.
    fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>, ReadError> {
        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }

        let escaped = glob::Pattern::escape(&root.to_string_lossy());
        let pattern = if self.recursive {
            format!("{escaped}/**/*.{DEFAULT_EXTENSION}")
        } else {
            format!("{escaped}/*.{DEFAULT_EXTENSION}")
        };

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| ReadError::Io {
                path: e.path().to_path_buf(),
                source: std::io::Error::from(e),
            })?;

            if !path.is_file() {
                continue;
            }

            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path);
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/.terraform/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}

impl Reader for ModuleReader {
    fn read(&self, path: &Path) -> Result<Vec<ConfigDocument>, ReadError> {
        if !path.exists() {
            return Err(ReadError::NotFound(path.to_path_buf()));
        }

        let files = self.discover_files(path)?;
        debug!("Found {} configuration file(s) in {}", files.len(), path.display());

        files
            .into_iter()
            .map(|file| {
                debug!("Parsing: {}", file.display());
                let content = std::fs::read_to_string(&file).map_err(|e| ReadError::Io {
                    path: file.clone(),
                    source: e,
                })?;
                ConfigDocument::parse(file.clone(), content).map_err(|e| ReadError::Parse {
                    path: file,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}
