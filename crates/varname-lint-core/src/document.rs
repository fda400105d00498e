//! Parsed configuration documents.

use crate::context::FileContext;
use hcl_edit::structure::{Block, Body};
use std::path::{Path, PathBuf};

/// A parsed HCL configuration file.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    source: String,
    body: Body,
}

impl ConfigDocument {
    /// Parses `source` as an HCL body.
    ///
    /// # Errors
    ///
    /// Returns the parser error if `source` is not valid HCL.
    pub fn parse(
        path: impl Into<PathBuf>,
        source: impl Into<String>,
    ) -> Result<Self, hcl_edit::parser::Error> {
        let source = source.into();
        let body = hcl_edit::parser::parse_body(&source)?;
        Ok(Self {
            path: path.into(),
            source,
            body,
        })
    }

    /// Path of the file this document was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed top-level body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Top-level blocks in document order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.body.blocks()
    }

    /// Context used by rules to locate nodes of this document.
    #[must_use]
    pub fn context(&self) -> FileContext<'_> {
        FileContext::new(&self.path, &self.source)
    }
}
