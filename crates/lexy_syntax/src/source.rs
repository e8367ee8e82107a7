//! Source files and source references.
//!
//! Every diagnostic is anchored to a [`SourceReference`], rendered as `file(line, column)` with 1-based line and
//! column numbers. Existing scenario fixtures assert on that literal text, so the rendering must not change.

use std::fmt;
use std::sync::Arc;

/// Name of a source file as it appears in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceFile {
    name: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Location of a construct in a source file (1-based line and column).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceReference {
    pub file: SourceFile,
    pub line: usize,
    pub column: usize,
}

impl SourceReference {
    pub fn new(file: SourceFile, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }

    /// Same line, different column.
    pub fn at_column(&self, column: usize) -> Self {
        Self {
            file: self.file.clone(),
            line: self.line,
            column,
        }
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_rendering() {
        let reference = SourceReference::new(SourceFile::new("tax.lexy"), 3, 5);
        assert_eq!(reference.to_string(), "tax.lexy(3, 5)");
        assert_eq!(reference.at_column(1).to_string(), "tax.lexy(3, 1)");
    }
}
