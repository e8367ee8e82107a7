//! Resolution of `include "name"` directives to files.

use std::path::{Path, PathBuf};

use super::files::FileSystem;
use crate::ast::IncludeDirective;
use crate::diagnostics::{CompileError, errors};

/// Files named by `directive`, relative to the directory of the file that contains it.
///
/// A directory includes every file with `extension` directly inside it, sorted by path. A file name without an
/// extension gets `extension` appended.
///
/// ## Errors
/// Returns an include error when neither a directory nor a file with that name exists.
pub(super) fn resolve(
    directive: &IncludeDirective,
    fs: &dyn FileSystem,
    extension: &str,
) -> Result<Vec<PathBuf>, CompileError> {
    let including = Path::new(directive.reference.file.name());
    let base = including.parent().unwrap_or_else(|| Path::new(""));
    let target = base.join(&directive.file_name);

    if fs.directory_exists(&target) {
        return fs
            .directory_files(&target, extension)
            .map_err(|_| errors::invalid_include(&directive.file_name, directive.reference.clone()));
    }

    let file = if target.extension().is_none() {
        target.with_extension(extension)
    } else {
        target
    };
    if fs.file_exists(&file) {
        Ok(vec![file])
    } else {
        Err(errors::invalid_include(&directive.file_name, directive.reference.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::files::MemoryFileSystem;
    use crate::source::{SourceFile, SourceReference};

    fn directive(file_name: &str) -> IncludeDirective {
        IncludeDirective {
            file_name: file_name.to_string(),
            reference: SourceReference::new(SourceFile::new("project/main.lexy"), 1, 1),
            processed: false,
        }
    }

    #[test]
    fn test_resolve_relative_to_including_file() {
        let fs = MemoryFileSystem::new()
            .with_file("project/shared.lexy", "")
            .with_file("project/lib/b.lexy", "")
            .with_file("project/lib/a.lexy", "");

        assert_eq!(
            resolve(&directive("shared"), &fs, "lexy").unwrap(),
            vec![PathBuf::from("project/shared.lexy")]
        );
        assert_eq!(
            resolve(&directive("lib"), &fs, "lexy").unwrap(),
            vec![PathBuf::from("project/lib/a.lexy"), PathBuf::from("project/lib/b.lexy")]
        );
    }

    #[test]
    fn test_missing_include() {
        let error = resolve(&directive("missing.lexy"), &MemoryFileSystem::new(), "lexy").unwrap_err();
        assert_eq!(error.message, "Invalid include file name 'missing.lexy'");
    }
}
