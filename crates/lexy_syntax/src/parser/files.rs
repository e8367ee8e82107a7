//! File-system access for the document parser.
//!
//! The parser only needs to read lines, test existence and list a directory. Hiding that behind
//! [`FileSystem`] lets tests and tooling parse multi-file documents from memory.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

pub trait FileSystem {
    fn read_all_lines(&self, path: &Path) -> io::Result<Vec<String>>;

    fn file_exists(&self, path: &Path) -> bool;

    fn directory_exists(&self, path: &Path) -> bool;

    /// Files directly inside `path` with the given extension, sorted by path.
    fn directory_files(&self, path: &Path, extension: &str) -> io::Result<Vec<PathBuf>>;

    /// Canonical form used to detect repeated includes.
    fn normalize(&self, path: &Path) -> PathBuf {
        normalize_lexically(path)
    }
}

/// Resolve `.` and `..` without touching the disk.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_all_lines(&self, path: &Path) -> io::Result<Vec<String>> {
        let content = std::fs::read_to_string(path)?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn directory_files(&self, path: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file = entry?.path();
            if file.is_file() && file.extension().is_some_and(|e| e == extension) {
                files.push(file);
            }
        }
        files.sort();
        Ok(files)
    }

    fn normalize(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| normalize_lexically(path))
    }
}

/// In-memory files keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files.insert(normalize_lexically(path.as_ref()), content.into());
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_all_lines(&self, path: &Path) -> io::Result<Vec<String>> {
        self.files
            .get(&normalize_lexically(path))
            .map(|content| content.lines().map(str::to_string).collect())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("file not found: {}", path.display())))
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize_lexically(path))
    }

    fn directory_exists(&self, path: &Path) -> bool {
        let directory = normalize_lexically(path);
        self.files.keys().any(|file| file.starts_with(&directory) && *file != directory)
    }

    fn directory_files(&self, path: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
        let directory = normalize_lexically(path);
        Ok(self
            .files
            .keys()
            .filter(|file| file.parent() == Some(directory.as_path()))
            .filter(|file| file.extension().is_some_and(|e| e == extension))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(normalize_lexically(Path::new("a/./b/../c.lexy")), PathBuf::from("a/c.lexy"));
        assert_eq!(normalize_lexically(Path::new("../x.lexy")), PathBuf::from("../x.lexy"));
    }

    #[test]
    fn test_memory_file_system() {
        let fs = MemoryFileSystem::new()
            .with_file("root/main.lexy", "function A\n  code")
            .with_file("root/shared/b.lexy", "enum B")
            .with_file("root/shared/a.lexy", "enum A")
            .with_file("root/shared/notes.txt", "ignored");

        assert_eq!(fs.read_all_lines(Path::new("root/./main.lexy")).unwrap().len(), 2);
        assert!(fs.directory_exists(Path::new("root/shared")));
        assert!(!fs.directory_exists(Path::new("root/main.lexy")));
        assert_eq!(
            fs.directory_files(Path::new("root/shared"), "lexy").unwrap(),
            vec![PathBuf::from("root/shared/a.lexy"), PathBuf::from("root/shared/b.lexy")]
        );
        assert!(fs.read_all_lines(Path::new("missing.lexy")).is_err());
    }
}
