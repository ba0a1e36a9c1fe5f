// File utilities for exam documents and stage outputs

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Extension of exam documents picked up from directories
pub const EXAM_EXTENSION: &str = "txt";

pub struct FileUtils;

impl FileUtils {
    /// Collect exam documents from a file or directory, sorted by path.
    /// An explicit file is taken whatever its extension; directories contribute `*.txt`.
    pub fn collect_exam_files(path: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            let walker = walkdir::WalkDir::new(path).into_iter().filter_entry(|e| {
                // Always include the root directory itself, even if it starts with '.'
                if e.depth() == 0 {
                    return true;
                }
                !e.file_name().to_string_lossy().starts_with('.')
            });

            for entry in walker.flatten() {
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|e| e == EXAM_EXTENSION)
                {
                    files.push(entry.path().to_path_buf());
                }
            }
        }

        files.sort();
        files
    }

    /// Read file content
    pub fn read_file(path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write file content, creating missing parent directories
    pub fn write_file(path: &Path, content: &str) -> Result<()> {
        Self::ensure_parent_dir(path)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    pub fn ensure_parent_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_exam_files_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("midterm")).unwrap();
        std::fs::create_dir_all(root.join(".hidden")).unwrap();
        std::fs::write(root.join("b.txt"), "").unwrap();
        std::fs::write(root.join("midterm/a.txt"), "").unwrap();
        std::fs::write(root.join("notes.md"), "").unwrap();
        std::fs::write(root.join(".hidden/c.txt"), "").unwrap();

        let files = FileUtils::collect_exam_files(root);
        assert_eq!(files, vec![root.join("b.txt"), root.join("midterm/a.txt")]);
    }

    #[test]
    fn test_explicit_file_is_always_collected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exam.md");
        std::fs::write(&path, "").unwrap();
        assert_eq!(FileUtils::collect_exam_files(&path), vec![path]);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("tokens.txt");
        FileUtils::write_file(&path, "$\n").unwrap();
        assert_eq!(FileUtils::read_file(&path).unwrap(), "$\n");
    }

    #[test]
    fn test_read_missing_file_has_context() {
        let err = FileUtils::read_file(Path::new("/nonexistent/exam.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/exam.txt"));
    }
}
