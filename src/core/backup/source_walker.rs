use crate::core::io_manager::IOManager;
use crate::interface::file_system::FileSystemTrait;
use crate::model::backup_entry::LogicalKey;
use crate::model::error::Error;
use crate::model::error::copy::CopyError;
use crate::model::log::backup::BackupLog;
use macros::log;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub key: LogicalKey,
}

/// Enumerates the files to back up under a source, level by level.
pub struct SourceWalker<'a> {
    io_manager: &'a IOManager,
}

impl<'a> SourceWalker<'a> {
    pub fn new(io_manager: &'a IOManager) -> Self {
        Self { io_manager }
    }

    /// Walks `source`. Unreadable directories and odd names are returned as
    /// errors next to the files that could be found; a missing source yields
    /// no files and a single error.
    pub async fn walk(&self, source: &Path) -> (Vec<SourceFile>, Vec<Error>) {
        let mut files = Vec::new();
        let mut errors = Vec::new();

        let Some(source_name) = Self::file_name(source, &mut errors) else {
            return (files, errors);
        };

        let metadata = match self.io_manager.metadata(source).await {
            Ok(metadata) => metadata,
            Err(err) => {
                errors.push(CopyError::source_not_found(source, err).into());
                return (files, errors);
            }
        };

        if !metadata.is_dir() {
            files.push(SourceFile {
                path: source.to_path_buf(),
                key: LogicalKey::single(&source_name),
            });
            return (files, errors);
        }

        let mut current_level = vec![source.to_path_buf()];
        while !current_level.is_empty() {
            let mut next_level = Vec::new();
            for directory in current_level {
                let entries = match self.io_manager.list_directory(&directory).await {
                    Ok(entries) => entries,
                    Err(err) => {
                        errors.push(CopyError::read_directory_failed(&directory, err).into());
                        continue;
                    }
                };
                for entry in entries {
                    match self.classify(source, &source_name, &entry).await {
                        Ok(Visit::Directory) => next_level.push(entry),
                        Ok(Visit::File(file)) => files.push(file),
                        Ok(Visit::Skip) => {}
                        Err(err) => errors.push(err),
                    }
                }
            }
            current_level = next_level;
        }

        (files, errors)
    }

    async fn classify(&self, source: &Path, source_name: &str, entry: &Path) -> Result<Visit, Error> {
        let link_metadata = self
            .io_manager
            .symlink_metadata(entry)
            .await
            .map_err(|err| CopyError::get_metadata_failed(entry, err))?;

        let is_dir = if link_metadata.file_type().is_symlink() {
            let target = self
                .io_manager
                .metadata(entry)
                .await
                .map_err(|err| CopyError::get_metadata_failed(entry, err))?;
            if target.is_dir() {
                log!(BackupLog::SymlinkedDirectorySkipped {
                    path: entry.to_path_buf(),
                });
                return Ok(Visit::Skip);
            }
            false
        } else {
            link_metadata.is_dir()
        };

        if is_dir {
            return Ok(Visit::Directory);
        }

        let relative = entry.strip_prefix(source).unwrap_or(entry);
        let relative_directory = relative.parent().unwrap_or(Path::new(""));
        let file_name = entry
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| CopyError::invalid_file_name(entry))?;
        if relative_directory.to_str().is_none() {
            return Err(CopyError::invalid_file_name(entry).into());
        }

        Ok(Visit::File(SourceFile {
            path: entry.to_path_buf(),
            key: LogicalKey::nested(source_name, relative_directory, file_name),
        }))
    }

    fn file_name(source: &Path, errors: &mut Vec<Error>) -> Option<String> {
        match source.file_name().map(|name| name.to_str()) {
            Some(Some(name)) => Some(name.to_string()),
            _ => {
                errors.push(CopyError::invalid_file_name(source).into());
                None
            }
        }
    }
}

enum Visit {
    Directory,
    File(SourceFile),
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn single_file_is_keyed_by_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "hello").unwrap();

        let io_manager = IOManager::new(4);
        let (files, errors) = SourceWalker::new(&io_manager).walk(&file).await;

        assert!(errors.is_empty());
        assert_eq!(
            files,
            vec![SourceFile {
                path: file,
                key: LogicalKey::single("notes.txt"),
            }]
        );
    }

    #[tokio::test]
    async fn directory_walk_preserves_relative_structure() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("project");
        fs::create_dir_all(source.join("a/b")).unwrap();
        fs::create_dir_all(source.join("empty")).unwrap();
        fs::write(source.join("top.txt"), "1").unwrap();
        fs::write(source.join("a/b/file.txt"), "2").unwrap();

        let io_manager = IOManager::new(4);
        let (files, errors) = SourceWalker::new(&io_manager).walk(&source).await;

        assert!(errors.is_empty());
        let keys: Vec<PathBuf> = files.iter().map(|file| file.key.relative_path()).collect();
        assert_eq!(
            keys,
            vec![PathBuf::from("project/top.txt"), PathBuf::from("project/a/b/file.txt")]
        );
    }

    #[tokio::test]
    async fn missing_source_is_one_error() {
        let dir = tempfile::tempdir().unwrap();
        let io_manager = IOManager::new(4);
        let (files, errors) = SourceWalker::new(&io_manager)
            .walk(&dir.path().join("missing"))
            .await;

        assert!(files.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], Error::Copy(CopyError::SourceNotFound { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinked_directories_are_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("real.txt"), "1").unwrap();
        std::os::unix::fs::symlink(&source, source.join("loop")).unwrap();
        std::os::unix::fs::symlink(source.join("real.txt"), source.join("alias.txt")).unwrap();

        let io_manager = IOManager::new(4);
        let (files, errors) = SourceWalker::new(&io_manager).walk(&source).await;

        assert!(errors.is_empty());
        let names: Vec<&str> = files.iter().map(|file| file.key.file_name()).collect();
        assert_eq!(names, vec!["alias.txt", "real.txt"]);
    }
}
