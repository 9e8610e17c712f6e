use async_trait::async_trait;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReadDirStream;

/// Filesystem primitives gated by a shared semaphore so concurrently running
/// jobs stay within the configured number of open operations.
#[async_trait]
pub trait FileSystemTrait: Send + Sync {
    fn new(semaphore: Arc<Semaphore>) -> Self
    where
        Self: Sized;

    fn semaphore(&self) -> Arc<Semaphore>;

    async fn acquire(&self) -> io::Result<OwnedSemaphorePermit> {
        self.semaphore()
            .acquire_owned()
            .await
            .map_err(|_| io::Error::other("file operation semaphore is closed"))
    }

    async fn list_directory(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let _permit = self.acquire().await?;
        let mut result = Vec::new();
        let reader = fs::read_dir(path).await?;
        let mut entries = ReadDirStream::new(reader);
        while let Some(entry) = entries.next().await {
            result.push(entry?.path());
        }
        result.sort();
        Ok(result)
    }

    async fn create_directory(&self, path: &Path) -> io::Result<()> {
        let _permit = self.acquire().await?;
        fs::create_dir_all(path).await
    }

    async fn copy_file(&self, source: &Path, destination: &Path) -> io::Result<u64> {
        let _permit = self.acquire().await?;
        fs::copy(source, destination).await
    }

    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let _permit = self.acquire().await?;
        fs::read(path).await
    }

    async fn rename(&self, source: &Path, destination: &Path) -> io::Result<()> {
        let _permit = self.acquire().await?;
        fs::rename(source, destination).await
    }

    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let _permit = self.acquire().await?;
        fs::try_exists(path).await
    }

    async fn delete_file(&self, path: &Path) -> io::Result<()> {
        let _permit = self.acquire().await?;
        fs::remove_file(path).await
    }

    /// Removes `path` only if it is an empty directory.
    async fn delete_empty_directory(&self, path: &Path) -> io::Result<()> {
        let _permit = self.acquire().await?;
        fs::remove_dir(path).await
    }

    async fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        let _permit = self.acquire().await?;
        fs::metadata(path).await
    }

    async fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata> {
        let _permit = self.acquire().await?;
        fs::symlink_metadata(path).await
    }
}
