use async_trait::async_trait;
use bytes::Bytes;

use crate::entry::{DirectoryEntry, Metadata, ReadResponse, StreamResponse, Timestamps};
use crate::error::{StorageError, StorageResult};
use crate::options::{Visibility, WriteOptions};
use crate::stream::ByteStream;

/// Trait implemented by storage adapters.
///
/// Paths are caller-relative; each adapter applies its own prefix. A remote
/// failure is returned as `Err`, never retried.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Create a new file with the given contents.
    async fn write(
        &self,
        path: &str,
        contents: Bytes,
        options: &WriteOptions,
    ) -> StorageResult<Metadata>;

    /// Create a new file from a stream.
    async fn write_stream(
        &self,
        path: &str,
        stream: ByteStream,
        options: &WriteOptions,
    ) -> StorageResult<Metadata>;

    /// Replace the contents of an existing file.
    async fn overwrite(
        &self,
        path: &str,
        contents: Bytes,
        options: &WriteOptions,
    ) -> StorageResult<Metadata>;

    /// Replace the contents of an existing file from a stream.
    async fn overwrite_stream(
        &self,
        path: &str,
        stream: ByteStream,
        options: &WriteOptions,
    ) -> StorageResult<Metadata>;

    async fn rename(&self, path: &str, new_path: &str) -> StorageResult<()>;

    async fn copy(&self, path: &str, new_path: &str) -> StorageResult<()>;

    async fn delete(&self, path: &str) -> StorageResult<Metadata>;

    /// Delete a directory and everything below it.
    async fn delete_directory(&self, path: &str) -> StorageResult<()>;

    async fn create_directory(&self, path: &str, options: &WriteOptions)
        -> StorageResult<Metadata>;

    /// Metadata of the file at `path`, or `None` if the remote cannot find it.
    async fn exists(&self, path: &str) -> StorageResult<Option<Metadata>>;

    async fn read(&self, path: &str) -> StorageResult<ReadResponse>;

    async fn read_stream(&self, path: &str) -> StorageResult<StreamResponse>;

    async fn list_directory(&self, path: &str, recursive: bool)
        -> StorageResult<Vec<DirectoryEntry>>;

    async fn get_metadata(&self, path: &str) -> StorageResult<Metadata>;

    async fn get_size(&self, path: &str) -> StorageResult<Metadata>;

    async fn get_mime_type(&self, path: &str) -> StorageResult<Metadata>;

    async fn get_modification_time(&self, path: &str) -> StorageResult<Timestamps>;

    /// Adapters without per-object visibility keep this default.
    async fn get_visibility(&self, _path: &str) -> StorageResult<Visibility> {
        Err(StorageError::Unsupported(
            "adapter does not support visibility settings".into(),
        ))
    }

    async fn set_visibility(&self, _path: &str, _visibility: Visibility) -> StorageResult<()> {
        Err(StorageError::Unsupported(
            "adapter does not support visibility settings".into(),
        ))
    }
}
