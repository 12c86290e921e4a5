//! Box adapter for the [`StorageAdapter`] trait.
//!
//! Each operation normalizes its path(s) under the configured prefix, makes a
//! single client call and maps the response. Only directory listing issues
//! more than one request.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use boxfs_common::entry::parse_timestamp;
use boxfs_common::{
    ByteStream, DirectoryEntry, Metadata, PathPrefix, ReadResponse, StorageAdapter,
    StorageError, StorageResult, StreamResponse, Timestamps, WriteOptions,
};

use crate::client::BoxClient;
use crate::config::AdapterConfig;
use crate::listing::{self, MAX_PAGE_SIZE};
use crate::response::BoxResponse;

/// An expiring embed link for a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporaryLink {
    #[serde(flatten)]
    pub metadata: Metadata,
    pub url: Option<String>,
}

#[derive(Debug)]
pub struct Thumbnail {
    pub metadata: Metadata,
    pub stream: ByteStream,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailOptions {
    /// Image extension, `png` or `jpg`.
    pub format: String,
    /// Box size token such as `w64h64`.
    pub size: String,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self { format: "png".into(), size: "w64h64".into() }
    }
}

pub struct BoxAdapter<C> {
    client: C,
    prefix: PathPrefix,
    page_size: u64,
}

impl<C: BoxClient> BoxAdapter<C> {
    pub fn new(client: C, prefix: &str) -> Self {
        Self { client, prefix: PathPrefix::new(prefix), page_size: MAX_PAGE_SIZE }
    }

    /// Build an adapter from a configuration, validating it first. Configs
    /// built in code get the same checks as [`AdapterConfig::load`].
    pub fn from_config(client: C, config: &AdapterConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            client,
            prefix: PathPrefix::new(&config.prefix),
            page_size: config.page_size,
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn prefix(&self) -> &PathPrefix {
        &self.prefix
    }

    /// Normalized remote path for a caller path.
    pub fn apply_path_prefix(&self, path: &str) -> String {
        self.prefix.apply(path)
    }

    /// Caller-relative path for a remote path.
    pub fn remove_path_prefix(&self, path: &str) -> String {
        self.prefix.strip(path)
    }

    pub async fn get_temporary_link(&self, path: &str) -> StorageResult<TemporaryLink> {
        let path = self.apply_path_prefix(path);
        let resp = checked(self.client.file_embedded_link(&path).await, "embedded link", &path)?;
        let url = resp
            .json()
            .pointer("/expiring_embed_link/url")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Ok(TemporaryLink { metadata: resp.to_metadata(), url })
    }

    pub async fn get_thumbnail(
        &self,
        path: &str,
        options: &ThumbnailOptions,
    ) -> StorageResult<Thumbnail> {
        let path = self.apply_path_prefix(path);
        let mut resp = checked(
            self.client
                .file_thumbnail_stream(&path, &options.format, &options.size)
                .await,
            "thumbnail",
            &path,
        )?;
        let stream = resp.take_stream().unwrap_or_else(ByteStream::empty);
        Ok(Thumbnail { metadata: resp.to_metadata(), stream })
    }
}

/// Pass a successful response through, or turn an error response into a
/// [`StorageError::Remote`].
fn checked(resp: BoxResponse, op: &str, path: &str) -> StorageResult<BoxResponse> {
    if resp.is_error() {
        debug!(op, path = %path, code = resp.code(), "Box request failed");
        return Err(resp.into_error());
    }
    debug!(op, path = %path, code = resp.code(), "Box request complete");
    Ok(resp)
}

fn metadata(resp: BoxResponse, op: &str, path: &str) -> StorageResult<Metadata> {
    checked(resp, op, path).map(|resp| resp.to_metadata())
}

#[async_trait]
impl<C: BoxClient> StorageAdapter for BoxAdapter<C> {
    async fn write(
        &self,
        path: &str,
        contents: Bytes,
        _options: &WriteOptions,
    ) -> StorageResult<Metadata> {
        let path = self.apply_path_prefix(path);
        metadata(self.client.upload_contents(contents, &path).await, "upload", &path)
    }

    async fn write_stream(
        &self,
        path: &str,
        stream: ByteStream,
        _options: &WriteOptions,
    ) -> StorageResult<Metadata> {
        let path = self.apply_path_prefix(path);
        metadata(
            self.client.upload_stream_contents(stream, &path).await,
            "upload stream",
            &path,
        )
    }

    async fn overwrite(
        &self,
        path: &str,
        contents: Bytes,
        _options: &WriteOptions,
    ) -> StorageResult<Metadata> {
        let path = self.apply_path_prefix(path);
        metadata(
            self.client.upload_contents_version(contents, &path).await,
            "upload version",
            &path,
        )
    }

    async fn overwrite_stream(
        &self,
        path: &str,
        stream: ByteStream,
        _options: &WriteOptions,
    ) -> StorageResult<Metadata> {
        let path = self.apply_path_prefix(path);
        metadata(
            self.client.upload_stream_contents_version(stream, &path).await,
            "upload stream version",
            &path,
        )
    }

    async fn rename(&self, path: &str, new_path: &str) -> StorageResult<()> {
        let path = self.apply_path_prefix(path);
        let new_path = self.apply_path_prefix(new_path);
        checked(self.client.move_file(&path, &new_path).await, "move", &path)?;
        Ok(())
    }

    async fn copy(&self, path: &str, new_path: &str) -> StorageResult<()> {
        let path = self.apply_path_prefix(path);
        let new_path = self.apply_path_prefix(new_path);
        checked(self.client.copy_file(&path, &new_path).await, "copy", &path)?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> StorageResult<Metadata> {
        let path = self.apply_path_prefix(path);
        metadata(self.client.delete_file(&path).await, "delete", &path)
    }

    async fn delete_directory(&self, path: &str) -> StorageResult<()> {
        let path = self.apply_path_prefix(path);
        checked(self.client.delete_folder(&path, true).await, "delete folder", &path)?;
        Ok(())
    }

    async fn create_directory(
        &self,
        path: &str,
        _options: &WriteOptions,
    ) -> StorageResult<Metadata> {
        let path = self.apply_path_prefix(path);
        metadata(self.client.create_folder(&path).await, "create folder", &path)
    }

    async fn exists(&self, path: &str) -> StorageResult<Option<Metadata>> {
        let path = self.apply_path_prefix(path);
        match metadata(self.client.file_information(&path).await, "file information", &path) {
            Ok(meta) => Ok(Some(meta)),
            Err(StorageError::Remote { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn read(&self, path: &str) -> StorageResult<ReadResponse> {
        let path = self.apply_path_prefix(path);
        let mut resp = checked(self.client.file_stream_download(&path).await, "download", &path)?;
        let contents = match resp.take_stream() {
            Some(stream) => stream.into_bytes().await?,
            None => Bytes::new(),
        };
        Ok(ReadResponse { metadata: resp.to_metadata(), contents })
    }

    async fn read_stream(&self, path: &str) -> StorageResult<StreamResponse> {
        let path = self.apply_path_prefix(path);
        let mut resp = checked(self.client.file_stream_download(&path).await, "download", &path)?;
        let stream = resp.take_stream().unwrap_or_else(ByteStream::empty);
        Ok(StreamResponse { metadata: resp.to_metadata(), stream })
    }

    async fn list_directory(
        &self,
        path: &str,
        recursive: bool,
    ) -> StorageResult<Vec<DirectoryEntry>> {
        let path = self.apply_path_prefix(path);
        if recursive {
            debug!(path = %path, "Recursive listing requested, listing one level");
        }
        listing::list_folder(&self.client, &self.prefix, &path, self.page_size).await
    }

    async fn get_metadata(&self, path: &str) -> StorageResult<Metadata> {
        let path = self.apply_path_prefix(path);
        metadata(self.client.file_information(&path).await, "file information", &path)
    }

    async fn get_size(&self, path: &str) -> StorageResult<Metadata> {
        let path = self.apply_path_prefix(path);
        metadata(self.client.file_information(&path).await, "file information", &path)
    }

    async fn get_mime_type(&self, path: &str) -> StorageResult<Metadata> {
        Err(StorageError::Unsupported(format!(
            "Box API does not support MIME types for path {path}"
        )))
    }

    async fn get_modification_time(&self, path: &str) -> StorageResult<Timestamps> {
        let path = self.apply_path_prefix(path);
        let resp = checked(self.client.file_information(&path).await, "file information", &path)?;
        let timestamp = |key: &str| {
            resp.json()
                .get(key)
                .and_then(|v| v.as_str())
                .and_then(parse_timestamp)
        };
        Ok(Timestamps {
            created_at: timestamp("created_at"),
            modified_at: timestamp("modified_at"),
            metadata: resp.to_metadata(),
        })
    }
}
