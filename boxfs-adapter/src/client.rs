use async_trait::async_trait;
use bytes::Bytes;

use boxfs_common::ByteStream;

use crate::response::BoxResponse;

/// The Box client surface consumed by [`BoxAdapter`](crate::BoxAdapter).
///
/// Paths handed to the client are already normalized (`/prefix/a/b`). The
/// client owns authentication, transport and path-to-id resolution; every
/// outcome, including transport failure, comes back as a [`BoxResponse`].
#[async_trait]
pub trait BoxClient: Send + Sync {
    async fn upload_contents(&self, contents: Bytes, path: &str) -> BoxResponse;

    async fn upload_stream_contents(&self, stream: ByteStream, path: &str) -> BoxResponse;

    /// Upload a new version of an existing file.
    async fn upload_contents_version(&self, contents: Bytes, path: &str) -> BoxResponse;

    async fn upload_stream_contents_version(&self, stream: ByteStream, path: &str)
        -> BoxResponse;

    async fn move_file(&self, path: &str, new_path: &str) -> BoxResponse;

    async fn copy_file(&self, path: &str, new_path: &str) -> BoxResponse;

    async fn delete_file(&self, path: &str) -> BoxResponse;

    async fn delete_folder(&self, path: &str, recursive: bool) -> BoxResponse;

    async fn create_folder(&self, path: &str) -> BoxResponse;

    async fn file_information(&self, path: &str) -> BoxResponse;

    async fn file_stream_download(&self, path: &str) -> BoxResponse;

    /// Number of items directly inside a folder; negative on error.
    async fn get_folder_items_count(&self, path: &str) -> i64;

    /// One page of folder items, as JSON `{"entries": [...]}`.
    async fn get_folder_items(
        &self,
        path: &str,
        filters: &[String],
        offset: u64,
        limit: u64,
    ) -> BoxResponse;

    async fn file_embedded_link(&self, path: &str) -> BoxResponse;

    async fn file_thumbnail_stream(&self, path: &str, extension: &str, size: &str)
        -> BoxResponse;
}
