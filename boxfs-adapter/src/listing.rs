//! Paginated directory listing.
//!
//! The folder's item count is read once up front and fixes how many pages
//! are requested. Each page asks for at most [`MAX_PAGE_SIZE`] items and the
//! last page asks for exactly the remainder.

use boxfs_common::entry::parse_timestamp;
use boxfs_common::path::join;
use boxfs_common::{DirectoryEntry, EntryType, PathPrefix, StorageError, StorageResult};
use serde::Deserialize;
use tracing::debug;

use crate::client::BoxClient;

/// Largest page the folder-items endpoint accepts.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// A folder item as reported by the remote.
#[derive(Debug, Deserialize)]
struct RemoteEntry {
    #[serde(rename = "type")]
    kind: String,
    modified_at: Option<String>,
    name: String,
    size: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FolderItemsPage {
    #[serde(default)]
    entries: Vec<RemoteEntry>,
}

/// List the items directly inside `directory` (a normalized remote path).
///
/// All-or-nothing: an error on any page discards the pages already fetched.
pub async fn list_folder<C>(
    client: &C,
    prefix: &PathPrefix,
    directory: &str,
    page_size: u64,
) -> StorageResult<Vec<DirectoryEntry>>
where
    C: BoxClient + ?Sized,
{
    let count = client.get_folder_items_count(directory).await;
    if count < 0 {
        debug!(path = %directory, count, "Folder item count query failed");
        return Err(StorageError::listing(directory, format!("item count is {count}")));
    }
    let count = count as u64;
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

    // The count is remote-reported, so nothing is reserved from it.
    let mut entries = Vec::new();
    let mut offset = 0;
    let mut limit = page_size.min(count);
    while offset < count {
        let resp = client.get_folder_items(directory, &[], offset, limit).await;
        if resp.is_error() {
            debug!(path = %directory, offset, code = resp.code(), "Folder items page failed");
            return Err(StorageError::listing(
                directory,
                format!("page at offset {offset}: {}", resp.error_message()),
            ));
        }

        let page: FolderItemsPage = if resp.json().is_null() {
            FolderItemsPage::default()
        } else {
            FolderItemsPage::deserialize(resp.json()).map_err(|e| {
                StorageError::listing(directory, format!("page at offset {offset}: {e}"))
            })?
        };
        entries.extend(page.entries.iter().map(|e| to_directory_entry(e, prefix, directory)));

        offset += limit;
        limit = page_size.min(count - offset);
    }

    debug!(path = %directory, count, returned = entries.len(), "Listed folder");
    Ok(entries)
}

fn to_directory_entry(entry: &RemoteEntry, prefix: &PathPrefix, directory: &str) -> DirectoryEntry {
    let entry_type = EntryType::from_remote(&entry.kind);
    DirectoryEntry {
        path: prefix.strip(&join(directory, &entry.name)),
        entry_type,
        timestamp: entry
            .modified_at
            .as_deref()
            .and_then(parse_timestamp)
            .map(|t| t.timestamp()),
        size: match entry_type {
            EntryType::File => entry.size,
            EntryType::Dir => None,
        },
    }
}
