pub mod adapter;
pub mod entry;
pub mod error;
pub mod options;
pub mod path;
pub mod stream;

pub use adapter::StorageAdapter;
pub use entry::{
    DirectoryEntry, EntryType, Metadata, ReadResponse, StreamResponse, Timestamps,
};
pub use error::{StorageError, StorageResult};
pub use options::{Visibility, WriteOptions};
pub use path::PathPrefix;
pub use stream::ByteStream;
