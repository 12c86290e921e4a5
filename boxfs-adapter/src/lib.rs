//! Box implementation of the `boxfs-common` storage abstraction.

pub mod adapter;
pub mod client;
pub mod config;
pub mod listing;
pub mod memory;
pub mod response;

pub use adapter::{BoxAdapter, TemporaryLink, Thumbnail, ThumbnailOptions};
pub use client::BoxClient;
pub use config::AdapterConfig;
pub use memory::MemoryClient;
pub use response::BoxResponse;
