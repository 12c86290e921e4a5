use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stream::ByteStream;

// ── Directory listing ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "dir")]
    Dir,
}

impl EntryType {
    /// Map a remote item type onto the abstraction's entry type. Only
    /// `folder` is a directory.
    pub fn from_remote(kind: &str) -> Self {
        if kind == "folder" {
            Self::Dir
        } else {
            Self::File
        }
    }
}

/// One child of a listed directory, relative to the adapter's prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl DirectoryEntry {
    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Dir
    }
}

// ── Operation results ──

/// Status code and raw JSON body of a successful remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub code: u16,
    pub body: serde_json::Value,
}

impl Metadata {
    pub fn new(code: u16, body: serde_json::Value) -> Self {
        Self { code, body }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.body.get(key)
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(|v| v.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(|v| v.as_str())
    }

    pub fn size(&self) -> Option<u64> {
        self.get("size").and_then(|v| v.as_u64())
    }

    pub fn entry_type(&self) -> Option<EntryType> {
        self.get("type").and_then(|v| v.as_str()).map(EntryType::from_remote)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadResponse {
    #[serde(flatten)]
    pub metadata: Metadata,
    #[serde(skip)]
    pub contents: Bytes,
}

#[derive(Debug)]
pub struct StreamResponse {
    pub metadata: Metadata,
    pub stream: ByteStream,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timestamps {
    #[serde(flatten)]
    pub metadata: Metadata,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Parse a remote RFC 3339 timestamp.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
