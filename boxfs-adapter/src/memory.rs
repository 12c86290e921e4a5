//! In-memory Box client.
//!
//! Keeps a tree of files and folders keyed by normalized path and answers
//! with the status codes Box uses: 404 for a missing item or parent, 409 for
//! a name conflict or a non-empty folder. Useful for tests and local runs.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use boxfs_common::ByteStream;

use crate::client::BoxClient;
use crate::response::BoxResponse;

const ROOT: &str = "/";
const ROOT_ID: &str = "0";

/// One `get_folder_items` call as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone)]
enum NodeKind {
    File { contents: Bytes, version: u32 },
    Folder,
}

#[derive(Debug, Clone)]
struct Node {
    id: String,
    kind: NodeKind,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Node {
    fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder)
    }
}

struct Tree {
    nodes: BTreeMap<String, Node>,
    next_id: u64,
}

impl Tree {
    fn new() -> Self {
        let now = Utc::now();
        let root = Node {
            id: ROOT_ID.to_string(),
            kind: NodeKind::Folder,
            created_at: now,
            modified_at: now,
        };
        Self { nodes: BTreeMap::from([(ROOT.to_string(), root)]), next_id: 1000 }
    }

    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn folder_exists(&self, path: &str) -> bool {
        self.nodes.get(path).is_some_and(Node::is_folder)
    }

    fn file(&self, path: &str) -> Option<&Node> {
        self.nodes.get(path).filter(|n| !n.is_folder())
    }

    /// Direct children of a folder, ordered by name.
    fn children<'a>(&'a self, path: &'a str) -> impl Iterator<Item = (&'a String, &'a Node)> + 'a {
        self.nodes
            .iter()
            .filter(move |(p, _)| p.as_str() != ROOT && parent(p) == path)
    }

    fn descendants(&self, path: &str) -> Vec<String> {
        let below = if path == ROOT { ROOT.to_string() } else { format!("{}/", path) };
        self.nodes
            .keys()
            .filter(|p| p.as_str() != ROOT && p.starts_with(&below))
            .cloned()
            .collect()
    }

    fn size(&self, path: &str, node: &Node) -> u64 {
        match &node.kind {
            NodeKind::File { contents, .. } => contents.len() as u64,
            NodeKind::Folder => self
                .descendants(path)
                .iter()
                .filter_map(|p| self.nodes.get(p))
                .map(|n| match &n.kind {
                    NodeKind::File { contents, .. } => contents.len() as u64,
                    NodeKind::Folder => 0,
                })
                .sum(),
        }
    }

    fn to_json(&self, path: &str, node: &Node) -> Value {
        let mut item = json!({
            "type": if node.is_folder() { "folder" } else { "file" },
            "id": node.id,
            "name": name(path),
            "size": self.size(path, node),
            "created_at": node.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "modified_at": node.modified_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        });
        if let NodeKind::File { version, .. } = node.kind {
            item["etag"] = json!(version.to_string());
        }
        item
    }

    fn item_response(&self, code: u16, path: &str) -> BoxResponse {
        match self.nodes.get(path) {
            Some(node) => BoxResponse::new(code, self.to_json(path, node)),
            None => not_found(path),
        }
    }

    /// Check that `path` can be created: not the root, free, and inside an
    /// existing folder.
    fn check_new_item(&self, path: &str) -> Result<(), BoxResponse> {
        if path == ROOT {
            return Err(error(400, "bad_request", "The root folder cannot be replaced"));
        }
        if self.nodes.contains_key(path) {
            return Err(error(409, "item_name_in_use", "Item with the same name already exists"));
        }
        if !self.folder_exists(parent(path)) {
            return Err(not_found(parent(path)));
        }
        Ok(())
    }

    fn insert_file(&mut self, path: &str, contents: Bytes) -> BoxResponse {
        if let Err(resp) = self.check_new_item(path) {
            return resp;
        }
        let now = Utc::now();
        let node = Node {
            id: self.next_id(),
            kind: NodeKind::File { contents, version: 1 },
            created_at: now,
            modified_at: now,
        };
        self.nodes.insert(path.to_string(), node);
        self.item_response(201, path)
    }

    fn replace_file(&mut self, path: &str, new_contents: Bytes) -> BoxResponse {
        let Some(node) = self.nodes.get_mut(path).filter(|n| !n.is_folder()) else {
            return not_found(path);
        };
        if let NodeKind::File { contents, version } = &mut node.kind {
            *contents = new_contents;
            *version += 1;
        }
        node.modified_at = Utc::now();
        self.item_response(201, path)
    }
}

/// An in-memory [`BoxClient`].
pub struct MemoryClient {
    tree: Mutex<Tree>,
    page_requests: Mutex<Vec<PageRequest>>,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClient {
    pub fn new() -> Self {
        Self { tree: Mutex::new(Tree::new()), page_requests: Mutex::new(Vec::new()) }
    }

    /// Every `get_folder_items` call made so far, oldest first.
    pub fn page_requests(&self) -> Vec<PageRequest> {
        self.page_requests.lock().unwrap().clone()
    }

    /// Normalized paths of every stored item except the root.
    pub fn paths(&self) -> Vec<String> {
        let tree = self.tree.lock().unwrap();
        tree.nodes.keys().filter(|p| p.as_str() != ROOT).cloned().collect()
    }

    /// Stored contents of a file.
    pub fn contents(&self, path: &str) -> Option<Bytes> {
        let tree = self.tree.lock().unwrap();
        tree.file(path).and_then(|n| match &n.kind {
            NodeKind::File { contents, .. } => Some(contents.clone()),
            NodeKind::Folder => None,
        })
    }
}

#[async_trait]
impl BoxClient for MemoryClient {
    async fn upload_contents(&self, contents: Bytes, path: &str) -> BoxResponse {
        self.tree.lock().unwrap().insert_file(path, contents)
    }

    async fn upload_stream_contents(&self, stream: ByteStream, path: &str) -> BoxResponse {
        match stream.into_bytes().await {
            Ok(contents) => self.upload_contents(contents, path).await,
            Err(e) => BoxResponse::transport_error(format!("upload stream failed: {e}")),
        }
    }

    async fn upload_contents_version(&self, contents: Bytes, path: &str) -> BoxResponse {
        self.tree.lock().unwrap().replace_file(path, contents)
    }

    async fn upload_stream_contents_version(
        &self,
        stream: ByteStream,
        path: &str,
    ) -> BoxResponse {
        match stream.into_bytes().await {
            Ok(contents) => self.upload_contents_version(contents, path).await,
            Err(e) => BoxResponse::transport_error(format!("upload stream failed: {e}")),
        }
    }

    async fn move_file(&self, path: &str, new_path: &str) -> BoxResponse {
        let mut tree = self.tree.lock().unwrap();
        if tree.file(path).is_none() {
            return not_found(path);
        }
        if let Err(resp) = tree.check_new_item(new_path) {
            return resp;
        }
        if let Some(mut node) = tree.nodes.remove(path) {
            node.modified_at = Utc::now();
            tree.nodes.insert(new_path.to_string(), node);
        }
        tree.item_response(200, new_path)
    }

    async fn copy_file(&self, path: &str, new_path: &str) -> BoxResponse {
        let mut tree = self.tree.lock().unwrap();
        let Some(source) = tree.file(path).cloned() else {
            return not_found(path);
        };
        if let Err(resp) = tree.check_new_item(new_path) {
            return resp;
        }
        let now = Utc::now();
        let copy = Node { id: tree.next_id(), created_at: now, modified_at: now, ..source };
        tree.nodes.insert(new_path.to_string(), copy);
        tree.item_response(201, new_path)
    }

    async fn delete_file(&self, path: &str) -> BoxResponse {
        let mut tree = self.tree.lock().unwrap();
        if tree.file(path).is_none() {
            return not_found(path);
        }
        tree.nodes.remove(path);
        BoxResponse::new(204, Value::Null)
    }

    async fn delete_folder(&self, path: &str, recursive: bool) -> BoxResponse {
        let mut tree = self.tree.lock().unwrap();
        if path == ROOT {
            return error(403, "access_denied", "The root folder cannot be deleted");
        }
        if !tree.folder_exists(path) {
            return not_found(path);
        }
        let descendants = tree.descendants(path);
        if !recursive && !descendants.is_empty() {
            return error(409, "folder_not_empty", "Cannot delete a folder that is not empty");
        }
        for p in descendants {
            tree.nodes.remove(&p);
        }
        tree.nodes.remove(path);
        BoxResponse::new(204, Value::Null)
    }

    async fn create_folder(&self, path: &str) -> BoxResponse {
        let mut tree = self.tree.lock().unwrap();
        if let Err(resp) = tree.check_new_item(path) {
            return resp;
        }
        let now = Utc::now();
        let node = Node { id: tree.next_id(), kind: NodeKind::Folder, created_at: now, modified_at: now };
        tree.nodes.insert(path.to_string(), node);
        tree.item_response(201, path)
    }

    async fn file_information(&self, path: &str) -> BoxResponse {
        self.tree.lock().unwrap().item_response(200, path)
    }

    async fn file_stream_download(&self, path: &str) -> BoxResponse {
        let tree = self.tree.lock().unwrap();
        let Some(node) = tree.file(path) else {
            return not_found(path);
        };
        let contents = match &node.kind {
            NodeKind::File { contents, .. } => contents.clone(),
            NodeKind::Folder => Bytes::new(),
        };
        BoxResponse::new(200, tree.to_json(path, node)).with_stream(ByteStream::from_bytes(contents))
    }

    async fn get_folder_items_count(&self, path: &str) -> i64 {
        let tree = self.tree.lock().unwrap();
        if !tree.folder_exists(path) {
            return -1;
        }
        tree.children(path).count() as i64
    }

    async fn get_folder_items(
        &self,
        path: &str,
        _filters: &[String],
        offset: u64,
        limit: u64,
    ) -> BoxResponse {
        self.page_requests.lock().unwrap().push(PageRequest {
            path: path.to_string(),
            offset,
            limit,
        });

        let tree = self.tree.lock().unwrap();
        if !tree.folder_exists(path) {
            return not_found(path);
        }
        let total = tree.children(path).count();
        let entries: Vec<Value> = tree
            .children(path)
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(p, node)| tree.to_json(p, node))
            .collect();
        BoxResponse::new(
            200,
            json!({ "total_count": total, "offset": offset, "limit": limit, "entries": entries }),
        )
    }

    async fn file_embedded_link(&self, path: &str) -> BoxResponse {
        let tree = self.tree.lock().unwrap();
        let Some(node) = tree.file(path) else {
            return not_found(path);
        };
        let mut item = tree.to_json(path, node);
        item["expiring_embed_link"] = json!({
            "url": format!("https://app.box.com/preview/expiring_embed/{}", node.id),
        });
        BoxResponse::new(200, item)
    }

    async fn file_thumbnail_stream(&self, path: &str, extension: &str, _size: &str) -> BoxResponse {
        if !matches!(extension, "png" | "jpg") {
            return error(400, "bad_request", "Thumbnail extension must be png or jpg");
        }
        let tree = self.tree.lock().unwrap();
        if tree.file(path).is_none() {
            return not_found(path);
        }
        // No renderer: report the thumbnail as not yet generated.
        BoxResponse::new(202, json!({ "message": "Thumbnail is being generated" }))
    }
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => ROOT,
        Some(i) => &path[..i],
    }
}

fn name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn error(status: u16, code: &str, message: &str) -> BoxResponse {
    BoxResponse::new(
        status,
        json!({ "type": "error", "status": status, "code": code, "message": message }),
    )
}

fn not_found(path: &str) -> BoxResponse {
    error(404, "not_found", &format!("Item not found: {path}"))
}
