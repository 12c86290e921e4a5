/// Configured path prefix for a storage adapter.
///
/// Remote paths always carry exactly one leading slash and no trailing slash:
/// `apply("//a/b/")` under prefix `root` yields `/root/a/b`, and `strip` turns
/// that back into the caller-relative `a/b`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPrefix {
    prefix: String,
}

impl PathPrefix {
    pub fn new(prefix: &str) -> Self {
        Self { prefix: prefix.trim_matches('/').to_string() }
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Apply the prefix to a caller path and normalize the result.
    pub fn apply(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        let joined = if self.prefix.is_empty() {
            path.to_string()
        } else if path.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}/{}", self.prefix, path)
        };
        format!("/{}", joined.trim_matches('/'))
    }

    /// Remove the prefix and any leading slash from a remote path.
    ///
    /// Paths outside the prefix come back with only their leading slashes
    /// removed.
    pub fn strip(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.prefix.is_empty() {
            return path.to_string();
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some("") => String::new(),
            Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/').to_string(),
            _ => path.to_string(),
        }
    }
}

/// Join a normalized directory path and a child name.
pub fn join(directory: &str, name: &str) -> String {
    if name.starts_with('/') {
        return name.to_string();
    }
    let directory = directory.trim_end_matches('/');
    format!("{}/{}", directory, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let prefix = PathPrefix::new("root");
        assert_eq!(prefix.apply("//a/b/"), "/root/a/b");
        assert_eq!(prefix.apply("a"), "/root/a");
        assert_eq!(prefix.apply(""), "/root");
        assert_eq!(prefix.apply("/"), "/root");

        let none = PathPrefix::new("");
        assert_eq!(none.apply("//a/b/"), "/a/b");
        assert_eq!(none.apply(""), "/");
        assert_eq!(none.apply("///"), "/");
    }

    #[test]
    fn test_prefix_is_trimmed() {
        let prefix = PathPrefix::new("/backups/box/");
        assert_eq!(prefix.as_str(), "backups/box");
        assert_eq!(prefix.apply("file.txt"), "/backups/box/file.txt");
        assert!(PathPrefix::new("//").is_empty());
    }

    #[test]
    fn test_strip() {
        let prefix = PathPrefix::new("root");
        assert_eq!(prefix.strip("/root/a/b"), "a/b");
        assert_eq!(prefix.strip("/root"), "");
        assert_eq!(prefix.strip("root/a"), "a");
        // Segment-aware: "rooted" is not under "root".
        assert_eq!(prefix.strip("/rooted/a"), "rooted/a");
        assert_eq!(prefix.strip("/other/a"), "other/a");
        assert_eq!(PathPrefix::new("").strip("//a/b"), "a/b");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let prefix = PathPrefix::new("");
        for raw in ["a", "/a/b/", "//x//", ""] {
            let once = prefix.apply(raw);
            assert_eq!(prefix.apply(&once), once);
        }
    }

    #[test]
    fn test_round_trip() {
        for prefix in ["", "root", "/nested/prefix/", "a"] {
            let prefix = PathPrefix::new(prefix);
            for raw in ["", "/", "//a/b/", "a", "a/a", "root/x", "/deep/er/path.txt"] {
                let normalized = prefix.apply(raw);
                assert_eq!(
                    prefix.apply(&prefix.strip(&normalized)),
                    normalized,
                    "prefix {:?}, path {:?}",
                    prefix.as_str(),
                    raw
                );
                assert!(normalized.starts_with('/'));
                assert!(!normalized.starts_with("//"));
                assert!(normalized == "/" || !normalized.ends_with('/'));
            }
        }
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/root/docs", "a.txt"), "/root/docs/a.txt");
        assert_eq!(join("/", "a.txt"), "/a.txt");
        assert_eq!(join("/root", "/root/b.txt"), "/root/b.txt");
    }
}
