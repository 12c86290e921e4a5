use serde::Deserialize;
use std::path::Path;

use crate::listing::MAX_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdapterConfig {
    /// Folder under which every adapter path lives. Empty means the account root.
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page_size() -> u64 {
    MAX_PAGE_SIZE
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self { prefix: String::new(), page_size: default_page_size() }
    }
}

impl AdapterConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: AdapterConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            anyhow::bail!("page_size must be between 1 and {}, got {}", MAX_PAGE_SIZE, self.page_size);
        }
        if self.prefix.split('/').any(|segment| segment == "..") {
            anyhow::bail!("prefix must not contain '..' segments: {}", self.prefix);
        }
        Ok(())
    }
}
