use composer_model::{BlockCatalog, CatalogEntry, IdGenerator, RandomIds, SequentialIds};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "composer.config.json";

/// Composer configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerConfig {
    /// Block kinds registered on top of the built-in catalog
    #[serde(default)]
    pub custom_kinds: Vec<CatalogEntry>,

    /// Undo depth (0 = unlimited)
    #[serde(default = "default_history_levels")]
    pub history_levels: usize,

    /// How fresh node ids are generated
    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Seed for sequential ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_seed: Option<String>,

    /// Directory for the file-backed store, relative to the config
    #[serde(default = "default_store_dir")]
    pub store_dir: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdStrategy {
    #[default]
    Uuid,
    Sequential,
}

fn default_history_levels() -> usize {
    100
}

fn default_store_dir() -> String {
    "documents".to_string()
}

fn default_id_seed() -> &'static str {
    "node"
}

impl ComposerConfig {
    /// Load config from a directory
    pub fn load(cwd: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = cwd.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: ComposerConfig = serde_json::from_str(&content)?;
            tracing::debug!(
                "[Config] Loaded {} ({} custom kinds)",
                config_path.display(),
                config.custom_kinds.len()
            );
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(ComposerConfig::default())
        }
    }

    /// Built-in catalog extended with the configured custom kinds
    pub fn catalog(&self) -> BlockCatalog {
        BlockCatalog::with_custom(self.custom_kinds.iter().cloned())
    }

    pub fn id_generator(&self) -> Box<dyn IdGenerator> {
        match self.id_strategy {
            IdStrategy::Uuid => Box::new(RandomIds),
            IdStrategy::Sequential => Box::new(SequentialIds::new(
                self.id_seed.as_deref().unwrap_or(default_id_seed()),
            )),
        }
    }

    /// Get absolute path to the store directory
    pub fn get_store_dir(&self, cwd: impl AsRef<Path>) -> PathBuf {
        cwd.as_ref().join(&self.store_dir)
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            custom_kinds: vec![],
            history_levels: default_history_levels(),
            id_strategy: IdStrategy::default(),
            id_seed: None,
            store_dir: default_store_dir(),
        }
    }
}
