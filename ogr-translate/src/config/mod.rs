//! Configuration de l'outil

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration principale
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Charset des fichiers MapInfo produits (ex: "WindowsLatin1")
    #[serde(default)]
    pub charset: Option<String>,

    /// Écrire le schéma NAS déduit dans un fichier .gfs
    #[serde(default = "default_true")]
    pub save_schema_cache: bool,

    /// Extraire les relations NAS dans `nas-info`
    #[serde(default)]
    pub relations: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            charset: None,
            save_schema_cache: true,
            relations: false,
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Configuration du fichier donné, ou configuration par défaut
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.charset.is_none());
        assert!(config.save_schema_cache);
        assert!(!config.relations);
    }

    #[test]
    fn test_load() {
        let path = std::env::temp_dir().join(format!("ogr-translate-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"charset": "WindowsLatin1", "save_schema_cache": false, "relations": true}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.charset.as_deref(), Some("WindowsLatin1"));
        assert!(!config.save_schema_cache);
        assert!(config.relations);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::load(Path::new("/nonexistent/config.json")).is_err());
        assert!(Config::load_or_default(None).unwrap().save_schema_cache);
    }
}
