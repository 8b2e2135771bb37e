use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "mailbuilder.config.json";

/// Mailbuilder project configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the `*.json` templates
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Where compiled `.html` files are written
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Emit complete documents rather than bare rows
    #[serde(default = "default_true")]
    pub full_document: bool,

    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Values bound over every template's variable defaults
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

fn default_src_dir() -> String {
    "templates".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn get_src_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.src_dir)
    }

    pub fn get_out_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            out_dir: default_out_dir(),
            full_document: true,
            pretty: true,
            variables: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "srcDir": "emails",
            "outDir": "build",
            "fullDocument": false,
            "variables": { "company": "Acme" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.src_dir, "emails");
        assert_eq!(config.out_dir, "build");
        assert!(!config.full_document);
        assert!(config.pretty);
        assert_eq!(config.variables.get("company").map(String::as_str), Some("Acme"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.src_dir, "templates");
        assert_eq!(config.out_dir, "dist");
        assert!(config.full_document);
        assert!(config.variables.is_empty());
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "srcDir": "mail" }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.get_src_dir(dir.path()), dir.path().join("mail"));
        assert_eq!(config.get_out_dir(dir.path()), dir.path().join("dist"));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ not json").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
