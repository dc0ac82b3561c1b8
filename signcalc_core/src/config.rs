//! # Engine Configuration
//!
//! Where packs and catalogs come from, and the version label written into
//! every trace. Loaded from TOML:
//!
//! ```toml
//! packs_dir = "/etc/signcalc/packs"
//! code_version = "2.3.0"
//!
//! [catalogs]
//! pipe = "data/aisc-shapes-v16.csv"
//! W = "data/aisc-shapes-v16.csv"
//! ```
//!
//! Everything is optional; an empty file means built-in packs and catalogs.
//! `SIGNCALC_PACKS_DIR` in the environment replaces `packs_dir`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::{load_catalog_csv, CatalogProvider, SupportFamily};
use crate::errors::{CalcError, CalcResult};
use crate::standards::{PackSource, PackStore};

/// Environment variable selecting a pack directory
pub const PACKS_DIR_ENV: &str = "SIGNCALC_PACKS_DIR";

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory of `<pack-id>.toml` files; built-in packs when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packs_dir: Option<PathBuf>,

    /// Per-family AISC CSV exports replacing the built-in tables
    pub catalogs: BTreeMap<SupportFamily, PathBuf>,

    /// Label recorded as `code_version` in result traces
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_version: Option<String>,
}

impl EngineConfig {
    /// Parse configuration text; `origin` names the source in errors
    pub fn from_toml_str(text: &str, origin: &str) -> CalcResult<Self> {
        toml::from_str(text)
            .map_err(|e| CalcError::invalid_input("config", origin, format!("Invalid TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> CalcResult<Self> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CalcError::invalid_input("config", &display, format!("Failed to read: {}", e))
        })?;
        Self::from_toml_str(&text, &display)
    }

    /// Apply `SIGNCALC_PACKS_DIR` if it is set and non-empty
    pub fn with_env(self) -> Self {
        self.with_packs_dir_override(std::env::var(PACKS_DIR_ENV).ok())
    }

    /// Replace the pack directory when `dir` is present and non-empty
    pub fn with_packs_dir_override(mut self, dir: Option<String>) -> Self {
        if let Some(dir) = dir.filter(|d| !d.trim().is_empty()) {
            self.packs_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn pack_source(&self) -> PackSource {
        match &self.packs_dir {
            Some(dir) => PackSource::Directory(dir.clone()),
            None => PackSource::Builtin,
        }
    }

    pub fn pack_store(&self) -> PackStore {
        PackStore::new(self.pack_source())
    }

    /// Built-in catalogs with any configured CSV overrides installed
    pub fn catalog_provider(&self) -> CalcResult<CatalogProvider> {
        let mut provider = CatalogProvider::builtin();
        for (family, path) in &self.catalogs {
            provider = provider.with_catalog(load_catalog_csv(path, *family)?);
        }
        Ok(provider)
    }

    /// Trace version label; the crate version unless configured
    pub fn code_version(&self) -> String {
        self.code_version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_builtin() {
        let config = EngineConfig::from_toml_str("", "inline").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(matches!(config.pack_source(), PackSource::Builtin));
        assert_eq!(config.code_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_parse_full_config() {
        let text = r#"
            packs_dir = "/srv/packs"
            code_version = "2.3.0"

            [catalogs]
            pipe = "pipe.csv"
            W = "shapes.csv"
        "#;
        let config = EngineConfig::from_toml_str(text, "inline").unwrap();
        assert_eq!(config.packs_dir, Some(PathBuf::from("/srv/packs")));
        assert_eq!(config.code_version(), "2.3.0");
        assert_eq!(config.catalogs.len(), 2);
        assert_eq!(
            config.catalogs.get(&SupportFamily::WideFlange),
            Some(&PathBuf::from("shapes.csv"))
        );
    }

    #[test]
    fn test_packs_dir_override() {
        let config = EngineConfig::default().with_packs_dir_override(Some("/tmp/p".to_string()));
        match config.pack_source() {
            PackSource::Directory(dir) => assert_eq!(dir, PathBuf::from("/tmp/p")),
            other => panic!("unexpected source: {other:?}"),
        }

        let unchanged = EngineConfig::default().with_packs_dir_override(Some("  ".to_string()));
        assert!(unchanged.packs_dir.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let err = EngineConfig::from_toml_str("packs_dir = [", "bad.toml").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_missing_catalog_file() {
        let mut config = EngineConfig::default();
        config
            .catalogs
            .insert(SupportFamily::Tube, PathBuf::from("/nonexistent/signcalc/tube.csv"));
        let err = config.catalog_provider().unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_LOAD");
    }
}
