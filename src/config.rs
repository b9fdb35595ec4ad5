// src/config.rs
//! Tool configuration
//!
//! A closed, explicitly enumerated set of typed fields, loaded from a
//! TOML file. The configuration is constructed once and passed by value
//! into the engine; nothing mutates it mid-operation.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::error::{Error, Result};

/// Downloader strategy names accepted by `validate()`
pub const DOWNLOADERS: &[&str] = &["powershell", "http"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Repository base URL; metadata paths and relative artifact hrefs
    /// resolve against it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the repository description below the base URL
    #[serde(default = "default_repomd_path")]
    pub repomd_path: String,

    /// Local copy of the repository description
    #[serde(default = "default_repomd_file")]
    pub repomd_file: PathBuf,

    /// Local copy of the compressed primary index
    #[serde(default = "default_compressed_index_file")]
    pub compressed_index_file: PathBuf,

    /// Local copy of the decompressed primary index
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,

    /// Directory artifact files are downloaded into
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Columns in tabular package listings
    #[serde(default = "default_package_columns")]
    pub package_columns: usize,

    /// Column width in tabular package listings
    #[serde(default = "default_package_column_width")]
    pub package_column_width: usize,

    /// Disable TLS certificate verification (http downloader only)
    #[serde(default = "default_true")]
    pub skip_tls_verify: bool,

    /// Fold weak requirements into the dependency graph
    #[serde(default)]
    pub support_weak_deps: bool,

    /// Select only the newest artifact entry per package
    #[serde(default = "default_true")]
    pub only_latest_version: bool,

    /// Download strategy: "powershell" or "http"
    #[serde(default = "default_downloader")]
    pub downloader: String,

    /// Explicit proxy URL (http downloader only; powershell uses the
    /// system proxy with default credentials)
    #[serde(default)]
    pub proxy_url: Option<String>,
}

fn default_base_url() -> String {
    "https://dl.fedoraproject.org/pub/epel/9/Everything/x86_64/".to_string()
}

fn default_repomd_path() -> String {
    "repodata/repomd.xml".to_string()
}

fn default_repomd_file() -> PathBuf {
    PathBuf::from("repomd.xml")
}

fn default_compressed_index_file() -> PathBuf {
    PathBuf::from("primary.xml.xz")
}

fn default_index_file() -> PathBuf {
    PathBuf::from("primary.xml")
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("rpms")
}

fn default_package_columns() -> usize {
    4
}

fn default_package_column_width() -> usize {
    30
}

fn default_true() -> bool {
    true
}

fn default_downloader() -> String {
    "powershell".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            repomd_path: default_repomd_path(),
            repomd_file: default_repomd_file(),
            compressed_index_file: default_compressed_index_file(),
            index_file: default_index_file(),
            download_dir: default_download_dir(),
            package_columns: default_package_columns(),
            package_column_width: default_package_column_width(),
            skip_tls_verify: true,
            support_weak_deps: false,
            only_latest_version: true,
            downloader: default_downloader(),
            proxy_url: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error: defaults apply, with a warning.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file '{}' not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::IoError(format!("Failed to read {}: {e}", path.display())))?;
        let config: Config = toml::from_str(&raw)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {e}")))?;
        fs::write(path, raw)
            .map_err(|e| Error::IoError(format!("Failed to write {}: {e}", path.display())))?;
        info!("Config written to {}", path.display());
        Ok(())
    }

    /// Reject invalid values before anything enters the engine
    pub fn validate(&self) -> Result<()> {
        if !DOWNLOADERS.contains(&self.downloader.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "Invalid downloader '{}'. Allowed: {}",
                self.downloader,
                DOWNLOADERS.join(", ")
            )));
        }
        Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidConfig(format!("Invalid base_url '{}': {e}", self.base_url)))?;
        if let Some(ref proxy) = self.proxy_url {
            Url::parse(proxy)
                .map_err(|e| Error::InvalidConfig(format!("Invalid proxy_url '{proxy}': {e}")))?;
        }
        if self.package_columns == 0 {
            return Err(Error::InvalidConfig(
                "package_columns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The repository base URL, parsed. Call after `validate()`.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidConfig(format!("Invalid base_url '{}': {e}", self.base_url)))
    }

    /// Set one field by name from a string value.
    ///
    /// The field set is closed and enumerated here; there is no
    /// reflection over arbitrary keys. The updated configuration is
    /// re-validated before being accepted.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "base_url" => updated.base_url = value.to_string(),
            "repomd_path" => updated.repomd_path = value.to_string(),
            "repomd_file" => updated.repomd_file = PathBuf::from(value),
            "compressed_index_file" => updated.compressed_index_file = PathBuf::from(value),
            "index_file" => updated.index_file = PathBuf::from(value),
            "download_dir" => updated.download_dir = PathBuf::from(value),
            "package_columns" => updated.package_columns = parse_usize(key, value)?,
            "package_column_width" => updated.package_column_width = parse_usize(key, value)?,
            "skip_tls_verify" => updated.skip_tls_verify = parse_bool(key, value)?,
            "support_weak_deps" => updated.support_weak_deps = parse_bool(key, value)?,
            "only_latest_version" => updated.only_latest_version = parse_bool(key, value)?,
            "downloader" => updated.downloader = value.to_lowercase(),
            "proxy_url" => {
                updated.proxy_url = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            other => {
                return Err(Error::InvalidConfig(format!(
                    "Unknown config key '{}'. Known keys: {}",
                    other,
                    FIELD_NAMES.join(", ")
                )))
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Render the effective configuration, one `key = value` per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "base_url = {}", self.base_url);
        let _ = writeln!(out, "repomd_path = {}", self.repomd_path);
        let _ = writeln!(out, "repomd_file = {}", self.repomd_file.display());
        let _ = writeln!(
            out,
            "compressed_index_file = {}",
            self.compressed_index_file.display()
        );
        let _ = writeln!(out, "index_file = {}", self.index_file.display());
        let _ = writeln!(out, "download_dir = {}", self.download_dir.display());
        let _ = writeln!(out, "package_columns = {}", self.package_columns);
        let _ = writeln!(out, "package_column_width = {}", self.package_column_width);
        let _ = writeln!(out, "skip_tls_verify = {}", self.skip_tls_verify);
        let _ = writeln!(out, "support_weak_deps = {}", self.support_weak_deps);
        let _ = writeln!(out, "only_latest_version = {}", self.only_latest_version);
        let _ = writeln!(out, "downloader = {}", self.downloader);
        let _ = writeln!(
            out,
            "proxy_url = {}",
            self.proxy_url.as_deref().unwrap_or("(none)")
        );
        out
    }
}

/// Keys accepted by `set_field`
pub const FIELD_NAMES: &[&str] = &[
    "base_url",
    "repomd_path",
    "repomd_file",
    "compressed_index_file",
    "index_file",
    "download_dir",
    "package_columns",
    "package_column_width",
    "skip_tls_verify",
    "support_weak_deps",
    "only_latest_version",
    "downloader",
    "proxy_url",
];

fn parse_usize(key: &str, value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|_| Error::InvalidConfig(format!("{key} expects an integer, got '{value}'")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => Err(Error::InvalidConfig(format!(
            "{key} expects a boolean, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.repomd_path, "repodata/repomd.xml");
        assert_eq!(config.downloader, "powershell");
        assert_eq!(config.package_columns, 4);
        assert!(!config.support_weak_deps);
        assert!(config.only_latest_version);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            base_url = "https://mirror.example.org/repo/"
            downloader = "http"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://mirror.example.org/repo/");
        assert_eq!(config.downloader, "http");
        // Everything else keeps its default
        assert_eq!(config.index_file, PathBuf::from("primary.xml"));
        assert_eq!(config.package_column_width, 30);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repodeps.toml");

        let mut config = Config::default();
        config.downloader = "http".to_string();
        config.proxy_url = Some("http://proxy.example.com:3128".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.downloader, "http");
        assert_eq!(
            loaded.proxy_url.as_deref(),
            Some("http://proxy.example.com:3128")
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/repodeps.toml")).unwrap();
        assert_eq!(config.downloader, "powershell");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.downloader = "ftp".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.package_columns = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_set_field_typed() {
        let mut config = Config::default();
        config.set_field("package_columns", "6").unwrap();
        assert_eq!(config.package_columns, 6);

        config.set_field("support_weak_deps", "yes").unwrap();
        assert!(config.support_weak_deps);

        config.set_field("proxy_url", "").unwrap();
        assert!(config.proxy_url.is_none());

        assert!(config.set_field("package_columns", "many").is_err());
        assert!(config.set_field("no_such_key", "1").is_err());
    }

    #[test]
    fn test_set_field_rejects_invalid_result() {
        let mut config = Config::default();
        // The assignment itself is well-typed but fails validation,
        // and the original value must survive
        assert!(config.set_field("downloader", "ftp").is_err());
        assert_eq!(config.downloader, "powershell");
    }
}
