//! Configuration file discovery
//!
//! Looks for `board.{toml,yaml,yml,json}` in the project's `.clientdesk/`
//! directory. All matches are returned so figment can merge them; later
//! entries override earlier ones.

use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Directory holding project configuration
pub const CONFIG_DIR_NAME: &str = ".clientdesk";

/// File stem of the board configuration
pub const CONFIG_FILE_STEM: &str = "board";

/// Extensions probed, lowest precedence first
const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// A discovered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
}

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Finds configuration files under a project root
#[derive(Debug, Clone, Default)]
pub struct FileDiscovery {
    /// Root to search; the current directory when unset
    project_root: Option<PathBuf>,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_root(root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: Some(root.into()),
        }
    }

    /// The `.clientdesk/` directory searched, if it can be resolved
    pub fn config_dir(&self) -> Option<PathBuf> {
        let root = match &self.project_root {
            Some(root) => root.clone(),
            None => match std::env::current_dir() {
                Ok(dir) => dir,
                Err(e) => {
                    warn!("Cannot resolve current directory: {}", e);
                    return None;
                }
            },
        };
        Some(root.join(CONFIG_DIR_NAME))
    }

    /// All configuration files present, lowest precedence first
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let Some(dir) = self.config_dir() else {
            return Vec::new();
        };
        if !dir.is_dir() {
            trace!("No config directory at {}", dir.display());
            return Vec::new();
        }

        let files: Vec<ConfigFile> = EXTENSIONS
            .iter()
            .filter_map(|ext| {
                let path = dir.join(format!("{}.{}", CONFIG_FILE_STEM, ext));
                let format = ConfigFormat::from_extension(ext)?;
                path.is_file().then_some(ConfigFile { path, format })
            })
            .collect();

        debug!(
            "Discovered {} config file(s) in {}",
            files.len(),
            dir.display()
        );
        files
    }
}
