//! Configuration loading using Figment

use crate::{
    discovery::{ConfigFile, ConfigFormat, FileDiscovery},
    error::ConfigError,
    types::BoardConfig,
    ConfigResult,
};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Prefix for environment overrides; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "CLIENTDESK_";

/// Loads [`BoardConfig`] from every source in precedence order.
///
/// Later sources override earlier ones:
/// 1. Built-in defaults
/// 2. Discovered files in `./.clientdesk/`
/// 3. An explicit file (`--config`)
/// 4. `CLIENTDESK_*` environment variables
///
/// Nothing is cached; every call to [`ConfigLoader::load`] reads fresh.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    discovery: FileDiscovery,
    explicit: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search for `.clientdesk/` under `root` instead of the current directory
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.discovery = FileDiscovery::with_project_root(root);
        self
    }

    /// Merge this file after the discovered ones
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Load, extract and validate
    pub fn load(&self) -> ConfigResult<BoardConfig> {
        let config: BoardConfig = self.figment()?.extract()?;
        config.validate()?;
        info!(
            activation_distance = config.drag.activation_distance,
            http_gateway = config.gateway.base_url.is_some(),
            "Loaded board configuration"
        );
        Ok(config)
    }

    /// The merged figment, before extraction
    pub fn figment(&self) -> ConfigResult<Figment> {
        debug!("Building figment configuration with precedence order");

        let mut figment = Figment::new().merge(Serialized::defaults(BoardConfig::default()));

        for file in self.discovery.discover_all() {
            trace!(
                "Loading config file: {} ({:?})",
                file.path.display(),
                file.format
            );
            figment = figment.merge(load_file(&file));
        }

        if let Some(path) = &self.explicit {
            figment = figment.merge(load_file(&explicit_file(path)?));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }
}

fn explicit_file(path: &Path) -> ConfigResult<ConfigFile> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        format: path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(none)".to_string()),
    })?;
    Ok(ConfigFile {
        path: path.to_path_buf(),
        format,
    })
}

fn load_file(file: &ConfigFile) -> Figment {
    let path = &file.path;
    match file.format {
        ConfigFormat::Toml => Figment::from(Toml::file(path)),
        ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
        ConfigFormat::Json => Figment::from(Json::file(path)),
    }
}
