//! Renderer configuration, loaded from TOML

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use trellis_router::RouterConfig;

/// Sizes used by the built-in [`crate::StackLayout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between siblings
    pub spacing: f64,
    /// Inner margin of container nodes
    pub padding: f64,
    /// Space reserved above a container's children for its label
    pub header: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 80.0,
            node_height: 40.0,
            spacing: 20.0,
            padding: 16.0,
            header: 24.0,
        }
    }
}

/// Top-level configuration file.
///
/// ```toml
/// auto_prune = true
///
/// [router]
/// cell_width = 10.0
/// cell_height = 10.0
/// search_limit = 7000
///
/// [layout]
/// spacing = 30.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub router: RouterConfig,
    pub layout: LayoutConfig,
    /// Forget removed entries right after they are handed to the drawing sink.
    pub auto_prune: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            router: RouterConfig::default(),
            layout: LayoutConfig::default(),
            auto_prune: true,
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.router.validate()?;
        let l = &self.layout;
        let sizes_ok = [l.node_width, l.node_height].iter().all(|v| v.is_finite() && *v > 0.0)
            && [l.spacing, l.padding, l.header].iter().all(|v| v.is_finite() && *v >= 0.0);
        if !sizes_ok {
            return Err(ConfigError::Layout);
        }
        Ok(())
    }
}
