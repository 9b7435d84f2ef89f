//! Model list and switches, read from a TOML file.
//!
//! ```toml
//! [models]
//! wall = "models/wall.obj"
//!
//! [misc]
//! output_corner_vertices = true
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model name -> OBJ path. Relative paths are taken from the config file's directory.
    pub models: BTreeMap<String, PathBuf>,
    pub misc: Misc,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Misc {
    /// Run the texcoord corner scan on every mesh and log the result.
    pub output_corner_vertices: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        if let Some(dir) = path.parent() {
            config.resolve_relative_to(dir);
        }
        log::info!(
            "Loaded config {} ({} models)",
            path.display(),
            config.models.len()
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn resolve_relative_to(&mut self, dir: &Path) {
        for path in self.models.values_mut() {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    /// Add a model given on the command line; its name is the path as written.
    pub fn add_model_path(&mut self, path: PathBuf) {
        let name = path.display().to_string();
        if self.models.insert(name.clone(), path).is_some() {
            log::warn!("Model '{}' given twice, loading it once", name);
        }
    }
}
