use directories::ProjectDirs;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LibraryError;
use crate::evaluation::builder::ForestBuilder;
use crate::evaluation::driver::DriverConfig;
use crate::evaluation::generator::DEFAULT_PARALLEL_THRESHOLD;
use crate::model::parameters::AngleUnit;

const CONFIG_FILE_NAME: &str = "forest.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ForestConfig {
    /// Worker threads for task-capable components. Unset means one per core.
    pub worker_count: Option<usize>,
    pub angle_unit: AngleUnit,
    /// Forests kept in the LRU cache; 0 disables caching.
    pub cache_capacity: usize,
    /// Total segments the cache may hold; larger forests are never cached.
    pub cache_segment_budget: usize,
    /// Generations with at least this many parents are branched in parallel.
    pub parallel_threshold: usize,
    /// Directory scanned for component plugins.
    pub plugin_dir: Option<PathBuf>,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            angle_unit: AngleUnit::Legacy,
            cache_capacity: crate::cache::DEFAULT_FOREST_CACHE_SIZE,
            cache_segment_budget: crate::cache::DEFAULT_CACHE_SEGMENT_BUDGET,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            plugin_dir: None,
        }
    }
}

impl ForestConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, LibraryError> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, LibraryError> {
        let toml_str = fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    pub fn builder(&self) -> ForestBuilder {
        ForestBuilder::default()
            .with_angle_unit(self.angle_unit)
            .with_parallel_threshold(self.parallel_threshold)
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            worker_count: self.worker_count,
            builder: self.builder(),
            cache_capacity: self.cache_capacity,
            cache_segment_budget: self.cache_segment_budget,
        }
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "branching-tree", "forest")
        .map(|proj_dirs| proj_dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn save_config(config: &ForestConfig) -> Result<PathBuf, LibraryError> {
    let path = get_config_path()
        .ok_or_else(|| LibraryError::Runtime("No home directory for config".to_string()))?;
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let toml_str = toml::to_string_pretty(config)?;
    fs::write(&path, toml_str)?;
    info!("Forest config saved to {}", path.display());
    Ok(path)
}

/// Config from the user's config directory, or defaults if there is none or
/// it cannot be read.
pub fn load_config() -> ForestConfig {
    if let Some(path) = get_config_path() {
        if path.exists() {
            match ForestConfig::load_from_path(&path) {
                Ok(config) => return config,
                Err(LibraryError::Io(e)) => {
                    warn!("Failed to read config file, using defaults: {}", e);
                }
                Err(e) => {
                    error!("Failed to parse config file {}, using defaults: {}", path.display(), e);
                }
            }
        }
    }
    ForestConfig::default()
}
