// Application settings
// Loaded from ~/.config/excelpro/settings.json

use std::fs;
use std::path::{Path, PathBuf};

use excelpro_engine::geometry::{
    GridGeometry, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT, MIN_COLUMN_WIDTH, MIN_ROW_HEIGHT,
};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Grid geometry
    #[serde(rename = "grid.defaultColumnWidth")]
    pub default_column_width: u32,

    #[serde(rename = "grid.defaultRowHeight")]
    pub default_row_height: u32,

    #[serde(rename = "grid.minColumnWidth")]
    pub min_column_width: u32,

    #[serde(rename = "grid.minRowHeight")]
    pub min_row_height: u32,

    // UI
    #[serde(rename = "ui.showFormulaBar")]
    pub show_formula_bar: bool,

    #[serde(rename = "ui.showSheetTabs")]
    pub show_sheet_tabs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            min_column_width: MIN_COLUMN_WIDTH,
            min_row_height: MIN_ROW_HEIGHT,
            show_formula_bar: true,
            show_sheet_tabs: true,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("excelpro")
            .join("settings.json")
    }

    /// Load settings from the default path, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from a specific file. `//` comment lines are ignored.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Save current settings to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Grid sizes for the engine. Minimums are at least 1 and defaults are
    /// never below their minimum.
    pub fn geometry(&self) -> GridGeometry {
        let min_column_width = self.min_column_width.max(1);
        let min_row_height = self.min_row_height.max(1);
        GridGeometry {
            default_column_width: self.default_column_width.max(min_column_width),
            default_row_height: self.default_row_height.max(min_row_height),
            min_column_width,
            min_row_height,
        }
    }
}
