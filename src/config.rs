//! TOML-based plot configuration with defaults and validation.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dataset::Columns;
use crate::palette::{self, Palette};
use crate::render::RenderOptions;

/// Top-level configuration parsed from TOML.
///
/// Every section is optional; missing fields take the defaults of the AEP
/// hourly dataset. Load with [`PlotConfig::from_toml_file`] or start from
/// [`PlotConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotConfig {
    /// Input file and column layout.
    #[serde(default)]
    pub data: DataConfig,
    /// Week, bands and figure geometry.
    #[serde(default)]
    pub plot: PlotSection,
    /// Band colors.
    #[serde(default)]
    pub palette: PaletteConfig,
}

/// Input file and column layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Path of the hourly CSV.
    pub csv_path: PathBuf,
    /// Timestamp column name.
    pub time_column: String,
    /// Consumption column name (MW).
    pub value_column: String,
    /// Series tag used in the output file name.
    pub label: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("AEP_hourly.csv"),
            time_column: "Datetime".to_string(),
            value_column: "AEP_MW".to_string(),
            label: "AEP".to_string(),
        }
    }
}

/// Week, bands and figure geometry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotSection {
    /// 1-indexed week to draw.
    pub week: i64,
    /// Number of bands per polarity.
    pub bands: usize,
    /// Write the PNG.
    pub save: bool,
    /// Directory for the PNG.
    pub output_dir: PathBuf,
    /// Output resolution.
    pub dpi: u32,
    /// Figure width in inches.
    pub width_in: f64,
    /// Height of one day strip in inches.
    pub row_height_in: f64,
}

impl Default for PlotSection {
    fn default() -> Self {
        Self {
            week: 1,
            bands: 3,
            save: false,
            output_dir: PathBuf::from("."),
            dpi: 150,
            width_in: 12.0,
            row_height_in: 1.8,
        }
    }
}

/// Band colors, lightest first.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            positive: palette::DEFAULT_POSITIVE.map(String::from).to_vec(),
            negative: palette::DEFAULT_NEGATIVE.map(String::from).to_vec(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"plot.bands"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl PlotConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Column names for the CSV loader.
    pub fn columns(&self) -> Columns {
        Columns {
            time: self.data.time_column.clone(),
            value: self.data.value_column.clone(),
        }
    }

    /// Figure geometry for the PNG renderer.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            dpi: self.plot.dpi,
            width_in: self.plot.width_in,
            row_height_in: self.plot.row_height_in,
        }
    }

    /// Parsed palette. Call [`PlotConfig::validate`] first; invalid colors
    /// fall back to the default palette.
    pub fn palette(&self) -> Palette {
        Palette::from_hex(&self.palette.positive, &self.palette.negative).unwrap_or_default()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Week bounds depend
    /// on the dataset and are checked when the week is selected.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let d = &self.data;
        if d.time_column.trim().is_empty() {
            errors.push(ConfigError {
                field: "data.time_column".into(),
                message: "must not be empty".into(),
            });
        }
        if d.value_column.trim().is_empty() {
            errors.push(ConfigError {
                field: "data.value_column".into(),
                message: "must not be empty".into(),
            });
        }
        if d.label.contains(['/', '\\']) {
            errors.push(ConfigError {
                field: "data.label".into(),
                message: "must not contain path separators".into(),
            });
        }

        let p = &self.plot;
        if p.bands == 0 {
            errors.push(ConfigError {
                field: "plot.bands".into(),
                message: "must be >= 1".into(),
            });
        }
        if p.dpi == 0 {
            errors.push(ConfigError {
                field: "plot.dpi".into(),
                message: "must be > 0".into(),
            });
        }
        if !(p.width_in.is_finite() && p.width_in > 0.0) {
            errors.push(ConfigError {
                field: "plot.width_in".into(),
                message: "must be a positive number".into(),
            });
        }
        if !(p.row_height_in.is_finite() && p.row_height_in > 0.0) {
            errors.push(ConfigError {
                field: "plot.row_height_in".into(),
                message: "must be a positive number".into(),
            });
        }

        if let Err(message) = Palette::from_hex(&self.palette.positive, &self.palette.negative) {
            errors.push(ConfigError {
                field: "palette".into(),
                message,
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let cfg = PlotConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
        assert_eq!(cfg.plot.bands, 3);
        assert_eq!(cfg.plot.dpi, 150);
        assert_eq!(cfg.columns(), Columns::default());
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r##"
[data]
csv_path = "PJME_hourly.csv"
time_column = "Datetime"
value_column = "PJME_MW"
label = "PJME"

[plot]
week = 12
bands = 4
save = true
output_dir = "out"
dpi = 100
width_in = 10.0
row_height_in = 1.5

[palette]
positive = ["#eeeeff", "#0000ff"]
negative = ["#ffeeee", "#ff0000"]
"##;
        let cfg = PlotConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.plot.week), Some(12));
        assert_eq!(cfg.as_ref().map(|c| &*c.data.label), Some("PJME"));
        assert!(cfg.as_ref().is_some_and(|c| c.validate().is_empty()));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[plot]
bands = 3
bogus_field = true
"#;
        assert!(PlotConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = PlotConfig::from_toml_str("[plot]\nweek = 5\n").ok();
        assert_eq!(cfg.as_ref().map(|c| c.plot.week), Some(5));
        assert_eq!(cfg.as_ref().map(|c| c.plot.bands), Some(3));
        assert_eq!(
            cfg.as_ref().map(|c| c.data.value_column.as_str()),
            Some("AEP_MW")
        );
    }

    #[test]
    fn validation_catches_zero_bands() {
        let mut cfg = PlotConfig::default();
        cfg.plot.bands = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "plot.bands"));
    }

    #[test]
    fn validation_catches_bad_geometry() {
        let mut cfg = PlotConfig::default();
        cfg.plot.dpi = 0;
        cfg.plot.width_in = -1.0;
        cfg.plot.row_height_in = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "plot.dpi"));
        assert!(errors.iter().any(|e| e.field == "plot.width_in"));
        assert!(errors.iter().any(|e| e.field == "plot.row_height_in"));
    }

    #[test]
    fn validation_catches_bad_palette() {
        let mut cfg = PlotConfig::default();
        cfg.palette.positive = vec!["blue".to_string()];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "palette"));
    }
}
