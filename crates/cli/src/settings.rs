use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use declassify_core::compositing::disclosure_compositor::CompositorOptions;
use declassify_core::shared::constants::{
    DEFAULT_BLUR_RADIUS, DEFAULT_LABEL_SIZE, DEFAULT_POINT_RADIUS, DEFAULT_REQUEST_TIMEOUT_SECS,
    MAX_BLUR_RADIUS,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("no configuration directory on this platform")]
    NoConfigDir,
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// User defaults persisted between runs. Command-line flags override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub blur_radius: f64,
    pub point_radius: u32,
    pub label_size: f32,
    pub font: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            point_radius: DEFAULT_POINT_RADIUS,
            label_size: DEFAULT_LABEL_SIZE,
            font: None,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Declassify").join("settings.json"))
    }

    /// Loads the user's settings, falling back to defaults when the file is
    /// missing. A broken file is reported and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            log::warn!("{e}; using defaults");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=MAX_BLUR_RADIUS).contains(&self.blur_radius) {
            return Err(SettingsError::Invalid(format!(
                "blur radius must be between 0 and {MAX_BLUR_RADIUS}, got {}",
                self.blur_radius
            )));
        }
        if !(self.label_size.is_finite() && self.label_size > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "label size must be positive, got {}",
                self.label_size
            )));
        }
        if self.timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |e| SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    pub fn compositor_options(&self) -> CompositorOptions {
        let mut options = CompositorOptions {
            blur_radius: self.blur_radius,
            point_radius: self.point_radius,
            ..CompositorOptions::default()
        };
        options.style.label_size = self.label_size;
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_core_constants() {
        let options = Settings::default().compositor_options();
        assert_eq!(options, CompositorOptions::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Declassify/settings.json");
        let settings = Settings {
            blur_radius: 8.0,
            point_radius: 32,
            label_size: 20.0,
            font: Some(PathBuf::from("/fonts/custom.ttf")),
            timeout_secs: 5,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"point_radius": 40}"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.point_radius, 40);
        assert_eq!(settings.blur_radius, DEFAULT_BLUR_RADIUS);
        assert_eq!(settings.font, None);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_oversized_blur_radius_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"blur_radius": 1e9}"#).unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_bounds() {
        assert!(Settings::default().validate().is_ok());
        let at_cap = Settings {
            blur_radius: MAX_BLUR_RADIUS,
            ..Settings::default()
        };
        assert!(at_cap.validate().is_ok());
        for bad in [
            Settings {
                blur_radius: -1.0,
                ..Settings::default()
            },
            Settings {
                blur_radius: f64::NAN,
                ..Settings::default()
            },
            Settings {
                label_size: 0.0,
                ..Settings::default()
            },
            Settings {
                timeout_secs: 0,
                ..Settings::default()
            },
        ] {
            assert!(bad.validate().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Settings::load_from(Path::new("/nonexistent/settings.json")),
            Err(SettingsError::Io { .. })
        ));
    }

    #[test]
    fn test_compositor_options_carry_overrides() {
        let settings = Settings {
            blur_radius: 3.5,
            point_radius: 7,
            label_size: 24.0,
            ..Settings::default()
        };
        let options = settings.compositor_options();
        assert_eq!(options.blur_radius, 3.5);
        assert_eq!(options.point_radius, 7);
        assert_eq!(options.style.label_size, 24.0);
    }
}
