use anyhow::{Context, Result, anyhow};
use image_effect::matrix_table::DeficiencyType;
use log::debug;
use once_cell::sync::Lazy;
use platform_dirs::AppDirs;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

#[derive(Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub preference: Preference,

    #[serde(default)]
    pub color_blindness: ColorBlindness,

    #[serde(default)]
    pub crt: Crt,
}

#[derive(Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Preference {
    #[derivative(Default(value = "60"))]
    pub frame_rate: u32,

    #[derivative(Default(value = "240"))]
    pub max_frames: u32,

    #[derivative(Default(value = "360.0"))]
    pub selector_width: f32,

    #[derivative(Default(value = "40.0"))]
    pub selector_height: f32,

    pub animate_parameters: bool,
}

#[derive(Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct ColorBlindness {
    #[derivative(Default(value = "0.5"))]
    pub severity: f32,

    #[derivative(Default(value = "DeficiencyType::Deuteranomaly.name().to_string()"))]
    pub deficiency: String,
}

impl ColorBlindness {
    pub fn deficiency(&self) -> Result<DeficiencyType> {
        self.deficiency
            .parse()
            .map_err(|e: String| anyhow!(e))
            .with_context(|| "invalid color_blindness.deficiency")
    }
}

#[derive(Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Crt {
    #[derivative(Default(value = "10.0"))]
    pub curvature: f32,

    #[derivative(Default(value = "30.0"))]
    pub vignette_width: f32,

    #[derivative(Default(value = "1.0"))]
    pub pixel_density: f32,

    #[derivative(Default(value = "true"))]
    pub enabled: bool,
}

impl Config {
    /// Points the configuration at `path`, or at `shaderlab.toml` in the
    /// platform config dir, and loads it.
    pub fn init(&mut self, path: Option<&Path>) -> Result<()> {
        self.config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let app_dirs = AppDirs::new(Some(APP_NAME), true)
                    .with_context(|| "no config directory on this platform")?;
                app_dirs.config_dir.join(format!("{APP_NAME}.toml"))
            }
        };

        self.load()
            .with_context(|| format!("load {} failed", self.config_path.display()))?;
        debug!("{:?}", self);
        Ok(())
    }

    /// A missing file resets to the defaults. The file is never written.
    fn load(&mut self) -> Result<()> {
        let text = match fs::read_to_string(&self.config_path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} not found, using defaults", self.config_path.display());
                *self = Config {
                    config_path: self.config_path.clone(),
                    ..Default::default()
                };
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let mut c = toml::from_str::<Config>(&text)?;
        c.config_path = self.config_path.clone();
        c.color_blindness.deficiency()?;
        *self = c;

        Ok(())
    }
}

/// Loads the global configuration and returns what was loaded.
pub fn init(path: Option<&Path>) -> Result<Config> {
    let mut config = CONFIG.lock().unwrap_or_else(PoisonError::into_inner);
    config.init(path)?;
    Ok(config.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_from(text: &str) -> Result<Config> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(text.as_bytes())?;

        let mut config = Config::default();
        config.init(Some(file.path()))?;
        Ok(config)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.preference.frame_rate, 60);
        assert!(!config.preference.animate_parameters);
        assert_eq!(config.color_blindness.severity, 0.5);
        assert_eq!(
            config.color_blindness.deficiency().unwrap(),
            DeficiencyType::Deuteranomaly
        );
        assert_eq!(config.crt.curvature, 10.0);
        assert_eq!(config.crt.vignette_width, 30.0);
        assert!(config.crt.enabled);
    }

    #[test]
    fn test_missing_file_keeps_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("shaderlab.toml");

        let mut config = Config::default();
        config.init(Some(&path))?;
        assert_eq!(config.config_path, path);
        assert_eq!(config.preference.max_frames, 240);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Result<()> {
        let config = load_from(
            r#"
            [preference]
            animate_parameters = true

            [color_blindness]
            deficiency = "tritanomaly"

            [crt]
            curvature = 3.5
            "#,
        )?;

        assert!(config.preference.animate_parameters);
        assert_eq!(config.preference.frame_rate, 60);
        assert_eq!(
            config.color_blindness.deficiency()?,
            DeficiencyType::Tritanomaly
        );
        assert_eq!(config.color_blindness.severity, 0.5);
        assert_eq!(config.crt.curvature, 3.5);
        assert_eq!(config.crt.vignette_width, 30.0);
        Ok(())
    }

    #[test]
    fn test_missing_file_after_loaded_file_resets() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("shaderlab.toml");
        fs::write(&path, "[crt]\nenabled = false\n")?;

        let mut config = Config::default();
        config.init(Some(&path))?;
        assert!(!config.crt.enabled);

        let missing = dir.path().join("missing.toml");
        config.init(Some(&missing))?;
        assert!(config.crt.enabled);
        assert_eq!(config.config_path, missing);
        Ok(())
    }

    #[test]
    fn test_invalid_file() {
        assert!(load_from("[crt]\ncurvature = \"flat\"").is_err());
        assert!(load_from("[color_blindness]\ndeficiency = \"achromatopsia\"").is_err());
    }
}
