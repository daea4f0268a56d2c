use std::path::Path;

use serde_yaml::{Mapping, Value};

use super::yaml::load_yaml;
use crate::thumbnail::Dimensions;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub debug: bool,
    pub log_level: String,
    pub settings: AppSettings,
}

#[derive(Debug, Clone, Default)]
pub struct AppSettings {
    pub preview: PreviewSettings,
    pub diagnostics: DiagnosticsSettings,
    pub development: DevelopmentSettings,
}

#[derive(Debug, Clone, Copy)]
pub struct PreviewSettings {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct DiagnosticsSettings {
    pub log_enforcement_ticks: bool,
}

#[derive(Debug, Clone)]
pub struct DevelopmentSettings {
    pub debug: bool,
    pub log_level: String,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            width: 300,
            height: 200,
        }
    }
}

impl PreviewSettings {
    pub fn viewport(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            log_enforcement_ticks: true,
        }
    }
}

impl Default for DevelopmentSettings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = AppSettings::default();
        Self {
            debug: settings.development.debug,
            log_level: settings.development.log_level.clone(),
            settings,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Option<Self> {
        let value = load_yaml(path)?;
        Self::from_yaml(&value)
    }

    pub fn from_yaml(root: &Value) -> Option<Self> {
        let map = root.as_mapping()?;

        let settings = parse_settings(map);
        Some(Self {
            debug: settings.development.debug,
            log_level: settings.development.log_level.clone(),
            settings,
        })
    }
}

fn parse_settings(root: &Mapping) -> AppSettings {
    let mut settings = AppSettings::default();

    settings.development.debug = bool_at(root, "debug").unwrap_or(settings.development.debug);
    settings.development.log_level = str_at(root, "log_level")
        .unwrap_or(&settings.development.log_level)
        .to_lowercase();

    let settings_map = mapping_at(root, "settings");

    if let Some(preview) = settings_map.and_then(|v| mapping_at(v, "preview")) {
        settings.preview.width = u64_any(preview, &["width", "viewport_width"])
            .map(clamp_px)
            .unwrap_or(settings.preview.width);
        settings.preview.height = u64_any(preview, &["height", "viewport_height"])
            .map(clamp_px)
            .unwrap_or(settings.preview.height);
    }

    if let Some(diag) = settings_map.and_then(|v| mapping_at(v, "diagnostics")) {
        settings.diagnostics.log_enforcement_ticks =
            bool_any(diag, &["log_enforcement_ticks", "log_ticks"])
                .unwrap_or(settings.diagnostics.log_enforcement_ticks);
    }

    if let Some(dev) = settings_map.and_then(|v| mapping_at(v, "development")) {
        settings.development.debug =
            bool_any(dev, &["debug", "debug_mode"]).unwrap_or(settings.development.debug);
        if let Some(level) = str_any(dev, &["log_level", "logging"]) {
            settings.development.log_level = level.to_lowercase();
        }
    }

    settings
}

fn clamp_px(v: u64) -> u32 {
    v.clamp(1, u32::MAX as u64) as u32
}

fn bool_at(map: &Mapping, key: &str) -> Option<bool> {
    map.get(Value::String(key.to_string()))?.as_bool()
}

fn bool_any(map: &Mapping, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| bool_at(map, k))
}

fn str_at<'a>(map: &'a Mapping, key: &str) -> Option<&'a str> {
    map.get(Value::String(key.to_string()))?.as_str()
}

fn str_any<'a>(map: &'a Mapping, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| str_at(map, k))
}

fn mapping_at<'a>(map: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    map.get(Value::String(key.to_string()))?.as_mapping()
}

fn u64_at(map: &Mapping, key: &str) -> Option<u64> {
    map.get(Value::String(key.to_string()))?
        .as_i64()
        .and_then(|v| if v >= 0 { Some(v as u64) } else { None })
}

fn u64_any(map: &Mapping, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| u64_at(map, k))
}
