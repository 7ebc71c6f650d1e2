use crate::error::{GitodoError, Result};
use crate::paths;
use crate::types::HexColor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Tint for repositories added without an explicit color.
    #[serde(default)]
    pub default_tint: HexColor,
    /// Named colors accepted wherever a color is expected. Values are kept as
    /// raw strings so a bad entry surfaces as a warning instead of a load error.
    #[serde(default = "default_palette")]
    pub palette: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    1
}

fn default_palette() -> BTreeMap<String, String> {
    [
        ("blue", "#B5D3FF"),
        ("red", "#FFB5B5"),
        ("yellow", "#FFE7A3"),
        ("green", "#B8E6C1"),
        ("purple", "#D9C2FF"),
        ("gray", "#D1D1D6"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_tint: HexColor::default(),
            palette: default_palette(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(GitodoError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        crate::io::atomic_write(&paths::config_path(root), self.to_yaml()?.as_bytes())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Palette name (case-insensitive) or a literal `#RRGGBB`.
    pub fn resolve_color(&self, spec: &str) -> Result<HexColor> {
        let key = spec.trim().to_ascii_lowercase();
        if let Some(hex) = self.palette.get(&key) {
            return hex.parse();
        }
        spec.trim().parse()
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("unsupported config version {}", self.version),
            });
        }

        for (name, value) in &self.palette {
            if value.parse::<HexColor>().is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("palette color '{name}' has invalid value '{value}'"),
                });
            }
            if name.chars().any(|c| c.is_ascii_uppercase()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("palette name '{name}' is unreachable: names are matched lowercase"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.default_tint, HexColor::new(0xB5D3FF));
        assert_eq!(parsed.palette.len(), cfg.palette.len());
    }

    #[test]
    fn empty_file_gets_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.version, 1);
        assert!(cfg.palette.contains_key("red"));
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(GitodoError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.default_tint = HexColor::new(0x123456);
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.default_tint, HexColor::new(0x123456));
    }

    #[test]
    fn resolve_color_prefers_palette() {
        let cfg = Config::default();
        assert_eq!(cfg.resolve_color("Red").unwrap(), HexColor::new(0xFFB5B5));
        assert_eq!(cfg.resolve_color("#010203").unwrap(), HexColor::new(0x010203));
        assert!(matches!(
            cfg.resolve_color("magenta"),
            Err(GitodoError::InvalidColor(_))
        ));
    }

    #[test]
    fn validate_flags_bad_palette_entries() {
        let mut cfg = Config::default();
        cfg.palette.insert("mud".into(), "brownish".into());
        cfg.palette.insert("Sky".into(), "#87CEEB".into());
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.message.contains("'mud'")));
        assert!(warnings.iter().any(|w| w.message.contains("'Sky'")));
    }
}
