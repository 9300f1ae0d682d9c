use charlcd_gpio::lcd::hd44780::driver::TimingProfile;
use charlcd_gpio::lcd::hd44780::{DisplayGeometry, GlyphBitmap, LcdResult};
use dotenv::var;
use serde::{Deserialize, Serialize};
use std::env::var_os;
use std::ffi::OsStr;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "charlcd.json";

#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TimingPreset {
    #[default]
    Standard,
    Conservative,
}

impl TimingPreset {
    pub fn profile(&self) -> TimingProfile {
        match self {
            TimingPreset::Standard => TimingProfile::standard(),
            TimingPreset::Conservative => TimingProfile::conservative(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    pub columns: u8,
    pub lines: u8,
    pub timing: TimingPreset,
    pub backlight: u8,
    pub glyph: GlyphBitmap,
}

impl Config {
    pub fn try_load() -> Option<Self> {
        let config_str = var_os("CONFIG_FILE");
        let config_str: &OsStr = config_str
            .as_deref()
            .unwrap_or(OsStr::new(DEFAULT_CONFIG_FILE));
        let config_path = Path::new(config_str);
        if config_path.exists() {
            let file = std::fs::File::open(config_path).ok()?;
            let reader = std::io::BufReader::new(file);
            serde_json::from_reader(reader).ok()
        } else {
            None
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        let config_str = var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let config_path = Path::new(&config_str);
        let file = std::fs::File::create(config_path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn geometry(&self) -> LcdResult<DisplayGeometry> {
        DisplayGeometry::new(self.columns, self.lines)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            columns: 16,
            lines: 2,
            timing: TimingPreset::Standard,
            backlight: 100,
            // A little figure
            glyph: [
                0b00100, 0b01110, 0b00100, 0b01110, 0b11111, 0b01110, 0b01010, 0b01010,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charlcd_gpio::lcd::hd44780::{LcdError, LcdErrorKind};

    #[test]
    fn defaults_describe_a_16x2_display() {
        let geometry = Config::default().geometry().unwrap();
        assert_eq!(geometry.columns(), 16);
        assert_eq!(geometry.lines().count(), 2);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"columns": 20, "lines": 4, "timing": "conservative"}"#)
                .unwrap();
        assert_eq!(config.columns, 20);
        assert_eq!(config.timing, TimingPreset::Conservative);
        assert_eq!(config.timing.profile(), TimingProfile::conservative());
        assert_eq!(config.backlight, 100);
        assert_eq!(config.glyph, Config::default().glyph);
    }

    #[test]
    fn unsupported_geometry_is_a_configuration_error() {
        let config = Config {
            lines: 3,
            ..Config::default()
        };
        let error = config.geometry().unwrap_err();
        assert_eq!(error, LcdError::UnsupportedLines(3));
        assert_eq!(error.kind(), LcdErrorKind::Configuration);

        let config = Config {
            columns: 21,
            lines: 4,
            ..Config::default()
        };
        assert_eq!(config.geometry().unwrap_err().kind(), LcdErrorKind::Configuration);
    }

    #[test]
    fn unknown_timing_preset_is_rejected() {
        let result = serde_json::from_str::<Config>(r#"{"timing": "fast"}"#);
        assert!(result.is_err());
    }
}
