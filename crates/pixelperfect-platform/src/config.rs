use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pixelperfect_core::Size;

use crate::PlatformError;

pub const DEFAULT_WIDTH: u32 = 64;
pub const DEFAULT_HEIGHT: u32 = 32;
pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_TIME_PER_SLICE: f64 = 5.0;

/// Display geometry, pacing and asset locations.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub tick: Duration,
    pub font_dir: PathBuf,
    pub icon_dir: PathBuf,
    /// Seconds each panel stays up before a carousel rotates.
    pub time_per_slice: f64,
    /// Render to the terminal emulator instead of hardware.
    pub emulated: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            font_dir: PathBuf::from("./fonts"),
            icon_dir: PathBuf::from("./icons"),
            time_per_slice: DEFAULT_TIME_PER_SLICE,
            emulated: true,
        }
    }
}

impl DisplayConfig {
    /// Defaults overridden by `PIXELPERFECT_WIDTH`, `PIXELPERFECT_HEIGHT`,
    /// `PIXELPERFECT_TICK_MS`, `PIXELPERFECT_SLICE_SECS`,
    /// `PIXELPERFECT_EMULATED`, `FONT_PATH` and `ICON_PATH`.
    pub fn from_env() -> Result<Self, PlatformError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PlatformError> {
        let mut cfg = Self::default();
        if let Some(v) = parse::<u32>(&lookup, "PIXELPERFECT_WIDTH")? {
            cfg.width = nonzero("PIXELPERFECT_WIDTH", v)?;
        }
        if let Some(v) = parse::<u32>(&lookup, "PIXELPERFECT_HEIGHT")? {
            cfg.height = nonzero("PIXELPERFECT_HEIGHT", v)?;
        }
        if let Some(ms) = parse::<u64>(&lookup, "PIXELPERFECT_TICK_MS")? {
            cfg.tick = Duration::from_millis(nonzero("PIXELPERFECT_TICK_MS", ms)?);
        }
        if let Some(secs) = parse::<f64>(&lookup, "PIXELPERFECT_SLICE_SECS")? {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(invalid("PIXELPERFECT_SLICE_SECS", secs, "must be a positive number"));
            }
            cfg.time_per_slice = secs;
        }
        if let Some(v) = lookup("PIXELPERFECT_EMULATED") {
            cfg.emulated = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid("PIXELPERFECT_EMULATED", v, "expected true or false")),
            };
        }
        if let Some(dir) = lookup("FONT_PATH") {
            cfg.font_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("ICON_PATH") {
            cfg.icon_dir = PathBuf::from(dir);
        }
        log::debug!("display config: {cfg:?}");
        Ok(cfg)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, PlatformError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| invalid(key, &raw, e)),
    }
}

fn nonzero<T: PartialEq + Default + std::fmt::Display>(key: &'static str, v: T) -> Result<T, PlatformError> {
    if v == T::default() {
        return Err(invalid(key, v, "must not be zero"));
    }
    Ok(v)
}

fn invalid(key: &'static str, value: impl std::fmt::Display, reason: impl std::fmt::Display) -> PlatformError {
    PlatformError::Config {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = DisplayConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(cfg, DisplayConfig::default());
        assert_eq!(cfg.size(), Size::new(64, 32));
        assert_eq!(cfg.tick, Duration::from_millis(100));
    }

    #[test]
    fn test_overrides() {
        let cfg = DisplayConfig::from_lookup(env(&[
            ("PIXELPERFECT_WIDTH", "128"),
            ("PIXELPERFECT_TICK_MS", " 50 "),
            ("PIXELPERFECT_EMULATED", "off"),
            ("FONT_PATH", "/opt/fonts"),
        ]))
        .unwrap();
        assert_eq!(cfg.width, 128);
        assert_eq!(cfg.height, 32);
        assert_eq!(cfg.tick, Duration::from_millis(50));
        assert!(!cfg.emulated);
        assert_eq!(cfg.font_dir, PathBuf::from("/opt/fonts"));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = DisplayConfig::from_lookup(env(&[("PIXELPERFECT_HEIGHT", "tall")])).unwrap_err();
        assert!(matches!(err, PlatformError::Config { key: "PIXELPERFECT_HEIGHT", .. }));

        let err = DisplayConfig::from_lookup(env(&[("PIXELPERFECT_WIDTH", "0")])).unwrap_err();
        assert!(matches!(err, PlatformError::Config { key: "PIXELPERFECT_WIDTH", .. }));

        let err = DisplayConfig::from_lookup(env(&[("PIXELPERFECT_SLICE_SECS", "-1")])).unwrap_err();
        assert!(matches!(err, PlatformError::Config { key: "PIXELPERFECT_SLICE_SECS", .. }));
    }
}
