//! Startup configuration with environment overrides

use std::path::PathBuf;

use crate::animation::{scheduler::MIN_STEP_MS, Timestep};

pub const ENV_ASSET_DIR: &str = "AQUASPHERE_ASSET_DIR";
pub const ENV_FIXED_STEP_MS: &str = "AQUASPHERE_FIXED_STEP_MS";
pub const ENV_TIME_SCALE: &str = "AQUASPHERE_TIME_SCALE";
pub const ENV_VSYNC: &str = "AQUASPHERE_VSYNC";

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub title: String,
    pub window_size: (u32, u32),
    pub asset_root: PathBuf,
    pub timestep: Timestep,
    pub time_scale: f64,
    pub vsync: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Aquasphere".to_string(),
            window_size: (1280, 800),
            asset_root: PathBuf::from("assets"),
            timestep: Timestep::Variable,
            time_scale: 1.0,
            vsync: true,
        }
    }
}

impl DemoConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn with_timestep(mut self, timestep: Timestep) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Defaults with overrides taken from the process environment
    pub fn from_env() -> Self {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Malformed values are logged and skipped.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_ASSET_DIR).filter(|dir| !dir.trim().is_empty()) {
            self.asset_root = PathBuf::from(dir.trim());
        }

        if let Some(raw) = lookup(ENV_FIXED_STEP_MS) {
            match raw.trim().parse::<f64>() {
                Ok(step_ms) if step_ms == 0.0 => self.timestep = Timestep::Variable,
                Ok(step_ms) if step_ms.is_finite() && step_ms >= MIN_STEP_MS => {
                    self.timestep = Timestep::Fixed { step_ms }
                }
                _ => log::warn!(
                    "Ignoring {}={:?}, expected 0 or at least {} ms",
                    ENV_FIXED_STEP_MS,
                    raw,
                    MIN_STEP_MS
                ),
            }
        }

        if let Some(raw) = lookup(ENV_TIME_SCALE) {
            match raw.trim().parse::<f64>() {
                Ok(scale) if scale.is_finite() && scale >= 0.0 => self.time_scale = scale,
                _ => log::warn!("Ignoring {}={:?}, expected a non-negative number", ENV_TIME_SCALE, raw),
            }
        }

        if let Some(raw) = lookup(ENV_VSYNC) {
            match parse_flag(&raw) {
                Some(flag) => self.vsync = flag,
                None => log::warn!("Ignoring {}={:?}, expected on/off", ENV_VSYNC, raw),
            }
        }

        self
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_env(pairs: &[(&str, &str)]) -> DemoConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DemoConfig::default().apply_overrides(|key| env.get(key).cloned())
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        assert_eq!(with_env(&[]), DemoConfig::default());
    }

    #[test]
    fn test_valid_overrides() {
        let config = with_env(&[
            (ENV_ASSET_DIR, "/opt/art"),
            (ENV_FIXED_STEP_MS, "16.5"),
            (ENV_TIME_SCALE, "0.5"),
            (ENV_VSYNC, "off"),
        ]);
        assert_eq!(config.asset_root, PathBuf::from("/opt/art"));
        assert_eq!(config.timestep, Timestep::Fixed { step_ms: 16.5 });
        assert_eq!(config.time_scale, 0.5);
        assert!(!config.vsync);
        assert_eq!(config.present_mode(), wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn test_malformed_overrides_are_ignored() {
        let config = with_env(&[
            (ENV_FIXED_STEP_MS, "-4"),
            (ENV_TIME_SCALE, "fast"),
            (ENV_VSYNC, "maybe"),
            (ENV_ASSET_DIR, "  "),
        ]);
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_tiny_fixed_step_is_rejected() {
        let config = with_env(&[(ENV_FIXED_STEP_MS, "1e-300")]);
        assert_eq!(config.timestep, Timestep::Variable);
        let config = with_env(&[(ENV_FIXED_STEP_MS, "0.05")]);
        assert_eq!(config.timestep, Timestep::Variable);
    }

    #[test]
    fn test_builders() {
        let config = DemoConfig::default()
            .with_title("demo")
            .with_window_size(0, 600)
            .with_timestep(Timestep::Fixed { step_ms: 10.0 });
        assert_eq!(config.title, "demo");
        assert_eq!(config.window_size, (1, 600));
        assert_eq!(config.timestep, Timestep::Fixed { step_ms: 10.0 });
    }
}
