use dashfb_framebuffer_linux::{DeviceConfig, ProbeStrategy, WriteStrategy};
use log::LevelFilter;
use std::fmt::{self, Display};
use std::path::PathBuf;
use std::time::Duration;

const DEVICE: &str = "DASHFB_DEVICE";
const SYSFS: &str = "DASHFB_SYSFS";
const PROBE: &str = "DASHFB_PROBE";
const WRITE: &str = "DASHFB_WRITE";
const FPS: &str = "DASHFB_FPS";
const FRAMES: &str = "DASHFB_FRAMES";
const LOG: &str = "DASHFB_LOG";

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid value {:?} for {}", self.value, self.variable)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    pub device: DeviceConfig,
    /// Target frames per second; 0 draws a single frame.
    pub fps: u32,
    /// Frames to draw before exiting; 0 runs until killed.
    pub frames: u64,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device: DeviceConfig::default(),
            fps: 10,
            frames: 0,
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        let invalid = |variable: &'static str, value: &str| ConfigError {
            variable,
            value: value.to_string(),
        };

        if let Some(device) = lookup(DEVICE) {
            config.device.device = PathBuf::from(device);
        }
        if let Some(dir) = lookup(SYSFS) {
            config.device.attributes = PathBuf::from(dir);
        }
        if let Some(probe) = lookup(PROBE) {
            config.device.probe = match probe.trim() {
                "auto" => ProbeStrategy::Auto,
                "ioctl" => ProbeStrategy::Structured,
                "sysfs" => ProbeStrategy::Attributes,
                other => return Err(invalid(PROBE, other)),
            };
        }
        if let Some(write) = lookup(WRITE) {
            config.device.write = match write.trim() {
                "mmap" => WriteStrategy::Mmap,
                "stream" => WriteStrategy::Stream,
                other => return Err(invalid(WRITE, other)),
            };
        }
        if let Some(fps) = lookup(FPS) {
            config.fps = fps.trim().parse().map_err(|_| invalid(FPS, &fps))?;
        }
        if let Some(frames) = lookup(FRAMES) {
            config.frames = frames.trim().parse().map_err(|_| invalid(FRAMES, &frames))?;
        }
        if let Some(level) = lookup(LOG) {
            config.log_level = level.trim().parse().map_err(|_| invalid(LOG, &level))?;
        }
        Ok(config)
    }

    pub fn frame_interval(&self) -> Option<Duration> {
        if self.fps == 0 {
            None
        } else {
            Some(Duration::from_secs(1) / self.fps)
        }
    }
}
