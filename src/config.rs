use std::path::Path;

use anyhow::{Context, Result, ensure};
use log::warn;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 854;
pub const DEFAULT_HEIGHT: u32 = 480;
pub const DEFAULT_FPS: u32 = 15;
/// Width of the visible area in scene units.
pub const DEFAULT_FRAME_WIDTH: f64 = 14.0 + 2.0 / 9.0;
pub const DEFAULT_ROCKET_SPEED: f64 = 0.5;

/// Everything that shapes the rendered output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub frame_width: f64,
    pub background: [u8; 3],
    pub font_family: String,
    /// Rocket speed as a fraction of c.
    pub rocket_speed: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            frame_width: DEFAULT_FRAME_WIDTH,
            background: [0, 0, 0],
            font_family: "sans-serif".to_string(),
            rocket_speed: DEFAULT_ROCKET_SPEED,
        }
    }
}

/// Values given on the command line. Anything set here wins over the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<u32>,
    pub rocket_speed: Option<f64>,
}

impl RenderConfig {
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("invalid render config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&source).with_context(|| format!("in {}", path.display()))
    }

    /// Defaults, then the optional file, then the command line.
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
        if let Some(fps) = overrides.fps {
            self.fps = fps;
        }
        if let Some(rocket_speed) = overrides.rocket_speed {
            self.rocket_speed = rocket_speed;
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.width > 0 && self.height > 0, "frame size must be non-zero");
        ensure!(self.fps > 0, "fps must be positive");
        ensure!(
            self.frame_width.is_finite() && self.frame_width > 0.0,
            "frame_width must be a positive number of scene units"
        );
        ensure!(
            self.rocket_speed > 0.0 && self.rocket_speed < 1.0,
            "rocket speed must be strictly between 0 and 1 (fraction of c), got {}",
            self.rocket_speed
        );
        if self.fps > 60 {
            warn!("{} fps is more than GIF players usually honour", self.fps);
        }
        if 100 % self.fps != 0 {
            warn!(
                "GIF delays are whole hundredths of a second, {} fps is written as {} ms per frame",
                self.fps,
                self.frame_delay_ms()
            );
        }
        Ok(())
    }

    /// Visible area in scene units, keeping the pixel aspect ratio.
    pub fn frame(&self) -> (f64, f64) {
        (
            self.frame_width,
            self.frame_width * self.height as f64 / self.width as f64,
        )
    }

    /// Delay between GIF frames. GIF stores it in hundredths of a second, so the
    /// value is rounded to 10 ms.
    pub fn frame_delay_ms(&self) -> u32 {
        ((1000.0 / self.fps as f64 / 10.0).round() as u32 * 10).max(10)
    }
}
