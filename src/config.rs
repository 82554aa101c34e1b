use anyhow::Context;
use phong_scene::{DemoKind, Steps};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "phong.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub fps: u64,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "Phong Canvas".into(),
            width: 800,
            height: 600,
            canvas_width: 400,
            canvas_height: 400,
            fps: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSection {
    pub kind: DemoKind,
    pub mesh: Option<PathBuf>,
    pub rotation_step: f32,
    pub zoom_step: f32,
    pub move_step: f32,
}

impl Default for DemoSection {
    fn default() -> Self {
        let steps = Steps::default();
        Self {
            kind: DemoKind::default(),
            mesh: None,
            rotation_step: steps.rotation,
            zoom_step: steps.zoom,
            move_step: steps.movement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: "warn,phong=info,phong_runtime=info,phong_obj=info".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowSection,
    pub demo: DemoSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(src).context("invalid config")?;
        config.check()?;
        Ok(config)
    }

    /// Reads `path` when given; otherwise `phong.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let src = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("loading {}", path.display()))
    }

    fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.window.fps > 0, "window.fps must be positive");
        anyhow::ensure!(
            self.window.canvas_width > 0 && self.window.canvas_height > 0,
            "window.canvas_width and window.canvas_height must be positive"
        );
        anyhow::ensure!(
            self.demo.rotation_step.is_finite()
                && self.demo.zoom_step.is_finite()
                && self.demo.move_step.is_finite(),
            "demo steps must be finite"
        );
        Ok(())
    }

    pub fn steps(&self) -> Steps {
        Steps {
            rotation: self.demo.rotation_step,
            zoom: self.demo.zoom_step,
            movement: self.demo.move_step,
        }
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.window.fps.max(1))
    }
}
