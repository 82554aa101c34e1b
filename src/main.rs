mod app;
mod config;
mod input;

use crate::app::App;
use crate::config::AppConfig;
use anyhow::Context;
use clap::Parser;
use phong_runtime::Graphics;
use phong_scene::DemoKind;
use std::path::PathBuf;
use winit::event_loop::EventLoop;

/// Canvas demos: a cube or an OBJ mesh under Blinn-Phong lighting.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML config file (defaults to ./phong.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Demo to run: spinning_cube, lit_cube or blinn_phong_mesh
    #[arg(long)]
    demo: Option<DemoKind>,

    /// OBJ mesh for the blinn_phong_mesh demo
    #[arg(long)]
    mesh: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut AppConfig) {
        if let Some(demo) = self.demo {
            config.demo.kind = demo;
        }
        if let Some(mesh) = self.mesh {
            config.demo.mesh = Some(mesh);
        }
    }
}

fn run_app(event_loop: EventLoop<Graphics>, mut app: App) -> anyhow::Result<()> {
    event_loop.run_app(&mut app).context("event loop failed")?;
    app.finish()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.filter))
        .init();
    log::info!("starting {} demo", config.demo.kind);

    let event_loop = EventLoop::<Graphics>::with_user_event()
        .build()
        .context("creating event loop")?;

    let app = App::new(&event_loop, config);
    run_app(event_loop, app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let args = Args::try_parse_from([
            "phong",
            "--demo",
            "spinning-cube",
            "--mesh",
            "teapot.obj",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config.demo.kind, DemoKind::SpinningCube);
        assert_eq!(config.demo.mesh, Some(PathBuf::from("teapot.obj")));
    }

    #[test]
    fn cli_rejects_unknown_demo() {
        assert!(Args::try_parse_from(["phong", "--demo", "teapot"]).is_err());
    }

    #[test]
    fn no_flags_keep_config() {
        let args = Args::try_parse_from(["phong"]).unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config, AppConfig::default());
    }
}
