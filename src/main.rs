mod present;
mod window;

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use motefield::{BackdropMode, Engine, HostError, PixelSurface, Settings, SnapshotError};

const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Field,
    Comet,
}

impl From<ModeArg> for BackdropMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Field => BackdropMode::Field,
            ModeArg::Comet => BackdropMode::Comet,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(version, about)]
/// Animated mote field desktop backdrop
struct Args {
    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Settings file (created on save if missing)
    #[arg(long, default_value = "motefield.json")]
    settings: PathBuf,

    /// Override the particle density (motes = density * 20)
    #[arg(long)]
    density: Option<f32>,

    /// Override the backdrop mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Render headlessly and write the last frame to this PNG
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Frames to simulate for --snapshot
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Surface width for --snapshot
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Surface height for --snapshot
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,
}

fn main() -> Result<(), HostError> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("motefield=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("motefield=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut settings = Settings::load_or_default(&args.settings);
    if let Some(density) = args.density {
        settings.particle_density = density;
    }
    if let Some(mode) = args.mode {
        settings.theme = mode.into();
    }

    if let Some(path) = &args.snapshot {
        return snapshot(&settings, &args, path);
    }

    info!(
        density = settings.particle_density,
        mode = ?settings.theme,
        animated = settings.animated_bg,
        "starting backdrop"
    );

    let surface = PixelSurface::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    let engine = Engine::from_settings(Some(surface), &settings);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = window::App::new(settings, args.settings.clone(), engine);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Simulate without a window and save the final frame.
fn snapshot(settings: &Settings, args: &Args, path: &Path) -> Result<(), HostError> {
    let surface = PixelSurface::new(args.width, args.height);
    let mut engine = Engine::from_settings(Some(surface), settings);
    let handle = engine.start().ok_or(SnapshotError::NoSurface)?;

    for _ in 0..args.frames {
        engine.frame(handle);
    }

    let surface = engine.surface().ok_or(SnapshotError::NoSurface)?;
    surface.save_png(path)?;
    info!(
        path = %path.display(),
        frames = args.frames,
        motes = engine.field().len(),
        "snapshot written"
    );
    Ok(())
}
