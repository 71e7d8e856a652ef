//! Drift headless runner
//!
//! Runs one of the visuals at the arcade frame rate without a display and
//! writes the final frame as a PPM image.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use drift::consts::{FRAME_DT, GRID_SIZE, MAX_SUBSTEPS};
use drift::renderer::Framebuffer;
use drift::settings::Settings;
use drift::visuals::{AmbientVisual, FlyoverVisual, SandboxVisual, Visual};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VisualKind {
    /// Top-down ambient cycle
    Ambient,
    /// Voxel-space orbit
    Flyover,
    /// Interactive sculpting grid
    Sandbox,
}

#[derive(Parser)]
#[command(name = "drift")]
#[command(about = "Terrain and water simulation for a 64x64 display")]
struct Args {
    /// Visual to run
    #[arg(value_enum, default_value_t = VisualKind::Flyover)]
    visual: VisualKind,

    /// Frames to simulate at 30 FPS
    #[arg(long, default_value_t = 300)]
    frames: u32,

    /// Where to write the last frame (binary PPM)
    #[arg(long, short, default_value = "drift.ppm")]
    output: PathBuf,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective settings to this path and exit
    #[arg(long)]
    dump_settings: Option<PathBuf>,
}

fn build_visual(kind: VisualKind, settings: &Settings, seed: u64) -> Box<dyn Visual> {
    match kind {
        VisualKind::Ambient => Box::new(AmbientVisual::new(settings, seed)),
        VisualKind::Flyover => Box::new(FlyoverVisual::new(settings, seed)),
        VisualKind::Sandbox => Box::new(SandboxVisual::new(settings, seed)),
    }
}

/// Fixed-timestep loop: host frames feed an accumulator drained in FRAME_DT steps
fn run(visual: &mut dyn Visual, frames: u32, frame_time: f32) {
    let mut accumulator = 0.0;
    for _ in 0..frames {
        accumulator += frame_time.min(0.1);
        let mut substeps = 0;
        while accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            visual.update(FRAME_DT);
            accumulator -= FRAME_DT;
            substeps += 1;
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let settings = args.settings.as_deref().map(Settings::load).unwrap_or_default();

    if let Some(path) = &args.dump_settings {
        return match settings.save(path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("Could not write {}: {}", path.display(), e);
                ExitCode::FAILURE
            }
        };
    }

    let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);
    log::info!("Drift starting: {:?} visual, seed {}, {} frames", args.visual, seed, args.frames);

    let mut visual = build_visual(args.visual, &settings, seed);
    run(visual.as_mut(), args.frames, FRAME_DT);

    let mut fb = Framebuffer::new(GRID_SIZE, GRID_SIZE);
    visual.draw(&mut fb);

    let written = File::create(&args.output).and_then(|f| fb.write_ppm(BufWriter::new(f)));
    match written {
        Ok(()) => {
            log::info!("Wrote {} frame to {}", visual.name(), args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Could not write {}: {}", args.output.display(), e);
            ExitCode::FAILURE
        }
    }
}
