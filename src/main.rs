// Frostboard demo.
// • A desktop with four boards parked on the screen edges.
// • Click a board's handle to slide it in; click it again to slide it out.
// • The left board frosts the screen behind itself while it is open;
//   clicking anywhere outside it dismisses it.
// • B switches between the gaussian and box blur. P moves the first board
//   to the next edge. ESC quits.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use frostboard::capture::capture_screen;
use frostboard::config::Config;
use frostboard::draw::Drawer;
use frostboard::scene::Scene;
use frostboard::snapshot::{run_blur_job, BlurAlgorithm};
use frostboard::{logging, PixelBuffer, Point};

#[derive(Parser)]
#[command(name = "frostboard", about = "Sliding side boards over a frosted screen")]
struct Cli {
    /// Config file (defaults to <config dir>/frostboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Blur used for backdrops; overrides the config file
    #[arg(long, value_enum, global = true)]
    algorithm: Option<BlurAlgorithm>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the demo scene without a window, blur it and write a PNG
    Snapshot {
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    let config = Config::load(cli.config.as_deref())?;
    let algorithm = cli.algorithm.unwrap_or(config.blur.algorithm);
    let scene = Scene::from_config(&config, algorithm).context("Failed to build the demo scene")?;

    match cli.command {
        Some(Command::Snapshot { output }) => snapshot(&scene, algorithm, &output),
        None => run(scene, &config, algorithm),
    }
}

fn snapshot(scene: &Scene, algorithm: BlurAlgorithm, output: &std::path::Path) -> Result<()> {
    let frame = capture_screen(scene).context("Failed to capture the demo scene")?;
    let image = run_blur_job(frame, algorithm).context("Failed to blur the capture")?;
    image
        .save_png(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

fn run(mut scene: Scene, config: &Config, mut algorithm: BlurAlgorithm) -> Result<()> {
    /* --- Window + screen buffer ---
       The buffer is redrawn only when something moved. */
    let size = config.screen.size();
    let (w, h) = (size.width.max(1) as usize, size.height.max(1) as usize);
    let mut drawer = Drawer::new("Frostboard", w, h, config.screen.fps as usize)?;
    let mut screen = PixelBuffer::new(w, h)?;
    scene.render(&mut screen);

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    info!(width = w, height = h, ?algorithm, "demo running");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let mut dirty = false;

        /* 1) Inputs */
        if let Some((x, y)) = drawer.take_click() {
            scene.click(Point::new(x, y), now);
            dirty = true;
        }
        if drawer.b_pressed_once() {
            algorithm = match algorithm {
                BlurAlgorithm::Gaussian => BlurAlgorithm::BoxBlur,
                BlurAlgorithm::BoxBlur => BlurAlgorithm::Gaussian,
            };
            scene.set_algorithm(algorithm);
            info!(?algorithm, "blur algorithm switched");
        }
        if drawer.p_pressed_once() {
            scene.rotate_first_panel();
            dirty = true;
        }

        /* 2) Animations and finished blurs */
        dirty |= scene.tick(now);

        /* 3) Draw + present */
        if dirty {
            scene.render(&mut screen);
        }
        drawer.present(&screen)?;

        /* 4) FPS counter */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(5) {
            let fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            debug!(fps, "frame rate");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
