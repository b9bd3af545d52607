//! wink-frame-tool
//!
//! Host companion for the wink firmware:
//!
//! * `convert` — threshold an image into a packed 1-bpp frame.
//! * `blend` — fade between two images as a dithered frame sequence, and
//!   optionally loop it in the terminal at about 12 fps.
//! * `play` — run the animator against the terminal.
//!
//! Logging goes to stderr and is filtered with `RUST_LOG` (default `info`).

mod bitmap;
mod emit;
mod output;
mod preview;
mod terminal;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use embassy_futures::block_on;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use wink_oled_display_rs::{
    frames, AnimationConfig, Animator, FrameSource, GifFrameSource, PrecomputedSequence,
    DISPLAY_HEIGHT, DISPLAY_WIDTH, GIF_SCRATCH_BYTES,
};

use crate::preview::{PackedFrames, PREVIEW_CONFIG};
use crate::terminal::{TerminalSurface, ThreadDelay};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an image to a packed 1-bpp frame.
    Convert {
        image: PathBuf,
        /// Constant name; defaults to the file stem.
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Rust)]
        format: Format,
        /// Light pixels set the bit instead of dark ones.
        #[arg(long)]
        invert: bool,
        /// Write here instead of stdout (required for `--format bin`).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fade from one image to another as dithered frames.
    Blend {
        first: PathBuf,
        second: PathBuf,
        #[arg(long, default_value_t = 10)]
        frames: usize,
        #[arg(long, value_enum, default_value_t = Format::Rust)]
        format: Format,
        /// Light pixels set the bit instead of dark ones.
        #[arg(long)]
        invert: bool,
        /// Directory for `frame_<n>.bin` files (required for `--format bin`).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Loop the frames in the terminal instead of writing them out.
        #[arg(long)]
        preview: bool,
        /// Preview loops; 0 loops forever.
        #[arg(long, default_value_t = 0)]
        cycles: u32,
    },
    /// Play an animation in the terminal.
    Play {
        #[arg(long, value_enum, default_value_t = Source::Wink4)]
        source: Source,
        /// GIF file for `--source gif`; defaults to the bundled wink.
        #[arg(long)]
        gif: Option<PathBuf>,
        /// Number of cycles; 0 plays forever.
        #[arg(long, default_value_t = 1)]
        cycles: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Rust,
    Bin,
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Wink4,
    Wink8,
    Gif,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Convert {
            image,
            name,
            format,
            invert,
            out,
        } => convert(&image, name, format, invert, out.as_deref()),
        Command::Blend {
            first,
            second,
            frames,
            format,
            invert,
            out,
            preview,
            cycles,
        } => {
            let blended = blend(&first, &second, frames, invert)?;
            if preview {
                play_blend(blended, cycles)
            } else {
                write_blend(&blended, format, out.as_deref())
            }
        }
        Command::Play {
            source,
            gif,
            cycles,
        } => play(source, gif.as_deref(), cycles),
    }
}

fn load(path: &Path) -> Result<image::RgbaImage> {
    let image = image::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(image.to_rgba8())
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn convert(
    path: &Path,
    name: Option<String>,
    format: Format,
    invert: bool,
    out: Option<&Path>,
) -> Result<()> {
    let image = load(path)?;
    let (width, height) = image.dimensions();
    let mut packed = bitmap::threshold(&image);
    if invert {
        bitmap::invert(&mut packed, width);
    }
    info!(width, height, bytes = packed.len(), "converted {}", path.display());

    match format {
        Format::Rust => {
            let base = stem(path);
            let name = name.unwrap_or_else(|| emit::const_name(&base));
            let src = emit::rust_const(&name, &format!("'{}', {}x{}px", base, width, height), &packed);
            output::write_text(out, &src, io::stdout())
        }
        Format::Bin => output::write_bin(output::require_out(out)?, &packed),
    }
}

/// A dithered blend: frame size and packed frames.
struct Blended {
    width: u32,
    height: u32,
    frames: Vec<Vec<u8>>,
}

fn blend(first: &Path, second: &Path, frames: usize, invert: bool) -> Result<Blended> {
    let a = load(first)?;
    let b = load(second)?;
    let (width, height, mut frames) = bitmap::blend_dithered(&a, &b, frames);
    if invert {
        for packed in &mut frames {
            bitmap::invert(packed, width);
        }
    }
    info!(width, height, frames = frames.len(), "blended");
    Ok(Blended {
        width,
        height,
        frames,
    })
}

fn write_blend(blended: &Blended, format: Format, out: Option<&Path>) -> Result<()> {
    match format {
        Format::Rust => {
            let src = emit::blend_consts(blended.width, blended.height, &blended.frames);
            output::write_text(out, &src, io::stdout())
        }
        Format::Bin => output::write_frames(output::require_out(out)?, &blended.frames),
    }
}

fn play_blend(blended: Blended, cycles: u32) -> Result<()> {
    if blended.width > DISPLAY_WIDTH || blended.height > DISPLAY_HEIGHT {
        warn!(
            width = blended.width,
            height = blended.height,
            "blend is larger than the panel, preview is clipped"
        );
    }
    let source = PackedFrames::new(blended.frames, blended.width, blended.height)?;
    run_cycles(source, PREVIEW_CONFIG, cycles)
}

fn play(source: Source, gif: Option<&Path>, cycles: u32) -> Result<()> {
    match source {
        Source::Wink4 => {
            let seq = PrecomputedSequence::new(&frames::WINK_4)?;
            run_cycles(seq, AnimationConfig::wink_4(), cycles)
        }
        Source::Wink8 => {
            let seq = PrecomputedSequence::new(&frames::WINK_8)?;
            run_cycles(seq, AnimationConfig::wink_8(), cycles)
        }
        Source::Gif => {
            let encoded = match gif {
                Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
                None => frames::WINK_GIF.to_vec(),
            };
            let mut scratch = Box::new([0u8; GIF_SCRATCH_BYTES]);
            let source = GifFrameSource::new(&encoded, &mut scratch);
            run_cycles(source, AnimationConfig::gif(), cycles)
        }
    }
}

fn run_cycles<F: FrameSource>(source: F, config: AnimationConfig, cycles: u32) -> Result<()> {
    let surface = TerminalSurface::new(io::stdout());
    let mut animator = Animator::new(surface, source, ThreadDelay, config);
    print!("\x1b[2J");

    if cycles == 0 {
        block_on(animator.run());
    }

    for cycle in 0..cycles {
        let report = block_on(animator.play_cycle());
        debug!(cycle, ?report, "cycle finished");
        if !report.opened || report.source_failed {
            if let Some(err) = animator.last_source_error() {
                warn!(?err, "frame source failed");
            }
        }
        if report.render_failures > 0 {
            bail!("{} frames failed to render", report.render_failures);
        }
    }
    Ok(())
}
