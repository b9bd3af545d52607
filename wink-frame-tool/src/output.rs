//! Where converted frames end up: stdout, a file, or a directory of `.bin`s.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Write `text` to `out`, or to `stdout` when no path is given.
pub fn write_text<W: Write>(out: Option<&Path>, text: &str, mut stdout: W) -> Result<()> {
    match out {
        Some(path) => fs::write(path, text).with_context(|| format!("writing {}", path.display())),
        None => {
            stdout.write_all(text.as_bytes()).context("writing to stdout")?;
            Ok(())
        }
    }
}

/// Raw frames cannot go to the terminal.
pub fn require_out(out: Option<&Path>) -> Result<&Path> {
    match out {
        Some(path) => Ok(path),
        None => bail!("--out is required for --format bin"),
    }
}

/// Write one packed frame as raw bytes.
pub fn write_bin(path: &Path, packed: &[u8]) -> Result<()> {
    fs::write(path, packed).with_context(|| format!("writing {}", path.display()))
}

/// Write `frame_1.bin`, `frame_2.bin`, … into `dir`, creating it if needed.
pub fn write_frames(dir: &Path, frames: &[Vec<u8>]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (f, packed) in frames.iter().enumerate() {
        let path = dir.join(format!("frame_{}.bin", f + 1));
        write_bin(&path, packed)?;
        debug!("wrote {}", path.display());
    }
    Ok(())
}
