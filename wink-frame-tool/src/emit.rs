//! Source emitters for packed frames.

use std::fmt::Write;

/// Turn a file stem into an upper-case Rust constant name.
///
/// Anything outside `[A-Za-z0-9_]` becomes `_`; a leading digit gets a `_`
/// prefix.
pub fn const_name(stem: &str) -> String {
    let mut name: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Emit a `pub const NAME: [u8; LEN] = [...];` item, sixteen bytes per line,
/// preceded by a `// comment` line.
pub fn rust_const(name: &str, comment: &str, bytes: &[u8]) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "// {}", comment);
    let _ = writeln!(out, "pub const {}: [u8; {}] = [", name, bytes.len());
    for line in bytes.chunks(16) {
        out.push_str("   ");
        for byte in line {
            let _ = write!(out, " 0x{:02x},", byte);
        }
        out.push('\n');
    }
    out.push_str("];\n");
    out
}

/// Emit one `DITHERED_BLEND_<f>` const per frame of a blend sequence.
pub fn blend_consts(width: u32, height: u32, frames: &[Vec<u8>]) -> String {
    let count = frames.len();
    frames
        .iter()
        .enumerate()
        .map(|(f, packed)| {
            let comment = format!(
                "Dithered blend frame {}/{}, {}x{}px",
                f + 1,
                count,
                width,
                height
            );
            rust_const(&format!("DITHERED_BLEND_{}", f), &comment, packed) + "\n"
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn const_name_sanitises() {
        assert_eq!(const_name("wink frame-1"), "WINK_FRAME_1");
        assert_eq!(const_name("1st"), "_1ST");
        assert_eq!(const_name(""), "_");
    }

    #[test]
    fn rust_const_wraps_at_sixteen_bytes() {
        let bytes: Vec<u8> = (0..18).collect();
        let src = rust_const("FACE", "'face', 16x9px", &bytes);
        let lines: Vec<&str> = src.lines().collect();
        assert_eq!(lines[0], "// 'face', 16x9px");
        assert_eq!(lines[1], "pub const FACE: [u8; 18] = [");
        assert!(lines[2].starts_with("    0x00, 0x01,"));
        assert!(lines[2].ends_with("0x0f,"));
        assert_eq!(lines[3], "    0x10, 0x11,");
        assert_eq!(lines[4], "];");
    }

    #[test]
    fn blend_consts_are_numbered_from_zero() {
        let src = blend_consts(8, 1, &[vec![0xAA], vec![0x55]]);
        assert!(src.starts_with("// Dithered blend frame 1/2, 8x1px\npub const DITHERED_BLEND_0: [u8; 1] = ["));
        assert!(src.contains("// Dithered blend frame 2/2, 8x1px\npub const DITHERED_BLEND_1: [u8; 1] = [\n    0x55,\n];\n"));
    }
}
