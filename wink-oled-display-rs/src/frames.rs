//! Compiled-in wink animation tables.
//!
//! Each entry is one full-screen 128×64 packed bitmap generated with
//! `wink-frame-tool convert`. The right eye closes and reopens while the
//! smile lifts on the winking side.

/// Four-frame wink: open, half, closed, half.
pub static WINK_4: [&[u8]; 4] = [
    include_bytes!("../frames/wink4/frame_1.bin"),
    include_bytes!("../frames/wink4/frame_2.bin"),
    include_bytes!("../frames/wink4/frame_3.bin"),
    include_bytes!("../frames/wink4/frame_4.bin"),
];

/// Eight-frame wink with quarter steps between open and closed.
pub static WINK_8: [&[u8]; 8] = [
    include_bytes!("../frames/wink8/frame_1.bin"),
    include_bytes!("../frames/wink8/frame_2.bin"),
    include_bytes!("../frames/wink8/frame_3.bin"),
    include_bytes!("../frames/wink8/frame_4.bin"),
    include_bytes!("../frames/wink8/frame_5.bin"),
    include_bytes!("../frames/wink8/frame_6.bin"),
    include_bytes!("../frames/wink8/frame_7.bin"),
    include_bytes!("../frames/wink8/frame_8.bin"),
];

/// The eight-frame wink encoded as a 128×64 two-colour GIF.
pub static WINK_GIF: &[u8] = include_bytes!("../frames/wink.gif");
