//! Terminal preview: a [`FrameSurface`] that prints the panel with
//! half-block characters, and a thread-sleep delay.

use std::io::{self, Write};
use std::time::Duration;

use embedded_hal_async::delay::DelayNs;
use wink_oled_display_rs::{Frame, FrameSurface, DISPLAY_HEIGHT, DISPLAY_WIDTH};

const WIDTH: usize = DISPLAY_WIDTH as usize;
const HEIGHT: usize = DISPLAY_HEIGHT as usize;

/// In-memory 128×64 panel flushed to a writer.
pub struct TerminalSurface<W> {
    pixels: Vec<bool>,
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            pixels: vec![false; WIDTH * HEIGHT],
            out,
        }
    }

    /// Render the buffer as 32 text rows; each character covers two
    /// vertically stacked pixels.
    pub fn render(&self) -> String {
        let mut text = String::with_capacity((WIDTH * 3 + 1) * HEIGHT / 2);
        for y in (0..HEIGHT).step_by(2) {
            for x in 0..WIDTH {
                let top = self.pixels[y * WIDTH + x];
                let bottom = self.pixels[(y + 1) * WIDTH + x];
                text.push(match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            text.push('\n');
        }
        text
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSurface for TerminalSurface<W> {
    type Error = io::Error;

    fn clear(&mut self) {
        self.pixels.fill(false);
    }

    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<(), io::Error> {
        for pixel in frame.lit_pixels() {
            let (x, y) = (pixel.0.x as usize, pixel.0.y as usize);
            if x < WIDTH && y < HEIGHT {
                self.pixels[y * WIDTH + x] = true;
            }
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), io::Error> {
        let text = self.render();
        // Cursor home so each frame overwrites the previous one.
        write!(self.out, "\x1b[H{}", text)?;
        self.out.flush()
    }
}

/// Blocks the calling thread for the requested time.
pub struct ThreadDelay;

impl DelayNs for ThreadDelay {
    async fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns.into()));
    }

    async fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use wink_oled_display_rs::FRAME_BYTES;

    #[test]
    fn render_uses_half_blocks() {
        let mut data = [0u8; FRAME_BYTES];
        data[0] = 0b1100_0000; // (0,0) and (1,0)
        data[16] = 0b1010_0000; // (0,1) and (2,1)
        let frame = Frame::for_display(&data).unwrap();

        let mut surface = TerminalSurface::new(Vec::new());
        surface.draw_frame(&frame).unwrap();
        let text = surface.render();
        let first: Vec<char> = text.lines().next().unwrap().chars().take(4).collect();
        assert_eq!(first, vec!['█', '▀', '▄', ' ']);
        assert_eq!(text.lines().count(), 32);
    }

    #[test]
    fn clear_blanks_the_buffer() {
        let data = [0xFFu8; FRAME_BYTES];
        let frame = Frame::for_display(&data).unwrap();
        let mut surface = TerminalSurface::new(Vec::new());
        surface.draw_frame(&frame).unwrap();
        surface.clear();
        assert!(surface.render().chars().all(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn flush_writes_cursor_home_and_frame() {
        let mut surface = TerminalSurface::new(Vec::new());
        block_on(surface.flush()).unwrap();
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert!(out.starts_with("\x1b[H"));
        assert_eq!(out.lines().count(), 32);
    }
}
