// Window + software drawing utilities.
// 1) A window that shows a PixelBuffer and reports clicks and keys.
// 2) Clipped rectangle fills and image blits.
// 3) A tiny 5x7 bitmap font for panel labels and the status line.

use crate::error::Error;
use crate::types::PixelBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,
    scratch: Vec<u32>,
    left_was_down: bool,
}

impl Drawer {
    /// Create a window of the given size.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self { window, scratch: Vec::new(), left_was_down: false })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, fb: &PixelBuffer) -> Result<(), Error> {
        let (w, h) = (fb.width(), fb.height());
        let pixels = if fb.stride() == w {
            fb.raw()
        } else {
            // minifb wants tightly packed rows
            self.scratch.clear();
            for y in 0..h {
                self.scratch.extend_from_slice(fb.row(y));
            }
            &self.scratch
        };
        self.window
            .update_with_buffer(pixels, w, h)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Returns false when the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Position of a left click that happened since the last call.
    /// Fires once on press, not while the button is held.
    pub fn take_click(&mut self) -> Option<(i32, i32)> {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pressed = down && !self.left_was_down;
        self.left_was_down = down;
        if !pressed {
            return None;
        }
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x as i32, y as i32))
    }

    // toggles the blur algorithm
    pub fn b_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::B, KeyRepeat::No)
    }

    // moves the first board to the next edge
    pub fn p_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::P, KeyRepeat::No)
    }
}

/* ---------- Software drawing ---------- */

/// Solid rectangle, clipped to the buffer.
pub fn fill_rect(fb: &mut PixelBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    let x0 = x.max(0) as usize;
    let y0 = y.max(0) as usize;
    let x1 = (x + w).clamp(0, fb.width() as i32) as usize;
    let y1 = (y + h).clamp(0, fb.height() as i32) as usize;
    if x0 >= x1 {
        return;
    }
    for row in y0..y1 {
        fb.row_mut(row)[x0..x1].fill(color);
    }
}

/// One-pixel outline.
pub fn stroke_rect(fb: &mut PixelBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    fill_rect(fb, x, y, w, 1, color);
    fill_rect(fb, x, y + h - 1, w, 1, color);
    fill_rect(fb, x, y, 1, h, color);
    fill_rect(fb, x + w - 1, y, 1, h, color);
}

/// Copy `img` with its top-left at (x,y), clipped.
pub fn blit(fb: &mut PixelBuffer, img: &PixelBuffer, x: i32, y: i32) {
    let (fw, fh) = (fb.width() as i32, fb.height() as i32);
    let sx0 = (-x).max(0);
    let sy0 = (-y).max(0);
    let sx1 = (img.width() as i32).min(fw - x);
    let sy1 = (img.height() as i32).min(fh - y);
    if sx0 >= sx1 || sy0 >= sy1 {
        return;
    }
    for sy in sy0..sy1 {
        let src = &img.row(sy as usize)[sx0 as usize..sx1 as usize];
        let dx = (x + sx0) as usize;
        fb.row_mut((y + sy) as usize)[dx..dx + src.len()].copy_from_slice(src);
    }
}

/* ---------- 5x7 bitmap font (uppercase, digits, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Each u8 is a row; bit 4 is the leftmost pixel.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        _ => None,
    }
}

/// Pixel width of `text` at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 6 * scale
}

/// Draw a text string using 5x7 glyphs, each glyph pixel a `scale`-sized square.
pub fn draw_text_5x7(fb: &mut PixelBuffer, mut x: i32, y: i32, text: &str, scale: i32, color: u32) {
    for ch in text.chars() {
        if let Some(rows) = glyph5x7(ch) {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        fill_rect(fb, x + rx * scale, y + ry as i32 * scale, scale, scale, color);
                    }
                }
            }
        }
        x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_buffer() {
        let mut fb = PixelBuffer::new(4, 4).unwrap();
        fill_rect(&mut fb, -2, 2, 4, 10, 7);
        assert_eq!(fb.row(1), &[0, 0, 0, 0]);
        assert_eq!(fb.row(2), &[7, 7, 0, 0]);
        assert_eq!(fb.row(3), &[7, 7, 0, 0]);
    }

    #[test]
    fn blit_clips_negative_offsets() {
        let mut img = PixelBuffer::new(3, 2).unwrap();
        img.fill(5);
        *img.pixel_mut(2, 1) = 9;
        let mut fb = PixelBuffer::new(4, 3).unwrap();
        blit(&mut fb, &img, -1, 1);
        assert_eq!(fb.row(0), &[0, 0, 0, 0]);
        assert_eq!(fb.row(1), &[5, 5, 0, 0]);
        assert_eq!(fb.row(2), &[5, 9, 0, 0]);
        blit(&mut fb, &img, 10, 10);
    }

    #[test]
    fn text_lands_where_asked() {
        let mut fb = PixelBuffer::new(20, 10).unwrap();
        draw_text_5x7(&mut fb, 1, 1, "l", 1, 3);
        // 'L' is a left bar plus a bottom row
        assert_eq!(fb.pixel(1, 1), 3);
        assert_eq!(fb.pixel(5, 7), 3);
        assert_eq!(fb.pixel(5, 1), 0);
        assert_eq!(text_width("LEFT", 2), 48);
    }
}
