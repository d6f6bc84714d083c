//! Decorative drifting starfield.
//!
//! Stateless: every frame is a pure function of the area and the tick, so it
//! never touches the feed.

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

/// Roughly one cell in `DENSITY` holds a star.
const DENSITY: u64 = 37;

/// Twinkle cycle, dim to bright and back.
const GLYPHS: [char; 6] = ['.', '·', '+', '*', '+', '·'];

pub struct Starfield {
    pub tick: u64,
    pub color: Color,
}

impl Starfield {
    pub fn new(tick: u64, color: Color) -> Self {
        Self { tick, color }
    }

    /// Glyph at a screen cell, if a star is there this tick.
    pub fn glyph_at(&self, x: u16, y: u16) -> Option<char> {
        // Three parallax layers; nearer rows drift faster.
        let layer = mix(u64::from(y) ^ 0x5eed) % 3;
        let drift = self.tick / (8 >> layer);
        let world_x = u64::from(x) + drift;

        let h = mix(world_x.wrapping_mul(0x9E37_79B9) ^ (u64::from(y) << 32));
        if h % DENSITY != 0 {
            return None;
        }

        let phase = (h >> 16).wrapping_add(self.tick / 3) as usize;
        Some(GLYPHS[phase % GLYPHS.len()])
    }
}

impl Widget for Starfield {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(glyph) = self.glyph_at(x - area.left(), y - area.top()) {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(glyph).set_fg(self.color);
                    }
                }
            }
        }
    }
}

/// splitmix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
