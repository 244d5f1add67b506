//! CPU frame buffer and raster primitives
//!
//! Pixel `(x, y)` covers `[x, x + 1) x [y, y + 1)`; shapes are sampled at pixel
//! centers. Every primitive clips to the buffer and alpha-blends colors that
//! are not fully opaque.

use glam::Vec2;

use crate::Color;

/// RGBA8 frame, row-major, no padding
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let i = self.index(x, y)?;
        let p = &self.pixels[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    pub fn clear(&mut self, color: Color) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Source-over blend of one pixel
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        match color[3] {
            0 => {}
            255 => self.pixels[i..i + 4].copy_from_slice(&color),
            a => {
                let dst = &mut self.pixels[i..i + 4];
                for c in 0..3 {
                    dst[c] = blend_channel(color[c], dst[c], a);
                }
                dst[3] = a.saturating_add(((255 - a) as u16 * dst[3] as u16 / 255) as u8);
            }
        }
    }

    /// Pixel range whose centers fall in `[lo, hi)`, clipped to `0..limit`
    fn span(lo: f32, hi: f32, limit: u32) -> (i32, i32) {
        let start = (lo - 0.5).ceil().max(0.0) as i32;
        let end = ((hi - 0.5).ceil() as i32).min(limit as i32);
        (start, end)
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (x0, x1) = Self::span(x, x + w, self.width);
        let (y0, y1) = Self::span(y, y + h, self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    /// Outline centered on the rectangle's edge, like a canvas stroke
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, line_width: f32, color: Color) {
        let half = line_width / 2.0;
        self.fill_rect(x - half, y - half, w + line_width, line_width, color);
        self.fill_rect(x - half, y + h - half, w + line_width, line_width, color);
        self.fill_rect(x - half, y + half, line_width, h - line_width, color);
        self.fill_rect(x + w - half, y + half, line_width, h - line_width, color);
    }

    /// Segment with round caps
    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let half = width / 2.0;
        let min = from.min(to) - Vec2::splat(half);
        let max = from.max(to) + Vec2::splat(half);
        let (x0, x1) = Self::span(min.x, max.x, self.width);
        let (y0, y1) = Self::span(min.y, max.y, self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                if distance_to_segment(p, from, to) <= half {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ring(center, 0.0, radius, color);
    }

    /// Circle outline centered on `radius`
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color) {
        let half = line_width / 2.0;
        self.ring(center, (radius - half).max(0.0), radius + half, color);
    }

    fn ring(&mut self, center: Vec2, inner: f32, outer: f32, color: Color) {
        let (x0, x1) = Self::span(center.x - outer, center.x + outer, self.width);
        let (y0, y1) = Self::span(center.y - outer, center.y + outer, self.height);
        let (inner_sq, outer_sq) = (inner * inner, outer * outer);
        for py in y0..y1 {
            for px in x0..x1 {
                let d = Vec2::new(px as f32 + 0.5, py as f32 + 0.5).distance_squared(center);
                if d <= outer_sq && (inner <= 0.0 || d >= inner_sq) {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    /// Even-odd scanline fill; each pixel is blended at most once
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let (min_y, max_y) = points
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let (y0, y1) = Self::span(min_y, max_y, self.height);
        let mut crossings = Vec::new();
        for py in y0..y1 {
            let sy = py as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy) != (b.y <= sy) {
                    crossings.push(a.x + (sy - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let (x0, x1) = Self::span(pair[0], pair[1], self.width);
                for px in x0..x1 {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    /// Paint a rotated `size` box centered on `center`
    ///
    /// `shade` gets texture coordinates in `[0, 1)` and returns the color for
    /// that point, or `None` to leave the pixel untouched.
    pub fn fill_transformed(
        &mut self,
        center: Vec2,
        size: Vec2,
        rotation: f32,
        shade: impl Fn(Vec2) -> Option<Color>,
    ) {
        let reach = size.length() / 2.0;
        let (x0, x1) = Self::span(center.x - reach, center.x + reach, self.width);
        let (y0, y1) = Self::span(center.y - reach, center.y + reach, self.height);
        let inverse = Vec2::from_angle(-rotation);
        for py in y0..y1 {
            for px in x0..x1 {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - center;
                let uv = inverse.rotate(p) / size + Vec2::splat(0.5);
                if (0.0..1.0).contains(&uv.x) && (0.0..1.0).contains(&uv.y) {
                    if let Some(color) = shade(uv) {
                        self.blend_pixel(px, py, color);
                    }
                }
            }
        }
    }

    /// Block-glyph text centered on `center`
    pub fn draw_text(&mut self, text: &str, center: Vec2, scale: f32, color: Color) {
        let origin = center - Vec2::new(text_width(text, scale), GLYPH_H as f32 * scale) / 2.0;
        for (i, ch) in text.chars().enumerate() {
            let x = origin.x + i as f32 * GLYPH_ADVANCE as f32 * scale;
            for (row, bits) in glyph_rows(ch).iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                        self.fill_rect(
                            x + col as f32 * scale,
                            origin.y + row as f32 * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
    }

    /// Text with an outline `outline` pixels thick drawn underneath
    pub fn draw_text_outlined(
        &mut self,
        text: &str,
        center: Vec2,
        scale: f32,
        outline: f32,
        fill: Color,
        stroke: Color,
    ) {
        for dy in [-outline, 0.0, outline] {
            for dx in [-outline, 0.0, outline] {
                if dx != 0.0 || dy != 0.0 {
                    self.draw_text(text, center + Vec2::new(dx, dy), scale, stroke);
                }
            }
        }
        self.draw_text(text, center, scale, fill);
    }
}

fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = alpha as u16;
    ((src as u16 * a + dst as u16 * (255 - a) + 127) / 255) as u8
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

pub const GLYPH_W: usize = 3;
pub const GLYPH_H: usize = 5;
/// Glyph width plus one column of spacing
const GLYPH_ADVANCE: usize = GLYPH_W + 1;

/// Width of `text` in pixels at `scale`
pub fn text_width(text: &str, scale: f32) -> f32 {
    let n = text.chars().count();
    if n == 0 {
        return 0.0;
    }
    (n * GLYPH_ADVANCE - 1) as f32 * scale
}

/// 3x5 bitmap rows, most significant of the low three bits is the left column
fn glyph_rows(ch: char) -> [u8; GLYPH_H] {
    match ch.to_ascii_uppercase() {
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '$' => [0b011, 0b110, 0b010, 0b011, 0b110],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        _ => [0b111, 0b001, 0b011, 0b000, 0b010],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [255, 0, 0, 255];
    const BLACK: Color = [0, 0, 0, 255];

    fn count(fb: &FrameBuffer, color: Color) -> usize {
        fb.as_bytes()
            .chunks_exact(4)
            .filter(|px| *px == color.as_slice())
            .count()
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.fill_rect(-5.0, -5.0, 8.0, 8.0, RED);
        assert_eq!(count(&fb, RED), 9);
        assert_eq!(fb.pixel(2, 2), Some(RED));
        assert_eq!(fb.pixel(3, 3), Some([0, 0, 0, 0]));
        assert_eq!(fb.pixel(10, 0), None);
    }

    #[test]
    fn test_blend_half_alpha() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.clear(BLACK);
        fb.blend_pixel(0, 0, [255, 255, 255, 128]);
        assert_eq!(fb.pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn test_stroke_rect_is_hollow() {
        let mut fb = FrameBuffer::new(20, 20);
        fb.stroke_rect(5.0, 5.0, 10.0, 10.0, 2.0, RED);
        assert_eq!(fb.pixel(4, 4), Some(RED));
        assert_eq!(fb.pixel(15, 10), Some(RED));
        assert_eq!(fb.pixel(10, 10), Some([0, 0, 0, 0]));
        // 12x12 outer minus 8x8 inner
        assert_eq!(count(&fb, RED), 144 - 64);
    }

    #[test]
    fn test_line_width() {
        let mut fb = FrameBuffer::new(20, 20);
        fb.line(Vec2::new(2.0, 10.0), Vec2::new(18.0, 10.0), 2.0, RED);
        assert_eq!(fb.pixel(10, 9), Some(RED));
        assert_eq!(fb.pixel(10, 10), Some(RED));
        assert_eq!(fb.pixel(10, 8), Some([0, 0, 0, 0]));
        assert_eq!(fb.pixel(10, 11), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_circle_and_ring() {
        let mut fb = FrameBuffer::new(40, 40);
        fb.fill_circle(Vec2::new(20.0, 20.0), 10.0, RED);
        assert_eq!(fb.pixel(20, 20), Some(RED));
        assert_eq!(fb.pixel(20, 11), Some(RED));
        assert_eq!(fb.pixel(20, 8), Some([0, 0, 0, 0]));

        let mut fb = FrameBuffer::new(40, 40);
        fb.stroke_circle(Vec2::new(20.0, 20.0), 10.0, 3.0, RED);
        assert_eq!(fb.pixel(20, 20), Some([0, 0, 0, 0]));
        assert_eq!(fb.pixel(29, 19), Some(RED));
    }

    #[test]
    fn test_polygon_fill_blends_once() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.clear(BLACK);
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        fb.fill_polygon(&square, [255, 0, 0, 128]);
        assert!(fb.as_bytes().chunks_exact(4).all(|px| px == [128, 0, 0, 255]));
    }

    #[test]
    fn test_transformed_rotation() {
        let mut fb = FrameBuffer::new(40, 40);
        // A 20x4 bar turned 90 degrees becomes a 4x20 bar
        fb.fill_transformed(
            Vec2::new(20.0, 20.0),
            Vec2::new(20.0, 4.0),
            std::f32::consts::FRAC_PI_2,
            |_| Some(RED),
        );
        assert_eq!(fb.pixel(20, 12), Some(RED));
        assert_eq!(fb.pixel(12, 20), Some([0, 0, 0, 0]));
        assert_eq!(count(&fb, RED), 80);
    }

    #[test]
    fn test_text_layout() {
        assert_eq!(text_width("AI", 5.0), 35.0);
        assert_eq!(text_width("", 5.0), 0.0);

        let mut fb = FrameBuffer::new(20, 20);
        fb.draw_text("I", Vec2::new(10.0, 10.0), 2.0, RED);
        // Top bar of the I spans x 7..13 at y 5..7
        assert_eq!(fb.pixel(7, 5), Some(RED));
        assert_eq!(fb.pixel(12, 6), Some(RED));
        assert_eq!(fb.pixel(7, 8), Some([0, 0, 0, 0]));
        assert_eq!(fb.pixel(9, 8), Some(RED));
    }

    #[test]
    fn test_outlined_text_keeps_fill_on_top() {
        let mut fb = FrameBuffer::new(30, 30);
        fb.draw_text_outlined("I", Vec2::new(15.0, 15.0), 2.0, 1.0, RED, BLACK);
        assert_eq!(fb.pixel(15, 15), Some(RED));
        assert!(count(&fb, BLACK) > 0);
    }
}
