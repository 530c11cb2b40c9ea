//! Drawing surface in logical canvas coordinates, and the half-block pixel
//! canvas that rasterises it for the terminal.

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::color::{Rgb, gradient_at};
use crate::config::{HEIGHT, WIDTH};
use crate::font::{self, GLYPH_H, GLYPH_W};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Primitive 2D drawing in the fixed 400×600 logical space.
///
/// Every fill is blended with the current global alpha and shifted by the
/// current offset.
pub trait Surface {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, c: Rgb);
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, c: Rgb);
    fn fill_polygon(&mut self, pts: &[(f64, f64)], c: Rgb);
    /// Fills a rect with a top-to-bottom gradient. Stop positions are 0.0..=1.0.
    fn vertical_gradient(&mut self, x: f64, y: f64, w: f64, h: f64, stops: &[(f64, Rgb)]);

    fn alpha(&self) -> f64;
    fn set_alpha(&mut self, alpha: f64);
    fn offset(&self) -> (f64, f64);
    fn set_offset(&mut self, dx: f64, dy: f64);

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, width: f64, c: Rgb) {
        self.fill_rect(x, y, w, width, c);
        self.fill_rect(x, y + h - width, w, width, c);
        self.fill_rect(x, y, width, h, c);
        self.fill_rect(x + w - width, y, width, h, c);
    }

    /// Ellipse rotated by `rot` radians around its center.
    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, rot: f64, c: Rgb) {
        const SEGMENTS: usize = 20;
        let (sin, cos) = rot.sin_cos();
        let pts: Vec<(f64, f64)> = (0..SEGMENTS)
            .map(|i| {
                let a = i as f64 / SEGMENTS as f64 * std::f64::consts::TAU;
                let (x, y) = (a.cos() * rx, a.sin() * ry);
                (cx + x * cos - y * sin, cy + x * sin + y * cos)
            })
            .collect();
        self.fill_polygon(&pts, c);
    }

    /// Draws `text` with the bitmap font. `size` is the cap height; `y` is the
    /// vertical middle of the line.
    fn text(&mut self, text: &str, x: f64, y: f64, size: f64, c: Rgb, align: Align) {
        let unit = size / GLYPH_H as f64;
        let width = font::text_width(text) as f64 * unit;
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
        };
        let top = y - size / 2.0;
        for (i, ch) in text.chars().enumerate() {
            let Some(glyph) = font::glyph(ch) else {
                continue;
            };
            let gx = left + (i * font::ADVANCE) as f64 * unit;
            for row in 0..GLYPH_H {
                for col in 0..GLYPH_W {
                    if glyph[row * GLYPH_W + col] == 1 {
                        self.fill_rect(gx + col as f64 * unit, top + row as f64 * unit, unit, unit, c);
                    }
                }
            }
        }
    }

    /// Text with a drop outline, the cartoon style used by every HUD label.
    fn outlined_text(&mut self, text: &str, x: f64, y: f64, size: f64, fill: Rgb, outline: Rgb) {
        let d = (size / 10.0).max(1.5);
        for (ox, oy) in [(-d, 0.0), (d, 0.0), (0.0, -d), (0.0, d), (d, d)] {
            self.text(text, x + ox, y + oy, size, outline, Align::Center);
        }
        self.text(text, x, y, size, fill, Align::Center);
    }
}

/// Multiplies the surface alpha by `alpha` for the duration of `draw`.
pub fn with_alpha(s: &mut dyn Surface, alpha: f64, draw: impl FnOnce(&mut dyn Surface)) {
    let prev = s.alpha();
    s.set_alpha(prev * alpha.clamp(0.0, 1.0));
    draw(&mut *s);
    s.set_alpha(prev);
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

/// Device pixel buffer, two pixels per terminal cell. The logical canvas is
/// scaled to fit and letterboxed.
pub struct PixelCanvas {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
    scale: f64,
    ox: f64,
    oy: f64,
    alpha: f64,
    shift: (f64, f64),
    border: Rgb,
}

impl PixelCanvas {
    pub fn new(w: usize, h: usize) -> Self {
        let mut canvas = Self {
            w: 0,
            h: 0,
            px: Vec::new(),
            scale: 1.0,
            ox: 0.0,
            oy: 0.0,
            alpha: 1.0,
            shift: (0.0, 0.0),
            border: Rgb(12, 12, 16),
        };
        canvas.resize(w, h);
        canvas
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, self.border);
        self.scale = (w as f64 / WIDTH).min(h as f64 / HEIGHT);
        self.ox = ((w as f64 - WIDTH * self.scale) / 2.0).floor();
        self.oy = ((h as f64 - HEIGHT * self.scale) / 2.0).floor();
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Resets every pixel to the letterbox color and drops alpha and offset.
    pub fn clear(&mut self) {
        self.px.fill(self.border);
        self.alpha = 1.0;
        self.shift = (0.0, 0.0);
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Device pixel under a logical point, ignoring the current offset.
    pub fn sample(&self, x: f64, y: f64) -> Option<Rgb> {
        let dx = (self.ox + x * self.scale).floor();
        let dy = (self.oy + y * self.scale).floor();
        if dx < 0.0 || dy < 0.0 || dx as usize >= self.w || dy as usize >= self.h {
            return None;
        }
        Some(self.get(dx as usize, dy as usize))
    }

    fn to_device(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.ox + (x + self.shift.0) * self.scale,
            self.oy + (y + self.shift.1) * self.scale,
        )
    }

    /// Visible device rect of the logical canvas: (x0, y0, x1, y1), exclusive.
    fn viewport(&self) -> (i32, i32, i32, i32) {
        let x1 = (self.ox + WIDTH * self.scale).round() as i32;
        let y1 = (self.oy + HEIGHT * self.scale).round() as i32;
        (
            self.ox as i32,
            self.oy as i32,
            x1.min(self.w as i32),
            y1.min(self.h as i32),
        )
    }

    fn blend(&mut self, x: i32, y: i32, c: Rgb) {
        let (x0, y0, x1, y1) = self.viewport();
        if x < x0 || y < y0 || x >= x1 || y >= y1 {
            return;
        }
        let i = y as usize * self.w + x as usize;
        self.px[i] = if self.alpha >= 1.0 {
            c
        } else {
            self.px[i].mix(c, self.alpha)
        };
    }

    /// Rounds a logical span to device pixels, never collapsing a non-empty
    /// span to zero width.
    fn span(a: f64, b: f64) -> (i32, i32) {
        let lo = a.round() as i32;
        let hi = b.round() as i32;
        if hi <= lo && b > a { (lo, lo + 1) } else { (lo, hi) }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

impl Surface for PixelCanvas {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, c: Rgb) {
        if w <= 0.0 || h <= 0.0 || !(x.is_finite() && y.is_finite()) {
            return;
        }
        let (ax, ay) = self.to_device(x, y);
        let (bx, by) = self.to_device(x + w, y + h);
        let (x0, x1) = Self::span(ax, bx);
        let (y0, y1) = Self::span(ay, by);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, c);
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, c: Rgb) {
        if r <= 0.0 || !(cx.is_finite() && cy.is_finite()) {
            return;
        }
        let (dcx, dcy) = self.to_device(cx, cy);
        let dr = r * self.scale;
        if dr < 0.5 {
            self.blend(dcx.floor() as i32, dcy.floor() as i32, c);
            return;
        }
        let r2 = dr * dr;
        for py in (dcy - dr).floor() as i32..=(dcy + dr).ceil() as i32 {
            for px in (dcx - dr).floor() as i32..=(dcx + dr).ceil() as i32 {
                let ddx = px as f64 + 0.5 - dcx;
                let ddy = py as f64 + 0.5 - dcy;
                if ddx * ddx + ddy * ddy <= r2 {
                    self.blend(px, py, c);
                }
            }
        }
    }

    fn fill_polygon(&mut self, pts: &[(f64, f64)], c: Rgb) {
        if pts.len() < 3 || pts.iter().any(|(x, y)| !(x.is_finite() && y.is_finite())) {
            return;
        }
        let dev: Vec<(f64, f64)> = pts.iter().map(|&(x, y)| self.to_device(x, y)).collect();
        let min_y = dev.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = dev.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let mut painted = false;
        let mut xs = Vec::new();
        for py in min_y.floor() as i32..=max_y.ceil() as i32 {
            let yc = py as f64 + 0.5;
            xs.clear();
            for i in 0..dev.len() {
                let (x0, y0) = dev[i];
                let (x1, y1) = dev[(i + 1) % dev.len()];
                if (y0 <= yc && y1 > yc) || (y1 <= yc && y0 > yc) {
                    xs.push(x0 + (yc - y0) / (y1 - y0) * (x1 - x0));
                }
            }
            xs.sort_by(f64::total_cmp);
            for pair in xs.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil() as i32;
                let end = (pair[1] - 0.5).floor() as i32;
                for px in start..=end {
                    self.blend(px, py, c);
                    painted = true;
                }
            }
        }
        // Sub-pixel shapes still leave a mark.
        if !painted {
            let n = dev.len() as f64;
            let cx = dev.iter().map(|p| p.0).sum::<f64>() / n;
            let cy = dev.iter().map(|p| p.1).sum::<f64>() / n;
            self.blend(cx.floor() as i32, cy.floor() as i32, c);
        }
    }

    fn vertical_gradient(&mut self, x: f64, y: f64, w: f64, h: f64, stops: &[(f64, Rgb)]) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let (ax, ay) = self.to_device(x, y);
        let (bx, by) = self.to_device(x + w, y + h);
        let (x0, x1) = Self::span(ax, bx);
        let (y0, y1) = Self::span(ay, by);
        let span = (by - ay).max(f64::EPSILON);
        for py in y0..y1 {
            let t = (py as f64 + 0.5 - ay) / span;
            let c = gradient_at(stops, t);
            for px in x0..x1 {
                self.blend(px, py, c);
            }
        }
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn offset(&self) -> (f64, f64) {
        self.shift
    }

    fn set_offset(&mut self, dx: f64, dy: f64) {
        self.shift = (dx, dy);
    }
}
