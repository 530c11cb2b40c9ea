// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(v: u32) -> Rgb {
        Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Integer lerp with `t_256` in 0..=256.
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    /// Blends `over` onto `self` with coverage `alpha` in 0.0..=1.0.
    pub fn mix(self, over: Rgb, alpha: f64) -> Rgb {
        let t = (alpha.clamp(0.0, 1.0) * 256.0).round() as u16;
        Rgb::lerp(self, over, t)
    }

    pub fn darken(self, factor: f64) -> Rgb {
        self.mix(BLACK, factor)
    }

    pub fn lighten(self, factor: f64) -> Rgb {
        self.mix(WHITE, factor)
    }
}

/// Samples a piecewise-linear gradient. Stops must be sorted by position.
pub fn gradient_at(stops: &[(f64, Rgb)], t: f64) -> Rgb {
    match stops {
        [] => BLACK,
        [(_, only)] => *only,
        _ => {
            let t = t.clamp(0.0, 1.0);
            for pair in stops.windows(2) {
                let (p0, c0) = pair[0];
                let (p1, c1) = pair[1];
                if t <= p1 {
                    let span = (p1 - p0).max(f64::EPSILON);
                    return c0.mix(c1, (t - p0) / span);
                }
            }
            stops[stops.len() - 1].1
        }
    }
}

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const SHADOW: Rgb = Rgb(30, 30, 30);
pub const GOLD: Rgb = Rgb::hex(0xFFD700);
pub const CRIMSON: Rgb = Rgb::hex(0xDC143C);
pub const SANTA_RED: Rgb = Rgb::hex(0xE31C23);
pub const PINE: Rgb = Rgb::hex(0x0F7D3A);
pub const ORANGE: Rgb = Rgb::hex(0xFF8C00);
pub const TAN: Rgb = Rgb::hex(0xD2B48C);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_unpacks_channels() {
        assert_eq!(Rgb::hex(0x2A9AA5), Rgb(0x2A, 0x9A, 0xA5));
    }

    #[test]
    fn mix_endpoints() {
        let a = Rgb(10, 20, 30);
        assert_eq!(a.mix(WHITE, 0.0), a);
        assert_eq!(a.mix(WHITE, 1.0), WHITE);
    }

    #[test]
    fn gradient_interpolates_between_stops() {
        let stops = [(0.0, BLACK), (1.0, Rgb(200, 100, 0))];
        assert_eq!(gradient_at(&stops, 0.0), BLACK);
        assert_eq!(gradient_at(&stops, 1.0), Rgb(200, 100, 0));
        assert_eq!(gradient_at(&stops, 0.5), Rgb(100, 50, 0));
    }
}
