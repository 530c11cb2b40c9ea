//! Visual and audio skins. A theme is chosen once at startup and owns every
//! themed layer of the frame plus the cue variants for flaps and celebrations.

mod avatar;
pub mod classic;
pub mod festive;

use chrono::{Datelike, NaiveDate};
use rand::RngCore;
use std::fmt;
use std::str::FromStr;

use crate::audio::Cue;
use crate::bird::Bird;
use crate::color::{BLACK, GOLD, Rgb, WHITE};
use crate::config::WIDTH;
use crate::obstacles::Pipe;
use crate::particles::ParticlePool;
use crate::surface::Surface;

pub use classic::Classic;
pub use festive::Festive;

/// Which high-score table and analytics label a run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Classic,
    Festive,
}

impl Mode {
    pub fn key(self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::Festive => "festive",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Read-only view of the world handed to themes each tick and frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub frame: u64,
    pub score: u32,
    pub playing: bool,
    pub speed: f64,
    pub ground_x: f64,
    pub city_x: f64,
    pub pipes: &'a [Pipe],
}

pub trait Theme {
    fn mode(&self) -> Mode;

    /// Advances ambient animation. Called once per tick in every state.
    fn update(&mut self, scene: &Scene<'_>, rng: &mut dyn RngCore);

    fn draw_background(&self, s: &mut dyn Surface, scene: &Scene<'_>);
    fn draw_decor(&self, s: &mut dyn Surface, scene: &Scene<'_>);
    fn draw_obstacle(&self, s: &mut dyn Surface, pipe: &Pipe, scene: &Scene<'_>);
    fn draw_ground(&self, s: &mut dyn Surface, scene: &Scene<'_>);
    /// Foreground weather drawn above the ground and below gameplay effects.
    fn draw_ambient(&self, _s: &mut dyn Surface, _scene: &Scene<'_>) {}
    fn draw_avatar(&self, s: &mut dyn Surface, bird: &Bird);

    /// Flap side effects; returns the cue to play.
    fn on_flap(&mut self, bird: &Bird, particles: &mut ParticlePool, rng: &mut dyn RngCore) -> Cue;
    fn celebration_cue(&self) -> Cue;
    /// Looping background track, if the theme has one.
    fn music(&self) -> Option<Cue> {
        None
    }

    /// Colors thrown out by the death explosion.
    fn feathers(&self) -> &'static [Rgb];
    fn sparkle_color(&self) -> Rgb;
    /// Start button fill.
    fn accent(&self) -> Rgb;

    fn draw_title(&self, s: &mut dyn Surface, frame: u64) {
        let y = 100.0 + (frame as f64 / 30.0).sin() * 8.0;
        s.outlined_text("KEYBIRD", WIDTH / 2.0, y, 40.0, GOLD, BLACK);
    }

    /// Decoration inside the start button outline.
    fn draw_button_trim(&self, s: &mut dyn Surface, x: f64, y: f64, w: f64, _h: f64) {
        s.fill_rect(x + 10.0, y + 2.0, w - 20.0, 3.0, WHITE);
    }

    fn reset(&mut self) {}
}

// ── Selection ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeChoice {
    Classic,
    Festive,
    #[default]
    Auto,
}

impl FromStr for ThemeChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(ThemeChoice::Classic),
            "festive" | "christmas" => Ok(ThemeChoice::Festive),
            "auto" => Ok(ThemeChoice::Auto),
            other => Err(format!("unknown theme '{other}' (expected classic, festive or auto)")),
        }
    }
}

impl ThemeChoice {
    pub fn resolve(self, today: NaiveDate) -> Mode {
        match self {
            ThemeChoice::Classic => Mode::Classic,
            ThemeChoice::Festive => Mode::Festive,
            ThemeChoice::Auto if is_festive_season(today) => Mode::Festive,
            ThemeChoice::Auto => Mode::Classic,
        }
    }
}

/// December 1st through January 6th inclusive.
pub fn is_festive_season(date: NaiveDate) -> bool {
    date.month() == 12 || (date.month() == 1 && date.day() <= 6)
}

pub fn build(mode: Mode, rng: &mut dyn RngCore) -> Box<dyn Theme> {
    match mode {
        Mode::Classic => Box::new(Classic::new()),
        Mode::Festive => Box::new(Festive::new(rng)),
    }
}

// ── Drawing helpers ─────────────────────────────────────────────────────────

/// Local frame for sprites: translate, rotate (degrees), then scale.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pose {
    x: f64,
    y: f64,
    rot: f64,
    sin: f64,
    cos: f64,
    sx: f64,
    sy: f64,
    ox: f64,
    oy: f64,
}

impl Pose {
    pub(crate) fn new(x: f64, y: f64, rot_deg: f64) -> Self {
        let rot = rot_deg.to_radians();
        let (sin, cos) = rot.sin_cos();
        Self {
            x,
            y,
            rot,
            sin,
            cos,
            sx: 1.0,
            sy: 1.0,
            ox: 0.0,
            oy: 0.0,
        }
    }

    pub(crate) fn scaled(self, sx: f64, sy: f64) -> Self {
        Self { sx, sy, ..self }
    }

    /// Moves the local origin, in local units.
    pub(crate) fn shifted(self, dx: f64, dy: f64) -> Self {
        Self {
            ox: self.ox + dx,
            oy: self.oy + dy,
            ..self
        }
    }

    pub(crate) fn map(&self, px: f64, py: f64) -> (f64, f64) {
        let lx = (px + self.ox) * self.sx;
        let ly = (py + self.oy) * self.sy;
        (self.x + lx * self.cos - ly * self.sin, self.y + lx * self.sin + ly * self.cos)
    }

    pub(crate) fn ellipse(&self, s: &mut dyn Surface, cx: f64, cy: f64, rx: f64, ry: f64, c: Rgb) {
        let (x, y) = self.map(cx, cy);
        s.fill_ellipse(x, y, rx * self.sx.abs(), ry * self.sy.abs(), self.rot, c);
    }

    pub(crate) fn circle(&self, s: &mut dyn Surface, cx: f64, cy: f64, r: f64, c: Rgb) {
        self.ellipse(s, cx, cy, r, r, c);
    }

    pub(crate) fn rect(&self, s: &mut dyn Surface, x: f64, y: f64, w: f64, h: f64, c: Rgb) {
        self.poly(s, &[(x, y), (x + w, y), (x + w, y + h), (x, y + h)], c);
    }

    pub(crate) fn poly(&self, s: &mut dyn Surface, pts: &[(f64, f64)], c: Rgb) {
        let mapped: Vec<(f64, f64)> = pts.iter().map(|&(x, y)| self.map(x, y)).collect();
        s.fill_polygon(&mapped, c);
    }
}

/// Straight segment of the given width.
pub(crate) fn line(s: &mut dyn Surface, a: (f64, f64), b: (f64, f64), width: f64, c: Rgb) {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return;
    }
    let (nx, ny) = (-dy / len * width / 2.0, dx / len * width / 2.0);
    s.fill_polygon(
        &[
            (a.0 + nx, a.1 + ny),
            (b.0 + nx, b.1 + ny),
            (b.0 - nx, b.1 - ny),
            (a.0 - nx, a.1 - ny),
        ],
        c,
    );
}

/// Five-pointed star centered on `(x, y)`.
pub(crate) fn star(x: f64, y: f64, outer: f64, inner: f64) -> Vec<(f64, f64)> {
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = std::f64::consts::PI / 5.0 * i as f64 - std::f64::consts::FRAC_PI_2;
            (x + a.cos() * r, y + a.sin() * r)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn season_spans_new_year() {
        assert!(!is_festive_season(date(2025, 11, 30)));
        assert!(is_festive_season(date(2025, 12, 1)));
        assert!(is_festive_season(date(2025, 12, 31)));
        assert!(is_festive_season(date(2026, 1, 6)));
        assert!(!is_festive_season(date(2026, 1, 7)));
    }

    #[test]
    fn explicit_choices_ignore_the_date() {
        let summer = date(2026, 7, 1);
        let winter = date(2026, 12, 24);
        assert_eq!(ThemeChoice::Festive.resolve(summer), Mode::Festive);
        assert_eq!(ThemeChoice::Classic.resolve(winter), Mode::Classic);
        assert_eq!(ThemeChoice::Auto.resolve(summer), Mode::Classic);
        assert_eq!(ThemeChoice::Auto.resolve(winter), Mode::Festive);
    }

    #[test]
    fn choice_parses() {
        assert_eq!("Festive".parse::<ThemeChoice>(), Ok(ThemeChoice::Festive));
        assert_eq!("auto".parse::<ThemeChoice>(), Ok(ThemeChoice::Auto));
        assert!("summer".parse::<ThemeChoice>().is_err());
    }

    #[test]
    fn pose_rotates_then_translates() {
        let p = Pose::new(10.0, 20.0, 90.0);
        let (x, y) = p.map(5.0, 0.0);
        assert!((x - 10.0).abs() < 1e-9);
        assert!((y - 25.0).abs() < 1e-9);
        let (x, y) = p.scaled(2.0, 1.0).shifted(1.0, 0.0).map(0.0, 0.0);
        assert!((x - 10.0).abs() < 1e-9);
        assert!((y - 22.0).abs() < 1e-9);
    }

    #[test]
    fn star_alternates_radii() {
        let pts = star(0.0, 0.0, 10.0, 4.0);
        assert_eq!(pts.len(), 10);
        assert!((pts[0].1 + 10.0).abs() < 1e-9);
        let r1 = pts[1].0.hypot(pts[1].1);
        assert!((r1 - 4.0).abs() < 1e-9);
    }
}
