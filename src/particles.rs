//! Short-lived visual effects: particles and floating texts.
//!
//! Every particle is the same struct; `ParticleKind` carries the per-kind
//! payload and selects the update and draw rules.

use rand::Rng;
use std::f64::consts::TAU;

use crate::color::{BLACK, GOLD, Rgb, WHITE};
use crate::surface::{Surface, with_alpha};

const DEFAULT_CAP: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    /// Outlined spinning square under full gravity.
    Chip { color: Rgb, size: f64, angle: f64, spin: f64 },
    /// Round spark that drifts without gravity and shrinks as it goes.
    Spark { color: Rgb, size: f64 },
    /// Light-gravity firework ember with a faint halo.
    Ember { color: Rgb, size: f64 },
    /// Translucent ink blot.
    Ink { size: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: u32,
    pub max_life: u32,
    pub kind: ParticleKind,
}

impl Particle {
    /// A chip with a random scatter velocity and spin.
    pub fn chip<R: Rng + ?Sized>(rng: &mut R, x: f64, y: f64, color: Rgb, size: f64) -> Self {
        Self {
            x,
            y,
            vx: rng.gen_range(-3.0..3.0),
            vy: rng.gen_range(-3.0..3.0) - 2.0,
            life: 30,
            max_life: 30,
            kind: ParticleKind::Chip {
                color,
                size,
                angle: rng.gen_range(0.0..360.0),
                spin: rng.gen_range(-10.0..10.0),
            },
        }
    }

    pub fn alpha(&self) -> f64 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f64 / self.max_life as f64
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    fn gravity(&self) -> f64 {
        match self.kind {
            ParticleKind::Chip { .. } => 0.3,
            ParticleKind::Spark { .. } => 0.0,
            ParticleKind::Ember { .. } => 0.1,
            ParticleKind::Ink { .. } => 0.2,
        }
    }

    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += self.gravity();
        match &mut self.kind {
            ParticleKind::Chip { angle, spin, .. } => *angle += *spin,
            ParticleKind::Spark { size, .. } => *size *= 0.95,
            ParticleKind::Ember { .. } | ParticleKind::Ink { .. } => {}
        }
        self.life = self.life.saturating_sub(1);
    }

    pub fn draw(&self, s: &mut dyn Surface) {
        let (x, y) = (self.x, self.y);
        with_alpha(s, self.alpha(), |s| match self.kind {
            ParticleKind::Chip {
                color, size, angle, ..
            } => {
                let rot = angle.to_radians();
                s.fill_polygon(&square(x, y, size + 2.0, rot), BLACK);
                s.fill_polygon(&square(x, y, size, rot), color);
            }
            ParticleKind::Spark { color, size } => s.fill_circle(x, y, size, color),
            ParticleKind::Ember { color, size } => {
                with_alpha(s, 0.3, |s| s.fill_rect(x - size, y - size, size * 2.0, size * 2.0, color));
                s.fill_rect(x - size / 2.0, y - size / 2.0, size, size, color);
            }
            ParticleKind::Ink { size } => with_alpha(s, 0.4, |s| {
                s.fill_rect(x - size / 2.0, y - size / 2.0, size, size, BLACK)
            }),
        });
    }
}

fn square(cx: f64, cy: f64, size: f64, rot: f64) -> [(f64, f64); 4] {
    let h = size / 2.0;
    let (sin, cos) = rot.sin_cos();
    [(-h, -h), (h, -h), (h, h), (-h, h)].map(|(x, y)| (cx + x * cos - y * sin, cy + x * sin + y * cos))
}

// ── Pool ────────────────────────────────────────────────────────────────────

/// Bounded particle list. When full, the oldest particle makes room.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    items: Vec<Particle>,
    cap: usize,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAP)
    }
}

impl ParticlePool {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap: cap.max(1),
        }
    }

    pub fn spawn(&mut self, p: Particle) {
        if self.items.len() >= self.cap {
            self.items.remove(0);
        }
        self.items.push(p);
    }

    pub fn update(&mut self) {
        for p in &mut self.items {
            p.update();
        }
        self.items.retain(Particle::is_alive);
    }

    pub fn draw(&self, s: &mut dyn Surface) {
        for p in &self.items {
            p.draw(s);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.items.iter()
    }
}

// ── Emitters ────────────────────────────────────────────────────────────────

/// Eight gold chips thrown out evenly around `(x, y)`.
pub fn score_burst<R: Rng + ?Sized>(pool: &mut ParticlePool, rng: &mut R, x: f64, y: f64) {
    for i in 0..8 {
        let a = TAU / 8.0 * i as f64;
        let mut p = Particle::chip(rng, x, y, GOLD, 6.0);
        p.vx = a.cos() * 3.0;
        p.vy = a.sin() * 3.0;
        pool.spawn(p);
    }
}

pub fn pipe_sparkles<R: Rng + ?Sized>(
    pool: &mut ParticlePool,
    rng: &mut R,
    pipe_x: f64,
    bird_y: f64,
    color: Rgb,
) {
    for _ in 0..6 {
        let y = bird_y + rng.gen_range(-20.0..20.0);
        let mut p = Particle::chip(rng, pipe_x + 26.0, y, color, 4.0);
        p.vx = rng.gen_range(1.0..3.0);
        p.vy = rng.gen_range(-1.0..1.0);
        pool.spawn(p);
    }
}

/// White burst plus colored feathers.
pub fn death_explosion<R: Rng + ?Sized>(
    pool: &mut ParticlePool,
    rng: &mut R,
    x: f64,
    y: f64,
    feathers: &[Rgb],
) {
    for _ in 0..20 {
        let p = Particle::chip(rng, x, y, WHITE, 8.0);
        pool.spawn(p);
    }
    if feathers.is_empty() {
        return;
    }
    for _ in 0..15 {
        let color = feathers[rng.gen_range(0..feathers.len())];
        let p = Particle::chip(rng, x, y, color, 6.0);
        pool.spawn(p);
    }
}

pub fn dust<R: Rng + ?Sized>(pool: &mut ParticlePool, rng: &mut R, x: f64, ground_y: f64, color: Rgb) {
    for _ in 0..5 {
        let size = rng.gen_range(4.0..8.0);
        let p = Particle::chip(rng, x, ground_y, color, size);
        pool.spawn(p);
    }
}

/// Red and white sparks streaming back from the avatar.
pub fn spark_trail<R: Rng + ?Sized>(pool: &mut ParticlePool, rng: &mut R, x: f64, y: f64, colors: [Rgb; 2]) {
    for _ in 0..8 {
        let color = if rng.gen_bool(0.5) { colors[0] } else { colors[1] };
        pool.spawn(Particle {
            x: x - 10.0,
            y: y + rng.gen_range(-5.0..5.0),
            vx: -2.0 - rng.gen_range(0.0..2.0),
            vy: rng.gen_range(-2.0..2.0),
            life: 40,
            max_life: 40,
            kind: ParticleKind::Spark {
                color,
                size: rng.gen_range(1.0..4.0),
            },
        });
    }
}

pub fn confetti<R: Rng + ?Sized>(
    pool: &mut ParticlePool,
    rng: &mut R,
    x: f64,
    y: f64,
    count: usize,
    palette: &[Rgb],
) {
    if palette.is_empty() {
        return;
    }
    for _ in 0..count {
        let color = palette[rng.gen_range(0..palette.len())];
        let mut p = Particle::chip(rng, x, y, color, 4.0);
        p.vx = rng.gen_range(-5.0..5.0);
        p.vy = rng.gen_range(-5.0..5.0);
        p.life = 40;
        p.max_life = 40;
        pool.spawn(p);
    }
}

/// Thirty embers in a ring.
pub fn firework<R: Rng + ?Sized>(pool: &mut ParticlePool, rng: &mut R, x: f64, y: f64, palette: &[Rgb]) {
    const SPARKS: usize = 30;
    for j in 0..SPARKS {
        let a = TAU / SPARKS as f64 * j as f64;
        let speed = rng.gen_range(3.0..8.0);
        let color = if palette.is_empty() {
            GOLD
        } else {
            palette[rng.gen_range(0..palette.len())]
        };
        pool.spawn(Particle {
            x,
            y,
            vx: a.cos() * speed,
            vy: a.sin() * speed,
            life: 60,
            max_life: 60,
            kind: ParticleKind::Ember {
                color,
                size: rng.gen_range(3.0..6.0),
            },
        });
    }
}

/// Twelve ink blots thrown out by the medal stamp.
pub fn ink_splat<R: Rng + ?Sized>(pool: &mut ParticlePool, rng: &mut R, x: f64, y: f64) {
    const BLOTS: usize = 12;
    for i in 0..BLOTS {
        let a = TAU / BLOTS as f64 * i as f64;
        let speed = rng.gen_range(2.0..5.0);
        pool.spawn(Particle {
            x,
            y,
            vx: a.cos() * speed,
            vy: a.sin() * speed - 1.0,
            life: rng.gen_range(20..30),
            max_life: 30,
            kind: ParticleKind::Ink {
                size: rng.gen_range(3.0..7.0),
            },
        });
    }
}

// ── Floating texts ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Pops upward and slows down; fades over the last 20 ticks.
    Pop,
    /// Rises one unit per tick while scaling in; fades linearly.
    Rise,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub vy: f64,
    pub life: u32,
    pub max_life: u32,
    pub scale: f64,
    pub size: f64,
    pub color: Rgb,
    pub motion: Motion,
}

impl FloatingText {
    pub fn pop(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            vy: -2.0,
            life: 60,
            max_life: 60,
            scale: 1.0,
            size: 20.0,
            color: WHITE,
            motion: Motion::Pop,
        }
    }

    pub fn rise(text: impl Into<String>, x: f64, y: f64, color: Rgb) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            vy: -1.0,
            life: 60,
            max_life: 60,
            scale: 0.0,
            size: 24.0,
            color,
            motion: Motion::Rise,
        }
    }

    pub fn update(&mut self) {
        self.y += self.vy;
        match self.motion {
            Motion::Pop => self.vy *= 0.9,
            Motion::Rise => {
                if self.scale < 1.0 {
                    self.scale = (self.scale + 0.1).min(1.0);
                }
            }
        }
        self.life = self.life.saturating_sub(1);
    }

    pub fn alpha(&self) -> f64 {
        match self.motion {
            Motion::Pop => (self.life as f64 / 20.0).min(1.0),
            Motion::Rise => self.life as f64 / self.max_life.max(1) as f64,
        }
    }

    pub fn draw(&self, s: &mut dyn Surface) {
        if self.scale <= 0.0 {
            return;
        }
        with_alpha(s, self.alpha(), |s| {
            s.outlined_text(&self.text, self.x, self.y, self.size * self.scale, self.color, BLACK)
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct FloatingTexts {
    items: Vec<FloatingText>,
}

impl FloatingTexts {
    pub fn push(&mut self, t: FloatingText) {
        self.items.push(t);
    }

    pub fn update(&mut self) {
        for t in &mut self.items {
            t.update();
        }
        self.items.retain(|t| t.life > 0);
    }

    pub fn draw(&self, s: &mut dyn Surface) {
        for t in &self.items {
            t.draw(s);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloatingText> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn chip_falls_and_expires() {
        let mut p = Particle::chip(&mut rng(), 0.0, 0.0, WHITE, 4.0);
        p.vx = 0.0;
        p.vy = 0.0;
        p.update();
        assert_eq!(p.y, 0.0);
        assert!((p.vy - 0.3).abs() < 1e-9);
        for _ in 0..29 {
            p.update();
        }
        assert!(!p.is_alive());
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn spark_shrinks_without_gravity() {
        let mut pool = ParticlePool::default();
        spark_trail(&mut pool, &mut rng(), 100.0, 100.0, [WHITE, GOLD]);
        assert_eq!(pool.len(), 8);
        let before: Vec<_> = pool.iter().cloned().collect();
        pool.update();
        for (a, b) in before.iter().zip(pool.iter()) {
            assert_eq!(a.vy, b.vy);
            match (a.kind, b.kind) {
                (ParticleKind::Spark { size: s0, .. }, ParticleKind::Spark { size: s1, .. }) => {
                    assert!((s1 - s0 * 0.95).abs() < 1e-9)
                }
                _ => panic!("expected sparks"),
            }
        }
    }

    #[test]
    fn pool_drops_oldest_when_full() {
        let mut pool = ParticlePool::with_capacity(3);
        let mut r = rng();
        for i in 0..5 {
            pool.spawn(Particle::chip(&mut r, i as f64, 0.0, WHITE, 1.0));
        }
        let xs: Vec<f64> = pool.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn emitters_spawn_expected_counts() {
        let mut pool = ParticlePool::default();
        let mut r = rng();
        score_burst(&mut pool, &mut r, 200.0, 80.0);
        assert_eq!(pool.len(), 8);
        death_explosion(&mut pool, &mut r, 80.0, 300.0, &[GOLD]);
        assert_eq!(pool.len(), 43);
        firework(&mut pool, &mut r, 100.0, 100.0, &[]);
        assert_eq!(pool.len(), 73);
        ink_splat(&mut pool, &mut r, 0.0, 0.0);
        assert_eq!(pool.len(), 85);
        pool.clear();
        assert!(pool.is_empty());
    }

    #[test]
    fn score_burst_is_radial() {
        let mut pool = ParticlePool::default();
        score_burst(&mut pool, &mut rng(), 0.0, 0.0);
        for p in pool.iter() {
            assert!(((p.vx * p.vx + p.vy * p.vy).sqrt() - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn pop_text_decelerates_and_fades_late() {
        let mut t = FloatingText::pop("+1", 80.0, 230.0);
        t.update();
        assert!((t.y - 228.0).abs() < 1e-9);
        assert!((t.vy + 1.8).abs() < 1e-9);
        assert_eq!(t.alpha(), 1.0);
        for _ in 0..49 {
            t.update();
        }
        assert_eq!(t.life, 10);
        assert!((t.alpha() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rise_text_scales_in() {
        let mut t = FloatingText::rise("NICE!", 200.0, 150.0, GOLD);
        for _ in 0..15 {
            t.update();
        }
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.y, 135.0);
    }

    #[test]
    fn texts_expire() {
        let mut texts = FloatingTexts::default();
        texts.push(FloatingText::pop("+1", 0.0, 0.0));
        for _ in 0..60 {
            texts.update();
        }
        assert!(texts.is_empty());
    }
}
