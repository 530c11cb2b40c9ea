//! Winter night skin: aurora, stars, moon, pine forest, a string of lights,
//! candy-cane pipes, snow ground and three layers of snowfall.

use rand::{Rng, RngCore};

use super::{Mode, Pose, Scene, Theme, avatar, line};
use crate::audio::Cue;
use crate::bird::Bird;
use crate::color::{BLACK, GOLD, PINE, Rgb, SANTA_RED, WHITE, gradient_at};
use crate::config::{GROUND_HEIGHT, GROUND_Y, HEIGHT, WIDTH};
use crate::font::{self, GLYPH_H};
use crate::obstacles::Pipe;
use crate::particles::{self, ParticlePool};
use crate::surface::{Align, Surface, with_alpha};

const FLAKES: usize = 150;
const STARS: usize = 100;
const LIGHTS: usize = 15;
const TREES: usize = 15;
const STRIPE: f64 = 8.0;
const CAP_HEIGHT: f64 = 24.0;
const GLINT_CHANCE: f64 = 0.05;
const GLINT_LIFE: u32 = 30;

const FEATHERS: [Rgb; 4] = [SANTA_RED, WHITE, GOLD, PINE];
const SKY: [(f64, Rgb); 4] = [
    (0.0, Rgb::hex(0x0A1828)),
    (0.3, Rgb::hex(0x1C3557)),
    (0.7, Rgb::hex(0x2E5077)),
    (1.0, Rgb::hex(0x4A7BA7)),
];
const CANDY: [(f64, Rgb); 5] = [
    (0.0, SANTA_RED),
    (0.25, WHITE),
    (0.5, SANTA_RED),
    (0.75, WHITE),
    (1.0, SANTA_RED),
];
const BULBS: [Rgb; 6] = [
    SANTA_RED,
    GOLD,
    PINE,
    Rgb::hex(0x4169E1),
    Rgb::hex(0xFF69B4),
    Rgb::hex(0xFFA500),
];
const ORNAMENTS: [Rgb; 3] = [SANTA_RED, GOLD, Rgb::hex(0x3498DB)];
const GLINTS: [Rgb; 3] = [GOLD, WHITE, Rgb::hex(0xFFED4E)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Far,
    Mid,
    Near,
}

#[derive(Debug, Clone)]
struct Flake {
    layer: Layer,
    x: f64,
    y: f64,
    size: f64,
    speed: f64,
    opacity: f64,
    drift: f64,
    phase: f64,
}

impl Flake {
    fn spawn(rng: &mut dyn RngCore, layer: Layer) -> Self {
        let (size, speed, opacity, drift) = match layer {
            Layer::Far => (2.0, rng.gen_range(0.5..1.0), 0.3, 0.2),
            Layer::Mid => (3.0, rng.gen_range(1.0..2.0), 0.6, 0.5),
            Layer::Near => (
                4.0 + rng.gen_range(0..2) as f64,
                rng.gen_range(1.5..3.0),
                0.9,
                1.0,
            ),
        };
        Self {
            layer,
            x: rng.gen_range(0.0..WIDTH),
            y: -10.0,
            size,
            speed,
            opacity,
            drift,
            phase: rng.gen_range(0.0..std::f64::consts::TAU),
        }
    }

    fn draw(&self, s: &mut dyn Surface) {
        let (x, y, size) = (self.x, self.y, self.size);
        with_alpha(s, self.opacity, |s| match self.layer {
            Layer::Far => s.fill_rect(x - 1.0, y - 1.0, 2.0, 2.0, WHITE),
            Layer::Mid => {
                s.fill_rect(x - 1.0, y - size / 2.0, 2.0, size, WHITE);
                s.fill_rect(x - size / 2.0, y - 1.0, size, 2.0, WHITE);
            }
            Layer::Near => {
                s.fill_rect(x - 1.0, y - 1.0, 2.0, 2.0, WHITE);
                for i in 0..6 {
                    let a = std::f64::consts::TAU / 6.0 * i as f64;
                    let (sin, cos) = a.sin_cos();
                    s.fill_rect(x + cos * size - 1.0, y + sin * size - 1.0, 2.0, 2.0, WHITE);
                    s.fill_rect(x + cos * size * 0.6 - 1.0, y + sin * size * 0.6 - 1.0, 2.0, 2.0, WHITE);
                }
            }
        });
    }
}

#[derive(Debug, Clone)]
struct Star {
    x: f64,
    y: f64,
    size: f64,
    brightness: f64,
    twinkle: f64,
    near: bool,
}

#[derive(Debug, Clone)]
struct Bulb {
    x: f64,
    y: f64,
    color: Rgb,
    phase: f64,
    base: f64,
}

#[derive(Debug, Clone)]
struct Glint {
    x: f64,
    y: f64,
    life: u32,
    size: f64,
    color: Rgb,
}

#[derive(Debug, Clone)]
struct Wave {
    y: f64,
    offset: f64,
    speed: f64,
    amplitude: f64,
    frequency: f64,
    color: Rgb,
    alpha: f64,
}

pub struct Festive {
    flakes: Vec<Flake>,
    stars: Vec<Star>,
    bulbs: Vec<Bulb>,
    waves: Vec<Wave>,
    glints: Vec<Glint>,
    time: u64,
}

impl Festive {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let far = FLAKES * 33 / 100;
        let mid = FLAKES * 40 / 100;
        let flakes = (0..FLAKES)
            .map(|i| {
                let layer = if i < far {
                    Layer::Far
                } else if i < far + mid {
                    Layer::Mid
                } else {
                    Layer::Near
                };
                let mut f = Flake::spawn(rng, layer);
                f.y = rng.gen_range(0.0..HEIGHT);
                f
            })
            .collect();

        let stars = (0..STARS)
            .map(|_| Star {
                x: rng.gen_range(0.0..WIDTH),
                y: rng.gen_range(0.0..300.0),
                size: if rng.gen_bool(0.7) { 2.0 } else { 3.0 },
                brightness: rng.gen_range(0.0..1.0),
                twinkle: rng.gen_range(0.02..0.05),
                near: rng.gen_bool(0.5),
            })
            .collect();

        let spacing = WIDTH / (LIGHTS - 1) as f64;
        let bulbs = (0..LIGHTS)
            .map(|i| {
                let x = i as f64 * spacing;
                Bulb {
                    x,
                    y: 40.0 + (x / WIDTH * std::f64::consts::PI).sin() * 15.0,
                    color: BULBS[rng.gen_range(0..BULBS.len())],
                    phase: rng.gen_range(0.0..std::f64::consts::TAU),
                    base: rng.gen_range(0.8..1.0),
                }
            })
            .collect();

        let aurora = [
            (Rgb(0, 255, 150), 0.15),
            (Rgb(100, 200, 255), 0.12),
            (Rgb(200, 100, 255), 0.10),
        ];
        let waves = aurora
            .iter()
            .enumerate()
            .map(|(i, &(color, alpha))| {
                let fi = i as f64;
                Wave {
                    y: 80.0 + fi * 30.0,
                    offset: fi * 100.0,
                    speed: 0.01 + fi * 0.005,
                    amplitude: 40.0 + fi * 20.0,
                    frequency: 0.01 + fi * 0.002,
                    color,
                    alpha,
                }
            })
            .collect();

        Self {
            flakes,
            stars,
            bulbs,
            waves,
            glints: Vec::new(),
            time: 0,
        }
    }

    fn t(&self) -> f64 {
        self.time as f64
    }

    fn draw_aurora(&self, s: &mut dyn Surface) {
        for w in &self.waves {
            let crest: Vec<(f64, f64)> = (0..=((WIDTH + 50.0) / 10.0) as usize)
                .map(|i| (i as f64 * 10.0, w.y + (w.offset + i as f64 * w.frequency).sin() * w.amplitude))
                .collect();
            for (above, below, alpha) in [(50.0, 100.0, w.alpha * 0.5), (15.0, 40.0, w.alpha)] {
                let mut band: Vec<(f64, f64)> = crest.iter().map(|&(x, y)| (x, y - above)).collect();
                band.extend(crest.iter().rev().map(|&(x, y)| (x, y + below)));
                with_alpha(s, alpha, |s| s.fill_polygon(&band, w.color));
            }
        }
    }

    fn draw_stars(&self, s: &mut dyn Surface) {
        for st in &self.stars {
            let alpha = 0.5 + st.brightness.clamp(0.0, 1.0) * 0.5;
            let (x, y) = (st.x.floor(), st.y.floor());
            with_alpha(s, alpha, |s| {
                s.fill_rect(x, y, st.size, st.size, WHITE);
                if st.size >= 3.0 {
                    with_alpha(s, 0.3, |s| s.fill_rect(x - 1.0, y - 1.0, st.size + 2.0, st.size + 2.0, WHITE));
                }
            });
        }
    }

    fn draw_moon(s: &mut dyn Surface) {
        let (mx, my, r) = (WIDTH - 80.0, 80.0, 35.0);
        let glow = Rgb(255, 255, 200);
        with_alpha(s, 0.12, |s| s.fill_circle(mx, my, r + 20.0, glow));
        with_alpha(s, 0.18, |s| s.fill_circle(mx, my, r + 10.0, glow));
        s.fill_circle(mx, my, r, Rgb::hex(0xFFF8DC));
        let crater = Rgb::hex(0xF0E68C);
        s.fill_circle(mx - 10.0, my - 5.0, 8.0, crater);
        s.fill_circle(mx + 8.0, my + 10.0, 5.0, crater);
        s.fill_circle(mx + 5.0, my - 15.0, 6.0, crater);
    }

    fn draw_trees(&self, s: &mut dyn Surface) {
        let spacing = WIDTH / TREES as f64;
        for i in 0..TREES {
            let x = i as f64 * spacing + (i * 1234 % 20) as f64;
            let height = 60.0 + (i * 987 % 60) as f64;
            let sway = (self.t() / 60.0 + i as f64).sin() * 2.0;
            self.draw_tree(s, x, height, sway, i);
        }
    }

    fn draw_tree(&self, s: &mut dyn Surface, x: f64, height: f64, sway: f64, seed: usize) {
        const TIERS: usize = 3;
        let width = height * 0.4;
        let tier_h = height / TIERS as f64;
        let gy = GROUND_Y;
        for t in 0..TIERS {
            let ft = t as f64;
            let tw = width * (1.0 - ft * 0.2);
            let base = gy - ft * tier_h * 0.8;
            let top = gy - (ft + 1.0) * tier_h - if t == TIERS - 1 { 0.0 } else { 10.0 };
            let sw = sway * ((ft + 1.0) / TIERS as f64);
            let color = Rgb::hex(0x0D2818).mix(Rgb::hex(0x1E5631), ft / (TIERS - 1) as f64);
            s.fill_polygon(&[(x - tw / 2.0 + sw, base), (x + tw / 2.0 + sw, base), (x + sw, top)], color);
            s.fill_polygon(
                &[
                    (x - tw / 2.0 + sw, base),
                    (x - tw / 2.0 + 10.0 + sw, base - 5.0),
                    (x - tw / 4.0 + sw, base),
                ],
                WHITE,
            );
            s.fill_polygon(
                &[
                    (x + tw / 2.0 + sw, base),
                    (x + tw / 2.0 - 10.0 + sw, base - 5.0),
                    (x + tw / 4.0 + sw, base),
                ],
                WHITE,
            );
        }
        if seed % 2 == 0 {
            for j in 0..5 {
                let fj = j as f64;
                let lit = (self.t() / 12.0 + seed as f64 + fj).sin() > 0.0;
                if lit {
                    let oy = gy - height * 0.2 - fj * height * 0.15;
                    let ox = x + (fj * 5.0 + seed as f64).sin() * width * 0.3 + sway;
                    s.fill_circle(ox, oy, 2.0, ORNAMENTS[j % ORNAMENTS.len()]);
                }
            }
        }
    }

    fn draw_lights(&self, s: &mut dyn Surface) {
        let wire = Rgb::hex(0x2F4F4F);
        for pair in self.bulbs.windows(2) {
            line(s, (pair[0].x, pair[0].y), (pair[1].x, pair[1].y), 2.0, wire);
        }
        for b in &self.bulbs {
            let intensity = (b.base + b.phase.sin() * 0.2).clamp(0.0, 1.0);
            with_alpha(s, intensity * 0.35, |s| s.fill_circle(b.x, b.y, 12.0, b.color));
            s.fill_rect(b.x - 4.0, b.y - 5.0, 8.0, 10.0, BLACK);
            with_alpha(s, intensity, |s| s.fill_rect(b.x - 3.0, b.y - 4.0, 6.0, 8.0, b.color));
            with_alpha(s, 0.6, |s| s.fill_rect(b.x - 1.0, b.y - 2.0, 2.0, 2.0, WHITE));
        }
    }

    /// Barber-pole stripes: red bands slanting down-left over white.
    fn candy(&self, s: &mut dyn Surface, x: f64, y: f64, w: f64, h: f64) {
        const ROW: f64 = 3.0;
        if h <= 0.0 {
            return;
        }
        s.fill_rect(x, y, w, h, WHITE);
        let scroll = (self.t() * 0.8) % (STRIPE * 2.0);
        let mut row = 0.0;
        while row < h {
            let rh = ROW.min(h - row);
            let phase = (scroll + row + rh / 2.0).rem_euclid(STRIPE * 2.0);
            let mut sx = x - phase;
            while sx < x + w {
                let (a, b) = (sx.max(x), (sx + STRIPE).min(x + w));
                if b > a {
                    s.fill_rect(a, y + row, b - a, rh, SANTA_RED);
                }
                sx += STRIPE * 2.0;
            }
            row += ROW;
        }
        s.stroke_rect(x, y, w, h, 3.0, BLACK);
    }

    fn holly_cap(s: &mut dyn Surface, x: f64, cap_y: f64, w: f64) {
        s.fill_rect(x - 4.0, cap_y, w + 8.0, CAP_HEIGHT, PINE);
        s.fill_rect(x - 4.0, cap_y + 8.0, w + 8.0, 4.0, GOLD);
        s.stroke_rect(x - 4.0, cap_y, w + 8.0, CAP_HEIGHT, 3.0, BLACK);
        let leaf = Rgb::hex(0x2ECC71);
        s.fill_circle(x + 10.0, cap_y + 12.0, 5.0, leaf);
        s.fill_circle(x + w - 20.0, cap_y + 12.0, 5.0, leaf);
        for (bx, by) in [(15.0, 10.0), (20.0, 8.0), (18.0, 14.0)] {
            s.fill_circle(x + bx, cap_y + by, 3.0, SANTA_RED);
        }
    }

    fn icicles(s: &mut dyn Surface, x: f64, y: f64, w: f64, seed: f64) {
        let ice = Rgb(200, 240, 255);
        let mut i = 4.0;
        while i < w - 4.0 {
            let len = 10.0 + (seed + i * 0.5).sin().abs() * 20.0;
            with_alpha(s, 0.8, |s| {
                s.fill_polygon(&[(x + i, y), (x + i + 3.0, y + len), (x + i + 6.0, y)], ice)
            });
            i += 6.0;
        }
    }

    fn snow_cap(s: &mut dyn Surface, x: f64, y: f64, w: f64) {
        s.fill_rect(x - 6.0, y - 2.0, w + 12.0, 4.0, WHITE);
        let mut i = 0.0;
        while i <= w + 8.0 {
            let bump = 8.0 + (i * 0.3).sin() * 5.0;
            s.fill_ellipse(x + i, y, 4.5, bump / 2.0, 0.0, WHITE);
            i += 8.0;
        }
    }

    fn buried_cane(s: &mut dyn Surface, x: f64, y: f64) {
        s.fill_rect(x, y, 4.0, 12.0, SANTA_RED);
        s.fill_rect(x + 2.0, y - 2.0, 4.0, 2.0, SANTA_RED);
        s.fill_rect(x + 4.0, y, 2.0, 4.0, SANTA_RED);
        for dy in [2.0, 6.0, 10.0] {
            s.fill_rect(x, y + dy, 4.0, 2.0, WHITE);
        }
    }

    fn drift_height(&self, x: f64) -> f64 {
        (x / 30.0 + self.t() / 120.0).sin() * 5.0
    }
}

impl Theme for Festive {
    fn mode(&self) -> Mode {
        Mode::Festive
    }

    fn update(&mut self, scene: &Scene<'_>, rng: &mut dyn RngCore) {
        self.time += 1;
        let t = self.t();

        for f in &mut self.flakes {
            f.y += f.speed;
            f.x += (t / 60.0 + f.phase).sin() * f.drift;
            if f.y > HEIGHT + 10.0 {
                *f = Flake::spawn(rng, f.layer);
            }
            if f.x < -10.0 {
                f.x = WIDTH + 10.0;
            } else if f.x > WIDTH + 10.0 {
                f.x = -10.0;
            }
        }

        let parallax = if scene.playing { scene.speed } else { 0.0 };
        for st in &mut self.stars {
            st.brightness += st.twinkle;
            if st.brightness > 1.0 || st.brightness < 0.0 {
                st.twinkle = -st.twinkle;
            }
            if parallax > 0.0 {
                st.x -= parallax * if st.near { 0.4 } else { 0.2 };
                if st.x < 0.0 {
                    st.x = WIDTH;
                    st.y = rng.gen_range(0.0..300.0);
                }
            }
        }

        for w in &mut self.waves {
            w.offset += w.speed;
        }
        for b in &mut self.bulbs {
            b.phase += 0.05;
        }

        for g in &mut self.glints {
            g.life = g.life.saturating_sub(1);
        }
        self.glints.retain(|g| g.life > 0);
        for pipe in scene.pipes {
            if rng.gen_bool(GLINT_CHANCE) {
                self.glints.push(Glint {
                    x: pipe.x + rng.gen_range(0.0..pipe.width),
                    y: rng.gen_range(0.0..pipe.top_height.max(1.0)),
                    life: GLINT_LIFE,
                    size: rng.gen_range(4.0..8.0),
                    color: GLINTS[rng.gen_range(0..GLINTS.len())],
                });
            }
        }
    }

    fn draw_background(&self, s: &mut dyn Surface, _scene: &Scene<'_>) {
        s.vertical_gradient(0.0, 0.0, WIDTH, HEIGHT, &SKY);
        self.draw_aurora(s);
        self.draw_stars(s);
        Self::draw_moon(s);
        self.draw_trees(s);
    }

    fn draw_decor(&self, s: &mut dyn Surface, _scene: &Scene<'_>) {
        self.draw_lights(s);
    }

    fn draw_obstacle(&self, s: &mut dyn Surface, pipe: &Pipe, _scene: &Scene<'_>) {
        let (x, w) = (pipe.x, pipe.width);
        self.candy(s, x, 0.0, w, pipe.top_height);
        Self::holly_cap(s, x, pipe.top_height - CAP_HEIGHT, w);
        Self::icicles(s, x, pipe.top_height, w, pipe.top_height.floor());

        self.candy(s, x, pipe.bottom_y, w, HEIGHT - pipe.bottom_y);
        Self::holly_cap(s, x, pipe.bottom_y, w);
        Self::snow_cap(s, x, pipe.bottom_y, w);
    }

    fn draw_ground(&self, s: &mut dyn Surface, _scene: &Scene<'_>) {
        let gy = GROUND_Y;
        s.vertical_gradient(0.0, gy, WIDTH, GROUND_HEIGHT, &[(0.0, WHITE), (1.0, Rgb::hex(0xD4E6F1))]);

        let mut drift = vec![(0.0, gy)];
        let mut x = 0.0;
        while x < WIDTH {
            drift.push((x, gy + self.drift_height(x)));
            x += 10.0;
        }
        drift.push((WIDTH, gy));
        s.fill_polygon(&drift, WHITE);

        let shadow = Rgb::hex(0xA9CCE3);
        let mut x = 0.0;
        while x < WIDTH {
            s.fill_rect(x, gy + self.drift_height(x), 10.0, 3.0, shadow);
            x += 10.0;
        }

        for i in 0..5 {
            Self::buried_cane(s, WIDTH / 5.0 * i as f64 + 40.0, gy + 10.0);
        }

        if self.time % 5 == 0 {
            let sx = (self.time * 73 % WIDTH as u64) as f64;
            let sy = gy + (self.time * 31 % 30) as f64;
            with_alpha(s, 0.8, |s| s.fill_rect(sx, sy, 2.0, 2.0, WHITE));
        }
    }

    fn draw_ambient(&self, s: &mut dyn Surface, _scene: &Scene<'_>) {
        let spin = self.t() / 12.0;
        for g in &self.glints {
            let pose = Pose::new(g.x, g.y, spin.to_degrees());
            let (r, k) = (g.size, g.size / 3.0);
            with_alpha(s, g.life as f64 / GLINT_LIFE as f64, |s| {
                pose.poly(s, &[(0.0, -r), (k, 0.0), (0.0, r), (-k, 0.0)], g.color);
                pose.poly(s, &[(-r, 0.0), (0.0, -k), (r, 0.0), (0.0, k)], g.color);
            });
        }
        for layer in [Layer::Far, Layer::Mid, Layer::Near] {
            for f in self.flakes.iter().filter(|f| f.layer == layer) {
                f.draw(s);
            }
        }
    }

    fn draw_avatar(&self, s: &mut dyn Surface, bird: &Bird) {
        avatar::draw(s, bird, true);
    }

    fn on_flap(&mut self, bird: &Bird, particles: &mut ParticlePool, rng: &mut dyn RngCore) -> Cue {
        particles::spark_trail(particles, rng, bird.x, bird.y, [SANTA_RED, WHITE]);
        Cue::Jingle
    }

    fn celebration_cue(&self) -> Cue {
        Cue::SleighBells
    }

    fn music(&self) -> Option<Cue> {
        Some(Cue::Music)
    }

    fn feathers(&self) -> &'static [Rgb] {
        &FEATHERS
    }

    fn sparkle_color(&self) -> Rgb {
        GOLD
    }

    fn accent(&self) -> Rgb {
        SANTA_RED
    }

    /// Candy-striped title with a Santa hat hung on the first letter.
    fn draw_title(&self, s: &mut dyn Surface, frame: u64) {
        const TITLE: &str = "KEYBIRD";
        const SIZE: f64 = 40.0;
        let f = frame as f64;
        let y = 100.0 + (f / 30.0).sin() * 8.0;
        let unit = SIZE / GLYPH_H as f64;
        let width = font::text_width(TITLE) as f64 * unit;
        let left = WIDTH / 2.0 - width / 2.0;

        let d = SIZE / 10.0;
        for (ox, oy) in [(-d, 0.0), (d, 0.0), (0.0, -d), (0.0, d), (d, d)] {
            s.text(TITLE, left + ox, y + oy, SIZE, BLACK, Align::Left);
        }
        for (i, ch) in TITLE.chars().enumerate() {
            let gx = left + (i * font::ADVANCE) as f64 * unit;
            let t = (gx + unit * 1.5 - left) / width;
            s.text(&ch.to_string(), gx, y, SIZE, gradient_at(&CANDY, t), Align::Left);
        }

        let hat = Pose::new(WIDTH / 2.0 - 110.0, y - 35.0, -11.5);
        hat.poly(s, &[(0.0, 0.0), (10.0, -20.0), (20.0, -24.0), (30.0, 0.0)], SANTA_RED);
        hat.rect(s, -5.0, 0.0, 40.0, 10.0, WHITE);
        let bob = (f / 12.0).sin() * 3.0;
        hat.circle(s, 30.0, -25.0 + bob, 6.0, WHITE);
    }

    /// Dashed white stitching inset from the button edge.
    fn draw_button_trim(&self, s: &mut dyn Surface, x: f64, y: f64, w: f64, h: f64) {
        let (x0, y0, x1, y1) = (x + 6.0, y + 6.0, x + w - 6.0, y + h - 6.0);
        let mut cx = x0;
        while cx < x1 {
            let len = 8.0f64.min(x1 - cx);
            s.fill_rect(cx, y0, len, 3.0, WHITE);
            s.fill_rect(cx, y1 - 3.0, len, 3.0, WHITE);
            cx += 14.0;
        }
        let mut cy = y0;
        while cy < y1 {
            let len = 8.0f64.min(y1 - cy);
            s.fill_rect(x0, cy, 3.0, len, WHITE);
            s.fill_rect(x1 - 3.0, cy, 3.0, len, WHITE);
            cy += 14.0;
        }
    }

    fn reset(&mut self) {
        self.glints.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelCanvas;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scene(pipes: &[Pipe], playing: bool) -> Scene<'_> {
        Scene {
            frame: 0,
            score: 0,
            playing,
            speed: 2.0,
            ground_x: 0.0,
            city_x: 0.0,
            pipes,
        }
    }

    fn theme() -> (Festive, StdRng) {
        let mut rng = StdRng::seed_from_u64(12);
        (Festive::new(&mut rng), rng)
    }

    #[test]
    fn populations_match_the_layout() {
        let (f, _) = theme();
        assert_eq!(f.flakes.len(), FLAKES);
        assert_eq!(f.flakes.iter().filter(|x| x.layer == Layer::Far).count(), 49);
        assert_eq!(f.flakes.iter().filter(|x| x.layer == Layer::Mid).count(), 60);
        assert_eq!(f.flakes.iter().filter(|x| x.layer == Layer::Near).count(), 41);
        assert_eq!(f.stars.len(), STARS);
        assert_eq!(f.bulbs.len(), LIGHTS);
        assert_eq!(f.waves.len(), 3);
    }

    #[test]
    fn snow_recycles_and_stays_in_bounds() {
        let (mut f, mut rng) = theme();
        for _ in 0..2000 {
            f.update(&scene(&[], true), &mut rng);
        }
        assert_eq!(f.flakes.len(), FLAKES);
        for flake in &f.flakes {
            assert!(flake.x >= -10.0 && flake.x <= WIDTH + 10.0);
            assert!(flake.y >= -10.0 && flake.y <= HEIGHT + 10.0);
        }
    }

    #[test]
    fn stars_hold_still_outside_play() {
        let (mut f, mut rng) = theme();
        let xs: Vec<f64> = f.stars.iter().map(|s| s.x).collect();
        for _ in 0..50 {
            f.update(&scene(&[], false), &mut rng);
        }
        assert!(f.stars.iter().zip(&xs).all(|(s, x)| s.x == *x));
        f.update(&scene(&[], true), &mut rng);
        assert!(f.stars.iter().zip(&xs).any(|(s, x)| s.x != *x));
    }

    #[test]
    fn glints_come_from_pipes_and_fade() {
        let (mut f, mut rng) = theme();
        for _ in 0..100 {
            f.update(&scene(&[], true), &mut rng);
        }
        assert!(f.glints.is_empty());

        let pipes = [Pipe::new(100.0, 200.0), Pipe::new(300.0, 150.0)];
        for _ in 0..200 {
            f.update(&scene(&pipes, true), &mut rng);
        }
        assert!(!f.glints.is_empty());
        assert!(f.glints.iter().all(|g| g.y < 200.0 && g.life <= GLINT_LIFE));
        for _ in 0..GLINT_LIFE {
            f.update(&scene(&[], true), &mut rng);
        }
        assert!(f.glints.is_empty());
    }

    #[test]
    fn flap_jingles_and_leaves_sparks() {
        let (mut f, mut rng) = theme();
        let mut pool = ParticlePool::default();
        let cue = f.on_flap(&Bird::new(Default::default()), &mut pool, &mut rng);
        assert_eq!(cue, Cue::Jingle);
        assert!(!pool.is_empty());
        assert_eq!(f.celebration_cue(), Cue::SleighBells);
        assert_eq!(f.music(), Some(Cue::Music));
    }

    #[test]
    fn pipes_are_candy_striped() {
        let (f, _) = theme();
        let mut canvas = PixelCanvas::new(400, 600);
        let pipe = Pipe::new(100.0, 300.0);
        f.draw_obstacle(&mut canvas, &pipe, &scene(&[], true));
        let row: Vec<Rgb> = (105..147).filter_map(|x| canvas.sample(x as f64, 150.0)).collect();
        assert!(row.contains(&SANTA_RED));
        assert!(row.contains(&WHITE));
    }
}
