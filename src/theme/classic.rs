//! Daytime skin: cycling sky, clouds, a parallax skyline, green pipes and a
//! grassy ground strip.

use rand::{Rng, RngCore};

use super::{Mode, Scene, Theme, avatar};
use crate::audio::Cue;
use crate::bird::Bird;
use crate::color::{BLACK, CRIMSON, GOLD, ORANGE, Rgb, TAN, WHITE, gradient_at};
use crate::config::{GROUND_HEIGHT, GROUND_Y, HEIGHT, WIDTH};
use crate::obstacles::Pipe;
use crate::particles::ParticlePool;
use crate::surface::{Surface, with_alpha};

const CLOUD_EVERY: u64 = 100;
/// Clouds only drift while playing, so idle screens stop spawning here.
const MAX_CLOUDS: usize = 12;
const CAP_HEIGHT: f64 = 24.0;
const NIGHT_WINDOW: Rgb = Rgb::hex(0xFFFF00);
const SLATE: Rgb = Rgb::hex(0x2F4F4F);
const FEATHERS: [Rgb; 3] = [GOLD, ORANGE, CRIMSON];
const PIPE_SHADE: [(f64, Rgb); 5] = [
    (0.0, Rgb::hex(0x558C22)),
    (0.1, Rgb::hex(0x73BF2E)),
    (0.4, Rgb::hex(0x9CE659)),
    (0.8, Rgb::hex(0x73BF2E)),
    (1.0, Rgb::hex(0x558C22)),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sky {
    Day,
    Sunset,
    Night,
}

impl Sky {
    fn at(score: u32) -> Sky {
        let cycle = (score % 50) as f64 / 50.0;
        if cycle < 0.3 {
            Sky::Day
        } else if cycle < 0.6 {
            Sky::Sunset
        } else {
            Sky::Night
        }
    }

    fn colors(self) -> (Rgb, Rgb) {
        match self {
            Sky::Day => (Rgb::hex(0x2A9AA5), Rgb::hex(0x4EC0CA)),
            Sky::Sunset => (Rgb::hex(0xFF4500), Rgb::hex(0xFF7F50)),
            Sky::Night => (Rgb::hex(0x000033), Rgb::hex(0x191970)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Cloud {
    x: f64,
    y: f64,
    speed: f64,
}

#[derive(Debug, Default)]
pub struct Classic {
    clouds: Vec<Cloud>,
}

impl Classic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cloud_count(&self) -> usize {
        self.clouds.len()
    }

    fn draw_cloud(s: &mut dyn Surface, c: &Cloud) {
        let (x, y) = (c.x, c.y);
        with_alpha(s, 0.1, |s| {
            s.fill_circle(x + 5.0, y + 5.0, 20.0, BLACK);
            s.fill_circle(x + 30.0, y - 5.0, 25.0, BLACK);
            s.fill_circle(x + 55.0, y + 5.0, 20.0, BLACK);
        });
        let lavender = Rgb::hex(0xE6E6FA);
        s.fill_circle(x, y, 20.0, lavender);
        s.fill_circle(x + 25.0, y - 10.0, 25.0, lavender);
        s.fill_circle(x + 50.0, y, 20.0, lavender);
        s.fill_circle(x + 2.0, y - 2.0, 16.0, WHITE);
        s.fill_circle(x + 25.0, y - 13.0, 20.0, WHITE);
        s.fill_circle(x + 48.0, y - 2.0, 16.0, WHITE);
    }

    fn draw_city(s: &mut dyn Surface, city_x: f64, night: bool) {
        let body = if night { Rgb::hex(0x000033) } else { SLATE };
        let offset = city_x % 200.0;
        for i in (-100..(WIDTH as i32 + 100)).step_by(50) {
            let fi = i as f64;
            let h = 60.0 + (fi * 132.0).sin().abs() * 100.0;
            let x = fi - offset;
            let top = HEIGHT - GROUND_HEIGHT - h;
            s.fill_rect(x, top, 40.0, h, body);
            if night {
                let mut wy = top + 10.0;
                while wy < HEIGHT - GROUND_HEIGHT - 10.0 {
                    if (wy * fi).sin() > 0.0 {
                        s.fill_rect(x + 5.0, wy, 6.0, 8.0, NIGHT_WINDOW);
                        s.fill_rect(x + 25.0, wy, 6.0, 8.0, NIGHT_WINDOW);
                    }
                    wy += 15.0;
                }
            }
        }
    }

    /// One pipe segment with its cap at the gap edge.
    fn draw_segment(s: &mut dyn Surface, x: f64, y: f64, w: f64, h: f64, cap_at_bottom: bool) {
        if h <= 0.0 {
            return;
        }
        shade_columns(s, x, y, w, h);
        s.stroke_rect(x, y, w, h, 3.0, SLATE);

        let cap_y = if cap_at_bottom { y + h - CAP_HEIGHT } else { y };
        shade_columns(s, x - 4.0, cap_y, w + 8.0, CAP_HEIGHT);
        s.stroke_rect(x - 4.0, cap_y, w + 8.0, CAP_HEIGHT, 3.0, SLATE);

        with_alpha(s, 0.3, |s| {
            s.fill_rect(x + 10.0, y, 6.0, h, WHITE);
            s.fill_rect(x + 6.0, cap_y, 6.0, CAP_HEIGHT, WHITE);
        });
    }
}

/// Horizontal cylinder shading, drawn as thin vertical strips.
fn shade_columns(s: &mut dyn Surface, x: f64, y: f64, w: f64, h: f64) {
    const STRIP: f64 = 4.0;
    let mut cx = 0.0;
    while cx < w {
        let sw = STRIP.min(w - cx);
        let t = (cx + sw / 2.0) / w;
        s.fill_rect(x + cx, y, sw, h, gradient_at(&PIPE_SHADE, t));
        cx += STRIP;
    }
}

fn zigzag(s: &mut dyn Surface, offset: f64, pattern: f64, rise: f64, base: f64, c: Rgb) {
    let mut x = offset - pattern;
    while x < WIDTH + pattern {
        s.fill_polygon(&[(x, base), (x + pattern / 2.0, base - rise), (x + pattern, base)], c);
        x += pattern;
    }
}

impl Theme for Classic {
    fn mode(&self) -> Mode {
        Mode::Classic
    }

    fn update(&mut self, scene: &Scene<'_>, rng: &mut dyn RngCore) {
        if scene.frame % CLOUD_EVERY == 0 && self.clouds.len() < MAX_CLOUDS {
            self.clouds.push(Cloud {
                x: WIDTH + rng.gen_range(0.0..100.0),
                y: rng.gen_range(0.0..HEIGHT / 2.0),
                speed: rng.gen_range(0.5..1.0),
            });
        }
        if scene.playing {
            for c in &mut self.clouds {
                c.x -= c.speed;
            }
        }
        self.clouds.retain(|c| c.x > -100.0);
    }

    fn draw_background(&self, s: &mut dyn Surface, scene: &Scene<'_>) {
        let sky = Sky::at(scene.score);
        let (top, bottom) = sky.colors();
        s.vertical_gradient(0.0, 0.0, WIDTH, HEIGHT, &[(0.0, top), (1.0, bottom)]);
        if sky == Sky::Night {
            for i in 0..20u32 {
                let sx = (i * 37) as f64 % WIDTH;
                let sy = (i * 91) as f64 % (HEIGHT / 2.0);
                s.fill_rect(sx, sy, 2.0, 2.0, WHITE);
            }
        }
    }

    fn draw_decor(&self, s: &mut dyn Surface, scene: &Scene<'_>) {
        for c in &self.clouds {
            Self::draw_cloud(s, c);
        }
        Self::draw_city(s, scene.city_x, Sky::at(scene.score) == Sky::Night);
    }

    fn draw_obstacle(&self, s: &mut dyn Surface, pipe: &Pipe, _scene: &Scene<'_>) {
        Self::draw_segment(s, pipe.x, 0.0, pipe.width, pipe.top_height, true);
        Self::draw_segment(s, pipe.x, pipe.bottom_y, pipe.width, HEIGHT - pipe.bottom_y, false);
    }

    fn draw_ground(&self, s: &mut dyn Surface, scene: &Scene<'_>) {
        let gx = scene.ground_x;
        let gy = GROUND_Y;
        s.vertical_gradient(0.0, gy, WIDTH, GROUND_HEIGHT, &[(0.0, TAN), (1.0, Rgb::hex(0x8B4513))]);

        with_alpha(s, 0.1, |s| {
            for i in 0..50 {
                let fi = i as f64;
                let x = ((fi * 123.45).sin().abs() * 1000.0 + gx * 0.5).rem_euclid(WIDTH);
                let y = gy + (fi * 678.9).cos().abs() * GROUND_HEIGHT;
                s.fill_rect(x, y, 2.0, 2.0, BLACK);
            }
        });

        s.fill_rect(0.0, gy, WIDTH, 12.0, Rgb::hex(0x7CFC00));
        zigzag(s, (gx * 0.8) % 30.0, 30.0, 6.0, gy + 12.0, Rgb::hex(0x228B22));
        zigzag(s, gx % 20.0, 20.0, 8.0, gy + 12.0, Rgb::hex(0x32CD32));

        let flowers = [Rgb::hex(0xFF4500), Rgb::hex(0x1E90FF), WHITE, GOLD];
        for i in 0..8 {
            let x = (gx + i as f64 * 180.0).rem_euclid(WIDTH + 180.0) - 90.0;
            if x > -20.0 && x < WIDTH + 20.0 {
                s.fill_rect(x, gy + 8.0, 4.0, 4.0, flowers[i % flowers.len()]);
                s.fill_rect(x + 1.0, gy + 12.0, 2.0, 4.0, Rgb::hex(0x228B22));
            }
        }

        with_alpha(s, 0.2, |s| {
            let mut x = 0.0;
            while x < WIDTH {
                let sx = (x + gx).rem_euclid(WIDTH);
                s.fill_rect(sx, gy + 25.0, 8.0, 6.0, BLACK);
                s.fill_rect(sx + 30.0, gy + 35.0, 5.0, 4.0, BLACK);
                x += 60.0;
            }
        });

        s.fill_rect(0.0, gy, WIDTH, 2.0, SLATE);
    }

    fn draw_avatar(&self, s: &mut dyn Surface, bird: &Bird) {
        avatar::draw(s, bird, false);
    }

    fn on_flap(&mut self, _bird: &Bird, _particles: &mut ParticlePool, _rng: &mut dyn RngCore) -> Cue {
        Cue::Flap
    }

    fn celebration_cue(&self) -> Cue {
        Cue::Medal
    }

    fn feathers(&self) -> &'static [Rgb] {
        &FEATHERS
    }

    fn sparkle_color(&self) -> Rgb {
        Rgb::hex(0x7CD67C)
    }

    fn accent(&self) -> Rgb {
        Rgb::hex(0x5CB85C)
    }

    fn reset(&mut self) {
        self.clouds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelCanvas;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scene(frame: u64, playing: bool) -> Scene<'static> {
        Scene {
            frame,
            score: 0,
            playing,
            speed: 2.0,
            ground_x: 0.0,
            city_x: 0.0,
            pipes: &[],
        }
    }

    #[test]
    fn sky_cycles_every_fifty_points() {
        assert_eq!(Sky::at(0), Sky::Day);
        assert_eq!(Sky::at(14), Sky::Day);
        assert_eq!(Sky::at(15), Sky::Sunset);
        assert_eq!(Sky::at(30), Sky::Night);
        assert_eq!(Sky::at(49), Sky::Night);
        assert_eq!(Sky::at(50), Sky::Day);
    }

    #[test]
    fn clouds_spawn_on_schedule_and_hold_still_until_play() {
        let mut theme = Classic::new();
        let mut rng = StdRng::seed_from_u64(5);
        for f in 0..250 {
            theme.update(&scene(f, false), &mut rng);
        }
        assert_eq!(theme.cloud_count(), 3);
        let before = theme.clouds.clone();
        theme.update(&scene(251, false), &mut rng);
        assert_eq!(theme.clouds, before);
    }

    #[test]
    fn idle_screen_keeps_a_bounded_sky() {
        let mut theme = Classic::new();
        let mut rng = StdRng::seed_from_u64(5);
        // Ten minutes on the start screen.
        for f in 0..36_000 {
            theme.update(&scene(f, false), &mut rng);
        }
        assert_eq!(theme.cloud_count(), MAX_CLOUDS);
    }

    #[test]
    fn clouds_drift_off_and_are_dropped() {
        let mut theme = Classic::new();
        let mut rng = StdRng::seed_from_u64(5);
        theme.update(&scene(0, true), &mut rng);
        for f in 1..3000 {
            theme.update(&scene(f, true), &mut rng);
        }
        assert!(theme.clouds.iter().all(|c| c.x > -100.0));
        assert!(theme.cloud_count() <= 13);
    }

    #[test]
    fn pipe_is_green_and_ground_is_grass() {
        let theme = Classic::new();
        let mut canvas = PixelCanvas::new(400, 600);
        let pipe = Pipe::new(200.0, 200.0);
        theme.draw_obstacle(&mut canvas, &pipe, &scene(0, true));
        theme.draw_ground(&mut canvas, &scene(0, true));
        let Some(Rgb(r, g, b)) = canvas.sample(226.0, 100.0) else {
            panic!("pipe pixel off canvas");
        };
        assert!(g > r && g > b);
        let Some(Rgb(r, g, b)) = canvas.sample(200.0, GROUND_Y + 6.0) else {
            panic!("ground pixel off canvas");
        };
        assert!(g > r && g > b);
    }
}
