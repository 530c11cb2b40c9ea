use rand::Rng;

use super::FESTIVE_PALETTE;
use crate::clock::Schedule;
use crate::color::{BLACK, GOLD, PINE, Rgb, SANTA_RED, WHITE};
use crate::config::{HEIGHT, STREAK_MILESTONES, STREAK_STEP_EVERY, WIDTH};
use crate::particles::{self, FloatingText, FloatingTexts, ParticlePool};
use crate::surface::{Align, Surface, with_alpha};

const BANNER_TICKS: u32 = 120;
const BURST_SPACING: u64 = 12;
const PRAISE: [&str; 6] = ["NICE!", "GREAT!", "AWESOME!", "AMAZING!", "INCREDIBLE!", "LEGENDARY!"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakUpdate {
    pub streak: u32,
    /// The persisted best was beaten and should be saved.
    pub new_best: bool,
    pub milestone: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
struct Banner {
    milestone: u32,
    timer: u32,
}

/// Consecutive passes since the run started.
#[derive(Debug, Clone)]
pub struct Streak {
    current: u32,
    best: u32,
    pulse: f64,
    banner: Option<Banner>,
    fireworks: ParticlePool,
    pending_bursts: Schedule<()>,
    praise: FloatingTexts,
    tick: u64,
}

impl Streak {
    pub fn new(best: u32) -> Self {
        Self {
            current: 0,
            best,
            pulse: 0.0,
            banner: None,
            fireworks: ParticlePool::with_capacity(1024),
            pending_bursts: Schedule::new(),
            praise: FloatingTexts::default(),
            tick: 0,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn multiplier(&self) -> f64 {
        1.0 + (self.current / STREAK_STEP_EVERY) as f64 * 0.5
    }

    pub fn banner(&self) -> Option<u32> {
        self.banner.map(|b| b.milestone)
    }

    pub fn pending_bursts(&self) -> usize {
        self.pending_bursts.len()
    }

    pub fn fireworks(&self) -> &ParticlePool {
        &self.fireworks
    }

    pub fn record_pass(&mut self) -> StreakUpdate {
        self.current += 1;
        let new_best = self.current > self.best;
        if new_best {
            self.best = self.current;
        }
        self.pulse = 1.0;

        let milestone = STREAK_MILESTONES.contains(&self.current).then_some(self.current);
        if let Some(m) = milestone {
            self.banner = Some(Banner {
                milestone: m,
                timer: BANNER_TICKS,
            });
            for i in 0..(m / 5) as u64 {
                self.pending_bursts.push_after(self.tick, i * BURST_SPACING, ());
            }
        }

        if self.current >= 5 {
            let idx = ((self.current / 10) as usize).min(PRAISE.len() - 1);
            self.praise
                .push(FloatingText::rise(PRAISE[idx], WIDTH / 2.0, 150.0, GOLD));
        }

        StreakUpdate {
            streak: self.current,
            new_best,
            milestone,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, tick: u64, rng: &mut R) {
        self.tick = tick;
        if self.pulse > 0.0 {
            self.pulse = (self.pulse - 0.05).max(0.0);
        }
        if let Some(b) = &mut self.banner {
            b.timer = b.timer.saturating_sub(1);
            if b.timer == 0 {
                self.banner = None;
            }
        }
        for () in self.pending_bursts.drain_due(tick) {
            let x = rng.gen_range(0.0..WIDTH);
            let y = rng.gen_range(100.0..300.0);
            particles::firework(&mut self.fireworks, rng, x, y, &FESTIVE_PALETTE);
        }
        self.fireworks.update();
        self.praise.update();
    }

    /// Clears the run. The best streak survives.
    pub fn reset(&mut self) {
        *self = Self {
            tick: self.tick,
            ..Self::new(self.best)
        };
    }

    pub fn draw(&self, s: &mut dyn Surface) {
        if self.current > 0 {
            self.draw_counter(s);
        }
        self.fireworks.draw(s);
        self.praise.draw(s);
        if let Some(b) = self.banner {
            draw_banner(s, b);
        }
    }

    fn draw_counter(&self, s: &mut dyn Surface) {
        let (cx, cy) = (WIDTH - 100.0, 50.0);
        let k = 1.0 + self.pulse * 0.2;
        let (w, h) = (90.0 * k, 50.0 * k);
        let (x, y) = (cx - w / 2.0, cy - h / 2.0);

        with_alpha(s, 0.9, |s| s.fill_rect(x, y, w, h, streak_color(self.current)));
        s.stroke_rect(x, y, w, h, 3.0, GOLD);

        // Flame
        s.fill_rect(cx - 35.0 * k, cy - 10.0 * k, 8.0 * k, 12.0 * k, Rgb::hex(0xFF6B00));
        s.fill_rect(cx - 32.0 * k, cy - 15.0 * k, 5.0 * k, 8.0 * k, GOLD);

        s.text(
            &self.current.to_string(),
            cx + 5.0 * k,
            cy - 4.0 * k,
            16.0 * k,
            WHITE,
            Align::Center,
        );
        s.text(
            &format!("X{:.1}", self.multiplier()),
            cx + 5.0 * k,
            cy + 14.0 * k,
            8.0 * k,
            GOLD,
            Align::Center,
        );
    }
}

fn streak_color(streak: u32) -> Rgb {
    match streak {
        50.. => Rgb::hex(0x9B59B6),
        25.. => SANTA_RED,
        10.. => Rgb::hex(0xFF6B00),
        _ => PINE,
    }
}

fn draw_banner(s: &mut dyn Surface, b: Banner) {
    let alpha = b.timer as f64 / BANNER_TICKS as f64;
    let scale = 1.0 + (1.0 - alpha) * 0.5;
    with_alpha(s, alpha * 0.3, |s| s.fill_rect(0.0, 0.0, WIDTH, HEIGHT, GOLD));
    with_alpha(s, alpha, |s| {
        let (cx, cy) = (WIDTH / 2.0, HEIGHT / 2.0);
        let label = format!("{} PIPES!", b.milestone);
        s.outlined_text(&label, cx, cy, 28.0 * scale, SANTA_RED, BLACK);
        s.outlined_text("AMAZING!", cx, cy + 40.0 * scale, 14.0 * scale, WHITE, BLACK);
    });
}
