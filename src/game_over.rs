//! Game-over entrance: overlay fade, sliding panel with bounce, counting
//! score, medal stamp and the new-record badge.

use rand::Rng;

use crate::audio::Cue;
use crate::color::{BLACK, CRIMSON, GOLD, Rgb, WHITE};
use crate::config::{HEIGHT, WIDTH};
use crate::particles::{self, ParticlePool};
use crate::render::DrawError;
use crate::surface::{Align, Surface, with_alpha};
use crate::theme;

const PANEL_W: f64 = 300.0;
const PANEL_H: f64 = 280.0;
const PANEL_X: f64 = (WIDTH - PANEL_W) / 2.0;
const PANEL_REST_Y: f64 = 150.0;
const PANEL_START_Y: f64 = -300.0;
const WHOOSH_Y: f64 = -250.0;
const OVERLAY_MAX: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Bronze,
    Silver,
    Gold,
}

struct MedalStyle {
    base: Rgb,
    highlight: Rgb,
    shadow: Rgb,
    ribbon: Rgb,
}

impl Medal {
    pub fn for_score(score: u32) -> Option<Medal> {
        match score {
            30.. => Some(Medal::Gold),
            20.. => Some(Medal::Silver),
            10.. => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Medal::Bronze => "BRONZE",
            Medal::Silver => "SILVER",
            Medal::Gold => "GOLD",
        }
    }

    fn rank(self) -> &'static str {
        match self {
            Medal::Bronze => "3",
            Medal::Silver => "2",
            Medal::Gold => "1",
        }
    }

    fn style(self) -> MedalStyle {
        match self {
            Medal::Bronze => MedalStyle {
                base: Rgb::hex(0xCD7F32),
                highlight: Rgb::hex(0xE89C5C),
                shadow: Rgb::hex(0x8B5A2B),
                ribbon: Rgb::hex(0x8B4513),
            },
            Medal::Silver => MedalStyle {
                base: Rgb::hex(0xC0C0C0),
                highlight: Rgb::hex(0xE0E0E0),
                shadow: Rgb::hex(0x808080),
                ribbon: Rgb::hex(0x696969),
            },
            Medal::Gold => MedalStyle {
                base: GOLD,
                highlight: Rgb::hex(0xFFED4E),
                shadow: Rgb::hex(0xB8860B),
                ribbon: Rgb::hex(0xDAA520),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameOverPanel {
    overlay: f64,
    panel_y: f64,
    slide_speed: f64,
    bounce: f64,
    landed: bool,
    shown_score: u32,
    stamp: f64,
    squash: f64,
    impact: f64,
    medal_scale: f64,
    badge: f64,
    whoosh_played: bool,
    medal_played: bool,
    ink: ParticlePool,
    frame: u64,
}

impl Default for GameOverPanel {
    fn default() -> Self {
        Self {
            overlay: 0.0,
            panel_y: PANEL_START_Y,
            slide_speed: 5.0,
            bounce: 0.0,
            landed: false,
            shown_score: 0,
            stamp: 0.0,
            squash: 1.0,
            impact: 0.0,
            medal_scale: 0.0,
            badge: 0.0,
            whoosh_played: false,
            medal_played: false,
            ink: ParticlePool::with_capacity(64),
            frame: 0,
        }
    }
}

impl GameOverPanel {
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    pub fn panel_y(&self) -> f64 {
        self.panel_y
    }

    pub fn overlay(&self) -> f64 {
        self.overlay
    }

    pub fn shown_score(&self) -> u32 {
        self.shown_score
    }

    pub fn medal_scale(&self) -> f64 {
        self.medal_scale
    }

    pub fn badge_scale(&self) -> f64 {
        self.badge
    }

    fn medal_center(&self) -> (f64, f64) {
        (PANEL_X + 80.0, self.panel_y + 160.0)
    }

    /// Advances one tick. Returns the cues that fired this tick.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, score: u32, new_record: bool) -> Vec<Cue> {
        let mut cues = Vec::new();
        self.frame += 1;

        if self.overlay < OVERLAY_MAX {
            self.overlay = (self.overlay + 0.04).min(OVERLAY_MAX);
        }

        if !self.landed {
            self.panel_y += self.slide_speed;
            self.slide_speed += 1.0;
            if !self.whoosh_played && self.panel_y > WHOOSH_Y {
                cues.push(Cue::Whoosh);
                self.whoosh_played = true;
            }
            if self.panel_y >= PANEL_REST_Y {
                self.landed = true;
                self.bounce = 15.0;
            }
        }
        // Bounce is an offset above the rest line that decays to zero once.
        if self.bounce > 0.0 {
            self.panel_y = PANEL_REST_Y - self.bounce;
            self.bounce *= 0.7;
            if self.bounce < 0.5 {
                self.bounce = 0.0;
                self.panel_y = PANEL_REST_Y;
            }
        }

        if self.shown_score < score {
            self.shown_score += (score - self.shown_score).div_ceil(10);
            self.shown_score = self.shown_score.min(score);
        }

        if Medal::for_score(score).is_some() {
            if self.stamp < 1.0 {
                self.stamp += 0.15;
                if self.stamp >= 1.0 {
                    self.stamp = 1.0;
                    self.impact = 1.0;
                    self.squash = 0.7;
                    if !self.medal_played {
                        cues.push(Cue::Medal);
                        self.medal_played = true;
                    }
                    let (mx, my) = self.medal_center();
                    particles::ink_splat(&mut self.ink, rng, mx, my);
                }
            } else if self.squash < 1.0 {
                self.squash = (self.squash + 0.1).min(1.0);
            }
            self.medal_scale = self.stamp * self.squash;
        }

        if self.impact > 0.0 {
            self.impact = (self.impact - 0.1).max(0.0);
        }
        self.ink.update();

        if new_record && self.badge < 1.0 {
            self.badge = (self.badge + 0.15).min(1.0);
        }
        cues
    }

    pub fn draw(&self, s: &mut dyn Surface, score: u32, best: u32, new_record: bool) -> Result<(), DrawError> {
        for (name, v) in [
            ("panel_y", self.panel_y),
            ("overlay", self.overlay),
            ("medal_scale", self.medal_scale),
            ("badge", self.badge),
        ] {
            if !v.is_finite() {
                return Err(DrawError::NonFinite(name));
            }
        }

        with_alpha(s, self.overlay, |s| s.fill_rect(0.0, 0.0, WIDTH, HEIGHT, BLACK));

        let py = self.panel_y;
        with_alpha(s, 0.4, |s| s.fill_rect(PANEL_X + 6.0, py + 6.0, PANEL_W, PANEL_H, BLACK));
        s.fill_rect(PANEL_X, py, PANEL_W, PANEL_H, Rgb::hex(0xFAEBD7));
        s.stroke_rect(PANEL_X, py, PANEL_W, PANEL_H, 6.0, Rgb::hex(0x8B7355));
        s.stroke_rect(PANEL_X + 10.0, py + 10.0, PANEL_W - 20.0, PANEL_H - 20.0, 2.0, BLACK);

        // Title plate wobbles vertically in place of a rotation.
        let wiggle = (self.frame as f64 * 0.16).sin() * 2.0;
        let ty = py - 40.0 + wiggle;
        s.fill_rect(WIDTH / 2.0 - 120.0, ty - 20.0, 240.0, 40.0, CRIMSON);
        s.stroke_rect(WIDTH / 2.0 - 120.0, ty - 20.0, 240.0, 40.0, 4.0, BLACK);
        s.outlined_text("GAME OVER", WIDTH / 2.0, ty, 20.0, WHITE, BLACK);

        let cx = WIDTH / 2.0 + 40.0;
        let base = py + 100.0;
        let label = Rgb::hex(0x8B7355);
        s.text("SCORE", cx, base - 40.0, 12.0, label, Align::Center);
        s.text(&self.shown_score.to_string(), cx, base - 5.0, 28.0, BLACK, Align::Center);
        s.text("BEST", cx, base + 40.0, 12.0, label, Align::Center);
        let best_color = if new_record { Rgb(255, 0, 0) } else { GOLD };
        s.outlined_text(&best.to_string(), cx, base + 75.0, 28.0, best_color, BLACK);

        if new_record && self.badge > 0.0 {
            self.draw_badge(s, cx + 80.0, base + 75.0);
        }

        if let Some(medal) = Medal::for_score(score) {
            if self.medal_scale > 0.0 {
                self.ink.draw(s);
                let (mx, my) = self.medal_center();
                if self.impact > 0.0 {
                    with_alpha(s, self.impact * 0.3, |s| s.fill_circle(mx, my, 60.0 * self.impact, WHITE));
                }
                self.draw_medal(s, mx, my, medal);
            }
        }

        let btn_y = py + PANEL_H - 40.0;
        s.fill_rect(WIDTH / 2.0 - 100.0, btn_y - 20.0, 200.0, 40.0, Rgb::hex(0x5CB85C));
        s.stroke_rect(WIDTH / 2.0 - 100.0, btn_y - 20.0, 200.0, 40.0, 4.0, Rgb::hex(0x2C662C));
        s.outlined_text("PLAY AGAIN", WIDTH / 2.0, btn_y, 14.0, WHITE, BLACK);
        Ok(())
    }

    fn draw_badge(&self, s: &mut dyn Surface, x: f64, y: f64) {
        let pulse = 1.0 + (self.frame as f64 * 0.11).sin() * 0.1;
        let k = pulse * self.badge;
        let (w, h) = (48.0 * k, 22.0 * k);
        s.fill_rect(x - w / 2.0, y - h / 2.0, w, h, Rgb(255, 0, 0));
        s.stroke_rect(x - w / 2.0, y - h / 2.0, w, h, 2.0, BLACK);
        s.text("NEW!", x, y, 10.0 * k, WHITE, Align::Center);
    }

    fn draw_medal(&self, s: &mut dyn Surface, x: f64, y: f64, medal: Medal) {
        let style = medal.style();
        let size = 50.0 * self.medal_scale;

        s.fill_rect(x - 8.0, y + size / 2.0 - 10.0, 16.0, 35.0, style.ribbon);
        s.fill_rect(x - 8.0, y + size / 2.0 - 10.0, 6.0, 35.0, style.shadow);

        let (sx, sy) = (1.0 / self.squash, self.squash);
        let star = |outer: f64, inner: f64| -> Vec<(f64, f64)> {
            theme::star(0.0, 0.0, outer, inner)
                .into_iter()
                .map(|(px, py)| (x + px * sx, y + py * sy))
                .collect()
        };
        s.fill_polygon(&star(size / 2.0 + 2.0, size / 4.0 + 2.0), BLACK);
        s.fill_polygon(&star(size / 2.0, size / 4.0), style.highlight);
        s.fill_polygon(&star(size / 2.0 - 2.0, size / 4.0 - 1.0), style.base);
        s.fill_circle(x, y, size / 3.5 + 1.5, BLACK);
        s.fill_circle(x, y, size / 3.5, WHITE);
        s.text(medal.rank(), x, y, (size / 2.5).floor(), style.base, Align::Center);
        s.outlined_text(medal.label(), x, y + size / 2.0 + 35.0, 8.0, style.base, BLACK);
    }
}

/// Bare panel used when the full one cannot be drawn.
pub fn draw_fallback(s: &mut dyn Surface) {
    s.set_alpha(1.0);
    with_alpha(s, 0.8, |s| s.fill_rect(0.0, 0.0, WIDTH, HEIGHT, BLACK));
    s.text("GAME OVER", WIDTH / 2.0, HEIGHT / 2.0, 30.0, WHITE, Align::Center);
    s.text("TAP TO PLAY AGAIN", WIDTH / 2.0, HEIGHT / 2.0 + 50.0, 15.0, WHITE, Align::Center);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn run(panel: &mut GameOverPanel, score: u32, new_record: bool, ticks: usize) -> Vec<Cue> {
        let mut rng = StdRng::seed_from_u64(21);
        (0..ticks)
            .flat_map(|_| panel.update(&mut rng, score, new_record))
            .collect()
    }

    #[test]
    fn medal_thresholds() {
        assert_eq!(Medal::for_score(9), None);
        assert_eq!(Medal::for_score(10), Some(Medal::Bronze));
        assert_eq!(Medal::for_score(20), Some(Medal::Silver));
        assert_eq!(Medal::for_score(29), Some(Medal::Silver));
        assert_eq!(Medal::for_score(30), Some(Medal::Gold));
    }

    #[test]
    fn panel_settles_at_rest_after_bounce() {
        let mut p = GameOverPanel::default();
        let cues = run(&mut p, 3, false, 60);
        assert_eq!(cues, vec![Cue::Whoosh]);
        assert_eq!(p.overlay(), OVERLAY_MAX);
        assert_eq!(p.panel_y(), PANEL_REST_Y);

        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..600 {
            p.update(&mut rng, 3, false);
            assert_eq!(p.panel_y(), PANEL_REST_Y, "panel moved after settling");
        }
    }

    #[test]
    fn bounce_rises_above_rest_then_decays() {
        let mut p = GameOverPanel::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut highest = PANEL_REST_Y;
        for _ in 0..60 {
            p.update(&mut rng, 0, false);
            assert!(p.panel_y() <= PANEL_REST_Y);
            if p.landed {
                highest = highest.min(p.panel_y());
            }
        }
        assert_eq!(highest, PANEL_REST_Y - 15.0);
    }

    #[test]
    fn score_counts_up_without_overshoot() {
        let mut p = GameOverPanel::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut last = 0;
        for _ in 0..100 {
            p.update(&mut rng, 37, false);
            assert!(p.shown_score() >= last && p.shown_score() <= 37);
            last = p.shown_score();
        }
        assert_eq!(p.shown_score(), 37);
    }

    #[test]
    fn stamp_fires_medal_cue_once() {
        let mut p = GameOverPanel::default();
        let cues = run(&mut p, 12, false, 60);
        assert_eq!(cues.iter().filter(|c| **c == Cue::Medal).count(), 1);
        assert_eq!(p.medal_scale(), 1.0);
    }

    #[test]
    fn no_medal_below_ten() {
        let mut p = GameOverPanel::default();
        let cues = run(&mut p, 9, false, 60);
        assert!(!cues.contains(&Cue::Medal));
        assert_eq!(p.medal_scale(), 0.0);
    }

    #[test]
    fn badge_scales_in_only_for_records() {
        let mut p = GameOverPanel::default();
        run(&mut p, 5, true, 10);
        assert_eq!(p.badge_scale(), 1.0);
        p.restart();
        run(&mut p, 5, false, 10);
        assert_eq!(p.badge_scale(), 0.0);
    }

    #[test]
    fn non_finite_state_is_a_draw_error() {
        let mut p = GameOverPanel::default();
        p.panel_y = f64::NAN;
        let mut canvas = crate::surface::PixelCanvas::new(80, 120);
        assert!(matches!(
            p.draw(&mut canvas, 1, 1, false),
            Err(DrawError::NonFinite("panel_y"))
        ));
    }
}
