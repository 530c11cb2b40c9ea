use crate::color::{GOLD, PINE, SANTA_RED, WHITE};
use crate::config::{COMBO_BURST_EVERY, COMBO_WINDOW, PERFECT_TOLERANCE};
use crate::surface::{Align, Surface, with_alpha};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboUpdate {
    pub perfect: bool,
    pub combo: u32,
    /// Every fifth perfect pass in a row.
    pub burst: bool,
}

/// Consecutive "perfect" passes, close to the gap center.
#[derive(Debug, Clone, Default)]
pub struct Combo {
    count: u32,
    timer: u32,
}

impl Combo {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn multiplier(&self) -> f64 {
        1.0 + (self.count / COMBO_BURST_EVERY) as f64 * 0.5
    }

    /// Ticks left before the combo lapses.
    pub fn window(&self) -> u32 {
        self.timer
    }

    /// `offset` is the distance between the avatar and the gap center at the
    /// moment the pipe scored.
    pub fn record_pass(&mut self, offset: f64) -> ComboUpdate {
        if offset < PERFECT_TOLERANCE {
            self.count += 1;
            self.timer = COMBO_WINDOW;
            ComboUpdate {
                perfect: true,
                combo: self.count,
                burst: self.count % COMBO_BURST_EVERY == 0,
            }
        } else {
            self.reset();
            ComboUpdate::default()
        }
    }

    pub fn update(&mut self) {
        if self.count > 0 {
            self.timer = self.timer.saturating_sub(1);
            if self.timer == 0 {
                self.reset();
            }
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.timer = 0;
    }

    /// Plate in the top-left corner with a draining window bar.
    pub fn draw(&self, s: &mut dyn Surface) {
        if self.count == 0 {
            return;
        }
        let (x, y) = (15.0, 30.0);
        with_alpha(s, 0.8, |s| s.fill_rect(x, y, 70.0, 35.0, PINE));
        s.stroke_rect(x, y, 70.0, 35.0, 2.0, GOLD);
        s.text("COMBO", x + 35.0, y + 9.0, 8.0, WHITE, Align::Center);
        s.text(&format!("X{}", self.count), x + 35.0, y + 21.0, 10.0, GOLD, Align::Center);

        let left = self.timer as f64 / COMBO_WINDOW as f64;
        let bar = if left > 0.3 { PINE } else { SANTA_RED };
        s.fill_rect(x + 5.0, y + 29.0, 60.0 * left, 3.0, bar);
    }
}
