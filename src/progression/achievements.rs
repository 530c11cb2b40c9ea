use std::collections::BTreeMap;

use crate::color::{BLACK, GOLD, PINE, Rgb, WHITE};
use crate::config::WIDTH;
use crate::surface::{Align, Surface, with_alpha};

const POPUP_TICKS: u32 = 180;
const POPUP_EXIT: u32 = 30;
const POPUP_TARGET_Y: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AchievementId {
    FirstFlight,
    JingleWay,
    SantaHelper,
    ChristmasMaster,
    PerfectCentury,
}

impl AchievementId {
    /// Stable key used in the persisted map.
    pub fn key(self) -> &'static str {
        match self {
            AchievementId::FirstFlight => "first_flight",
            AchievementId::JingleWay => "jingle_way",
            AchievementId::SantaHelper => "santa_helper",
            AchievementId::ChristmasMaster => "christmas_master",
            AchievementId::PerfectCentury => "perfect_century",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    AtLeast(u32),
    Exactly(u32),
}

impl Rule {
    pub fn is_met(self, score: u32) -> bool {
        match self {
            Rule::AtLeast(n) => score >= n,
            Rule::Exactly(n) => score == n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub rule: Rule,
}

pub const CATALOG: [Achievement; 5] = [
    Achievement {
        id: AchievementId::FirstFlight,
        name: "First Flight",
        description: "Pass your first pipe",
        rule: Rule::AtLeast(1),
    },
    Achievement {
        id: AchievementId::JingleWay,
        name: "Jingle All The Way",
        description: "Pass 10 pipes",
        rule: Rule::AtLeast(10),
    },
    Achievement {
        id: AchievementId::SantaHelper,
        name: "Santa's Helper",
        description: "Pass 25 pipes",
        rule: Rule::AtLeast(25),
    },
    Achievement {
        id: AchievementId::ChristmasMaster,
        name: "Christmas Master",
        description: "Pass 50 pipes",
        rule: Rule::AtLeast(50),
    },
    Achievement {
        id: AchievementId::PerfectCentury,
        name: "Perfect Century",
        description: "Score exactly 100",
        rule: Rule::Exactly(100),
    },
];

#[derive(Debug, Clone)]
struct Popup {
    achievement: Achievement,
    y: f64,
    life: u32,
    scale: f64,
}

impl Popup {
    fn new(achievement: Achievement) -> Self {
        Self {
            achievement,
            y: -100.0,
            life: POPUP_TICKS,
            scale: 0.0,
        }
    }

    fn update(&mut self) {
        if self.y < POPUP_TARGET_Y {
            self.y += (POPUP_TARGET_Y - self.y) * 0.2;
        }
        if self.scale < 1.0 {
            self.scale = (self.scale + 0.1).min(1.0);
        }
        self.life = self.life.saturating_sub(1);
        if self.life < POPUP_EXIT {
            self.y -= 2.0;
        }
    }

    fn alpha(&self) -> f64 {
        if self.life < POPUP_EXIT {
            self.life as f64 / POPUP_EXIT as f64
        } else {
            1.0
        }
    }

    fn draw(&self, s: &mut dyn Surface) {
        let k = self.scale;
        if k <= 0.0 {
            return;
        }
        let (cx, cy) = (WIDTH / 2.0, self.y);
        let a = &self.achievement;
        with_alpha(s, self.alpha(), |s| {
            let (w, h) = (300.0 * k, 70.0 * k);
            s.fill_rect(cx - w / 2.0, cy - h / 2.0, w, h, PINE);
            s.stroke_rect(cx - w / 2.0, cy - h / 2.0, w, h, 4.0 * k, GOLD);
            s.text("ACHIEVEMENT UNLOCKED!", cx, cy - 18.0 * k, 8.0 * k, GOLD, Align::Center);
            star(s, cx - 110.0 * k, cy + 6.0 * k, 12.0 * k, GOLD);
            s.text(a.name, cx - 80.0 * k, cy + 2.0 * k, 10.0 * k, WHITE, Align::Left);
            s.text(a.description, cx - 80.0 * k, cy + 18.0 * k, 6.0 * k, Rgb(204, 204, 204), Align::Left);
        });
    }
}

fn star(s: &mut dyn Surface, cx: f64, cy: f64, r: f64, c: Rgb) {
    let pts: Vec<(f64, f64)> = (0..10)
        .map(|i| {
            let radius = if i % 2 == 0 { r } else { r / 2.0 };
            let a = std::f64::consts::PI / 5.0 * i as f64 - std::f64::consts::FRAC_PI_2;
            (cx + a.cos() * radius, cy + a.sin() * radius)
        })
        .collect();
    s.fill_polygon(&pts, BLACK);
    let inner: Vec<(f64, f64)> = pts
        .iter()
        .map(|&(x, y)| (cx + (x - cx) * 0.8, cy + (y - cy) * 0.8))
        .collect();
    s.fill_polygon(&inner, c);
}

/// Unlock flags for the catalog plus the popups currently on screen.
/// Flags only ever go from locked to unlocked.
#[derive(Debug, Clone, Default)]
pub struct Achievements {
    unlocked: BTreeMap<AchievementId, bool>,
    popups: Vec<Popup>,
}

impl Achievements {
    /// Restores flags from a persisted map. Unknown keys are ignored.
    pub fn from_map(saved: &BTreeMap<String, bool>) -> Self {
        let unlocked = CATALOG
            .iter()
            .map(|a| (a.id, saved.get(a.id.key()).copied().unwrap_or(false)))
            .collect();
        Self {
            unlocked,
            popups: Vec::new(),
        }
    }

    /// Every catalog entry with its flag, keyed for storage.
    pub fn to_map(&self) -> BTreeMap<String, bool> {
        CATALOG
            .iter()
            .map(|a| (a.id.key().to_string(), self.is_unlocked(a.id)))
            .collect()
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.get(&id).copied().unwrap_or(false)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.values().filter(|u| **u).count()
    }

    pub fn total(&self) -> usize {
        CATALOG.len()
    }

    /// Unlocks everything the cumulative `score` now satisfies and returns
    /// the ids that were newly unlocked.
    pub fn check(&mut self, score: u32) -> Vec<AchievementId> {
        let mut fresh = Vec::new();
        for a in CATALOG {
            if self.is_unlocked(a.id) || !a.rule.is_met(score) {
                continue;
            }
            self.unlocked.insert(a.id, true);
            self.popups.push(Popup::new(a));
            fresh.push(a.id);
        }
        fresh
    }

    pub fn popups_visible(&self) -> usize {
        self.popups.len()
    }

    pub fn update(&mut self) {
        for p in &mut self.popups {
            p.update();
        }
        self.popups.retain(|p| p.life > 0);
    }

    pub fn draw(&self, s: &mut dyn Surface) {
        for p in &self.popups {
            p.draw(s);
        }
    }

    /// Drops popups only. Unlocks persist across runs.
    pub fn reset(&mut self) {
        self.popups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_unlock_in_order() {
        let mut a = Achievements::default();
        assert_eq!(a.check(1), vec![AchievementId::FirstFlight]);
        assert!(a.check(1).is_empty());
        assert_eq!(a.check(10), vec![AchievementId::JingleWay]);
        assert_eq!(a.unlocked_count(), 2);
    }

    #[test]
    fn exact_rule_skips_past_target() {
        let mut a = Achievements::default();
        a.check(99);
        a.check(101);
        assert!(!a.is_unlocked(AchievementId::PerfectCentury));
        a.check(100);
        assert!(a.is_unlocked(AchievementId::PerfectCentury));
    }

    #[test]
    fn unlocks_survive_reset() {
        let mut a = Achievements::default();
        a.check(30);
        a.reset();
        assert!(a.is_unlocked(AchievementId::SantaHelper));
        assert_eq!(a.popups_visible(), 0);
    }

    #[test]
    fn map_round_trip_ignores_unknown_keys() {
        let mut saved = BTreeMap::new();
        saved.insert("jingle_way".to_string(), true);
        saved.insert("presents_collected".to_string(), true);
        let a = Achievements::from_map(&saved);
        assert!(a.is_unlocked(AchievementId::JingleWay));
        assert_eq!(a.unlocked_count(), 1);
        let map = a.to_map();
        assert_eq!(map.len(), CATALOG.len());
        assert_eq!(map.get("jingle_way"), Some(&true));
        assert_eq!(map.get("first_flight"), Some(&false));
    }

    #[test]
    fn popup_slides_in_then_out() {
        let mut a = Achievements::default();
        a.check(1);
        for _ in 0..60 {
            a.update();
        }
        let y = a.popups[0].y;
        assert!((y - POPUP_TARGET_Y).abs() < 1.0);
        assert_eq!(a.popups[0].scale, 1.0);
        for _ in 60..POPUP_TICKS {
            a.update();
        }
        assert_eq!(a.popups_visible(), 0);
    }
}
