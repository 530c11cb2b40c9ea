use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{
    BIRD_RADIUS, BIRD_START_Y, BIRD_X, FLAP_TICKS, GRAVITY, JUMP, ROTATION_MAX, ROTATION_MIN,
    ROTATION_SMOOTHING, TERMINAL_VELOCITY,
};

/// Cosmetic avatar variant. Persisted by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BirdKind {
    #[default]
    Classic,
    Realistic,
    Advanced,
}

impl BirdKind {
    pub const ALL: [BirdKind; 3] = [BirdKind::Classic, BirdKind::Realistic, BirdKind::Advanced];

    pub fn name(self) -> &'static str {
        match self {
            BirdKind::Classic => "classic",
            BirdKind::Realistic => "realistic",
            BirdKind::Advanced => "advanced",
        }
    }
}

impl fmt::Display for BirdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BirdKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BirdKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown bird type '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    /// Degrees, positive is nose-down.
    pub rotation: f64,
    /// Ticks since the last flap while the wing animation runs.
    pub flap_timer: Option<u32>,
    pub kind: BirdKind,
}

impl Bird {
    pub fn new(kind: BirdKind) -> Self {
        Self {
            x: BIRD_X,
            y: BIRD_START_Y,
            velocity: 0.0,
            rotation: 0.0,
            flap_timer: None,
            kind,
        }
    }

    pub fn radius(&self) -> f64 {
        BIRD_RADIUS
    }

    pub fn is_flapping(&self) -> bool {
        self.flap_timer.is_some()
    }

    /// Sets the velocity to the jump impulse. Never adds to the current value.
    pub fn flap(&mut self) {
        self.velocity = JUMP;
        self.flap_timer = Some(0);
    }

    /// One tick of gravity, terminal-velocity clamp and rotation smoothing.
    pub fn fall(&mut self) {
        self.velocity = (self.velocity + GRAVITY).min(TERMINAL_VELOCITY);
        self.y += self.velocity;
        let target = (self.velocity * 4.0).clamp(ROTATION_MIN, ROTATION_MAX);
        self.rotation += (target - self.rotation) * ROTATION_SMOOTHING;
        self.advance_flap();
    }

    /// Idle bob while waiting for the first input. A pure function of `frame`.
    pub fn hover(&mut self, frame: u64) {
        let phase = frame as f64 * 0.05;
        self.y = BIRD_START_Y + phase.sin() * 15.0;
        self.rotation = phase.sin() * 3.0;
        self.advance_flap();
    }

    fn advance_flap(&mut self) {
        if let Some(t) = self.flap_timer {
            let t = t + 1;
            self.flap_timer = if t > FLAP_TICKS { None } else { Some(t) };
        }
    }

    /// Vertical wing offset for the flap animation, peaking mid-flap.
    pub fn wing_offset(&self) -> f64 {
        match self.flap_timer {
            Some(t) if t < 5 => -(t as f64),
            Some(t) => -((FLAP_TICKS - t.min(FLAP_TICKS)) as f64),
            None => 0.0,
        }
    }

    pub fn reset(&mut self) {
        *self = Bird::new(self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flap_overrides_velocity() {
        let mut b = Bird::new(BirdKind::Classic);
        b.velocity = 8.0;
        b.flap();
        assert_eq!(b.velocity, JUMP);
        b.flap();
        b.flap();
        assert_eq!(b.velocity, JUMP);
    }

    #[test]
    fn fall_is_capped_at_terminal_velocity() {
        let mut b = Bird::new(BirdKind::Classic);
        for _ in 0..200 {
            b.fall();
            assert!(b.velocity <= TERMINAL_VELOCITY);
        }
        assert_eq!(b.velocity, TERMINAL_VELOCITY);
    }

    #[test]
    fn rotation_stays_in_range() {
        let mut b = Bird::new(BirdKind::Classic);
        b.flap();
        for _ in 0..100 {
            b.fall();
            assert!(b.rotation >= ROTATION_MIN && b.rotation <= ROTATION_MAX);
        }
        assert!(b.rotation > 39.0);
    }

    #[test]
    fn flap_animation_clears_after_ten_ticks() {
        let mut b = Bird::new(BirdKind::Classic);
        b.flap();
        for _ in 0..10 {
            b.fall();
            assert!(b.is_flapping());
        }
        b.fall();
        assert!(!b.is_flapping());
    }

    #[test]
    fn hover_is_deterministic() {
        let mut a = Bird::new(BirdKind::Classic);
        let mut b = Bird::new(BirdKind::Advanced);
        a.hover(31);
        b.hover(31);
        assert_eq!(a.y, b.y);
        assert_eq!(a.rotation, b.rotation);
        a.hover(0);
        assert_eq!(a.y, BIRD_START_Y);
    }

    #[test]
    fn kind_parses_by_name() {
        assert_eq!("Realistic".parse::<BirdKind>(), Ok(BirdKind::Realistic));
        assert!("penguin".parse::<BirdKind>().is_err());
        assert_eq!(BirdKind::Advanced.to_string(), "advanced");
    }
}
