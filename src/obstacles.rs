//! Pipe spawning, scrolling, scoring and the speed ramp.

use rand::Rng;

use crate::config::{
    BASE_SPEED, GROUND_Y, MAX_SPEED_BONUS, PIPE_GAP, PIPE_MARGIN, PIPE_SPACING, PIPE_WIDTH,
    SPEED_RAMP, SPEED_STEP, WIDTH,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f64,
    pub top_height: f64,
    pub bottom_y: f64,
    pub width: f64,
    pub scored: bool,
}

impl Pipe {
    pub fn new(x: f64, top_height: f64) -> Self {
        Self {
            x,
            top_height,
            bottom_y: top_height + PIPE_GAP,
            width: PIPE_WIDTH,
            scored: false,
        }
    }

    /// A pipe at the right edge with its gap placed uniformly at random
    /// between the top margin and the ground margin.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (lo, hi) = top_height_range();
        Self::new(WIDTH, rng.gen_range(lo..hi))
    }

    pub fn gap_center(&self) -> f64 {
        self.top_height + PIPE_GAP / 2.0
    }

    pub fn right_edge(&self) -> f64 {
        self.x + self.width
    }
}

pub fn top_height_range() -> (f64, f64) {
    (PIPE_MARGIN, GROUND_Y - PIPE_GAP - PIPE_MARGIN)
}

/// Speed the ramp is heading for at a given score.
pub fn target_speed(score: u32) -> f64 {
    BASE_SPEED + MAX_SPEED_BONUS.min((score / 5) as f64 * SPEED_STEP)
}

/// Emitted once per pipe, on the first tick the avatar is past its trailing edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEvent {
    pub pipe_x: f64,
    pub gap_center: f64,
    pub bird_y: f64,
}

impl ScoreEvent {
    pub fn offset_from_center(&self) -> f64 {
        (self.bird_y - self.gap_center).abs()
    }
}

#[derive(Debug, Clone)]
pub struct Obstacles {
    pipes: Vec<Pipe>,
    speed: f64,
    ground_x: f64,
    city_x: f64,
}

impl Default for Obstacles {
    fn default() -> Self {
        Self {
            pipes: Vec::new(),
            speed: BASE_SPEED,
            ground_x: 0.0,
            city_x: 0.0,
        }
    }
}

impl Obstacles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn push(&mut self, pipe: Pipe) {
        self.pipes.push(pipe);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn stop(&mut self) {
        self.speed = 0.0;
    }

    /// Ground pattern offset in `(-12, 0]`.
    pub fn ground_x(&self) -> f64 {
        self.ground_x
    }

    /// Distance the far skyline has travelled.
    pub fn city_x(&self) -> f64 {
        self.city_x
    }

    /// Eases the speed toward `target_speed(score)`.
    pub fn ramp(&mut self, score: u32) {
        if self.speed < target_speed(score) {
            self.speed += SPEED_RAMP;
        }
    }

    /// Moves every pipe, scores the ones the avatar has just passed, drops
    /// pipes that left the screen and spawns the next one when due.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, bird_x: f64, bird_y: f64) -> Vec<ScoreEvent> {
        let mut events = Vec::new();
        for pipe in &mut self.pipes {
            pipe.x -= self.speed;
            if !pipe.scored && bird_x > pipe.right_edge() {
                pipe.scored = true;
                events.push(ScoreEvent {
                    pipe_x: pipe.x,
                    gap_center: pipe.gap_center(),
                    bird_y,
                });
            }
        }
        self.pipes.retain(|p| p.x > -p.width);

        let due = self.pipes.last().is_none_or(|last| last.x < WIDTH - PIPE_SPACING);
        if due {
            self.pipes.push(Pipe::random(rng));
        }
        self.city_x += self.speed * 0.25;
        events
    }

    /// Ground keeps scrolling in every state; it only stops when speed is zero.
    pub fn scroll_ground(&mut self) {
        self.ground_x -= self.speed;
        if self.ground_x <= -12.0 {
            self.ground_x = 0.0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_pipes_fit_above_ground() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let p = Pipe::random(&mut rng);
            assert!(p.top_height >= PIPE_MARGIN);
            assert!(p.bottom_y <= GROUND_Y - PIPE_MARGIN);
            assert!((p.bottom_y - p.top_height - PIPE_GAP).abs() < 1e-9);
            assert_eq!(p.x, WIDTH);
        }
    }

    #[test]
    fn target_speed_steps_and_caps() {
        assert_eq!(target_speed(0), 2.0);
        assert_eq!(target_speed(4), 2.0);
        assert!((target_speed(5) - 2.2).abs() < 1e-9);
        assert!((target_speed(74) - 4.8).abs() < 1e-9);
        assert_eq!(target_speed(75), 5.0);
        assert_eq!(target_speed(500), 5.0);
    }

    #[test]
    fn ramp_is_gradual() {
        let mut o = Obstacles::new();
        o.ramp(10);
        assert!((o.speed() - 2.005).abs() < 1e-9);
        o.ramp(0);
        assert!((o.speed() - 2.005).abs() < 1e-9);
    }

    #[test]
    fn spawns_when_empty_and_at_spacing() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut o = Obstacles::new();
        o.advance(&mut rng, 80.0, 300.0);
        assert_eq!(o.pipes().len(), 1);
        // 400 → 200 takes 100 ticks; the next spawns once it is left of 200.
        for _ in 0..100 {
            o.advance(&mut rng, 80.0, 300.0);
        }
        assert_eq!(o.pipes().len(), 1);
        o.advance(&mut rng, 80.0, 300.0);
        assert_eq!(o.pipes().len(), 2);
    }

    #[test]
    fn pipe_scores_exactly_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut o = Obstacles::new();
        o.push(Pipe::new(400.0, 200.0));
        let mut scored = 0;
        for _ in 0..300 {
            scored += o
                .advance(&mut rng, 80.0, 300.0)
                .iter()
                .filter(|e| e.gap_center == 275.0)
                .count();
        }
        assert_eq!(scored, 1);
    }

    #[test]
    fn score_event_carries_gap_offset() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut o = Obstacles::new();
        o.push(Pipe::new(27.0, 100.0));
        let events = o.advance(&mut rng, 80.0, 180.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].gap_center, 175.0);
        assert_eq!(events[0].offset_from_center(), 5.0);
    }

    #[test]
    fn offscreen_pipes_are_dropped() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut o = Obstacles::new();
        o.push(Pipe::new(-50.0, 100.0));
        o.advance(&mut rng, 80.0, 300.0);
        assert!(o.pipes().iter().all(|p| p.x > -p.width));
    }

    #[test]
    fn stopped_track_does_not_scroll() {
        let mut o = Obstacles::new();
        o.stop();
        o.scroll_ground();
        assert_eq!(o.ground_x(), 0.0);
    }

    #[test]
    fn ground_offset_wraps() {
        let mut o = Obstacles::new();
        for _ in 0..6 {
            o.scroll_ground();
        }
        assert_eq!(o.ground_x(), 0.0);
        o.scroll_ground();
        assert_eq!(o.ground_x(), -2.0);
    }
}
