//! Gameplay constants. Everything is in logical canvas units (400×600) and
//! per-tick rates at a nominal 60 ticks per second.

// ── Canvas ──────────────────────────────────────────────────────────────────

pub const WIDTH: f64 = 400.0;
pub const HEIGHT: f64 = 600.0;
pub const GROUND_HEIGHT: f64 = 50.0;
pub const GROUND_Y: f64 = HEIGHT - GROUND_HEIGHT;

pub const TICKS_PER_SECOND: u64 = 60;

// ── Avatar ──────────────────────────────────────────────────────────────────

pub const GRAVITY: f64 = 0.45;
pub const JUMP: f64 = -7.5;
pub const TERMINAL_VELOCITY: f64 = 10.0;
pub const BIRD_X: f64 = 80.0;
pub const BIRD_START_Y: f64 = 250.0;
pub const BIRD_RADIUS: f64 = 10.0;
pub const FLAP_TICKS: u32 = 10;
pub const ROTATION_SMOOTHING: f64 = 0.15;
pub const ROTATION_MIN: f64 = -25.0;
pub const ROTATION_MAX: f64 = 90.0;
pub const TRAIL_LEN: usize = 10;
/// Flaps closer than this to the ground kick up dust.
pub const DUST_HEIGHT: f64 = 120.0;

// ── Obstacles ───────────────────────────────────────────────────────────────

pub const PIPE_WIDTH: f64 = 52.0;
pub const PIPE_GAP: f64 = 150.0;
pub const PIPE_SPACING: f64 = 200.0;
pub const PIPE_MARGIN: f64 = 50.0;

pub const BASE_SPEED: f64 = 2.0;
pub const MAX_SPEED_BONUS: f64 = 3.0;
/// Extra target speed per five points.
pub const SPEED_STEP: f64 = 0.2;
pub const SPEED_RAMP: f64 = 0.005;

// ── Progression ─────────────────────────────────────────────────────────────

pub const PERFECT_TOLERANCE: f64 = 15.0;
pub const COMBO_WINDOW: u32 = 120;
pub const COMBO_BURST_EVERY: u32 = 5;
pub const STREAK_STEP_EVERY: u32 = 5;
pub const STREAK_MILESTONES: [u32; 5] = [10, 25, 50, 75, 100];

// ── Screen shake ────────────────────────────────────────────────────────────

pub const SHAKE_SCORE: f64 = 3.0;
pub const SHAKE_FLAP: f64 = 1.5;
pub const SHAKE_CRASH: f64 = 10.0;
pub const SHAKE_MILESTONE: f64 = 15.0;

/// Delay between the hit cue and the die cue.
pub const DIE_CUE_DELAY: u64 = 6;
/// Delay before festive music first starts.
pub const MUSIC_START_DELAY: u64 = TICKS_PER_SECOND;
