//! Pure hit tests between the avatar circle and the world.

use crate::obstacles::Pipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Ground,
    Ceiling,
    Pipe,
}

/// Lower edge touching or below the ground line counts as a hit.
pub fn hits_ground(y: f64, radius: f64, ground_y: f64) -> bool {
    y + radius >= ground_y
}

pub fn hits_ceiling(y: f64, radius: f64) -> bool {
    y - radius <= 0.0
}

pub fn hits_pipe(x: f64, y: f64, radius: f64, pipe: &Pipe) -> bool {
    let overlaps_column = x + radius > pipe.x && x - radius < pipe.x + pipe.width;
    overlaps_column && (y - radius < pipe.top_height || y + radius > pipe.bottom_y)
}

/// Full check while flying. Ground wins over everything else.
pub fn check(x: f64, y: f64, radius: f64, ground_y: f64, pipes: &[Pipe]) -> Option<Collision> {
    if hits_ground(y, radius, ground_y) {
        Some(Collision::Ground)
    } else if hits_ceiling(y, radius) {
        Some(Collision::Ceiling)
    } else if pipes.iter().any(|p| hits_pipe(x, y, radius, p)) {
        Some(Collision::Pipe)
    } else {
        None
    }
}
