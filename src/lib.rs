//! Flappy Bird for the terminal, with streaks, combos, achievements and a
//! seasonal festive skin.
//!
//! [`session::Session`] owns a run and advances it one tick at a time;
//! [`render::Renderer`] paints it onto any [`surface::Surface`]. The binary
//! wires both to crossterm.

pub mod analytics;
pub mod audio;
pub mod bird;
pub mod clock;
pub mod collision;
pub mod color;
pub mod config;
pub mod font;
pub mod game_over;
pub mod obstacles;
pub mod particles;
pub mod progression;
pub mod render;
pub mod session;
pub mod shake;
pub mod storage;
pub mod surface;
pub mod theme;
