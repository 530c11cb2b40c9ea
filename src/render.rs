//! Frame composition. Layer order is fixed; themes fill in the skinned ones.

use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::color::{BLACK, GOLD, Rgb, WHITE};
use crate::config::{HEIGHT, TRAIL_LEN, WIDTH};
use crate::game_over;
use crate::session::{GameState, Session};
use crate::surface::{Surface, with_alpha};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawError {
    /// An animation value went NaN or infinite.
    NonFinite(&'static str),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::NonFinite(what) => write!(f, "{what} is not finite"),
        }
    }
}

impl std::error::Error for DrawError {}

thread_local! {
    static GUARDING: Cell<bool> = const { Cell::new(false) };
}

/// True while a [`Renderer::guarded`] overlay is drawing on this thread. A
/// panic hook uses it to leave contained panics to the renderer's own report.
pub fn is_guarding() -> bool {
    GUARDING.with(Cell::get)
}

const BUTTON_W: f64 = 280.0;
const BUTTON_H: f64 = 70.0;

#[derive(Debug, Default)]
pub struct Renderer {
    warned: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a panel failure has been reported.
    pub fn has_warned(&self) -> bool {
        self.warned
    }

    pub fn draw(&mut self, s: &mut dyn Surface, game: &Session) {
        let (dx, dy) = game.shake().offset();
        s.set_offset(dx, dy);
        s.set_alpha(1.0);

        let theme = game.theme();
        let scene = game.scene();
        theme.draw_background(s, &scene);
        theme.draw_decor(s, &scene);
        for pipe in scene.pipes {
            theme.draw_obstacle(s, pipe, &scene);
        }
        theme.draw_ground(s, &scene);
        theme.draw_ambient(s, &scene);

        game.particles().draw(s);
        game.texts().draw(s);
        draw_trail(s, game);
        theme.draw_avatar(s, game.bird());

        game.streak().draw(s);
        game.combo().draw(s);
        game.achievements().draw(s);

        match game.state() {
            GameState::Ready => draw_start(s, game),
            GameState::Playing | GameState::Crashed => draw_score(s, game),
            GameState::GameOver => {
                let panel = game.panel();
                let (score, best, record) = (game.score(), game.high_score(), game.is_new_record());
                self.guarded(s, |s| panel.draw(s, score, best, record));
            }
        }

        s.set_alpha(1.0);
        s.set_offset(0.0, 0.0);
    }

    /// Runs a fallible overlay. Errors and panics degrade to the bare
    /// game-over panel and are reported once.
    pub fn guarded<F>(&mut self, s: &mut dyn Surface, draw: F)
    where
        F: FnOnce(&mut dyn Surface) -> Result<(), DrawError>,
    {
        GUARDING.with(|g| g.set(true));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| draw(&mut *s)));
        GUARDING.with(|g| g.set(false));
        let failure = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(payload) => payload
                .downcast_ref::<&str>()
                .map(|m| (*m).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic".to_owned()),
        };
        if !self.warned {
            tracing::warn!(%failure, "game over panel failed; drawing fallback");
            self.warned = true;
        }
        game_over::draw_fallback(s);
    }
}

fn draw_trail(s: &mut dyn Surface, game: &Session) {
    for (i, &(x, y)) in game.trail().enumerate() {
        let alpha = i as f64 / TRAIL_LEN as f64;
        with_alpha(s, alpha, |s| s.fill_rect(x - 5.0, y - 5.0, 10.0, 10.0, GOLD));
    }
}

fn draw_start(s: &mut dyn Surface, game: &Session) {
    let theme = game.theme();
    theme.draw_title(s, game.frame());

    let pulse = 1.0 + (game.frame() as f64 * 0.1).sin() * 0.05;
    let (w, h) = (BUTTON_W * pulse, BUTTON_H * pulse);
    let (x, y) = ((WIDTH - w) / 2.0, HEIGHT - 200.0 + (BUTTON_H - h) / 2.0);
    s.fill_rect(x + 4.0, y + 4.0, w, h, BLACK);
    s.fill_rect(x, y, w, h, theme.accent());
    s.stroke_rect(x, y, w, h, 4.0, BLACK);
    theme.draw_button_trim(s, x, y, w, h);
    s.outlined_text("TAP TO START", WIDTH / 2.0, y + h / 2.0, 20.0, WHITE, BLACK);

    if game.high_score() > 0 {
        let best = format!("BEST: {}", game.high_score());
        s.outlined_text(&best, WIDTH / 2.0, HEIGHT - 100.0, 16.0, GOLD, BLACK);
    }
    let sound = if game.is_muted() { "OFF" } else { "ON" };
    let hint = format!("1-3 BIRD: {}   M SOUND: {sound}", game.bird().kind.name().to_uppercase());
    s.outlined_text(&hint, WIDTH / 2.0, HEIGHT - 70.0, 8.0, WHITE, BLACK);
}

fn draw_score(s: &mut dyn Surface, game: &Session) {
    let pop = game.score_pop();
    let size = 56.0 * (1.0 + pop * 0.3);
    let color = Rgb::lerp(WHITE, GOLD, (pop * 256.0) as u16);
    s.outlined_text(&game.score().to_string(), WIDTH / 2.0, 80.0, size, color, BLACK);
}
