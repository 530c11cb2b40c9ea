//! One player's game: the state machine, the world it owns, and the services
//! it talks to (audio, storage, analytics).

use rand::rngs::StdRng;
use std::collections::{BTreeMap, VecDeque};

use crate::analytics::Analytics;
use crate::audio::{Cue, CueSink, melody_ticks};
use crate::bird::{Bird, BirdKind};
use crate::clock::{Clock, Schedule};
use crate::collision::{self, Collision};
use crate::color::{GOLD, TAN};
use crate::config::{
    DIE_CUE_DELAY, DUST_HEIGHT, GROUND_Y, MUSIC_START_DELAY, SHAKE_CRASH, SHAKE_FLAP, SHAKE_MILESTONE,
    SHAKE_SCORE, TRAIL_LEN, WIDTH,
};
use crate::game_over::GameOverPanel;
use crate::obstacles::{Obstacles, ScoreEvent};
use crate::particles::{self, FloatingText, FloatingTexts, ParticlePool};
use crate::progression::{Achievements, Combo, FESTIVE_PALETTE, Streak};
use crate::shake::Shake;
use crate::storage::{self, Storage, keys};
use crate::theme::{Scene, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ready,
    Playing,
    /// Hit a pipe or the ceiling; falling to the ground with input ignored.
    Crashed,
    GameOver,
}

/// External collaborators, injected so tests can record what the game does.
pub struct Services {
    pub audio: Box<dyn CueSink>,
    pub storage: Box<dyn Storage>,
    pub analytics: Box<dyn Analytics>,
}

/// Effects that fire on a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Cue(Cue),
    /// Plays one pass of the theme music and re-arms itself.
    MusicLoop,
}

pub struct Session {
    theme: Box<dyn Theme>,
    services: Services,
    rng: StdRng,
    clock: Clock,
    schedule: Schedule<Deferred>,

    state: GameState,
    bird: Bird,
    obstacles: Obstacles,
    particles: ParticlePool,
    texts: FloatingTexts,
    trail: VecDeque<(f64, f64)>,
    shake: Shake,
    streak: Streak,
    combo: Combo,
    achievements: Achievements,
    panel: GameOverPanel,

    score: u32,
    high_score: u32,
    new_record: bool,
    score_pop: f64,
    frame: u64,
    muted: bool,
}

impl Session {
    /// Builds a session in `Ready`, restoring scores and preferences from
    /// storage.
    pub fn new(theme: Box<dyn Theme>, services: Services, rng: StdRng) -> Self {
        let store = services.storage.as_ref();
        let mode = theme.mode();
        let high_score = storage::read_or(store, &keys::high_score(mode.key()), 0u32);
        let best_streak = storage::read_or(store, keys::BEST_STREAK, 0u32);
        let muted = storage::read_or(store, keys::MUTED, false);
        let kind = storage::read_or(store, keys::BIRD, BirdKind::default());
        let saved: BTreeMap<String, bool> = storage::read_json_or_default(store, keys::ACHIEVEMENTS);
        let achievements = Achievements::from_map(&saved);

        tracing::info!(
            %mode,
            high_score,
            best_streak,
            unlocked = achievements.unlocked_count(),
            "session restored"
        );

        let mut session = Self {
            theme,
            services,
            rng,
            clock: Clock::default(),
            schedule: Schedule::new(),
            state: GameState::Ready,
            bird: Bird::new(kind),
            obstacles: Obstacles::new(),
            particles: ParticlePool::default(),
            texts: FloatingTexts::default(),
            trail: VecDeque::with_capacity(TRAIL_LEN),
            shake: Shake::default(),
            streak: Streak::new(best_streak),
            combo: Combo::default(),
            achievements,
            panel: GameOverPanel::default(),
            score: 0,
            high_score,
            new_record: false,
            score_pop: 0.0,
            frame: 0,
            muted,
        };
        session.services.audio.set_muted(muted);
        session.arm_music(MUSIC_START_DELAY);
        session
    }

    /// Overrides the persisted avatar for this run without saving it.
    pub fn with_bird(mut self, kind: BirdKind) -> Self {
        self.bird.kind = kind;
        self
    }

    /// Overrides the persisted mute flag for this run without saving it.
    pub fn with_muted(mut self, muted: bool) -> Self {
        if muted != self.muted {
            self.apply_mute(muted);
        }
        self
    }

    // ── Input ───────────────────────────────────────────────────────────────

    pub fn primary_action(&mut self) {
        match self.state {
            GameState::Ready => self.start(),
            GameState::Playing => self.flap(),
            GameState::Crashed => {}
            GameState::GameOver => self.reset(),
        }
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.muted;
        self.apply_mute(muted);
        storage::write(self.services.storage.as_mut(), keys::MUTED, muted);
    }

    /// Switches the avatar between runs. Returns false while a run is live.
    pub fn select_bird(&mut self, kind: BirdKind) -> bool {
        if !matches!(self.state, GameState::Ready | GameState::GameOver) {
            return false;
        }
        self.bird.kind = kind;
        storage::write(self.services.storage.as_mut(), keys::BIRD, kind);
        self.services
            .analytics
            .track("bird_select", vec![("bird_type", kind.name().into())]);
        tracing::info!(%kind, "bird selected");
        true
    }

    fn start(&mut self) {
        self.state = GameState::Playing;
        self.bird.flap();
        self.services.analytics.track(
            "game_start",
            vec![
                ("mode", self.theme.mode().key().into()),
                ("bird_type", self.bird.kind.name().into()),
            ],
        );
        self.play(Cue::Flap);
        self.kick_dust();
        tracing::info!("run started");
    }

    fn flap(&mut self) {
        self.bird.flap();
        let cue = self.theme.on_flap(&self.bird, &mut self.particles, &mut self.rng);
        self.play(cue);
        self.shake.nudge(SHAKE_FLAP);
        self.kick_dust();
    }

    fn kick_dust(&mut self) {
        if GROUND_Y - self.bird.y < DUST_HEIGHT {
            particles::dust(&mut self.particles, &mut self.rng, self.bird.x, GROUND_Y, TAN);
        }
    }

    fn apply_mute(&mut self, muted: bool) {
        self.muted = muted;
        self.services.audio.set_muted(muted);
        if muted {
            self.cancel_music();
        } else if self.state != GameState::GameOver {
            self.arm_music(1);
        }
        tracing::info!(muted, "mute toggled");
    }

    // ── Tick ────────────────────────────────────────────────────────────────

    /// Advances the world by one frame.
    pub fn tick(&mut self) {
        let now = self.clock.advance();
        for due in self.schedule.drain_due(now) {
            match due {
                Deferred::Cue(cue) => self.play(cue),
                Deferred::MusicLoop => {
                    if let Some(track) = self.theme.music() {
                        self.play(track);
                        self.schedule.push_after(now, melody_ticks(), Deferred::MusicLoop);
                    }
                }
            }
        }

        match self.state {
            GameState::Ready => self.bird.hover(self.frame),
            GameState::Playing => {
                self.obstacles.ramp(self.score);
                self.bird.fall();
                let events = self.obstacles.advance(&mut self.rng, self.bird.x, self.bird.y);
                for ev in events {
                    self.on_score(ev);
                }
            }
            GameState::Crashed => self.bird.fall(),
            GameState::GameOver => {}
        }
        self.obstacles.scroll_ground();
        self.particles.update();

        let scene = Scene {
            frame: self.frame,
            score: self.score,
            playing: self.state == GameState::Playing,
            speed: self.obstacles.speed(),
            ground_x: self.obstacles.ground_x(),
            city_x: self.obstacles.city_x(),
            pipes: self.obstacles.pipes(),
        };
        self.theme.update(&scene, &mut self.rng);

        self.streak.update(now, &mut self.rng);
        self.combo.update();
        self.achievements.update();
        self.texts.update();

        if self.state == GameState::Playing {
            self.trail.push_back((self.bird.x, self.bird.y));
            if self.trail.len() > TRAIL_LEN {
                self.trail.pop_front();
            }
        } else {
            self.trail.clear();
        }

        self.check_collisions();

        if self.state == GameState::GameOver {
            let cues = self.panel.update(&mut self.rng, self.score, self.new_record);
            for cue in cues {
                self.play(cue);
            }
        }

        self.shake.update(&mut self.rng);
        self.score_pop = (self.score_pop - 0.1).max(0.0);
        self.frame += 1;
    }

    fn on_score(&mut self, ev: ScoreEvent) {
        self.score += 1;
        tracing::debug!(score = self.score, offset = ev.offset_from_center(), "pipe cleared");
        self.play(Cue::Score);
        self.shake.kick(SHAKE_SCORE);
        self.score_pop = 1.0;

        particles::score_burst(&mut self.particles, &mut self.rng, WIDTH / 2.0, 80.0);
        let sparkle = self.theme.sparkle_color();
        particles::pipe_sparkles(&mut self.particles, &mut self.rng, ev.pipe_x, ev.bird_y, sparkle);
        let (bx, by) = (self.bird.x, self.bird.y);
        self.texts.push(FloatingText::pop("+1", bx, by - 20.0));

        let combo = self.combo.record_pass(ev.offset_from_center());
        if combo.perfect && combo.combo > 1 {
            self.texts.push(FloatingText::pop("PERFECT!", bx, by - 40.0));
            self.play(Cue::Medal);
        }
        if combo.burst {
            self.texts
                .push(FloatingText::rise(format!("COMBO X{}!", combo.combo), WIDTH / 2.0, 200.0, GOLD));
            particles::confetti(&mut self.particles, &mut self.rng, bx, by, 20, &FESTIVE_PALETTE);
        }

        let streak = self.streak.record_pass();
        if streak.new_best {
            storage::write(self.services.storage.as_mut(), keys::BEST_STREAK, streak.streak);
        }
        if let Some(m) = streak.milestone {
            tracing::info!(milestone = m, "streak milestone");
            self.shake.kick(SHAKE_MILESTONE);
            self.play(self.theme.celebration_cue());
        }

        let fresh = self.achievements.check(self.score);
        if !fresh.is_empty() {
            for id in &fresh {
                tracing::info!(achievement = id.key(), "achievement unlocked");
                self.play(self.theme.celebration_cue());
            }
            let map = self.achievements.to_map();
            storage::write_json(self.services.storage.as_mut(), keys::ACHIEVEMENTS, &map);
        }
    }

    fn check_collisions(&mut self) {
        let r = self.bird.radius();
        match self.state {
            GameState::Playing => {
                let hit = collision::check(self.bird.x, self.bird.y, r, GROUND_Y, self.obstacles.pipes());
                match hit {
                    Some(Collision::Ground) => {
                        self.bird.y = GROUND_Y - r;
                        self.game_over();
                    }
                    Some(kind) => self.crash(kind),
                    None => {}
                }
            }
            GameState::Crashed => {
                if collision::hits_ground(self.bird.y, r, GROUND_Y) {
                    self.bird.y = GROUND_Y - r;
                    self.game_over();
                }
            }
            GameState::Ready | GameState::GameOver => {}
        }
    }

    fn crash(&mut self, kind: Collision) {
        self.state = GameState::Crashed;
        self.obstacles.stop();
        self.play(Cue::Hit);
        self.schedule
            .push_after(self.clock.now(), DIE_CUE_DELAY, Deferred::Cue(Cue::Die));
        self.shake.kick(SHAKE_CRASH);
        tracing::info!(?kind, score = self.score, "crashed");
    }

    fn game_over(&mut self) {
        self.state = GameState::GameOver;
        self.obstacles.stop();
        let mode = self.theme.mode();
        self.services.analytics.track(
            "game_over",
            vec![
                ("score", self.score.into()),
                ("high_score", self.high_score.into()),
                ("mode", mode.key().into()),
                ("bird_type", self.bird.kind.name().into()),
            ],
        );

        let feathers = self.theme.feathers();
        particles::death_explosion(&mut self.particles, &mut self.rng, self.bird.x, self.bird.y, feathers);

        self.new_record = self.score > self.high_score;
        if self.new_record {
            self.high_score = self.score;
            storage::write(
                self.services.storage.as_mut(),
                &keys::high_score(mode.key()),
                self.high_score,
            );
        }

        self.panel.restart();
        self.cancel_music();
        self.streak.reset();
        tracing::info!(score = self.score, high_score = self.high_score, record = self.new_record, "game over");
    }

    /// Back to `Ready`. Unlocks, best streak, mute and avatar survive.
    fn reset(&mut self) {
        self.state = GameState::Ready;
        self.bird.reset();
        self.score = 0;
        self.new_record = false;
        self.score_pop = 0.0;
        self.frame = 0;
        self.obstacles.reset();
        self.particles.clear();
        self.texts.clear();
        self.trail.clear();
        self.shake.reset();
        self.streak.reset();
        self.combo.reset();
        self.achievements.reset();
        self.panel.restart();
        self.theme.reset();
        self.schedule.clear();
        self.services.audio.stop_music();

        let key = keys::high_score(self.theme.mode().key());
        self.high_score = storage::read_or(self.services.storage.as_ref(), &key, self.high_score);
        self.play(Cue::Button);
        self.arm_music(1);
        tracing::info!("reset");
    }

    // ── Audio helpers ───────────────────────────────────────────────────────

    fn play(&mut self, cue: Cue) {
        tracing::debug!(%cue, "cue");
        if let Err(e) = self.services.audio.play(cue) {
            tracing::debug!(%cue, "dropped: {e}");
        }
    }

    fn arm_music(&mut self, delay: u64) {
        if self.muted || self.theme.music().is_none() {
            return;
        }
        self.cancel_music();
        self.schedule.push_after(self.clock.now(), delay, Deferred::MusicLoop);
    }

    fn cancel_music(&mut self) {
        self.schedule.retain(|d| *d != Deferred::MusicLoop);
        self.services.audio.stop_music();
    }

    // ── Views ───────────────────────────────────────────────────────────────

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn obstacles(&self) -> &Obstacles {
        &self.obstacles
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    pub fn texts(&self) -> &FloatingTexts {
        &self.texts
    }

    /// Recent avatar positions, oldest first.
    pub fn trail(&self) -> impl ExactSizeIterator<Item = &(f64, f64)> {
        self.trail.iter()
    }

    pub fn shake(&self) -> &Shake {
        &self.shake
    }

    pub fn streak(&self) -> &Streak {
        &self.streak
    }

    pub fn combo(&self) -> &Combo {
        &self.combo
    }

    pub fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    pub fn panel(&self) -> &GameOverPanel {
        &self.panel
    }

    pub fn theme(&self) -> &dyn Theme {
        self.theme.as_ref()
    }

    pub fn storage(&self) -> &dyn Storage {
        self.services.storage.as_ref()
    }

    /// Progress of the score pop animation, 1.0 right after a point.
    pub fn score_pop(&self) -> f64 {
        self.score_pop
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn scene(&self) -> Scene<'_> {
        Scene {
            frame: self.frame,
            score: self.score,
            playing: self.state == GameState::Playing,
            speed: self.obstacles.speed(),
            ground_x: self.obstacles.ground_x(),
            city_x: self.obstacles.city_x(),
            pipes: self.obstacles.pipes(),
        }
    }

    /// Number of deferred effects still waiting on the tick schedule.
    pub fn pending(&self) -> usize {
        self.schedule.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Params;
    use crate::audio::AudioError;
    use crate::obstacles::Pipe;
    use crate::storage::MemoryStore;
    use crate::theme::{Classic, Festive};
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Log(Rc<RefCell<Vec<Cue>>>);

    impl CueSink for Log {
        fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
            self.0.borrow_mut().push(cue);
            Ok(())
        }
        fn stop_music(&mut self) {}
        fn set_muted(&mut self, _muted: bool) {}
    }

    struct Quiet;

    impl Analytics for Quiet {
        fn track(&mut self, _event: &'static str, _params: Params) {}
    }

    fn session(festive: bool) -> (Session, Log) {
        let log = Log::default();
        let mut rng = StdRng::seed_from_u64(3);
        let theme: Box<dyn Theme> = if festive {
            Box::new(Festive::new(&mut rng))
        } else {
            Box::new(Classic::new())
        };
        let services = Services {
            audio: Box::new(log.clone()),
            storage: Box::new(MemoryStore::new()),
            analytics: Box::new(Quiet),
        };
        (Session::new(theme, services, rng), log)
    }

    #[test]
    fn die_cue_follows_hit_after_a_delay() {
        let (mut s, log) = session(false);
        s.primary_action();
        s.obstacles.push(Pipe::new(s.bird.x - 10.0, 400.0));
        s.tick();
        assert_eq!(s.state(), GameState::Crashed);
        let hit_at = log.0.borrow().iter().position(|c| *c == Cue::Hit);
        assert!(hit_at.is_some());
        assert!(!log.0.borrow().contains(&Cue::Die));
        for _ in 0..DIE_CUE_DELAY {
            s.tick();
        }
        assert!(log.0.borrow().contains(&Cue::Die));
    }

    #[test]
    fn crashed_ignores_input_and_falls_to_game_over() {
        let (mut s, _) = session(false);
        s.primary_action();
        s.obstacles.push(Pipe::new(s.bird.x - 10.0, 400.0));
        s.tick();
        assert_eq!(s.state(), GameState::Crashed);
        let v = s.bird().velocity;
        s.primary_action();
        assert_eq!(s.bird().velocity, v);
        for _ in 0..200 {
            s.tick();
        }
        assert_eq!(s.state(), GameState::GameOver);
        assert_eq!(s.bird().y, GROUND_Y - s.bird().radius());
    }

    #[test]
    fn festive_music_starts_after_a_second_and_loops() {
        let (mut s, log) = session(true);
        for _ in 0..MUSIC_START_DELAY - 1 {
            s.tick();
        }
        assert!(!log.0.borrow().contains(&Cue::Music));
        s.tick();
        assert_eq!(log.0.borrow().iter().filter(|c| **c == Cue::Music).count(), 1);
        for _ in 0..melody_ticks() {
            s.tick();
        }
        assert_eq!(log.0.borrow().iter().filter(|c| **c == Cue::Music).count(), 2);
    }

    #[test]
    fn mute_cancels_music_and_unmute_rearms_it() {
        let (mut s, _) = session(true);
        assert_eq!(s.pending(), 1);
        s.toggle_mute();
        assert_eq!(s.pending(), 0);
        assert_eq!(s.storage().get(keys::MUTED).as_deref(), Some("true"));
        s.toggle_mute();
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn classic_has_no_music() {
        let (mut s, log) = session(false);
        assert_eq!(s.pending(), 0);
        for _ in 0..300 {
            s.tick();
        }
        assert!(!log.0.borrow().contains(&Cue::Music));
    }

    #[test]
    fn bird_choice_is_locked_during_a_run() {
        let (mut s, _) = session(false);
        assert!(s.select_bird(BirdKind::Advanced));
        assert_eq!(s.storage().get(keys::BIRD).as_deref(), Some("advanced"));
        s.primary_action();
        assert!(!s.select_bird(BirdKind::Realistic));
        assert_eq!(s.bird().kind, BirdKind::Advanced);
    }

    #[test]
    fn festive_flap_jingles() {
        let (mut s, log) = session(true);
        s.primary_action();
        s.tick();
        s.primary_action();
        assert_eq!(log.0.borrow().last(), Some(&Cue::Jingle));
    }
}
