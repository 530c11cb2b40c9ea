use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use keybird::analytics::{Analytics, Params, Value};
use keybird::audio::{AudioError, Cue, CueSink};
use keybird::bird::BirdKind;
use keybird::collision;
use keybird::config::{BIRD_START_Y, GROUND_Y, JUMP, TERMINAL_VELOCITY};
use keybird::progression::{AchievementId, Achievements, Combo};
use keybird::session::{GameState, Services, Session};
use keybird::storage::{MemoryStore, Storage, keys};
use keybird::theme::{Classic, Festive, Theme};

// ── Recording services ──────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Cues(Rc<RefCell<Vec<Cue>>>);

impl Cues {
    fn count(&self, cue: Cue) -> usize {
        self.0.borrow().iter().filter(|c| **c == cue).count()
    }
}

impl CueSink for Cues {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        self.0.borrow_mut().push(cue);
        Ok(())
    }
    fn stop_music(&mut self) {}
    fn set_muted(&mut self, _muted: bool) {}
}

#[derive(Clone, Default)]
struct Events(Rc<RefCell<Vec<(&'static str, Params)>>>);

impl Events {
    fn last(&self, event: &str) -> Option<Params> {
        self.0.borrow().iter().rev().find(|(e, _)| *e == event).map(|(_, p)| p.clone())
    }
}

impl Analytics for Events {
    fn track(&mut self, event: &'static str, params: Params) {
        self.0.borrow_mut().push((event, params));
    }
}

/// One store shared between sessions, like a save file across launches.
#[derive(Clone, Default)]
struct Shared(Rc<RefCell<MemoryStore>>);

impl Storage for Shared {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key)
    }
    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.0.borrow_mut().set(key, value)
    }
}

struct Rig {
    game: Session,
    cues: Cues,
    events: Events,
    store: Shared,
}

fn rig_with(store: Shared, festive: bool) -> Rig {
    let cues = Cues::default();
    let events = Events::default();
    let mut rng = StdRng::seed_from_u64(7);
    let theme: Box<dyn Theme> = if festive {
        Box::new(Festive::new(&mut rng))
    } else {
        Box::new(Classic::new())
    };
    let services = Services {
        audio: Box::new(cues.clone()),
        storage: Box::new(store.clone()),
        analytics: Box::new(events.clone()),
    };
    Rig {
        game: Session::new(theme, services, rng),
        cues,
        events,
        store,
    }
}

fn rig() -> Rig {
    rig_with(Shared::default(), false)
}

// ── Driving ─────────────────────────────────────────────────────────────────

/// Flaps whenever the avatar sinks below the middle of the next gap.
fn steer(game: &mut Session) {
    steer_below_center(game, 15.0);
}

/// Flaps whenever the avatar sinks more than `offset` below the next gap's
/// center. Anything past about 60 clips the lower pipe.
fn steer_below_center(game: &mut Session, offset: f64) {
    let bird = game.bird();
    let target = game
        .obstacles()
        .pipes()
        .iter()
        .find(|p| p.right_edge() > bird.x - bird.radius())
        .map_or(BIRD_START_Y, |p| p.gap_center())
        + offset;
    if bird.y > target {
        game.primary_action();
    }
}

fn play_to(game: &mut Session, score: u32) {
    if game.state() == GameState::Ready {
        game.primary_action();
    }
    for _ in 0..5000 {
        if game.score() >= score {
            return;
        }
        steer(game);
        game.tick();
        assert_eq!(game.state(), GameState::Playing, "autopilot crashed at {}", game.score());
    }
    panic!("never reached {score}");
}

fn crash_out(game: &mut Session) {
    for _ in 0..600 {
        if game.state() == GameState::GameOver {
            return;
        }
        game.tick();
    }
    panic!("never reached game over");
}

fn param<'a>(params: &'a Params, name: &str) -> Option<&'a Value> {
    params.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
}

// ── Properties ──────────────────────────────────────────────────────────────

#[test]
fn first_input_starts_with_a_full_jump() {
    let mut r = rig();
    assert_eq!(r.game.state(), GameState::Ready);
    r.game.primary_action();
    assert_eq!(r.game.state(), GameState::Playing);
    assert_eq!(r.game.bird().velocity, JUMP);
    assert_eq!(r.cues.count(Cue::Flap), 1);

    let start = r.events.last("game_start").expect("game_start tracked");
    assert_eq!(param(&start, "mode"), Some(&Value::from("classic")));
    assert_eq!(param(&start, "bird_type"), Some(&Value::from("classic")));
}

#[test]
fn free_fall_is_capped_and_ends_on_the_ground() {
    let mut r = rig();
    r.game.primary_action();
    let mut fastest: f64 = 0.0;
    while r.game.state() == GameState::Playing {
        r.game.tick();
        fastest = fastest.max(r.game.bird().velocity);
        assert!(r.game.bird().velocity <= TERMINAL_VELOCITY);
    }
    assert_eq!(fastest, TERMINAL_VELOCITY);
    assert_eq!(r.game.state(), GameState::GameOver);
    assert_eq!(r.game.bird().y, GROUND_Y - r.game.bird().radius());
    assert_eq!(r.cues.count(Cue::Hit), 0, "a straight ground hit skips the hit cue");
}

#[test]
fn each_pipe_scores_exactly_once() {
    let mut r = rig();
    r.game.primary_action();
    let mut scored_at = Vec::new();
    for tick in 1..=300u32 {
        steer(&mut r.game);
        let before = r.game.score();
        r.game.tick();
        assert_eq!(r.game.state(), GameState::Playing);
        let gained = r.game.score() - before;
        assert!(gained <= 1);
        if gained == 1 {
            scored_at.push(tick);
        }
    }
    // First pipe spawns at x=400 on tick 1 and moves 2 per tick; the avatar at
    // x=80 is past its trailing edge (x+52) on tick 188. The second pipe
    // spawns on tick 102.
    assert_eq!(scored_at, vec![188, 289]);
    assert_eq!(r.cues.count(Cue::Score), 2);
}

#[test]
fn streak_resets_on_game_over_and_best_is_saved() {
    let mut r = rig();
    play_to(&mut r.game, 3);
    assert_eq!(r.game.streak().current(), 3);
    crash_out(&mut r.game);
    assert_eq!(r.game.streak().current(), 0);
    assert_eq!(r.game.streak().best(), 3);
    assert_eq!(r.store.get(keys::BEST_STREAK).as_deref(), Some("3"));
}

#[test]
fn combo_needs_consecutive_perfect_passes() {
    let mut c = Combo::default();
    c.record_pass(2.0);
    c.record_pass(5.0);
    assert_eq!(c.count(), 2);
    c.record_pass(40.0);
    assert_eq!(c.count(), 0);

    c.record_pass(0.0);
    for _ in 0..c.window() {
        c.update();
    }
    assert_eq!(c.count(), 0, "combo lapses when the window runs out");
}

#[test]
fn off_center_pass_breaks_the_combo_but_not_the_streak() {
    let mut r = rig();
    r.game.primary_action();
    let mut breaks = 0;
    let mut perfect = 0;
    for _ in 0..5000 {
        if r.game.score() >= 12 {
            break;
        }
        // Low in the gap: passes land both inside and outside the perfect band.
        steer_below_center(&mut r.game, 50.0);
        let (score, combo, streak) = (r.game.score(), r.game.combo().count(), r.game.streak().current());
        r.game.tick();
        assert_eq!(r.game.state(), GameState::Playing, "autopilot crashed at {}", r.game.score());
        if r.game.score() == score {
            continue;
        }
        assert_eq!(r.game.streak().current(), streak + 1);
        match r.game.combo().count() {
            0 if combo > 0 => breaks += 1,
            0 => {}
            n => {
                assert_eq!(n, combo + 1);
                perfect += 1;
            }
        }
    }
    assert_eq!(r.game.score(), 12);
    assert_eq!(r.game.streak().current(), 12);
    assert!(perfect > 0, "no perfect pass in 12 pipes");
    assert!(breaks > 0, "no combo was broken in 12 pipes");
}

#[test]
fn high_score_only_moves_up() {
    let mut r = rig();
    for (run, expect_high, expect_record) in [(12, 12, true), (15, 15, true), (10, 15, false)] {
        play_to(&mut r.game, run);
        crash_out(&mut r.game);
        assert_eq!(r.game.high_score(), expect_high);
        assert_eq!(r.game.is_new_record(), expect_record);
        r.game.primary_action();
        assert_eq!(r.game.state(), GameState::Ready);
    }
    assert_eq!(r.store.get(&keys::high_score("classic")).as_deref(), Some("15"));
    assert_eq!(r.store.get(&keys::high_score("festive")), None);
}

#[test]
fn game_over_reports_the_previous_best() {
    let mut r = rig_with(Shared(Rc::new(RefCell::new(MemoryStore::with([("high_score.classic", "1")])))), false);
    play_to(&mut r.game, 2);
    crash_out(&mut r.game);
    let over = r.events.last("game_over").expect("game_over tracked");
    assert_eq!(param(&over, "score"), Some(&Value::from(2u32)));
    assert_eq!(param(&over, "high_score"), Some(&Value::from(1u32)));
    assert!(r.game.is_new_record());
}

#[test]
fn restart_clears_the_run() {
    let mut r = rig();
    play_to(&mut r.game, 1);
    crash_out(&mut r.game);
    assert!(!r.game.particles().is_empty());
    let buttons = r.cues.count(Cue::Button);

    r.game.primary_action();
    assert_eq!(r.game.state(), GameState::Ready);
    assert_eq!(r.game.score(), 0);
    assert!(r.game.obstacles().pipes().is_empty());
    assert!(r.game.particles().is_empty());
    assert_eq!(r.game.trail().len(), 0);
    assert_eq!(r.game.bird().y, BIRD_START_Y);
    assert_eq!(r.cues.count(Cue::Button), buttons + 1);
}

#[test]
fn unlocks_survive_restarts_and_relaunches() {
    let store = Shared::default();
    let mut r = rig_with(store.clone(), false);
    play_to(&mut r.game, 10);
    assert!(r.game.achievements().is_unlocked(AchievementId::FirstFlight));
    assert!(r.game.achievements().is_unlocked(AchievementId::JingleWay));
    crash_out(&mut r.game);
    r.game.primary_action();
    assert!(r.game.achievements().is_unlocked(AchievementId::JingleWay));

    let saved = store.get(keys::ACHIEVEMENTS).expect("achievements saved");
    assert!(saved.contains("\"jingle_way\":true"));

    let relaunch = rig_with(store, true);
    assert!(relaunch.game.achievements().is_unlocked(AchievementId::FirstFlight));
    assert!(!relaunch.game.achievements().is_unlocked(AchievementId::SantaHelper));
}

#[test]
fn exact_hundred_is_missed_by_jumping_over_it() {
    let mut a = Achievements::default();
    a.check(99);
    a.check(101);
    assert!(!a.is_unlocked(AchievementId::PerfectCentury));
    assert!(a.check(100).contains(&AchievementId::PerfectCentury));
    assert!(a.check(100).is_empty());
}

#[test]
fn ground_contact_is_inclusive() {
    let r = 10.0;
    assert!(collision::hits_ground(GROUND_Y - r, r, GROUND_Y));
    assert!(collision::hits_ground(GROUND_Y - r + 1.0, r, GROUND_Y));
    assert!(!collision::hits_ground(GROUND_Y - r - 1.0, r, GROUND_Y));
}

#[test]
fn festive_run_jingles_and_celebrates() {
    let mut r = rig_with(Shared::default(), true);
    play_to(&mut r.game, 1);
    assert!(r.cues.count(Cue::Jingle) > 0);
    assert_eq!(r.cues.count(Cue::SleighBells), 1, "first flight unlock");
    assert!(r.cues.count(Cue::Music) >= 1);
    crash_out(&mut r.game);
    assert_eq!(r.store.get(&keys::high_score("festive")).as_deref(), Some("1"));
}

#[test]
fn saved_preferences_load_and_cli_overrides_do_not_save() {
    let store = Shared(Rc::new(RefCell::new(MemoryStore::with([("bird", "realistic"), ("muted", "true")]))));
    let r = rig_with(store.clone(), true);
    assert_eq!(r.game.bird().kind, BirdKind::Realistic);
    assert!(r.game.is_muted());
    assert_eq!(r.game.pending(), 0, "muted sessions do not arm music");

    let game = r.game.with_bird(BirdKind::Advanced).with_muted(false);
    assert_eq!(game.bird().kind, BirdKind::Advanced);
    assert!(!game.is_muted());
    assert_eq!(store.get(keys::BIRD).as_deref(), Some("realistic"));
    assert_eq!(store.get(keys::MUTED).as_deref(), Some("true"));
}
