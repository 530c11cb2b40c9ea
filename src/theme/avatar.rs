//! The three avatar sprites. Both themes share the shapes and differ only in
//! palette and the festive hat.

use crate::bird::{Bird, BirdKind};
use crate::color::{BLACK, GOLD, Rgb, SANTA_RED, WHITE};
use crate::surface::Surface;
use crate::theme::Pose;

const FESTIVE_RED: Rgb = Rgb::hex(0xD32F2F);
const BEAK: Rgb = Rgb::hex(0xFF9800);

struct Palette {
    base: Rgb,
    shadow: Rgb,
    highlight: Rgb,
    beak: Rgb,
    belly: Rgb,
}

const REALISTIC: Palette = Palette {
    base: Rgb::hex(0xFBC02D),
    shadow: Rgb::hex(0xF57F17),
    highlight: Rgb::hex(0xFFF9C4),
    beak: Rgb::hex(0xE65100),
    belly: Rgb::hex(0xFFFDE7),
};

const REALISTIC_FESTIVE: Palette = Palette {
    base: FESTIVE_RED,
    shadow: Rgb::hex(0x7B1B1B),
    highlight: Rgb::hex(0xFF8A80),
    beak: BEAK,
    belly: WHITE,
};

const ADVANCED: Palette = Palette {
    base: GOLD,
    shadow: Rgb::hex(0xB8860B),
    highlight: Rgb::hex(0xFFFACD),
    beak: Rgb::hex(0xFF8C00),
    belly: Rgb::hex(0xFF4500),
};

const ADVANCED_FESTIVE: Palette = Palette {
    base: SANTA_RED,
    shadow: Rgb::hex(0x910A0E),
    highlight: Rgb::hex(0xFF5252),
    beak: Rgb::hex(0xFF8C00),
    belly: Rgb::hex(0xFF4500),
};

pub(crate) fn draw(s: &mut dyn Surface, bird: &Bird, festive: bool) {
    let pose = Pose::new(bird.x, bird.y, bird.rotation);
    match bird.kind {
        BirdKind::Classic => classic(s, pose, bird, festive),
        BirdKind::Realistic => realistic(s, pose, bird, festive),
        BirdKind::Advanced => advanced(s, pose, bird, festive),
    }
}

fn squash_stretch(pose: Pose, stretch: f64) -> Pose {
    pose.scaled(1.0 / stretch, stretch)
}

fn classic(s: &mut dyn Surface, pose: Pose, bird: &Bird, festive: bool) {
    let p = squash_stretch(pose, 1.0 + (bird.velocity * 0.02).abs().min(0.15));
    let body = if festive { FESTIVE_RED } else { GOLD };

    p.circle(s, 0.0, 0.0, 14.0, BLACK);
    p.circle(s, 0.0, 0.0, 13.0, body);
    p.circle(s, 5.0, -4.0, 3.0, BLACK);
    p.poly(s, &[(9.0, -1.0), (19.0, 2.0), (9.0, 6.0)], BLACK);
    p.poly(s, &[(10.0, 0.0), (18.0, 2.0), (10.0, 5.0)], BEAK);

    let wing = p.shifted(-2.0, 2.0 + bird.wing_offset());
    wing.ellipse(s, 0.0, 0.0, 8.0, 5.0, BLACK);
    wing.ellipse(s, 0.0, 0.0, 7.0, 4.0, body);

    if festive {
        santa_hat(s, p, 13.0);
    }
}

fn realistic(s: &mut dyn Surface, pose: Pose, bird: &Bird, festive: bool) {
    let c = if festive { &REALISTIC_FESTIVE } else { &REALISTIC };
    let p = squash_stretch(pose, 1.0 + (bird.velocity * 0.025).abs().min(0.2));

    p.poly(
        s,
        &[(-10.0, 0.0), (-20.0, -6.0), (-18.0, -2.0), (-22.0, 2.0), (-18.0, 6.0)],
        c.base,
    );
    p.circle(s, 0.0, 0.0, 15.0, BLACK);
    p.circle(s, 0.0, 0.0, 14.0, c.base);
    for i in 0..3 {
        let (x, y) = (-4.0 + i as f64 * 4.0, 2.0 + i as f64 * 2.0);
        p.rect(s, x - 3.0, y, 6.0, 1.0, c.shadow);
    }
    p.ellipse(s, 5.0, 5.0, 9.0, 7.0, c.belly);
    p.circle(s, -3.0, -8.0, 3.0, c.highlight);
    p.circle(s, 7.0, -5.0, 4.0, BLACK);
    p.circle(s, 8.5, -6.5, 1.5, WHITE);
    p.poly(s, &[(12.0, -2.0), (22.0, -2.0), (26.0, 4.0), (13.0, 6.0)], c.beak);

    let lift = bird.flap_timer.map_or(0.0, |t| -(t as f64 / 5.0) * 6.0);
    let wing = p.shifted(-2.0, 1.0 + lift);
    wing.poly(s, &[(0.0, -6.0), (10.0, -6.0), (13.0, 1.0), (9.0, 6.0), (0.0, 6.0)], BLACK);
    wing.poly(s, &[(0.0, -5.0), (9.0, -5.0), (12.0, 1.0), (8.0, 5.0), (0.0, 5.0)], c.base);

    if festive {
        santa_hat(s, p, 14.0);
    }
}

/// Blocky sphere built from 2.5-unit pixels.
fn advanced(s: &mut dyn Surface, pose: Pose, bird: &Bird, festive: bool) {
    let c = if festive { &ADVANCED_FESTIVE } else { &ADVANCED };
    let p = squash_stretch(pose, 1.0 + (bird.velocity * 0.1).sin() * 0.15);

    block(s, p, -5.0, -6.0, 10.0, 12.0, BLACK);
    block(s, p, -6.0, -5.0, 12.0, 10.0, BLACK);
    block(s, p, -4.0, -5.0, 8.0, 10.0, c.base);
    block(s, p, -5.0, -4.0, 10.0, 8.0, c.base);

    block(s, p, -4.0, 3.0, 8.0, 2.0, c.shadow);
    block(s, p, 3.0, -4.0, 1.0, 8.0, c.shadow);
    block(s, p, -3.0, -5.0, 4.0, 2.0, c.highlight);
    block(s, p, -5.0, -3.0, 2.0, 4.0, c.highlight);

    block(s, p, 2.0, -3.0, 2.5, 2.5, BLACK);
    block(s, p, 3.5, -3.5, 1.0, 1.0, WHITE);
    block(s, p, 5.0, 0.5, 3.0, 2.0, c.beak);
    block(s, p, 8.0, 1.0, 2.0, 1.0, c.belly);

    let wing = p.shifted(-4.0 * P, bird.wing_offset() * P);
    block(s, wing, -1.4, -1.4, 5.8, 3.8, BLACK);
    block(s, wing, -1.0, -1.0, 5.0, 3.0, c.base);
    block(s, wing, 0.0, -1.0, 3.0, 1.0, c.highlight);

    if festive {
        santa_hat(s, p, 6.0 * P / 2.0);
    }
}

const P: f64 = 2.5;

fn block(s: &mut dyn Surface, pose: Pose, x: f64, y: f64, w: f64, h: f64, c: Rgb) {
    pose.rect(s, x * P, y * P, w * P, h * P, c);
}

/// Small red cap with a white trim and pompom, perched at the crown.
fn santa_hat(s: &mut dyn Surface, pose: Pose, radius: f64) {
    let hat = pose.shifted(0.0, -radius + 2.0);
    hat.poly(
        s,
        &[(-radius + 7.0, 1.0), (-2.0, -10.0), (4.0, -11.0), (radius + 3.0, -2.0), (radius - 5.0, 1.0)],
        BLACK,
    );
    hat.poly(
        s,
        &[(-radius + 8.0, 0.0), (-2.0, -9.0), (4.0, -10.0), (radius + 2.0, -1.0), (radius - 6.0, 0.0)],
        FESTIVE_RED,
    );
    for i in 0..6 {
        hat.circle(s, -radius + 8.0 + i as f64 * 3.0, 0.0, 2.0, WHITE);
    }
    hat.circle(s, radius + 2.0, -1.0, 3.5, BLACK);
    hat.circle(s, radius + 2.0, -1.0, 3.0, WHITE);
}
