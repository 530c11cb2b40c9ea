use fundsp::hacker32::*;
use rand::Rng;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::collections::HashMap;

use super::{AudioError, Cue, CueSink};
use crate::config::TICKS_PER_SECOND;

const RATE: u32 = 44_100;
const SFX_VOLUME: f32 = 0.5;
const MUSIC_VOLUME: f32 = 0.8;

const C5: f32 = 523.25;
const D5: f32 = 587.33;
const E5: f32 = 659.25;
const F5: f32 = 698.46;
const G5: f32 = 783.99;

/// Jingle Bells, first phrase: (frequency, seconds).
const MELODY: [(f32, f32); 11] = [
    (E5, 0.25),
    (E5, 0.25),
    (E5, 0.5),
    (E5, 0.25),
    (E5, 0.25),
    (E5, 0.5),
    (E5, 0.25),
    (G5, 0.25),
    (C5, 0.25),
    (D5, 0.25),
    (E5, 1.0),
];

/// Length of one melody pass in ticks; the music loop re-arms on this period.
pub fn melody_ticks() -> u64 {
    let secs: f32 = MELODY.iter().map(|(_, d)| d).sum();
    (secs as f64 * TICKS_PER_SECOND as f64).round() as u64
}

// ── Sounds ──────────────────────────────────────────────────────────────────

/// Exponential ramp from `a` to `b` as `t` goes 0..1, then holds `b`.
fn sweep(a: f32, b: f32, t: f32) -> f32 {
    a * (b / a).powf(t.clamp(0.0, 1.0))
}

/// Renders `seconds` of a mono source shaped by a gain envelope.
fn voice(seconds: f32, mut next: impl FnMut() -> f32, gain: impl Fn(f32) -> f32) -> Vec<f32> {
    let n = (seconds * RATE as f32) as usize;
    (0..n)
        .map(|i| next() * gain(i as f32 / RATE as f32))
        .collect()
}

/// Adds `src` into `out` starting `at` seconds in, growing `out` as needed.
fn mix_at(out: &mut Vec<f32>, at: f32, src: &[f32]) {
    let start = (at * RATE as f32) as usize;
    if out.len() < start + src.len() {
        out.resize(start + src.len(), 0.0);
    }
    for (o, s) in out[start..].iter_mut().zip(src) {
        *o += s;
    }
}

fn square_note(freq: f32, len: f32, peak: f32) -> Vec<f32> {
    let mut osc = square_hz(freq);
    osc.set_sample_rate(RATE as f64);
    voice(len, || osc.get_mono(), |t| sweep(peak, 0.01, t / len))
}

fn chime(notes: &[(f32, f32, f32)], peak: f32) -> Vec<f32> {
    let mut out = Vec::new();
    for &(freq, at, len) in notes {
        mix_at(&mut out, at, &square_note(freq, len, peak));
    }
    out
}

fn chirp(from: f32, to: f32, len: f32, peak: f32) -> Vec<f32> {
    let mut osc = lfo(move |t: f32| sweep(from, to, t / len)) >> square();
    osc.set_sample_rate(RATE as f64);
    voice(len, || osc.get_mono(), |t| sweep(peak, 0.01, t / len))
}

fn noise_burst(len: f32, peak: f32) -> Vec<f32> {
    let mut src = noise();
    src.set_sample_rate(RATE as f64);
    voice(len, || src.get_mono(), |t| sweep(peak, 0.01, t / len))
}

fn whoosh() -> Vec<f32> {
    let len = 0.3;
    let mut src = noise() >> lowpass_hz(2000.0, 0.7);
    src.set_sample_rate(RATE as f64);
    voice(len, || src.get_mono(), |t| {
        (1.0 - t / len).max(0.0) * sweep(0.15, 0.01, t / len)
    })
}

fn jingle(detune_cents: f32) -> Vec<f32> {
    let ratio = 2f32.powf(detune_cents / 1200.0);
    let peak = 0.2 * SFX_VOLUME;
    let mut out = Vec::new();
    for (i, base) in [C5, E5].into_iter().enumerate() {
        let mut osc = sine_hz(base * ratio);
        osc.set_sample_rate(RATE as f64);
        let bell = voice(0.2, || osc.get_mono(), |t| {
            if t < 0.02 {
                peak * t / 0.02
            } else {
                sweep(peak, 0.01, (t - 0.02) / 0.13)
            }
        });
        mix_at(&mut out, i as f32 * 0.05, &bell);
    }
    out
}

fn sleigh_bells() -> Vec<f32> {
    let mut out = Vec::new();
    for (i, freq) in [C5, D5, E5, F5, G5].into_iter().enumerate() {
        let mut osc = triangle_hz(freq);
        osc.set_sample_rate(RATE as f64);
        let bell = voice(0.3, || osc.get_mono(), |t| sweep(0.15 * SFX_VOLUME, 0.01, t / 0.3));
        mix_at(&mut out, i as f32 * 0.08, &bell);
    }
    out
}

fn melody() -> Vec<f32> {
    let peak = 0.05 * MUSIC_VOLUME;
    let mut out = Vec::new();
    let mut at = 0.0;
    for (freq, len) in MELODY {
        let mut osc = sine_hz(freq);
        osc.set_sample_rate(RATE as f64);
        let note = voice(len, || osc.get_mono(), |t| {
            if t < 0.05 {
                peak * t / 0.05
            } else {
                sweep(peak, 0.01, (t - 0.05) / (len - 0.1))
            }
        });
        mix_at(&mut out, at, &note);
        at += len;
    }
    out
}

/// Renders a cue to mono samples at 44.1 kHz.
pub(crate) fn render(cue: Cue, detune_cents: f32) -> Vec<f32> {
    match cue {
        Cue::Flap => chirp(440.0, 880.0, 0.1, 0.3),
        Cue::Score => chime(&[(C5, 0.0, 0.05), (E5, 0.05, 0.05), (G5, 0.1, 0.1)], 0.2),
        Cue::Hit => noise_burst(0.15, 0.2),
        Cue::Die => chirp(880.0, 110.0, 0.2, 0.3),
        Cue::Button => square_note(600.0, 0.08, 0.2),
        Cue::Whoosh => whoosh(),
        Cue::Medal => chime(&[(E5, 0.0, 0.08), (G5, 0.08, 0.08), (987.77, 0.16, 0.15)], 0.2),
        Cue::Jingle => jingle(detune_cents),
        Cue::SleighBells => sleigh_bells(),
        Cue::Music => melody(),
    }
}

// ── Output ──────────────────────────────────────────────────────────────────

/// fundsp voices played through a rodio output stream.
///
/// Fixed cues are rendered once up front; the jingle is re-rendered per flap
/// with a small random detune.
pub struct Synth {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Option<Sink>,
    muted: bool,
    bank: HashMap<Cue, Vec<f32>>,
}

impl Synth {
    pub fn try_new() -> Result<Self, AudioError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
        let bank = Cue::ALL
            .into_iter()
            .filter(|c| *c != Cue::Jingle)
            .map(|c| (c, render(c, 0.0)))
            .collect();
        tracing::debug!("audio output opened");
        Ok(Self {
            _stream: stream,
            handle,
            music: None,
            muted: false,
            bank,
        })
    }
}

impl CueSink for Synth {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        if self.muted {
            return Ok(());
        }
        let samples = match self.bank.get(&cue) {
            Some(s) => s.clone(),
            None => render(cue, rand::thread_rng().gen_range(-25.0..25.0)),
        };
        let sink = Sink::try_new(&self.handle).map_err(|e| AudioError::Playback(e.to_string()))?;
        sink.append(SamplesBuffer::new(1, RATE, samples));
        if cue == Cue::Music {
            self.stop_music();
            self.music = Some(sink);
        } else {
            sink.detach();
        }
        Ok(())
    }

    fn stop_music(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_music();
        }
    }
}
