//! Tone synthesis for the two engine cues.
//!
//! Generators are pure: they return a mono `f32` buffer at the requested
//! sample rate and know nothing about devices. Playback lives in
//! [`cpal_sink`] behind the `audio` feature.

#[cfg(feature = "audio")]
pub mod cpal_sink;

use std::f32::consts::TAU;

/// Click length
pub const TICK_SECS: f32 = 0.05;
const TICK_FREQ: (f32, f32) = (150.0, 40.0);
const TICK_FLOOR_GAIN: f32 = 0.001;

/// Fanfare chord: C4, E4, G4, C5
pub const FANFARE_CHORD: [f32; 4] = [261.63, 329.63, 392.00, 523.25];
pub const FANFARE_SECS: f32 = 1.5;
const FANFARE_ATTACK_SECS: f32 = 0.1;
const FANFARE_PEAK_GAIN: f32 = 0.2;
const FANFARE_TAIL_GAIN: f32 = 0.01;

const ACCENT_SECS: f32 = 0.5;
const ACCENT_FREQ: (f32, f32) = (100.0, 200.0);
const ACCENT_GAIN: (f32, f32) = (0.1, 0.01);

/// Geometric interpolation from `from` to `to`, `t` in [0, 1]
fn exp_ramp(from: f32, to: f32, t: f32) -> f32 {
    from * (to / from).powf(t.clamp(0.0, 1.0))
}

fn sample_count(secs: f32, sample_rate: u32) -> usize {
    (secs * sample_rate as f32).round() as usize
}

#[derive(Clone, Copy)]
enum Wave {
    Square,
    Triangle,
    Sawtooth,
}

impl Wave {
    /// Value at `phase` cycles (fractional part used), in [-1, 1]
    fn at(self, phase: f32) -> f32 {
        let p = phase.fract();
        match self {
            Wave::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Wave::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
            Wave::Sawtooth => 2.0 * p - 1.0,
        }
    }
}

/// Render `len` samples of `wave` with time-varying frequency and gain.
///
/// Phase is accumulated per sample so frequency sweeps stay continuous.
fn render(
    wave: Wave,
    len: usize,
    sample_rate: u32,
    freq: impl Fn(f32) -> f32,
    gain: impl Fn(f32) -> f32,
) -> Vec<f32> {
    let dt = 1.0 / sample_rate as f32;
    let mut phase = 0.0f32;
    (0..len)
        .map(|i| {
            let t = i as f32 * dt;
            let s = wave.at(phase) * gain(t);
            phase = (phase + freq(t) * dt).fract();
            s
        })
        .collect()
}

/// Add `src` into `dst` starting at sample 0
fn mix_into(dst: &mut [f32], src: &[f32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d += s;
    }
}

/// 50 ms square click sweeping 150 -> 40 Hz, fading from `intensity`.
pub fn tick_samples(intensity: f32, sample_rate: u32) -> Vec<f32> {
    let len = sample_count(TICK_SECS, sample_rate);
    if intensity <= 0.0 {
        return vec![0.0; len];
    }
    let start = intensity.min(1.0).max(TICK_FLOOR_GAIN);
    render(
        Wave::Square,
        len,
        sample_rate,
        |t| exp_ramp(TICK_FREQ.0, TICK_FREQ.1, t / TICK_SECS),
        |t| exp_ramp(start, TICK_FLOOR_GAIN, t / TICK_SECS),
    )
}

/// Gain of one chord voice: linear attack, then exponential decay.
fn fanfare_envelope(t: f32) -> f32 {
    if t < FANFARE_ATTACK_SECS {
        FANFARE_PEAK_GAIN * t / FANFARE_ATTACK_SECS
    } else {
        let decay = (t - FANFARE_ATTACK_SECS) / (FANFARE_SECS - FANFARE_ATTACK_SECS);
        exp_ramp(FANFARE_PEAK_GAIN, FANFARE_TAIL_GAIN, decay)
    }
}

/// 1.5 s C major triangle chord plus a short rising sawtooth accent.
pub fn fanfare_samples(sample_rate: u32) -> Vec<f32> {
    let len = sample_count(FANFARE_SECS, sample_rate);
    let mut out = vec![0.0; len];

    for freq in FANFARE_CHORD {
        let voice = render(Wave::Triangle, len, sample_rate, |_| freq, fanfare_envelope);
        mix_into(&mut out, &voice);
    }

    let accent = render(
        Wave::Sawtooth,
        sample_count(ACCENT_SECS, sample_rate),
        sample_rate,
        |t| exp_ramp(ACCENT_FREQ.0, ACCENT_FREQ.1, t / ACCENT_SECS),
        |t| exp_ramp(ACCENT_GAIN.0, ACCENT_GAIN.1, t / ACCENT_SECS),
    );
    mix_into(&mut out, &accent);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 48_000;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_tick_length_and_gain() {
        let tick = tick_samples(0.15, RATE);
        assert_eq!(tick.len(), 2400);
        assert!((tick[0].abs() - 0.15).abs() < 1e-6);
        assert!(peak(&tick) <= 0.15 + 1e-6);
        // decayed to the floor by the end
        assert!(tick.last().unwrap().abs() < 0.0012);
    }

    #[test]
    fn test_tick_intensity_scales() {
        assert!(peak(&tick_samples(0.05, RATE)) < peak(&tick_samples(0.15, RATE)));
        assert_eq!(peak(&tick_samples(0.0, RATE)), 0.0);
    }

    #[test]
    fn test_fanfare_length_and_bounds() {
        let fanfare = fanfare_samples(RATE);
        assert_eq!(fanfare.len(), 72_000);
        // starts silent apart from the accent, never clips
        assert!(fanfare[0].abs() <= 0.1 + 1e-6);
        assert!(peak(&fanfare) <= 4.0 * FANFARE_PEAK_GAIN + ACCENT_GAIN.0);
        assert!(peak(&fanfare) < 1.0);
        assert!(peak(&fanfare[fanfare.len() - 100..]) < 0.05);
    }

    #[test]
    fn test_fanfare_envelope() {
        assert_eq!(fanfare_envelope(0.0), 0.0);
        assert!((fanfare_envelope(0.05) - 0.1).abs() < 1e-6);
        assert!((fanfare_envelope(0.1) - 0.2).abs() < 1e-6);
        assert!((fanfare_envelope(1.5) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_waves_in_range() {
        for wave in [Wave::Square, Wave::Triangle, Wave::Sawtooth] {
            for i in 0..100 {
                let v = wave.at(i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }
}
