//! Audio cue sink playing synthesized tones through the default output.
//!
//! A dedicated thread owns the cpal stream (streams are not `Send` on every
//! backend). Cues reach it over a channel; the thread renders them at the
//! device rate and hands finished buffers to the stream callback, which
//! mixes every active voice. Dropping the sink closes the channel and the
//! thread tears the stream down.

use std::thread::JoinHandle;

use anyhow::{Context, Result, anyhow, bail};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};

use super::{fanfare_samples, tick_samples};
use crate::core::audio::{AudioCue, AudioCueSink};

pub struct CpalAudio {
    cue_tx: Option<Sender<AudioCue>>,
    thread: Option<JoinHandle<()>>,
}

impl CpalAudio {
    /// Open the default output device. Fails if there is none or the
    /// stream cannot be started; callers usually fall back to `NullAudio`.
    pub fn new() -> Result<Self> {
        let (cue_tx, cue_rx) = crossbeam_channel::unbounded();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), String>>(1);

        let thread = std::thread::Builder::new()
            .name("audio".to_string())
            .spawn(move || run_audio_thread(cue_rx, ready_tx))
            .context("Failed to spawn audio thread")?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                cue_tx: Some(cue_tx),
                thread: Some(thread),
            }),
            Ok(Err(e)) => {
                thread.join().ok();
                Err(anyhow!(e))
            }
            Err(_) => bail!("Audio thread exited during startup"),
        }
    }

    fn send(&self, cue: AudioCue) {
        if let Some(tx) = &self.cue_tx
            && tx.send(cue).is_err()
        {
            debug!("Audio thread gone, dropping {:?}", cue);
        }
    }
}

impl AudioCueSink for CpalAudio {
    fn emit_tick(&self, intensity: f32) {
        self.send(AudioCue::Tick(intensity));
    }

    fn emit_completion_fanfare(&self) {
        self.send(AudioCue::Fanfare);
    }
}

impl Drop for CpalAudio {
    fn drop(&mut self) {
        self.cue_tx.take();
        if let Some(handle) = self.thread.take() {
            handle.join().ok();
        }
    }
}

/// A buffer being played and how far into it we are
struct Voice {
    samples: Vec<f32>,
    pos: usize,
}

fn run_audio_thread(cue_rx: Receiver<AudioCue>, ready_tx: Sender<Result<(), String>>) {
    let (sample_rate, voice_tx, _stream) = match open_stream() {
        Ok(opened) => opened,
        Err(e) => {
            ready_tx.send(Err(format!("{:#}", e))).ok();
            return;
        }
    };
    ready_tx.send(Ok(())).ok();
    info!("Audio output started at {} Hz", sample_rate);

    // Blocks until the sink is dropped
    for cue in cue_rx.iter() {
        let samples = match cue {
            AudioCue::Tick(intensity) => tick_samples(intensity, sample_rate),
            AudioCue::Fanfare => fanfare_samples(sample_rate),
        };
        if voice_tx.send(Voice { samples, pos: 0 }).is_err() {
            warn!("Audio stream closed, stopping audio thread");
            break;
        }
    }
    debug!("Audio thread stopped");
}

fn open_stream() -> Result<(u32, Sender<Voice>, cpal::Stream)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("No output device available")?;
    let supported = device
        .default_output_config()
        .context("No default output config")?;
    if supported.sample_format() != cpal::SampleFormat::F32 {
        bail!("Unsupported sample format {:?}", supported.sample_format());
    }

    let config: cpal::StreamConfig = supported.config();
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0;
    let (voice_tx, voice_rx) = crossbeam_channel::unbounded::<Voice>();
    let mut voices: Vec<Voice> = Vec::new();

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                voices.extend(voice_rx.try_iter());
                for frame in data.chunks_mut(channels) {
                    let mut mixed = 0.0f32;
                    for voice in voices.iter_mut() {
                        if let Some(s) = voice.samples.get(voice.pos) {
                            mixed += s;
                            voice.pos += 1;
                        }
                    }
                    frame.fill(mixed.clamp(-1.0, 1.0));
                }
                voices.retain(|v| v.pos < v.samples.len());
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )
        .context("Failed to build output stream")?;
    stream.play().context("Failed to start output stream")?;

    Ok((sample_rate, voice_tx, stream))
}
