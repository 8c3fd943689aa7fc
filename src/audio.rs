//! Real-time audio output using cpal
//! Works with JACK, ALSA, OpenSL ES (Android/Termux), CoreAudio, WASAPI.
//!
//! The engine is created once and lives for the whole process. Buffers are
//! queued from the trainer's thread and drained by the device callback, one
//! after another with no overlap.

use crate::error::{AudioError, AudioResult};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info};

pub struct AudioEngine {
    sample_rate: u32,
    player: Arc<Mutex<Player>>,
    _stream: cpal::Stream,
}

/// FIFO of mono buffers played strictly one at a time
#[derive(Default)]
pub(crate) struct Player {
    current: Option<Voice>,
    pending: VecDeque<Vec<f32>>,
}

struct Voice {
    samples: Vec<f32>,
    position: usize,
}

impl AudioEngine {
    pub fn new() -> AudioResult<Self> {
        // Get the default audio host (JACK/ALSA/OpenSL ES/etc)
        let host = cpal::default_host();
        info!("Audio host: {:?}", host.id());

        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        info!("Audio device: {}", device.name()?);

        let config = device.default_output_config()?;
        info!("Audio config: {:?}", config);

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        let player = Arc::new(Mutex::new(Player::default()));
        let player_clone = player.clone();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config.into(), player_clone, channels)
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config.into(), player_clone, channels)
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config.into(), player_clone, channels)
            }
            other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        }?;

        stream.play()?;
        info!("Audio stream started at {} Hz", sample_rate);

        Ok(Self {
            sample_rate,
            player,
            _stream: stream,
        })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        player: Arc<Mutex<Player>>,
        channels: usize,
    ) -> AudioResult<cpal::Stream>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                lock(&player).process_audio(data, channels);
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )?;

        Ok(stream)
    }

    /// Queue a mono buffer after everything already queued
    pub fn queue_buffer(&self, samples: Vec<f32>) {
        lock(&self.player).enqueue(samples);
    }

    /// True while a buffer is playing or waiting
    pub fn is_playing(&self) -> bool {
        lock(&self.player).is_busy()
    }

    pub fn get_sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// A panic in the callback must not silence every later tone
fn lock(player: &Mutex<Player>) -> MutexGuard<'_, Player> {
    player.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Player {
    pub(crate) fn enqueue(&mut self, samples: Vec<f32>) {
        if !samples.is_empty() {
            self.pending.push_back(samples);
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.current.is_some() || !self.pending.is_empty()
    }

    /// Next mono sample, advancing through the queue as buffers finish
    fn next_sample(&mut self) -> f32 {
        loop {
            if let Some(voice) = self.current.as_mut() {
                if voice.position < voice.samples.len() {
                    let sample = voice.samples[voice.position];
                    voice.position += 1;
                    return sample;
                }
            }

            self.current = self.pending.pop_front().map(|samples| Voice {
                samples,
                position: 0,
            });
            if self.current.is_none() {
                return 0.0;
            }
        }
    }

    pub(crate) fn process_audio<T>(&mut self, output: &mut [T], channels: usize)
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        for frame in output.chunks_mut(channels.max(1)) {
            let sample = self.next_sample().clamp(-1.0, 1.0);

            // Write to all channels (mono -> stereo/multi-channel)
            for channel in frame.iter_mut() {
                *channel = T::from_sample(sample);
            }
        }
    }
}
