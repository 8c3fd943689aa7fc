//! Tone synthesizer
//!
//! Renders pitch classes into decaying sine tones and hands the buffers to a
//! playback sink. Rendering is synchronous on the caller's thread; playback
//! belongs to the sink (normally [`crate::audio::AudioEngine`]).
//!
//! When no sink is available the synthesizer is silent: `play` and
//! `play_sequence` do nothing, and training continues unaffected.

use crate::audio::AudioEngine;
use crate::config::ToneConfig;
use crate::pitch::PitchClass;
use std::f64::consts::PI;
use tracing::{debug, warn};

/// Shape of a single rendered tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    /// Length in seconds
    pub duration_secs: f32,
    /// Peak amplitude at the first sample
    pub gain: f32,
}

impl Default for ToneSpec {
    fn default() -> Self {
        Self {
            duration_secs: 0.5,
            gain: 0.3,
        }
    }
}

impl From<&ToneConfig> for ToneSpec {
    fn from(config: &ToneConfig) -> Self {
        Self {
            duration_secs: config.duration_secs,
            gain: config.gain,
        }
    }
}

impl ToneSpec {
    /// Number of frames one tone occupies at `sample_rate`
    pub fn frame_count(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.duration_secs.max(0.0) as f64) as usize
    }
}

/// Render a mono sine tone at the pitch's reference frequency.
///
/// Amplitude is `spec.gain` shaped by a linear decay from 1.0 at the first
/// sample to 0.0 at the last.
pub fn render_tone(pitch: PitchClass, spec: &ToneSpec, sample_rate: u32) -> Vec<f32> {
    let frames = spec.frame_count(sample_rate);
    let freq = pitch.frequency();
    let sr = sample_rate as f64;
    let last = frames.saturating_sub(1).max(1) as f64;

    let mut buffer = Vec::with_capacity(frames);
    for i in 0..frames {
        let t = i as f64 / sr;
        let envelope = 1.0 - i as f64 / last;
        let sample = (2.0 * PI * freq * t).sin() * envelope * spec.gain as f64;
        buffer.push(sample as f32);
    }
    buffer
}

/// Render pitches back-to-back into one mono buffer with no gap
pub fn render_sequence(pitches: &[PitchClass], spec: &ToneSpec, sample_rate: u32) -> Vec<f32> {
    let mut buffer = Vec::with_capacity(spec.frame_count(sample_rate) * pitches.len());
    for &pitch in pitches {
        buffer.extend(render_tone(pitch, spec, sample_rate));
    }
    buffer
}

/// Duplicate a mono buffer across `channels` interleaved channels
pub fn interleave(mono: &[f32], channels: usize) -> Vec<f32> {
    let channels = channels.max(1);
    let mut out = Vec::with_capacity(mono.len() * channels);
    for &sample in mono {
        out.extend(std::iter::repeat(sample).take(channels));
    }
    out
}

/// Destination for rendered mono buffers.
///
/// Buffers play in the order they are enqueued, each starting when the
/// previous one ends.
pub trait ToneSink {
    /// Rate the sink plays at; buffers must be rendered at this rate
    fn sample_rate(&self) -> u32;

    /// Queue a mono buffer for playback without waiting for it
    fn enqueue(&self, samples: Vec<f32>);

    /// True while queued buffers are still playing
    fn is_busy(&self) -> bool {
        false
    }
}

impl ToneSink for AudioEngine {
    fn sample_rate(&self) -> u32 {
        self.get_sample_rate()
    }

    fn enqueue(&self, samples: Vec<f32>) {
        self.queue_buffer(samples);
    }

    fn is_busy(&self) -> bool {
        self.is_playing()
    }
}

/// Renders pitches and feeds them to a playback sink
pub struct ToneSynth {
    sink: Option<Box<dyn ToneSink>>,
    spec: ToneSpec,
}

impl ToneSynth {
    pub fn new(sink: Box<dyn ToneSink>, spec: ToneSpec) -> Self {
        Self {
            sink: Some(sink),
            spec,
        }
    }

    /// Synthesizer with no output; every play call is a no-op
    pub fn silent(spec: ToneSpec) -> Self {
        Self { sink: None, spec }
    }

    /// Open the default output device, falling back to silence if it fails
    pub fn with_default_output(spec: ToneSpec) -> Self {
        match AudioEngine::new() {
            Ok(engine) => Self::new(Box::new(engine), spec),
            Err(e) => {
                warn!("Audio unavailable, continuing without sound: {}", e);
                Self::silent(spec)
            }
        }
    }

    /// True when a playback sink is attached
    pub fn is_audible(&self) -> bool {
        self.sink.is_some()
    }

    /// True while the sink still has tones to play
    pub fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| sink.is_busy())
    }

    pub fn spec(&self) -> &ToneSpec {
        &self.spec
    }

    /// Render and queue one tone
    pub fn play(&self, pitch: PitchClass) {
        let Some(sink) = &self.sink else {
            return;
        };
        debug!("Playing {}", pitch);
        sink.enqueue(render_tone(pitch, &self.spec, sink.sample_rate()));
    }

    /// Render and queue tones back-to-back in order
    pub fn play_sequence(&self, pitches: &[PitchClass]) {
        let Some(sink) = &self.sink else {
            return;
        };
        debug!("Playing sequence {:?}", pitches);
        for &pitch in pitches {
            sink.enqueue(render_tone(pitch, &self.spec, sink.sample_rate()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const SAMPLE_RATE: u32 = 44100;

    struct RecordingSink {
        buffers: Rc<RefCell<Vec<Vec<f32>>>>,
    }

    impl ToneSink for RecordingSink {
        fn sample_rate(&self) -> u32 {
            8000
        }

        fn enqueue(&self, samples: Vec<f32>) {
            self.buffers.borrow_mut().push(samples);
        }
    }

    #[test]
    fn test_render_tone_length() {
        let spec = ToneSpec::default();
        let tone = render_tone(PitchClass::A, &spec, SAMPLE_RATE);
        assert_eq!(tone.len(), 22050);
    }

    #[test]
    fn test_render_tone_envelope_decays_to_zero() {
        let spec = ToneSpec::default();
        let tone = render_tone(PitchClass::A, &spec, SAMPLE_RATE);
        assert_eq!(tone[0], 0.0, "sine starts at zero phase");
        assert!(tone.last().unwrap().abs() < 1e-6, "last sample is fully decayed");

        let first_peak = tone[..200].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let last_peak = tone[tone.len() - 200..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(first_peak > 0.28 && first_peak <= 0.3, "first peak {}", first_peak);
        assert!(last_peak < 0.01, "tail peak {}", last_peak);
    }

    #[test]
    fn test_render_tone_respects_gain() {
        let spec = ToneSpec {
            duration_secs: 0.1,
            gain: 1.0,
        };
        let tone = render_tone(PitchClass::C, &spec, SAMPLE_RATE);
        assert!(tone.iter().all(|s| s.abs() <= 1.0));
        assert!(tone.iter().any(|s| s.abs() > 0.9));
    }

    #[test]
    fn test_zero_duration_renders_nothing() {
        let spec = ToneSpec {
            duration_secs: 0.0,
            gain: 0.3,
        };
        assert!(render_tone(PitchClass::C, &spec, SAMPLE_RATE).is_empty());
    }

    #[test]
    fn test_render_sequence_is_concatenation() {
        let spec = ToneSpec::default();
        let seq = render_sequence(&[PitchClass::C, PitchClass::G], &spec, SAMPLE_RATE);
        let c = render_tone(PitchClass::C, &spec, SAMPLE_RATE);
        let g = render_tone(PitchClass::G, &spec, SAMPLE_RATE);
        assert_eq!(seq.len(), c.len() + g.len());
        assert_eq!(&seq[..c.len()], &c[..]);
        assert_eq!(&seq[c.len()..], &g[..]);
    }

    #[test]
    fn test_interleave_duplicates_channels() {
        let stereo = interleave(&[0.1, -0.2], 2);
        assert_eq!(stereo, vec![0.1, 0.1, -0.2, -0.2]);
        assert_eq!(interleave(&[0.5], 0), vec![0.5]);
    }

    #[test]
    fn test_play_sequence_enqueues_in_order() {
        let buffers = Rc::new(RefCell::new(Vec::new()));
        let synth = ToneSynth::new(
            Box::new(RecordingSink {
                buffers: buffers.clone(),
            }),
            ToneSpec::default(),
        );

        synth.play_sequence(&[PitchClass::G, PitchClass::B]);
        synth.play(PitchClass::D);

        let recorded = buffers.borrow();
        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[0], render_tone(PitchClass::G, synth.spec(), 8000));
        assert_eq!(recorded[1], render_tone(PitchClass::B, synth.spec(), 8000));
        assert_eq!(recorded[2], render_tone(PitchClass::D, synth.spec(), 8000));
    }

    #[test]
    fn test_silent_synth_is_noop() {
        let synth = ToneSynth::silent(ToneSpec::default());
        assert!(!synth.is_audible());
        synth.play(PitchClass::C);
        assert!(!synth.is_busy());
        synth.play_sequence(&[PitchClass::C, PitchClass::E]);
    }
}
