//! Offline rendering of tones to WAV files

use crate::pitch::PitchClass;
use crate::synth::{interleave, render_sequence, ToneSpec};
use std::path::Path;
use tracing::info;

/// Configuration for rendering audio
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Output channels; the mono tone is duplicated to each
    pub channels: u16,
    pub tone: ToneSpec,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            tone: ToneSpec::default(),
        }
    }
}

/// Render pitches back-to-back and write them as 16-bit PCM
pub fn render_to_file(
    pitches: &[PitchClass],
    config: &RenderConfig,
    path: &Path,
) -> Result<RenderStats, String> {
    info!("Rendering {} tones to {}", pitches.len(), path.display());

    let mono = render_sequence(pitches, &config.tone, config.sample_rate);
    write_wav(path, &mono, config.sample_rate, config.channels)?;

    Ok(RenderStats::from_samples(&mono, config.sample_rate))
}

/// Write mono samples to a WAV file, duplicated across `channels`
pub fn write_wav(path: &Path, mono: &[f32], sample_rate: u32, channels: u16) -> Result<(), String> {
    let channels = channels.max(1);
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| format!("Failed to create WAV file: {e}"))?;

    for sample in interleave(mono, channels as usize) {
        // Clamp to prevent overflow
        let scaled = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
        writer
            .write_sample(scaled)
            .map_err(|e| format!("Failed to write sample: {e}"))?;
    }

    writer
        .finalize()
        .map_err(|e| format!("Failed to finalize WAV: {e}"))?;

    Ok(())
}

/// Statistics about rendered audio
#[derive(Debug, Clone)]
pub struct RenderStats {
    pub duration: f32,
    pub sample_count: usize,
    pub rms: f32,
    pub peak: f32,
    pub zero_crossings: usize,
}

impl RenderStats {
    pub fn from_samples(samples: &[f32], sample_rate: u32) -> Self {
        let sample_count = samples.len();

        let rms = if sample_count == 0 {
            0.0
        } else {
            let sum_squares: f32 = samples.iter().map(|x| x * x).sum();
            (sum_squares / sample_count as f32).sqrt()
        };

        let peak = samples.iter().map(|x| x.abs()).fold(0.0f32, f32::max);

        // Zeros carry no sign; count sign changes between nonzero samples
        let mut zero_crossings = 0;
        let mut last_sign = 0.0f32;
        for &sample in samples {
            if sample != 0.0 {
                let sign = sample.signum();
                if last_sign != 0.0 && sign != last_sign {
                    zero_crossings += 1;
                }
                last_sign = sign;
            }
        }

        Self {
            duration: sample_count as f32 / sample_rate.max(1) as f32,
            sample_count,
            rms,
            peak,
            zero_crossings,
        }
    }

    /// Frequency estimate from zero crossings (two per cycle)
    pub fn estimated_frequency(&self) -> f32 {
        if self.duration > 0.0 {
            self.zero_crossings as f32 / (2.0 * self.duration)
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        println!("Render Statistics:");
        println!("  Duration:       {:.3} seconds", self.duration);
        println!("  Samples:        {}", self.sample_count);
        println!("  RMS:            {:.3}", self.rms);
        println!("  Peak:           {:.3}", self.peak);
        println!("  Zero Crossings: {}", self.zero_crossings);
        println!("  Est. Frequency: {:.1} Hz", self.estimated_frequency());
    }
}
