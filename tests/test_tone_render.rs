/// Offline rendering of tones to WAV and back
use solfege::interval::IntervalQuality;
use solfege::pitch::PitchClass;
use solfege::prompt::IntervalPrompt;
use solfege::render::{render_to_file, write_wav, RenderConfig, RenderStats};
use solfege::scale::ScaleMode;
use solfege::synth::{render_tone, ToneSpec};

fn read_mono(path: &std::path::Path) -> (hound::WavSpec, Vec<f32>) {
    let reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let channels = spec.channels as usize;
    let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    let mono = samples
        .chunks(channels)
        .map(|frame| frame[0] as f32 / 32767.0)
        .collect();
    (spec, mono)
}

#[test]
fn test_tone_frequency_matches_pitch() {
    let spec = ToneSpec::default();
    for pitch in [PitchClass::C, PitchClass::A, PitchClass::B] {
        let tone = render_tone(pitch, &spec, 44100);
        let stats = RenderStats::from_samples(&tone, 44100);
        let estimate = stats.estimated_frequency() as f64;
        assert!(
            (estimate - pitch.frequency()).abs() < 5.0,
            "{}: estimated {:.1} Hz, expected {:.2} Hz",
            pitch,
            estimate,
            pitch.frequency()
        );
    }
}

#[test]
fn test_rendered_interval_is_root_then_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("interval.wav");
    let prompt = IntervalPrompt::new(PitchClass::G, IntervalQuality::MajorThird);

    let config = RenderConfig::default();
    let stats = render_to_file(&prompt.notes(), &config, &path).unwrap();
    assert_eq!(stats.sample_count, 2 * 22050);
    assert!((stats.duration - 1.0).abs() < 1e-6);
    assert!(stats.peak <= 0.3 + 1e-6);

    let (spec, mono) = read_mono(&path);
    assert_eq!(spec.channels, 2);
    assert_eq!(mono.len(), 2 * 22050);

    let first = RenderStats::from_samples(&mono[..22050], 44100);
    let second = RenderStats::from_samples(&mono[22050..], 44100);
    assert!((first.estimated_frequency() - 392.0).abs() < 5.0);
    assert!((second.estimated_frequency() - 493.9).abs() < 5.0);
}

#[test]
fn test_render_scale_mono() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scale.wav");
    let config = RenderConfig {
        sample_rate: 22050,
        channels: 1,
        tone: ToneSpec {
            duration_secs: 0.25,
            gain: 0.5,
        },
    };

    let pitches = ScaleMode::Phrygian.pitches(PitchClass::E);
    let stats = render_to_file(&pitches, &config, &path).unwrap();
    assert_eq!(stats.sample_count, 7 * 5512);

    let (spec, mono) = read_mono(&path);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(mono.len(), 7 * 5512);
    assert!(mono.iter().all(|s| s.abs() <= 0.5 + 1e-3));
}

#[test]
fn test_write_wav_clamps_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loud.wav");
    write_wav(&path, &[2.0, -2.0, 0.0], 8000, 1).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![32767, -32767, 0]);
}

#[test]
fn test_write_wav_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.wav");
    let err = write_wav(&path, &[0.0], 8000, 2).unwrap_err();
    assert!(err.contains("Failed to create WAV file"));
}
