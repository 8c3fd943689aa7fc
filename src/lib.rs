//! # Solfege - Ear Training Core
//!
//! Solfege trains relative pitch in two exercises on top of a small music
//! theory model. The learner picks a root and one of the seven diatonic
//! modes, plays the scale back degree by degree, then names the upper note
//! of intervals played above pitches of that scale.
//!
//! ## Core Features
//!
//! - **Pitch Model**: twelve pitch classes with reference frequencies in the C4 octave
//! - **Scale Theory**: Ionian through Locrian, derived from the root by fixed offsets
//! - **Interval Theory**: minor second through major seventh
//! - **Tone Synthesis**: decaying sine tones, queued back-to-back on the output device
//! - **Session State Machine**: scoring, timing and feedback for both exercises
//! - **Deferred Tasks**: epoch-tagged follow-ups that die with their session
//!
//! ## Quick Start
//!
//! ```rust
//! use solfege::config::TrainerConfig;
//! use solfege::interval::IntervalQuality;
//! use solfege::pitch::PitchClass;
//! use solfege::prompt::{IntervalPrompt, ScriptedPrompts};
//! use solfege::scale::ScaleMode;
//! use solfege::session::Phase;
//! use solfege::synth::{ToneSpec, ToneSynth};
//! use solfege::trainer::Trainer;
//!
//! let prompts = ScriptedPrompts::new([IntervalPrompt::new(
//!     PitchClass::G,
//!     IntervalQuality::MajorThird,
//! )]);
//! let mut trainer = Trainer::new(
//!     ToneSynth::silent(ToneSpec::default()),
//!     Box::new(prompts),
//!     &TrainerConfig::default(),
//! );
//!
//! trainer.select_root_pitch(PitchClass::C);
//! trainer.select_scale_mode(ScaleMode::Ionian);
//! trainer.start_interval_training();
//! assert_eq!(trainer.phase(), Phase::IntervalDictation);
//!
//! // G plus a major third is B
//! trainer.submit_answer(PitchClass::B);
//! assert_eq!(trainer.session().correct_count, 1);
//! ```
//!
//! ## Architecture
//!
//! The [`trainer::Trainer`] is synchronous and owns all session state. The
//! [`controller::Controller`] drives it from a tokio loop, firing deferred
//! tasks when they come due and publishing [`trainer::Snapshot`]s for the
//! presentation layer. Live playback goes through [`audio::AudioEngine`]
//! (cpal); offline rendering through [`render`] (hound).

pub mod audio;
pub mod config;
pub mod controller;
pub mod deferred;
pub mod error;
pub mod interval;
pub mod pitch;
pub mod prompt;
pub mod render;
pub mod scale;
pub mod session;
pub mod synth;
pub mod trainer;
