//! Session aggregate: configuration, phase, score and timing
//!
//! The derived scale is never stored; it is recomputed from `(root, mode)`
//! whenever it is needed so it can't drift from the configuration.

use crate::deferred::Epoch;
use crate::pitch::PitchClass;
use crate::prompt::IntervalPrompt;
use crate::scale::ScaleMode;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Waiting for root and mode; no dictation running
    Unconfigured,
    /// Learner plays the scale back degree by degree
    ScaleDictation,
    /// Learner names the upper note of played intervals
    IntervalDictation,
    /// Stopped; read-only until reset
    Finished,
}

impl Phase {
    pub fn is_dictation(self) -> bool {
        matches!(self, Phase::ScaleDictation | Phase::IntervalDictation)
    }
}

/// Transient answer signal for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Feedback {
    #[default]
    Neutral,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub root: Option<PitchClass>,
    pub mode: Option<ScaleMode>,
    pub correct_count: u32,
    pub error_count: u32,
    pub start_time: Option<Instant>,
    pub end_time: Option<Instant>,
    pub phase: Phase,
    /// Next degree expected during scale dictation
    pub scale_progress_index: usize,
    /// Set exactly while `phase == IntervalDictation`
    pub interval_prompt: Option<IntervalPrompt>,
    /// The current prompt has been answered and the next one is pending
    pub prompt_answered: bool,
    /// Display only
    pub last_answered: Option<PitchClass>,
    pub feedback: Feedback,
    /// Count of answers submitted; identifies which answer set the feedback
    pub answer_serial: u64,
    pub epoch: Epoch,
}

impl Session {
    pub fn new(epoch: Epoch) -> Self {
        Self {
            root: None,
            mode: None,
            correct_count: 0,
            error_count: 0,
            start_time: None,
            end_time: None,
            phase: Phase::Unconfigured,
            scale_progress_index: 0,
            interval_prompt: None,
            prompt_answered: false,
            last_answered: None,
            feedback: Feedback::Neutral,
            answer_serial: 0,
            epoch,
        }
    }

    /// Zero every mutable field, keeping root and mode
    pub fn reset(&mut self, epoch: Epoch) {
        let (root, mode) = (self.root, self.mode);
        *self = Session::new(epoch);
        self.root = root;
        self.mode = mode;
    }

    pub fn is_configured(&self) -> bool {
        self.root.is_some() && self.mode.is_some()
    }

    /// Pitches of the configured scale, empty until configured
    pub fn scale(&self) -> Vec<PitchClass> {
        match (self.mode, self.root) {
            (Some(mode), Some(root)) => mode.pitches(root),
            _ => Vec::new(),
        }
    }

    /// Whole/half step pattern of the configured mode
    pub fn pattern(&self) -> Option<String> {
        self.mode.map(|mode| mode.pattern())
    }

    /// Time between start and stop; zero if never started.
    ///
    /// A running session measures up to `now`.
    pub fn duration_at(&self, now: Instant) -> Duration {
        match self.start_time {
            Some(start) => self.end_time.unwrap_or(now).saturating_duration_since(start),
            None => Duration::ZERO,
        }
    }

    /// Duration of a finished session; zero unless both ends are set
    pub fn duration(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    pub fn total_answers(&self) -> u32 {
        self.correct_count + self.error_count
    }

    /// Percentage of correct answers, one decimal; `None` before any answer
    pub fn accuracy_percent(&self) -> Option<f64> {
        accuracy_percent(self.correct_count, self.error_count)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            correct: self.correct_count,
            errors: self.error_count,
            duration: self.duration(),
            accuracy: self.accuracy_percent(),
        }
    }
}

/// `correct / (correct + errors) * 100` rounded to one decimal
pub fn accuracy_percent(correct: u32, errors: u32) -> Option<f64> {
    let total = correct + errors;
    if total == 0 {
        return None;
    }
    let raw = correct as f64 / total as f64 * 100.0;
    Some((raw * 10.0).round() / 10.0)
}

/// `mm:ss`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// End-of-session report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub correct: u32,
    pub errors: u32,
    pub duration: Duration,
    pub accuracy: Option<f64>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Correct:  {}", self.correct)?;
        writeln!(f, "Errors:   {}", self.errors)?;
        write!(f, "Duration: {}", format_duration(self.duration))?;
        if let Some(accuracy) = self.accuracy {
            write!(f, "\nAccuracy: {:.1}%", accuracy)?;
        }
        Ok(())
    }
}
