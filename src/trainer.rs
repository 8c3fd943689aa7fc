//! Training session state machine
//!
//! ```text
//! Unconfigured ──start──▶ ScaleDictation ──scale complete──▶ IntervalDictation
//!      ▲          └─────────start─────────────────────────────────▲     │
//!      │                                                               stop
//!      └──────────────new session──────────── Finished ◀───────────────┘
//! ```
//!
//! The trainer owns the [`Session`], the deferred task queue and the tone
//! synthesizer. It is driven from a single thread: the controller loop calls
//! the request methods, fires due tasks with [`Trainer::run_due`] and reads
//! [`Trainer::snapshot`] after each change.
//!
//! Requests that are not valid in the current state are ignored. They log
//! at debug level and leave the session untouched.

use crate::config::{TimingConfig, TrainerConfig};
use crate::deferred::{DeferredAction, Epoch, ScheduledTask, TaskQueue};
use crate::error::{TrainerError, TrainerResult};
use crate::interval::IntervalQuality;
use crate::pitch::PitchClass;
use crate::prompt::{IntervalPrompt, PromptSource, RandomPrompts};
use crate::scale::ScaleMode;
use crate::session::{Feedback, Phase, Session, Summary};
use crate::synth::{ToneSpec, ToneSynth};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info};

pub struct Trainer {
    session: Session,
    /// Most recently issued epoch; the live session always carries it
    epoch: Epoch,
    tasks: TaskQueue,
    synth: ToneSynth,
    prompts: Box<dyn PromptSource>,
    timing: TimingConfig,
    present_intervals: bool,
}

/// Read-only view of the trainer for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub root: Option<PitchClass>,
    pub mode: Option<ScaleMode>,
    pub correct_count: u32,
    pub error_count: u32,
    pub elapsed_secs: u64,
    pub feedback: Feedback,
    pub last_answered: Option<PitchClass>,
    pub scale: Vec<PitchClass>,
    pub pattern: Option<String>,
    pub scale_progress_index: usize,
    pub prompt_root: Option<PitchClass>,
    pub prompt_quality: Option<IntervalQuality>,
    /// An interval prompt is open for an answer
    pub awaiting_answer: bool,
    pub accuracy: Option<f64>,
    pub audible: bool,
}

impl Snapshot {
    /// Score report built from the published counters
    pub fn summary(&self) -> Summary {
        Summary {
            correct: self.correct_count,
            errors: self.error_count,
            duration: std::time::Duration::from_secs(self.elapsed_secs),
            accuracy: self.accuracy,
        }
    }
}

impl Trainer {
    pub fn new(synth: ToneSynth, prompts: Box<dyn PromptSource>, config: &TrainerConfig) -> Self {
        let epoch = Epoch::default();
        Self {
            session: Session::new(epoch),
            epoch,
            tasks: TaskQueue::new(),
            synth,
            prompts,
            timing: config.timing.clone(),
            present_intervals: config.present_intervals,
        }
    }

    /// Trainer on the default audio device with random prompts
    pub fn from_config(config: &TrainerConfig) -> Self {
        let synth = ToneSynth::with_default_output(ToneSpec::from(&config.tone));
        Self::with_synth(synth, config)
    }

    /// Random prompts, seeded from the config when it has a seed
    pub fn with_synth(synth: ToneSynth, config: &TrainerConfig) -> Self {
        let prompts: Box<dyn PromptSource> = match config.seed {
            Some(seed) => Box::new(RandomPrompts::seeded(seed)),
            None => Box::new(RandomPrompts::from_entropy()),
        };
        Self::new(synth, prompts, config)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Prompt awaiting (or just given) an answer
    pub fn interval_prompt(&self) -> Option<IntervalPrompt> {
        self.session.interval_prompt
    }

    pub fn select_root_pitch(&mut self, pitch: PitchClass) {
        let result = self.ensure_configurable().map(|session| session.root = Some(pitch));
        absorb(result, "root selection");
    }

    pub fn select_scale_mode(&mut self, mode: ScaleMode) {
        let result = self.ensure_configurable().map(|session| session.mode = Some(mode));
        absorb(result, "mode selection");
    }

    pub fn start_scale_training(&mut self) {
        let result = self.start(Phase::ScaleDictation);
        absorb(result, "scale training start");
    }

    pub fn start_interval_training(&mut self) {
        let result = self.start(Phase::IntervalDictation);
        absorb(result, "interval training start");
    }

    /// Score an answer against whatever the active phase expects
    pub fn submit_answer(&mut self, pitch: PitchClass) {
        let result = match self.session.phase {
            Phase::Unconfigured => Err(TrainerError::InactivePrompt),
            Phase::Finished => Err(TrainerError::SessionFinished),
            Phase::ScaleDictation => self.answer_scale(pitch),
            Phase::IntervalDictation => self.answer_interval(pitch),
        };
        absorb(result, "answer");
    }

    /// Play the current interval prompt again
    pub fn replay_prompt(&mut self) {
        let result = match (self.session.phase, self.session.interval_prompt) {
            (Phase::IntervalDictation, Some(prompt)) => {
                self.synth.play_sequence(&prompt.notes());
                Ok(())
            }
            _ => Err(TrainerError::InactivePrompt),
        };
        absorb(result, "prompt replay");
    }

    /// End the running dictation and freeze the score
    pub fn stop(&mut self) {
        let result = match self.session.phase {
            Phase::ScaleDictation | Phase::IntervalDictation => {
                let epoch = self.advance_epoch();
                self.session.epoch = epoch;
                self.session.phase = Phase::Finished;
                self.session.end_time = Some(Instant::now());
                self.session.interval_prompt = None;
                self.session.prompt_answered = false;
                self.session.feedback = Feedback::Neutral;
                info!(
                    "Session finished: {} correct, {} errors",
                    self.session.correct_count, self.session.error_count
                );
                Ok(())
            }
            Phase::Finished => Err(TrainerError::SessionFinished),
            Phase::Unconfigured => Err(TrainerError::InactivePrompt),
        };
        absorb(result, "stop");
    }

    /// Discard the session, configuration included
    pub fn new_session(&mut self) {
        let epoch = self.advance_epoch();
        self.session = Session::new(epoch);
        info!("New session ({})", epoch);
    }

    /// Earliest deadline among pending deferred tasks
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.next_due()
    }

    /// Pending deferred tasks in firing order
    pub fn pending_tasks(&self) -> Vec<ScheduledTask> {
        self.tasks.pending()
    }

    /// Fire every deferred task due at `now`; returns how many fired
    pub fn run_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(task) = self.tasks.pop_due(now) {
            self.fire(task);
            fired += 1;
        }
        fired
    }

    /// Apply a deferred task if it still belongs to the live session
    pub fn fire(&mut self, task: ScheduledTask) {
        if task.epoch != self.session.epoch {
            debug!(
                "Dropping {:?} from {} (live session is {})",
                task.action, task.epoch, self.session.epoch
            );
            return;
        }

        match task.action {
            DeferredAction::RevertFeedback { answer } => {
                if answer == self.session.answer_serial {
                    self.session.feedback = Feedback::Neutral;
                }
            }
            DeferredAction::NextIntervalPrompt { answer } => {
                if self.session.phase == Phase::IntervalDictation
                    && self.session.prompt_answered
                    && answer == self.session.answer_serial
                {
                    self.session.last_answered = None;
                    self.present_next_prompt();
                }
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> Snapshot {
        let session = &self.session;
        Snapshot {
            phase: session.phase,
            root: session.root,
            mode: session.mode,
            correct_count: session.correct_count,
            error_count: session.error_count,
            elapsed_secs: session.duration_at(now).as_secs(),
            feedback: session.feedback,
            last_answered: session.last_answered,
            scale: session.scale(),
            pattern: session.pattern(),
            scale_progress_index: session.scale_progress_index,
            prompt_root: session.interval_prompt.map(|prompt| prompt.root),
            prompt_quality: session.interval_prompt.map(|prompt| prompt.quality),
            awaiting_answer: session.interval_prompt.is_some() && !session.prompt_answered,
            accuracy: session.accuracy_percent(),
            audible: self.synth.is_audible(),
        }
    }

    fn ensure_configurable(&mut self) -> TrainerResult<&mut Session> {
        match self.session.phase {
            Phase::Unconfigured => Ok(&mut self.session),
            Phase::Finished => Err(TrainerError::SessionFinished),
            Phase::ScaleDictation | Phase::IntervalDictation => Err(TrainerError::NotConfigurable),
        }
    }

    /// Issue a fresh epoch and cancel everything scheduled before it
    fn advance_epoch(&mut self) -> Epoch {
        self.epoch = self.epoch.next();
        self.tasks.cancel_before(self.epoch);
        self.epoch
    }

    fn start(&mut self, phase: Phase) -> TrainerResult<()> {
        if !self.session.is_configured() {
            return Err(TrainerError::ConfigurationIncomplete);
        }

        let epoch = self.advance_epoch();
        self.session.reset(epoch);
        self.session.start_time = Some(Instant::now());

        match phase {
            Phase::IntervalDictation => self.enter_interval_dictation()?,
            _ => self.session.phase = phase,
        }

        info!(
            "Started {:?} on {} {} ({})",
            self.session.phase,
            self.session.root.map(|r| r.name()).unwrap_or("?"),
            self.session.mode.map(|m| m.name()).unwrap_or("?"),
            epoch
        );
        Ok(())
    }

    fn enter_interval_dictation(&mut self) -> TrainerResult<()> {
        let scale = self.session.scale();
        let prompt = self
            .prompts
            .next_prompt(&scale)
            .ok_or(TrainerError::InactivePrompt)?;

        self.session.phase = Phase::IntervalDictation;
        self.set_prompt(prompt);
        Ok(())
    }

    fn present_next_prompt(&mut self) {
        let scale = self.session.scale();
        match self.prompts.next_prompt(&scale) {
            Some(prompt) => self.set_prompt(prompt),
            // Keep the old prompt so the phase always has one
            None => self.session.prompt_answered = false,
        }
    }

    fn set_prompt(&mut self, prompt: IntervalPrompt) {
        debug!("Interval prompt: {} + {}", prompt.root, prompt.quality);
        self.session.interval_prompt = Some(prompt);
        self.session.prompt_answered = false;
        if self.present_intervals {
            self.synth.play_sequence(&prompt.notes());
        }
    }

    /// Count the answer, set feedback and schedule its revert
    fn record_answer(&mut self, correct: bool) -> u64 {
        let session = &mut self.session;
        session.answer_serial += 1;
        if correct {
            session.correct_count += 1;
            session.feedback = Feedback::Correct;
        } else {
            session.error_count += 1;
            session.feedback = Feedback::Incorrect;
        }

        let answer = session.answer_serial;
        self.tasks.schedule(
            Instant::now() + self.timing.feedback_revert(),
            session.epoch,
            DeferredAction::RevertFeedback { answer },
        );
        answer
    }

    fn answer_scale(&mut self, pitch: PitchClass) -> TrainerResult<()> {
        let scale = self.session.scale();
        let expected = *scale
            .get(self.session.scale_progress_index)
            .ok_or(TrainerError::InactivePrompt)?;

        let correct = pitch == expected;
        self.record_answer(correct);
        if !correct {
            return Ok(());
        }

        self.session.last_answered = Some(pitch);
        self.synth.play(pitch);
        self.session.scale_progress_index += 1;

        if self.session.scale_progress_index >= scale.len() {
            info!("Scale complete, moving on to intervals");
            self.session.scale_progress_index = 0;
            if let Err(e) = self.enter_interval_dictation() {
                debug!("Could not start intervals: {}", e);
            }
        }
        Ok(())
    }

    fn answer_interval(&mut self, pitch: PitchClass) -> TrainerResult<()> {
        let prompt = self
            .session
            .interval_prompt
            .ok_or(TrainerError::InactivePrompt)?;
        if self.session.prompt_answered {
            return Err(TrainerError::InactivePrompt);
        }

        let correct = pitch == prompt.target();
        let answer = self.record_answer(correct);
        self.session.last_answered = correct.then_some(pitch);
        self.session.prompt_answered = true;

        self.tasks.schedule(
            Instant::now() + self.timing.next_prompt_delay(),
            self.session.epoch,
            DeferredAction::NextIntervalPrompt { answer },
        );
        Ok(())
    }
}

fn absorb(result: TrainerResult<()>, request: &str) {
    if let Err(e) = result {
        debug!("Ignoring {}: {}", request, e);
    }
}
