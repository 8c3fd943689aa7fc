//! Async controller loop
//!
//! Owns the [`Trainer`] and serializes everything that touches it: user
//! commands, deferred tasks coming due, and a once-a-second tick that keeps
//! the elapsed time fresh. After each event the current [`Snapshot`] is
//! published on a watch channel.
//!
//! The trainer holds the audio stream, which is not `Send`, so the loop is
//! awaited on the thread that built it rather than spawned.

use crate::pitch::PitchClass;
use crate::scale::ScaleMode;
use crate::trainer::{Snapshot, Trainer};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Requests from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectRoot(PitchClass),
    SelectMode(ScaleMode),
    StartScaleTraining,
    StartIntervalTraining,
    SubmitAnswer(PitchClass),
    ReplayPrompt,
    Stop,
    NewSession,
    Shutdown,
}

/// Sending side of the controller plus a view of its snapshots
#[derive(Clone)]
pub struct TrainerHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl TrainerHandle {
    /// Queue a command; false once the controller has stopped
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait for the next published change; `None` once the controller is gone
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.snapshots.changed().await.ok()?;
        Some(self.snapshots.borrow_and_update().clone())
    }
}

pub struct Controller {
    trainer: Trainer,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Snapshot>,
}

impl Controller {
    pub fn new(trainer: Trainer) -> (Self, TrainerHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(trainer.snapshot());

        let controller = Self {
            trainer,
            commands: command_rx,
            snapshots: snapshot_tx,
        };
        let handle = TrainerHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (controller, handle)
    }

    /// Run until `Shutdown` arrives or every handle is dropped.
    ///
    /// Returns the trainer so the caller can inspect the final session.
    pub async fn run(mut self) -> Trainer {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let next_due = self.trainer.next_due();

            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(Command::Shutdown) | None => break,
                        Some(command) => self.handle(command),
                    }
                }
                _ = sleep_until_due(next_due) => {
                    let fired = self.trainer.run_due(Instant::now());
                    debug!("Fired {} deferred task(s)", fired);
                }
                _ = ticker.tick() => {}
            }

            self.publish();
        }

        info!("Controller stopped");
        self.trainer
    }

    fn handle(&mut self, command: Command) {
        debug!("Command: {:?}", command);
        match command {
            Command::SelectRoot(pitch) => self.trainer.select_root_pitch(pitch),
            Command::SelectMode(mode) => self.trainer.select_scale_mode(mode),
            Command::StartScaleTraining => self.trainer.start_scale_training(),
            Command::StartIntervalTraining => self.trainer.start_interval_training(),
            Command::SubmitAnswer(pitch) => self.trainer.submit_answer(pitch),
            Command::ReplayPrompt => self.trainer.replay_prompt(),
            Command::Stop => self.trainer.stop(),
            Command::NewSession => self.trainer.new_session(),
            Command::Shutdown => {}
        }
    }

    fn publish(&self) {
        let next = self.trainer.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

async fn sleep_until_due(due: Option<Instant>) {
    match due {
        Some(due) => tokio::time::sleep_until(due).await,
        None => std::future::pending().await,
    }
}
