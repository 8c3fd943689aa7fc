/// Controller loop under a paused tokio clock
use solfege::config::TrainerConfig;
use solfege::controller::{Command, Controller};
use solfege::interval::IntervalQuality;
use solfege::pitch::PitchClass;
use solfege::prompt::{IntervalPrompt, ScriptedPrompts};
use solfege::scale::ScaleMode;
use solfege::session::{Feedback, Phase};
use solfege::synth::{ToneSpec, ToneSynth};
use solfege::trainer::Trainer;
use std::time::Duration;
use tokio::time::sleep;

fn silent_trainer() -> Trainer {
    Trainer::new(
        ToneSynth::silent(ToneSpec::default()),
        Box::new(ScriptedPrompts::new([
            IntervalPrompt::new(PitchClass::G, IntervalQuality::MajorThird),
            IntervalPrompt::new(PitchClass::D, IntervalQuality::PerfectFifth),
        ])),
        &TrainerConfig::default(),
    )
}

fn configure(handle: &solfege::controller::TrainerHandle) {
    handle.send(Command::SelectRoot(PitchClass::C));
    handle.send(Command::SelectMode(ScaleMode::Ionian));
}

#[tokio::test(start_paused = true)]
async fn test_deferred_tasks_fire_on_schedule() {
    let (controller, handle) = Controller::new(silent_trainer());

    let driver = async move {
        configure(&handle);
        handle.send(Command::StartIntervalTraining);
        sleep(Duration::from_millis(10)).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, Phase::IntervalDictation);
        assert_eq!(snapshot.prompt_root, Some(PitchClass::G));
        assert!(snapshot.awaiting_answer);

        handle.send(Command::SubmitAnswer(PitchClass::B));
        sleep(Duration::from_millis(10)).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.feedback, Feedback::Correct);
        assert_eq!(snapshot.correct_count, 1);
        assert!(!snapshot.awaiting_answer);

        // Feedback reverts after half a second
        sleep(Duration::from_millis(600)).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.feedback, Feedback::Neutral);
        assert!(!snapshot.awaiting_answer);

        // Next prompt one second after the answer
        sleep(Duration::from_millis(500)).await;
        let snapshot = handle.snapshot();
        assert!(snapshot.awaiting_answer);
        assert_eq!(snapshot.prompt_root, Some(PitchClass::D));
        assert_eq!(snapshot.last_answered, None);

        handle.send(Command::Stop);
        sleep(Duration::from_millis(10)).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, Phase::Finished);
        assert_eq!(snapshot.elapsed_secs, 1);

        handle.send(Command::Shutdown);
    };

    let (trainer, ()) = tokio::join!(controller.run(), driver);
    assert_eq!(trainer.session().correct_count, 1);
    assert_eq!(trainer.phase(), Phase::Finished);
}

#[tokio::test(start_paused = true)]
async fn test_new_session_discards_scheduled_prompt() {
    let (controller, handle) = Controller::new(silent_trainer());

    let driver = async move {
        configure(&handle);
        handle.send(Command::StartIntervalTraining);
        handle.send(Command::SubmitAnswer(PitchClass::C));
        handle.send(Command::NewSession);
        configure(&handle);
        handle.send(Command::StartScaleTraining);

        sleep(Duration::from_secs(3)).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, Phase::ScaleDictation);
        assert_eq!(snapshot.error_count, 0);
        assert_eq!(snapshot.feedback, Feedback::Neutral);
        assert_eq!(snapshot.prompt_root, None);

        handle.send(Command::Shutdown);
    };

    let ((), trainer) = tokio::join!(driver, controller.run());
    assert!(trainer.pending_tasks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_elapsed_time_republished_every_second() {
    let (controller, mut handle) = Controller::new(silent_trainer());

    let driver = async move {
        configure(&handle);
        handle.send(Command::StartScaleTraining);

        let mut elapsed = 0;
        while elapsed < 3 {
            let snapshot = handle.changed().await.expect("controller running");
            elapsed = snapshot.elapsed_secs;
        }
        assert_eq!(handle.snapshot().phase, Phase::ScaleDictation);
        handle.send(Command::Shutdown);
    };

    tokio::join!(controller.run(), driver);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_every_handle_stops_controller() {
    let (controller, handle) = Controller::new(silent_trainer());
    drop(handle);
    let trainer = controller.run().await;
    assert_eq!(trainer.phase(), Phase::Unconfigured);
}
