//! Interval prompts and where they come from

use crate::interval::IntervalQuality;
use crate::pitch::PitchClass;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::VecDeque;

/// A root pitch and the interval the learner must find above it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalPrompt {
    pub root: PitchClass,
    pub quality: IntervalQuality,
}

impl IntervalPrompt {
    pub fn new(root: PitchClass, quality: IntervalQuality) -> Self {
        Self { root, quality }
    }

    /// The expected answer
    pub fn target(&self) -> PitchClass {
        self.quality.above(self.root)
    }

    /// Root then target, the order they are presented in
    pub fn notes(&self) -> [PitchClass; 2] {
        [self.root, self.target()]
    }
}

/// Supplies interval prompts rooted on pitches of the current scale
pub trait PromptSource {
    /// Next prompt, or `None` if `scale` is empty
    fn next_prompt(&mut self, scale: &[PitchClass]) -> Option<IntervalPrompt>;
}

/// Uniform random root from the scale and uniform random quality
pub struct RandomPrompts<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomPrompts<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPrompts<StdRng> {
    /// Reproducible prompt stream
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> PromptSource for RandomPrompts<R> {
    fn next_prompt(&mut self, scale: &[PitchClass]) -> Option<IntervalPrompt> {
        let root = *scale.choose(&mut self.rng)?;
        let quality = *IntervalQuality::ALL.choose(&mut self.rng)?;
        Some(IntervalPrompt::new(root, quality))
    }
}

/// Replays a fixed list of prompts in order, then cycles.
///
/// Ignores the scale; used to force deterministic sessions.
#[derive(Debug, Clone)]
pub struct ScriptedPrompts {
    script: VecDeque<IntervalPrompt>,
}

impl ScriptedPrompts {
    pub fn new(prompts: impl IntoIterator<Item = IntervalPrompt>) -> Self {
        Self {
            script: prompts.into_iter().collect(),
        }
    }
}

impl PromptSource for ScriptedPrompts {
    fn next_prompt(&mut self, _scale: &[PitchClass]) -> Option<IntervalPrompt> {
        let prompt = self.script.pop_front()?;
        self.script.push_back(prompt);
        Some(prompt)
    }
}
