use cadence::ManualClock;
use chrono::{DateTime, Duration, Utc};
use deck_shuffle::DeckRng;
use rand::Rng;
use vocab_data::{Catalog, VocabularyDataSource};

use crate::cards::{PracticeMode, PracticeSize};
use crate::config::PracticeConfig;
use crate::Practice;

/// How a simulated learner answers each card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, parse_display::Display, parse_display::FromStr)]
#[display(style = "kebab-case")]
pub enum AnswerPolicy {
    AlwaysCorrect,
    /// Misses every card until it comes back in the review pass.
    MissUntilReview,
    /// Answers correctly with the given probability, in percent.
    #[display("accuracy:{percent}")]
    Accuracy { percent: u8 },
}

/// One answered card.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub card_id: String,
    pub correct: bool,
    /// The card's wrong answers after this one.
    pub card_wrong_count: u32,
    pub is_review_mode: bool,
    pub remaining: usize,
    pub pending_review: usize,
}

/// Iterator that runs a session card by card, always taking the first card of the deck and
/// letting virtual time pass for every reveal and resolution. Yields one [`StepRecord`] per
/// answer and stops when the session is complete or after `max_steps` answers.
pub struct SessionSimulation {
    practice: Practice,
    clock: ManualClock,
    policy: AnswerPolicy,
    rng: DeckRng,
    steps: usize,
    max_steps: usize,
}

impl SessionSimulation {
    /// The start time and seed make the simulation deterministic: callers must choose them.
    pub fn new(
        catalog: Catalog,
        config: PracticeConfig,
        policy: AnswerPolicy,
        start_time: DateTime<Utc>,
        seed: u64,
    ) -> Self {
        let clock = ManualClock::new(start_time);
        let practice = Practice::with_clock(catalog, config, Box::new(clock.clone()), seed);
        Self {
            practice,
            clock,
            policy,
            // Answers draw from their own stream so policies don't disturb the deck shuffles.
            rng: deck_shuffle::seeded_rng(seed.wrapping_add(1)),
            steps: 0,
            max_steps: 10_000,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn start(
        mut self,
        source: VocabularyDataSource,
        size: PracticeSize,
        custom_count: &str,
        mode: PracticeMode,
    ) -> Self {
        self.practice
            .start_session(source, size, custom_count, mode);
        self
    }

    pub fn practice(&self) -> &Practice {
        &self.practice
    }

    pub fn into_practice(self) -> Practice {
        self.practice
    }

    fn decide(&mut self) -> bool {
        match self.policy {
            AnswerPolicy::AlwaysCorrect => true,
            AnswerPolicy::MissUntilReview => self.practice.is_review_mode(),
            AnswerPolicy::Accuracy { percent } => {
                self.rng.gen_bool(f64::from(percent.min(100)) / 100.0)
            }
        }
    }

    fn wait(&mut self, delay: Duration) {
        self.clock.advance(delay);
        self.practice.tick();
    }
}

impl Iterator for SessionSimulation {
    type Item = StepRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.steps >= self.max_steps
            || !self.practice.is_practicing()
            || self.practice.is_complete()
        {
            return None;
        }

        let config = self.practice.context().config.clone();
        if !self.practice.focus_card(0) {
            log::warn!("Simulation could not focus the first card");
            return None;
        }
        let card_id = self.practice.session().cards()[0].item.id.clone();
        self.wait(config.reveal_delay());

        let correct = self.decide();
        if !self.practice.answer(correct) {
            log::warn!("Simulation could not answer `{card_id}`");
            return None;
        }
        self.wait(config.resolve_delay());

        self.steps += 1;
        let session = self.practice.session();
        let card_wrong_count = session
            .cards()
            .iter()
            .chain(session.removed_cards())
            .find(|card| card.item.id == card_id)
            .map(|card| card.wrong_count)
            .or_else(|| {
                session
                    .completed_cards()
                    .iter()
                    .find(|card| card.item.id == card_id)
                    .map(|card| card.wrong_count)
            })
            .unwrap_or_default();

        Some(StepRecord {
            step: self.steps,
            card_id,
            correct,
            card_wrong_count,
            is_review_mode: session.is_review_mode(),
            remaining: session.cards().len(),
            pending_review: session.removed_cards().len(),
        })
    }
}
