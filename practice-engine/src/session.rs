//! The practice session: which cards are in play, which one is focused, and what happens when a
//! card is answered.
//!
//! A session only changes by applying [`PracticeEvent`]s (see [`cadence::PartialAppState`]).
//! Every guard is checked again when an event is applied, so a transcript that contains a refused
//! or stale event replays to the same state it produced live.

use std::sync::Arc;

use cadence::data_model::Timestamped;
use chrono::{DateTime, Utc};
use deck_shuffle::DeckRng;
use vocab_data::{Catalog, VocabularyDataSource};

use crate::cards::{CardFaces, CardState, CompletedCard, PracticeMode, PracticeSize};
use crate::config::PracticeConfig;
use crate::events::{PracticeEvent, StartSession};
use crate::selection;
use crate::stats::{CompletionStats, LiveProgress};

/// The catalog and tunables a session runs against. Shared, never mutated.
#[derive(Clone, Debug, Default)]
pub struct Context {
    pub catalog: Arc<Catalog>,
    pub config: Arc<PracticeConfig>,
}

/// Where the single "in play" card is in its focus → reveal → answer → resolve cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi))]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum Phase {
    /// No card is in play; any unflipped card may be focused.
    #[default]
    Idle,
    /// A card was focused and is waiting to be revealed.
    Focusing { index: usize },
    /// The focused card is revealed and waiting for an answer.
    Focused { index: usize },
    /// An answer was given; focus is released and the verdict is waiting to take effect.
    Resolving { index: usize, correct: bool },
}

#[derive(Clone, Debug)]
pub struct Session {
    context: Context,

    selected_source: Option<VocabularyDataSource>,
    practice_size: Option<PracticeSize>,
    custom_count: String,
    practice_mode: PracticeMode,

    cards: Vec<CardState>,
    removed_cards: Vec<CardState>,
    completed_cards: Vec<CompletedCard>,
    is_review_mode: bool,
    phase: Phase,

    correct_count: u32,
    wrong_count: u32,
    total_cards: usize,

    /// Bumped on every start and exit. Deferred events from an older generation are ignored.
    generation: u64,
    started_at: Option<DateTime<Utc>>,
    rng: DeckRng,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Context::default())
    }
}

impl Session {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            selected_source: None,
            practice_size: None,
            custom_count: default_custom_count(),
            practice_mode: PracticeMode::default(),
            cards: Vec::new(),
            removed_cards: Vec::new(),
            completed_cards: Vec::new(),
            is_review_mode: false,
            phase: Phase::Idle,
            correct_count: 0,
            wrong_count: 0,
            total_cards: 0,
            generation: 0,
            started_at: None,
            rng: deck_shuffle::seeded_rng(0),
        }
    }

    /// Rebuilds a session by applying a recorded transcript from scratch.
    pub fn replay<'a>(
        context: Context,
        events: impl IntoIterator<Item = &'a Timestamped<PracticeEvent>>,
    ) -> Self {
        cadence::fold_events(Session::new(context), events)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn selected_source(&self) -> Option<VocabularyDataSource> {
        self.selected_source
    }

    pub fn practice_size(&self) -> Option<PracticeSize> {
        self.practice_size
    }

    pub fn custom_count(&self) -> &str {
        &self.custom_count
    }

    pub fn practice_mode(&self) -> PracticeMode {
        self.practice_mode
    }

    pub fn cards(&self) -> &[CardState] {
        &self.cards
    }

    pub fn removed_cards(&self) -> &[CardState] {
        &self.removed_cards
    }

    pub fn completed_cards(&self) -> &[CompletedCard] {
        &self.completed_cards
    }

    pub fn is_review_mode(&self) -> bool {
        self.is_review_mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The card under active answer input. Released as soon as an answer is given.
    pub fn focused_card_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Focusing { index } | Phase::Focused { index } => Some(index),
            Phase::Idle | Phase::Resolving { .. } => None,
        }
    }

    pub fn focused_card(&self) -> Option<&CardState> {
        self.focused_card_index().and_then(|index| self.cards.get(index))
    }

    pub fn focused_card_faces(&self) -> Option<CardFaces> {
        self.focused_card()
            .map(|card| self.practice_mode.faces(&card.item))
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    pub fn total_cards(&self) -> usize {
        self.total_cards
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn is_practicing(&self) -> bool {
        self.started_at.is_some()
    }

    /// A started session with nothing left to answer.
    pub fn is_complete(&self) -> bool {
        self.is_practicing()
            && self.cards.is_empty()
            && self.removed_cards.is_empty()
            && self.phase == Phase::Idle
    }

    pub fn completion_stats(&self) -> CompletionStats {
        CompletionStats::derive(
            &self.completed_cards,
            self.cards.len() + self.removed_cards.len(),
            self.total_cards,
        )
    }

    pub fn live_progress(&self) -> LiveProgress {
        LiveProgress {
            remaining: self.cards.len(),
            pending_review: self.removed_cards.len(),
            correct: self.correct_count,
            wrong: self.wrong_count,
            total_cards: self.total_cards,
            attempt_accuracy_percent: LiveProgress::attempt_accuracy(
                self.correct_count,
                self.wrong_count,
            ),
        }
    }

    /// Checks the bookkeeping invariants. Returns a description of the first one broken.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.correct_count as usize != self.completed_cards.len() {
            return Err(format!(
                "correct count {} does not match {} completed cards",
                self.correct_count,
                self.completed_cards.len()
            ));
        }

        let accounted = self.cards.len() + self.removed_cards.len() + self.completed_cards.len();
        if accounted != self.total_cards {
            return Err(format!(
                "{accounted} cards accounted for out of {}",
                self.total_cards
            ));
        }

        if let Some(index) = self.focused_card_index() {
            if index >= self.cards.len() {
                return Err(format!(
                    "focused index {index} is outside a deck of {}",
                    self.cards.len()
                ));
            }
        }

        let max = self.context.config.max_wrong_attempts;
        if let Some(card) = self.cards.iter().find(|card| {
            card.wrong_count >= max && card.review_cycle_count == 0 && !self.is_review_mode
        }) {
            return Err(format!(
                "card `{}` stayed in the deck with {} wrong answers",
                card.item.id, card.wrong_count
            ));
        }

        let mut ids: Vec<&str> = self
            .cards
            .iter()
            .chain(&self.removed_cards)
            .map(|card| card.item.id.as_str())
            .chain(self.completed_cards.iter().map(|card| card.item.id.as_str()))
            .collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(format!("card `{}` is in play twice", pair[0]));
        }

        Ok(())
    }
}

/// Intents. Each returns the event to apply, or `None` when the session would refuse it.
impl Session {
    pub fn start_session(
        &self,
        source: VocabularyDataSource,
        size: PracticeSize,
        custom_count: &str,
        mode: PracticeMode,
        seed: u64,
    ) -> PracticeEvent {
        PracticeEvent::Start(StartSession {
            source,
            size,
            custom_count: custom_count.to_string(),
            mode,
            seed,
        })
    }

    pub fn focus_card(&self, index: usize) -> Option<PracticeEvent> {
        self.can_focus(index)
            .then_some(PracticeEvent::FocusCard { index })
    }

    pub fn answer(&self, correct: bool) -> Option<PracticeEvent> {
        matches!(self.phase, Phase::Focused { .. }).then_some(PracticeEvent::Answer { correct })
    }

    pub fn exit_practice(&self) -> PracticeEvent {
        PracticeEvent::Exit
    }

    fn can_focus(&self, index: usize) -> bool {
        self.phase == Phase::Idle
            && self
                .cards
                .get(index)
                .is_some_and(|card| !card.is_flipped)
    }
}

impl cadence::PartialAppState for Session {
    type Event = PracticeEvent;
    type Partial = Self;

    fn process_event(mut session: Self::Partial, event: &Timestamped<Self::Event>) -> Self::Partial {
        let Timestamped {
            timestamp,
            sequence: _,
            event,
        } = event;

        match event {
            PracticeEvent::Start(start) => session.start(start, *timestamp),
            PracticeEvent::FocusCard { index } => session.focus(*index),
            PracticeEvent::RevealCard { generation } => session.reveal(*generation),
            PracticeEvent::Answer { correct } => session.begin_answer(*correct),
            PracticeEvent::ResolveAnswer { generation } => {
                session.resolve(*generation, *timestamp)
            }
            PracticeEvent::Exit => session.exit(),
        }

        session
    }

    fn finalize(partial: Self::Partial) -> Self {
        partial
    }
}

/// Transitions. Guards are silent: a refused transition leaves the session untouched.
impl Session {
    fn start(&mut self, start: &StartSession, timestamp: DateTime<Utc>) {
        let StartSession {
            source,
            size,
            custom_count,
            mode,
            seed,
        } = start;

        let mut rng = deck_shuffle::seeded_rng(*seed);
        let items = selection::select_practice_items(
            &self.context.catalog,
            *source,
            *size,
            custom_count,
            &self.context.config,
            &mut rng,
        );

        self.generation += 1;
        self.selected_source = Some(*source);
        self.practice_size = Some(*size);
        self.custom_count = custom_count.clone();
        self.practice_mode = *mode;
        self.cards = items.into_iter().map(CardState::new).collect();
        self.removed_cards.clear();
        self.completed_cards.clear();
        self.is_review_mode = false;
        self.phase = Phase::Idle;
        self.correct_count = 0;
        self.wrong_count = 0;
        self.total_cards = self.cards.len();
        self.started_at = Some(timestamp);
        self.rng = rng;

        log::info!(
            "Started {size} practice of {source} ({mode}) with {} cards",
            self.total_cards
        );
    }

    fn focus(&mut self, index: usize) {
        if !self.can_focus(index) {
            log::debug!("Refusing to focus card {index} in phase {:?}", self.phase);
            return;
        }
        self.phase = Phase::Focusing { index };
    }

    fn reveal(&mut self, generation: u64) {
        if generation != self.generation {
            log::debug!("Dropping reveal from session generation {generation}");
            return;
        }
        let Phase::Focusing { index } = self.phase else {
            log::debug!("Nothing to reveal in phase {:?}", self.phase);
            return;
        };
        self.cards[index].is_flipped = true;
        self.phase = Phase::Focused { index };
    }

    fn begin_answer(&mut self, correct: bool) {
        let Phase::Focused { index } = self.phase else {
            log::debug!("Refusing answer in phase {:?}", self.phase);
            return;
        };
        self.phase = Phase::Resolving { index, correct };
    }

    fn resolve(&mut self, generation: u64, timestamp: DateTime<Utc>) {
        if generation != self.generation {
            log::debug!("Dropping answer from session generation {generation}");
            return;
        }
        let Phase::Resolving { index, correct } = self.phase else {
            log::debug!("Nothing to resolve in phase {:?}", self.phase);
            return;
        };
        self.phase = Phase::Idle;

        if correct {
            self.resolve_correct(index, timestamp);
        } else {
            self.resolve_wrong(index);
        }
    }

    fn resolve_correct(&mut self, index: usize, timestamp: DateTime<Utc>) {
        let card = self.cards.remove(index);
        self.completed_cards
            .push(CompletedCard::from_card(card, self.is_review_mode, timestamp));
        self.correct_count += 1;
        self.promote_removed_cards_if_exhausted();
    }

    fn resolve_wrong(&mut self, index: usize) {
        self.wrong_count += 1;

        let card = &mut self.cards[index];
        card.wrong_count += 1;
        card.is_flipped = false;

        if card.wrong_count >= self.context.config.max_wrong_attempts {
            card.review_cycle_count += 1;
            let card = self.cards.remove(index);
            log::debug!(
                "Card `{}` set aside for review after {} wrong answers",
                card.item.id,
                card.wrong_count
            );
            self.removed_cards.push(card);
            self.promote_removed_cards_if_exhausted();
        } else {
            // A missed card must not come back in a predictable spot.
            self.cards = deck_shuffle::shuffle(&self.cards, &mut self.rng);
        }
    }

    fn promote_removed_cards_if_exhausted(&mut self) {
        if !self.cards.is_empty() || self.removed_cards.is_empty() {
            return;
        }

        self.cards = std::mem::take(&mut self.removed_cards)
            .into_iter()
            .map(|card| CardState {
                is_flipped: false,
                ..card
            })
            .collect();
        self.is_review_mode = true;
        log::info!("Starting review pass with {} cards", self.cards.len());
    }

    fn exit(&mut self) {
        let generation = self.generation + 1;
        *self = Session::new(self.context.clone());
        self.generation = generation;
        log::info!("Exited practice");
    }
}

fn default_custom_count() -> String {
    "100".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence::AppState;
    use chrono::{Duration, TimeZone};
    use vocab_data::VocabularyItem;

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_750_000_000, 0).unwrap()
    }

    fn catalog(n: usize) -> Catalog {
        Catalog::new(
            (0..n)
                .map(|i| VocabularyItem {
                    id: format!("word-{i}"),
                    arabic: format!("ar-{i}"),
                    english: format!("en-{i}"),
                    transliteration: format!("tr-{i}"),
                    category: None,
                    difficulty: 1,
                    datasource: VocabularyDataSource::MedinaBook1,
                })
                .collect(),
        )
        .unwrap()
    }

    /// Applies events directly, standing in for the scheduler.
    struct Driver {
        session: Session,
        sequence: usize,
        now: DateTime<Utc>,
    }

    impl Driver {
        fn new(n: usize) -> Self {
            let context = Context {
                catalog: Arc::new(catalog(n)),
                config: Arc::new(PracticeConfig::default()),
            };
            Self {
                session: Session::new(context),
                sequence: 0,
                now: t0(),
            }
        }

        fn apply(&mut self, event: PracticeEvent) {
            self.now += Duration::milliseconds(100);
            let stamped = Timestamped {
                timestamp: self.now,
                sequence: self.sequence,
                event,
            };
            self.sequence += 1;
            self.session = std::mem::take(&mut self.session).apply_event(&stamped);
            self.session.check_invariants().unwrap();
        }

        fn start(&mut self, seed: u64) {
            let event = self.session.start_session(
                VocabularyDataSource::MedinaBook1,
                PracticeSize::All,
                "",
                PracticeMode::ArabicToEnglish,
                seed,
            );
            self.apply(event);
        }

        fn reveal(&mut self) {
            let generation = self.session.generation();
            self.apply(PracticeEvent::RevealCard { generation });
        }

        fn resolve(&mut self) {
            let generation = self.session.generation();
            self.apply(PracticeEvent::ResolveAnswer { generation });
        }

        fn answer_card(&mut self, index: usize, correct: bool) {
            let focus = self.session.focus_card(index).expect("card can be focused");
            self.apply(focus);
            self.reveal();
            let answer = self.session.answer(correct).expect("card can be answered");
            self.apply(answer);
            self.resolve();
        }
    }

    #[test]
    fn test_start_deals_fresh_cards() {
        let mut driver = Driver::new(5);
        driver.start(1);
        let session = &driver.session;
        assert_eq!(session.cards().len(), 5);
        assert_eq!(session.total_cards(), 5);
        assert!(session.is_practicing());
        assert!(!session.is_complete());
        assert!(session.cards().iter().all(|card| {
            !card.is_flipped && card.wrong_count == 0 && card.review_cycle_count == 0
        }));
    }

    #[test]
    fn test_focus_then_reveal() {
        let mut driver = Driver::new(3);
        driver.start(2);

        let focus = driver.session.focus_card(1).unwrap();
        driver.apply(focus);
        assert_eq!(driver.session.focused_card_index(), Some(1));
        assert!(!driver.session.cards()[1].is_flipped);
        assert_eq!(driver.session.phase(), Phase::Focusing { index: 1 });

        driver.reveal();
        assert!(driver.session.cards()[1].is_flipped);
        assert_eq!(driver.session.phase(), Phase::Focused { index: 1 });
        assert!(
            driver
                .session
                .cards()
                .iter()
                .enumerate()
                .all(|(i, card)| card.is_flipped == (i == 1))
        );
    }

    #[test]
    fn test_focus_guards() {
        let mut driver = Driver::new(3);
        driver.start(3);

        assert!(driver.session.focus_card(3).is_none());

        let focus = driver.session.focus_card(0).unwrap();
        driver.apply(focus);
        assert!(driver.session.focus_card(1).is_none());
        assert!(driver.session.focus_card(0).is_none());

        // Applying a forged focus event is a no-op too.
        let before = driver.session.phase();
        driver.apply(PracticeEvent::FocusCard { index: 2 });
        assert_eq!(driver.session.phase(), before);
    }

    #[test]
    fn test_answer_requires_revealed_card() {
        let mut driver = Driver::new(2);
        driver.start(4);
        assert!(driver.session.answer(true).is_none());

        let focus = driver.session.focus_card(0).unwrap();
        driver.apply(focus);
        assert!(driver.session.answer(true).is_none());

        driver.reveal();
        assert!(driver.session.answer(true).is_some());
    }

    #[test]
    fn test_answer_releases_focus_before_resolving() {
        let mut driver = Driver::new(2);
        driver.start(5);
        let focus = driver.session.focus_card(0).unwrap();
        driver.apply(focus);
        driver.reveal();
        driver.apply(PracticeEvent::Answer { correct: true });

        assert_eq!(driver.session.focused_card_index(), None);
        assert_eq!(driver.session.cards().len(), 2);
        assert_eq!(driver.session.correct_count(), 0);
        // No new focus while the answer is pending.
        assert!(driver.session.focus_card(1).is_none());

        driver.resolve();
        assert_eq!(driver.session.cards().len(), 1);
        assert_eq!(driver.session.correct_count(), 1);
        assert!(driver.session.focus_card(0).is_some());
    }

    #[test]
    fn test_correct_answer_completes_card() {
        let mut driver = Driver::new(3);
        driver.start(6);
        let id = driver.session.cards()[2].item.id.clone();
        driver.answer_card(2, true);

        let session = &driver.session;
        assert_eq!(session.cards().len(), 2);
        assert!(session.cards().iter().all(|card| card.item.id != id));
        let completed = &session.completed_cards()[0];
        assert_eq!(completed.item.id, id);
        assert_eq!(completed.wrong_count, 0);
        assert_eq!(completed.total_attempts, 1);
        assert!(!completed.completed_in_review);
    }

    #[test]
    fn test_wrong_answer_below_ceiling_keeps_card_unflipped() {
        let mut driver = Driver::new(6);
        driver.start(7);
        let id = driver.session.cards()[0].item.id.clone();
        driver.answer_card(0, false);

        let session = &driver.session;
        assert_eq!(session.cards().len(), 6);
        assert_eq!(session.wrong_count(), 1);
        let card = session
            .cards()
            .iter()
            .find(|card| card.item.id == id)
            .unwrap();
        assert_eq!(card.wrong_count, 1);
        assert!(!card.is_flipped);
        assert!(session.removed_cards().is_empty());
    }

    #[test]
    fn test_wrong_answers_reshuffle_the_deck() {
        let mut driver = Driver::new(12);
        driver.start(8);
        let before: Vec<_> = driver
            .session
            .cards()
            .iter()
            .map(|card| card.item.id.clone())
            .collect();

        let mut moved = false;
        for _ in 0..2 {
            driver.answer_card(0, false);
            let after: Vec<_> = driver
                .session
                .cards()
                .iter()
                .map(|card| card.item.id.clone())
                .collect();
            moved |= after != before;
        }
        assert!(moved);
    }

    #[test]
    fn test_card_is_set_aside_at_ceiling() {
        let mut driver = Driver::new(3);
        driver.start(9);
        let id = driver.session.cards()[0].item.id.clone();

        for attempt in 1..=3 {
            let index = driver
                .session
                .cards()
                .iter()
                .position(|card| card.item.id == id)
                .unwrap();
            driver.answer_card(index, false);
            let still_active = driver
                .session
                .cards()
                .iter()
                .any(|card| card.item.id == id);
            assert_eq!(still_active, attempt < 3, "after {attempt} wrong answers");
        }

        let removed = &driver.session.removed_cards()[0];
        assert_eq!(removed.item.id, id);
        assert_eq!(removed.wrong_count, 3);
        assert_eq!(removed.review_cycle_count, 1);
        assert!(!removed.is_flipped);
        assert!(!driver.session.is_review_mode());
        assert_eq!(driver.session.cards().len(), 2);
    }

    #[test]
    fn test_review_pass_starts_when_deck_runs_out() {
        let mut driver = Driver::new(2);
        driver.start(10);
        let hard = driver.session.cards()[0].item.id.clone();

        for _ in 0..3 {
            let index = driver
                .session
                .cards()
                .iter()
                .position(|card| card.item.id == hard)
                .unwrap();
            driver.answer_card(index, false);
        }
        assert_eq!(driver.session.removed_cards().len(), 1);

        driver.answer_card(0, true);
        let session = &driver.session;
        assert!(session.is_review_mode());
        assert!(session.removed_cards().is_empty());
        assert_eq!(session.cards().len(), 1);
        assert_eq!(session.cards()[0].item.id, hard);
        assert_eq!(session.cards()[0].wrong_count, 3);

        driver.answer_card(0, true);
        let completed = driver.session.completed_cards().last().unwrap();
        assert_eq!(completed.item.id, hard);
        assert!(completed.completed_in_review);
        assert_eq!(completed.total_attempts, 4);
        assert!(driver.session.is_complete());
    }

    #[test]
    fn test_single_card_eviction_goes_straight_to_review() {
        let mut driver = Driver::new(1);
        driver.start(11);
        for _ in 0..3 {
            driver.answer_card(0, false);
        }

        let session = &driver.session;
        assert!(session.is_review_mode());
        assert!(session.removed_cards().is_empty());
        assert_eq!(session.cards().len(), 1);
        assert_eq!(session.cards()[0].wrong_count, 3);
        assert_eq!(session.cards()[0].review_cycle_count, 1);

        // Cumulative wrong count: every further miss sets the card aside again.
        driver.answer_card(0, false);
        let card = &driver.session.cards()[0];
        assert_eq!(card.wrong_count, 4);
        assert_eq!(card.review_cycle_count, 2);

        driver.answer_card(0, true);
        let stats = driver.session.completion_stats();
        assert_eq!(stats.multi_review_count, 1);
        assert_eq!(stats.perfect_count, 0);
    }

    #[test]
    fn test_stale_continuations_are_ignored() {
        let mut driver = Driver::new(3);
        driver.start(12);
        let focus = driver.session.focus_card(0).unwrap();
        driver.apply(focus);
        driver.reveal();
        driver.apply(PracticeEvent::Answer { correct: true });
        let stale_generation = driver.session.generation();

        driver.apply(PracticeEvent::Exit);
        driver.start(13);
        driver.apply(PracticeEvent::ResolveAnswer {
            generation: stale_generation,
        });

        assert_eq!(driver.session.cards().len(), 3);
        assert!(driver.session.completed_cards().is_empty());
        assert_eq!(driver.session.phase(), Phase::Idle);
    }

    #[test]
    fn test_stale_reveal_is_ignored() {
        let mut driver = Driver::new(3);
        driver.start(17);
        let focus = driver.session.focus_card(0).unwrap();
        driver.apply(focus);
        let stale_generation = driver.session.generation();

        driver.apply(PracticeEvent::Exit);
        driver.start(18);
        let focus = driver.session.focus_card(2).unwrap();
        driver.apply(focus);

        driver.apply(PracticeEvent::RevealCard {
            generation: stale_generation,
        });
        assert_eq!(driver.session.phase(), Phase::Focusing { index: 2 });
        assert!(driver.session.cards().iter().all(|card| !card.is_flipped));
        assert!(driver.session.answer(true).is_none());

        // The reveal scheduled by the new session still works.
        driver.reveal();
        assert_eq!(driver.session.phase(), Phase::Focused { index: 2 });
        assert!(driver.session.cards()[2].is_flipped);
        assert!(!driver.session.cards()[0].is_flipped);
    }

    #[test]
    fn test_exit_discards_everything() {
        let mut driver = Driver::new(4);
        driver.start(14);
        driver.answer_card(0, true);
        driver.answer_card(0, false);
        driver.apply(PracticeEvent::Exit);

        let session = &driver.session;
        assert!(!session.is_practicing());
        assert!(!session.is_complete());
        assert_eq!(session.selected_source(), None);
        assert_eq!(session.practice_size(), None);
        assert_eq!(session.custom_count(), "100");
        assert_eq!(session.practice_mode(), PracticeMode::ArabicToEnglish);
        assert!(session.cards().is_empty());
        assert!(session.completed_cards().is_empty());
        assert_eq!(session.correct_count(), 0);
        assert_eq!(session.wrong_count(), 0);
        assert_eq!(session.total_cards(), 0);
        assert_eq!(session.focused_card_index(), None);
    }

    #[test]
    fn test_empty_source_is_immediately_complete() {
        let mut driver = Driver::new(0);
        driver.start(15);
        assert!(driver.session.is_complete());
        assert_eq!(driver.session.total_cards(), 0);
        assert_eq!(driver.session.completion_stats().accuracy_percent, 0);
    }

    #[test]
    fn test_focused_faces_follow_mode() {
        let mut driver = Driver::new(2);
        let event = driver.session.start_session(
            VocabularyDataSource::MedinaBook1,
            PracticeSize::All,
            "",
            PracticeMode::EnglishToArabic,
            16,
        );
        driver.apply(event);
        assert!(driver.session.focused_card_faces().is_none());

        let focus = driver.session.focus_card(1).unwrap();
        driver.apply(focus);
        let faces = driver.session.focused_card_faces().unwrap();
        assert!(faces.prompt.starts_with("en-"));
        assert!(!faces.prompt_rtl);
    }

    #[test]
    fn test_phase_json() {
        assert_eq!(
            serde_json::to_value(Phase::Resolving {
                index: 2,
                correct: false
            })
            .unwrap(),
            serde_json::json!({"phase": "resolving", "index": 2, "correct": false})
        );
    }
}
