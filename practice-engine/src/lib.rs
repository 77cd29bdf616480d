//! Flashcard practice sessions over an Arabic vocabulary catalog.
//!
//! [`Practice`] is what a presentation layer talks to. It owns the setup flow ([`Setup`]), the
//! running session ([`Session`]), and a [`Timeline`] of deferred events: focusing a card reveals
//! it a little later, answering a card takes effect a little later. Call [`Practice::tick`]
//! whenever [`Practice::next_pending_in_ms`] says something is due.

pub mod cards;
pub mod config;
pub mod error;
pub mod events;
pub mod selection;
pub mod session;
pub mod setup;
pub mod simulation;
pub mod stats;
pub mod utils;

pub use cards::{CardFaces, CardState, CompletedCard, PracticeMode, PracticeSize};
pub use config::PracticeConfig;
pub use error::PracticeError;
pub use events::{PracticeEvent, StartSession};
pub use session::{Context, Phase, Session};
pub use setup::{ReadySetup, Setup, SetupEvent};
pub use simulation::{AnswerPolicy, SessionSimulation, StepRecord};
pub use stats::{CompletionStats, LiveProgress};

use std::sync::Arc;

use cadence::data_model::{Timeline, Timestamped};
use cadence::{AppState, Clock, SystemClock};
use chrono::{DateTime, Utc};
use deck_shuffle::DeckRng;
use rand::RngCore;
use vocab_data::{Catalog, SourceSummary, VocabularyDataSource};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub struct Practice {
    setup: Setup,
    session: Session,
    timeline: Timeline<PracticeEvent>,
    transcript: Vec<Timestamped<PracticeEvent>>,
    setup_sequence: usize,
    /// Hands out one seed per started session.
    seeds: DeckRng,
    clock: Box<dyn Clock>,
}

// putting this inside LOGGER prevents us from accidentally initializing the logger more than once
#[cfg(target_arch = "wasm32")]
static LOGGER: std::sync::LazyLock<()> = std::sync::LazyLock::new(|| {
    utils::set_panic_hook();

    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Logging initialized");
});

impl Practice {
    /// A practice running on the system clock, with sessions shuffled from OS entropy.
    pub fn new(catalog: Catalog, config: PracticeConfig) -> Self {
        Self::with_clock(
            catalog,
            config,
            Box::new(SystemClock),
            deck_shuffle::entropy_seed(),
        )
    }

    /// A practice with an explicit clock and seed. Two practices built with the same arguments
    /// and driven the same way deal and reshuffle identically.
    pub fn with_clock(
        catalog: Catalog,
        config: PracticeConfig,
        clock: Box<dyn Clock>,
        seed: u64,
    ) -> Self {
        #[cfg(target_arch = "wasm32")]
        std::sync::LazyLock::force(&LOGGER);

        let catalog = catalog.with_excluded_categories(config.excluded_categories.iter().cloned());
        log::info!(
            "Loaded {} vocabulary items ({} practicable)",
            catalog.len(),
            catalog.count(None)
        );

        let context = Context {
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        };

        Self {
            setup: Setup::default(),
            session: Session::new(context),
            timeline: Timeline::new(),
            transcript: Vec::new(),
            setup_sequence: 0,
            seeds: deck_shuffle::seeded_rng(seed),
            clock,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn context(&self) -> &Context {
        self.session.context()
    }

    pub fn transcript(&self) -> &[Timestamped<PracticeEvent>] {
        &self.transcript
    }

    pub fn pending(&self) -> &Timeline<PracticeEvent> {
        &self.timeline
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Rebuilds the session from the recorded transcript alone.
    pub fn replay(&self) -> Session {
        Session::replay(self.context().clone(), &self.transcript)
    }

    /// Rebuilds a session from a transcript produced by [`Practice::transcript_json`].
    pub fn replay_json(context: Context, json: &str) -> Result<Session, PracticeError> {
        let raw: Vec<Timestamped<serde_json::Value>> =
            serde_json::from_str(json).map_err(PracticeError::Transcript)?;
        let events = raw
            .into_iter()
            .map(Timestamped::<PracticeEvent>::from_json)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PracticeError::Transcript)?;
        Ok(Session::replay(context, &events))
    }

    fn apply(&mut self, timestamp: DateTime<Utc>, event: PracticeEvent) {
        let stamped = Timestamped {
            timestamp,
            sequence: self.transcript.len(),
            event,
        };
        self.session = std::mem::take(&mut self.session).apply_event(&stamped);
        self.transcript.push(stamped);
    }

    fn apply_setup(&mut self, event: SetupEvent) {
        let stamped = Timestamped {
            timestamp: self.clock.now(),
            sequence: self.setup_sequence,
            event,
        };
        self.setup_sequence += 1;
        self.setup = std::mem::take(&mut self.setup).apply_event(&stamped);
    }

    /// Deals a new session from what the setup flow has chosen, once it has a source and a size.
    fn start_if_ready(&mut self) -> bool {
        let Some(ready) = self.setup.ready() else {
            return false;
        };
        self.start_session(ready.source, ready.size, &ready.custom_count, ready.mode);
        true
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl Practice {
    /// Builds a practice from a JSON catalog (an array of vocabulary items) and an optional
    /// JSON config. Missing config fields take their defaults.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(constructor))]
    pub fn from_json(
        catalog_json: &str,
        config_json: Option<String>,
    ) -> Result<Practice, PracticeError> {
        let catalog = Catalog::from_json_str(catalog_json)?;
        let config = match config_json {
            Some(json) => PracticeConfig::from_json_str(&json)?,
            None => PracticeConfig::default(),
        };
        Ok(Self::new(catalog, config))
    }

    // Setup flow

    /// Picks the source to practice and opens the size dialog. Sources with nothing to practice
    /// can't be picked.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn select_source(&mut self, source: VocabularyDataSource) -> bool {
        if self.context().catalog.count(Some(source)) == 0 {
            log::debug!("{source} has nothing to practice");
            return false;
        }
        self.apply_setup(SetupEvent::SelectSource { source });
        true
    }

    /// Picks the deck size. Starts the session if a source is already picked.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn select_size(&mut self, size: PracticeSize) -> bool {
        self.apply_setup(SetupEvent::SelectSize { size });
        self.start_if_ready()
    }

    /// Picks the practice direction from the mode dialog and (re)starts the session if the
    /// setup is complete.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn select_mode(&mut self, mode: PracticeMode) -> bool {
        self.apply_setup(SetupEvent::SelectMode { mode });
        self.start_if_ready()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn open_mode_dialog(&mut self) {
        self.apply_setup(SetupEvent::OpenModeDialog);
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn set_custom_count(&mut self, text: String) {
        self.apply_setup(SetupEvent::SetCustomCount { text });
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn set_practice_mode(&mut self, mode: PracticeMode) {
        self.apply_setup(SetupEvent::SetMode { mode });
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn cancel_size_selection(&mut self) {
        self.apply_setup(SetupEvent::CancelSizeSelection);
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn cancel_mode_selection(&mut self) {
        self.apply_setup(SetupEvent::CancelModeSelection);
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn start_from_setup(&mut self) -> bool {
        self.start_if_ready()
    }

    // Session

    /// Deals a fresh deck and discards whatever session was running.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn start_session(
        &mut self,
        source: VocabularyDataSource,
        size: PracticeSize,
        custom_count: &str,
        mode: PracticeMode,
    ) {
        self.tick();
        let seed = self.seeds.next_u64();
        let event = self
            .session
            .start_session(source, size, custom_count, mode, seed);
        self.apply(self.clock.now(), event);
    }

    /// Focuses an unflipped card. It is revealed once the reveal delay has passed.
    /// Returns `false` (and changes nothing) if another card is in play.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn focus_card(&mut self, index: usize) -> bool {
        self.tick();
        let Some(event) = self.session.focus_card(index) else {
            log::debug!("Ignoring focus on card {index}");
            return false;
        };

        let now = self.clock.now();
        self.apply(now, event);
        let reveal = PracticeEvent::RevealCard {
            generation: self.session.generation(),
        };
        let due = now + self.context().config.reveal_delay();
        self.timeline.schedule(due, reveal);
        true
    }

    /// Answers the revealed card. The verdict takes effect once the resolve delay has passed.
    /// Returns `false` if no card is revealed.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn answer(&mut self, correct: bool) -> bool {
        self.tick();
        let Some(event) = self.session.answer(correct) else {
            log::debug!("Ignoring answer with no revealed card");
            return false;
        };

        let now = self.clock.now();
        self.apply(now, event);
        let resolve = PracticeEvent::ResolveAnswer {
            generation: self.session.generation(),
        };
        let due = now + self.context().config.resolve_delay();
        self.timeline.schedule(due, resolve);
        true
    }

    /// Applies every deferred event that is due. Returns how many were applied.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mut applied = 0;
        while let Some(due) = self.timeline.pop_due(now) {
            self.apply(due.timestamp, due.event);
            applied += 1;
        }
        applied
    }

    /// Leaves the session. Deferred events still pending belong to the old session and will do
    /// nothing when they come due.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn exit_practice(&mut self) {
        self.tick();
        let event = self.session.exit_practice();
        self.apply(self.clock.now(), event);
        self.apply_setup(SetupEvent::Exit);
    }

    /// Like [`Practice::exit_practice`], and also forgets the custom size and chosen mode.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn reset_state(&mut self) {
        self.exit_practice();
        self.apply_setup(SetupEvent::Reset);
    }

    // Views

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn setup(&self) -> Setup {
        self.setup.clone()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn cards(&self) -> Vec<CardState> {
        self.session.cards().to_vec()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn removed_cards(&self) -> Vec<CardState> {
        self.session.removed_cards().to_vec()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn completed_cards(&self) -> Vec<CompletedCard> {
        self.session.completed_cards().to_vec()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn focused_card_index(&self) -> Option<usize> {
        self.session.focused_card_index()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn focused_card_faces(&self) -> Option<CardFaces> {
        self.session.focused_card_faces()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn is_practicing(&self) -> bool {
        self.session.is_practicing()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn is_review_mode(&self) -> bool {
        self.session.is_review_mode()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn correct_count(&self) -> u32 {
        self.session.correct_count()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn wrong_count(&self) -> u32 {
        self.session.wrong_count()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn total_cards(&self) -> usize {
        self.session.total_cards()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn completion_stats(&self) -> CompletionStats {
        self.session.completion_stats()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn live_progress(&self) -> LiveProgress {
        self.session.live_progress()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn source_summaries(&self) -> Vec<SourceSummary> {
        self.context().catalog.source_summaries()
    }

    /// Milliseconds until the next deferred event is due, if any is pending.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn next_pending_in_ms(&self) -> Option<f64> {
        self.timeline
            .next_due()
            .map(|due| utils::ms_until(self.clock.now(), due))
    }

    /// The transcript as versioned JSON events.
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
    pub fn transcript_json(&self) -> Result<String, PracticeError> {
        let events = self
            .transcript
            .iter()
            .map(Timestamped::to_json)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PracticeError::Transcript)?;
        serde_json::to_string(&events).map_err(PracticeError::Transcript)
    }
}
