use cadence::data_model::Event;
use serde::{Deserialize, Serialize};
use vocab_data::VocabularyDataSource;

use crate::cards::{PracticeMode, PracticeSize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartSession {
    pub source: VocabularyDataSource,
    pub size: PracticeSize,
    pub custom_count: String,
    pub mode: PracticeMode,
    /// Seeds every shuffle of the session, so replaying the transcript deals the same cards.
    pub seed: u64,
}

/// Everything that can happen to a practice session.
///
/// `RevealCard` and `ResolveAnswer` are never requested by the user directly: they are scheduled
/// by `FocusCard` and `Answer` and carry the generation of the session that scheduled them, so
/// they do nothing if that session has since been exited or replaced.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum PracticeEvent {
    Start(StartSession),
    FocusCard { index: usize },
    RevealCard { generation: u64 },
    Answer { correct: bool },
    ResolveAnswer { generation: u64 },
    Exit,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "version")]
pub enum VersionedPracticeEvent {
    V1(PracticeEvent),
}

impl Event for PracticeEvent {
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let versioned = VersionedPracticeEvent::from(self.clone());
        serde_json::to_value(versioned)
    }

    fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<VersionedPracticeEvent>(json.clone())
            .map(|versioned| versioned.into())
    }
}

impl From<PracticeEvent> for VersionedPracticeEvent {
    fn from(event: PracticeEvent) -> Self {
        VersionedPracticeEvent::V1(event)
    }
}

impl From<VersionedPracticeEvent> for PracticeEvent {
    fn from(event: VersionedPracticeEvent) -> Self {
        match event {
            VersionedPracticeEvent::V1(event) => event,
        }
    }
}
