use cadence::data_model::{Event, Timestamped};
use vocab_data::VocabularyDataSource;

use crate::cards::{PracticeMode, PracticeSize};

/// The choices made before a session starts: source, then size, then (optionally) mode.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi))]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    pub selected_source: Option<VocabularyDataSource>,
    pub practice_size: Option<PracticeSize>,
    /// Raw text of the custom size field. Only parsed when a deck is dealt.
    pub custom_count: String,
    pub practice_mode: PracticeMode,
    pub size_dialog_open: bool,
    pub mode_dialog_open: bool,
    pub is_practicing: bool,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            selected_source: None,
            practice_size: None,
            custom_count: "100".to_string(),
            practice_mode: PracticeMode::default(),
            size_dialog_open: false,
            mode_dialog_open: false,
            is_practicing: false,
        }
    }
}

/// What a session should be started with, once the setup has everything it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadySetup {
    pub source: VocabularyDataSource,
    pub size: PracticeSize,
    pub custom_count: String,
    pub mode: PracticeMode,
}

impl Setup {
    pub fn ready(&self) -> Option<ReadySetup> {
        if !self.is_practicing {
            return None;
        }
        Some(ReadySetup {
            source: self.selected_source?,
            size: self.practice_size?,
            custom_count: self.custom_count.clone(),
            mode: self.practice_mode,
        })
    }
}

impl cadence::PartialAppState for Setup {
    type Event = SetupEvent;
    type Partial = Self;

    fn process_event(mut setup: Self::Partial, event: &Timestamped<Self::Event>) -> Self::Partial {
        match &event.event {
            SetupEvent::SelectSource { source } => {
                setup.selected_source = Some(*source);
                setup.size_dialog_open = true;
            }
            SetupEvent::SelectSize { size } => {
                setup.practice_size = Some(*size);
                setup.size_dialog_open = false;
                setup.is_practicing = true;
            }
            SetupEvent::SelectMode { mode } => {
                setup.practice_mode = *mode;
                setup.mode_dialog_open = false;
                setup.is_practicing = true;
            }
            SetupEvent::SetCustomCount { text } => setup.custom_count = text.clone(),
            SetupEvent::SetMode { mode } => setup.practice_mode = *mode,
            SetupEvent::OpenModeDialog => setup.mode_dialog_open = true,
            SetupEvent::CancelSizeSelection => {
                setup.size_dialog_open = false;
                setup.practice_size = None;
                setup.selected_source = None;
            }
            SetupEvent::CancelModeSelection => {
                setup.mode_dialog_open = false;
                setup.practice_mode = PracticeMode::default();
                setup.practice_size = None;
                setup.selected_source = None;
            }
            SetupEvent::Exit => {
                // The custom count text survives so the next deck can reuse it.
                setup = Setup {
                    custom_count: std::mem::take(&mut setup.custom_count),
                    ..Setup::default()
                };
            }
            SetupEvent::Reset => setup = Setup::default(),
        }
        setup
    }

    fn finalize(partial: Self::Partial) -> Self {
        partial
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SetupEvent {
    SelectSource { source: VocabularyDataSource },
    SelectSize { size: PracticeSize },
    SelectMode { mode: PracticeMode },
    SetCustomCount { text: String },
    SetMode { mode: PracticeMode },
    OpenModeDialog,
    CancelSizeSelection,
    CancelModeSelection,
    Exit,
    Reset,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "version")]
pub enum VersionedSetupEvent {
    V1(SetupEvent),
}

impl Event for SetupEvent {
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let versioned = VersionedSetupEvent::from(self.clone());
        serde_json::to_value(versioned)
    }

    fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<VersionedSetupEvent>(json.clone()).map(|versioned| versioned.into())
    }
}

impl From<SetupEvent> for VersionedSetupEvent {
    fn from(event: SetupEvent) -> Self {
        VersionedSetupEvent::V1(event)
    }
}

impl From<VersionedSetupEvent> for SetupEvent {
    fn from(event: VersionedSetupEvent) -> Self {
        match event {
            VersionedSetupEvent::V1(event) => event,
        }
    }
}
