pub mod catalog;

pub use catalog::{Catalog, CatalogError, DEFAULT_EXCLUDED_CATEGORIES, SourceSummary};

#[derive(
    Copy,
    Clone,
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    parse_display::Display,
    parse_display::FromStr,
    schemars::JsonSchema,
)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "lowercase")]
#[display(style = "lowercase")]
pub enum VocabularyDataSource {
    MedinaBook1,
    MedinaBook2,
    MedinaBook3,
    /// Ten Lessons of Arabic
    Other,
}

impl VocabularyDataSource {
    pub const ALL: [VocabularyDataSource; 4] = [
        VocabularyDataSource::MedinaBook1,
        VocabularyDataSource::MedinaBook2,
        VocabularyDataSource::MedinaBook3,
        VocabularyDataSource::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            VocabularyDataSource::MedinaBook1 => "Medina Book 1",
            VocabularyDataSource::MedinaBook2 => "Medina Book 2",
            VocabularyDataSource::MedinaBook3 => "Medina Book 3",
            VocabularyDataSource::Other => "Ten Lessons Of Arabic",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            VocabularyDataSource::MedinaBook1 => "📗",
            VocabularyDataSource::MedinaBook2 => "📘",
            VocabularyDataSource::MedinaBook3 => "📙",
            VocabularyDataSource::Other => "📕",
        }
    }

    /// The chip label shown next to a selected source, e.g. `📗 Medina Book 1`.
    pub fn label(&self) -> String {
        format!("{} {}", self.emoji(), self.display_name())
    }
}

fn default_difficulty() -> u8 {
    1
}

#[derive(
    Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, schemars::JsonSchema,
)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
pub struct VocabularyItem {
    pub id: String,
    pub arabic: String,
    pub english: String,
    pub transliteration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    pub datasource: VocabularyDataSource,
}
