use chrono::{DateTime, Utc};
use vocab_data::VocabularyItem;

#[derive(
    Copy,
    Clone,
    Debug,
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    Hash,
    Ord,
    PartialOrd,
    parse_display::Display,
    parse_display::FromStr,
)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "lowercase")]
#[display(style = "lowercase")]
pub enum PracticeSize {
    /// A random selection of (by default) 50 items.
    Random50,
    /// A random selection of a user-chosen number of items.
    Custom,
    /// Every item of the source, in random order.
    All,
}

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    Hash,
    Ord,
    PartialOrd,
    parse_display::Display,
    parse_display::FromStr,
)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "kebab-case")]
#[display(style = "kebab-case")]
pub enum PracticeMode {
    #[default]
    ArabicToEnglish,
    EnglishToArabic,
}

/// One item in play during a session.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi))]
pub struct CardState {
    pub item: VocabularyItem,
    pub is_flipped: bool,
    /// Wrong answers over the whole session, review passes included.
    pub wrong_count: u32,
    /// How many times the card has been pulled from the active deck for review.
    pub review_cycle_count: u32,
}

impl CardState {
    pub fn new(item: VocabularyItem) -> Self {
        Self {
            item,
            is_flipped: false,
            wrong_count: 0,
            review_cycle_count: 0,
        }
    }
}

/// Record of a card that was answered correctly. Never changes once written.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi))]
pub struct CompletedCard {
    pub item: VocabularyItem,
    pub wrong_count: u32,
    pub total_attempts: u32,
    pub completed_in_review: bool,
    pub review_cycle_count: u32,
    pub completed_at: DateTime<Utc>,
}

impl CompletedCard {
    pub(crate) fn from_card(card: CardState, in_review: bool, completed_at: DateTime<Utc>) -> Self {
        Self {
            total_attempts: card.wrong_count + 1,
            wrong_count: card.wrong_count,
            review_cycle_count: card.review_cycle_count,
            completed_in_review: in_review,
            item: card.item,
            completed_at,
        }
    }
}

/// What the presentation layer shows for a card, depending on the practice direction.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi))]
pub struct CardFaces {
    /// The side shown before the card is revealed.
    pub prompt: String,
    /// Whether the prompt is Arabic script.
    pub prompt_rtl: bool,
    pub arabic: String,
    pub transliteration: String,
    pub english: String,
    pub category: Option<String>,
}

impl PracticeMode {
    pub fn faces(&self, item: &VocabularyItem) -> CardFaces {
        let (prompt, prompt_rtl) = match self {
            PracticeMode::ArabicToEnglish => (item.arabic.clone(), true),
            PracticeMode::EnglishToArabic => (item.english.clone(), false),
        };
        CardFaces {
            prompt,
            prompt_rtl,
            arabic: item.arabic.clone(),
            transliteration: item.transliteration.clone(),
            english: item.english.clone(),
            category: item.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_data::VocabularyDataSource;

    fn kitab() -> VocabularyItem {
        VocabularyItem {
            id: "kitab".to_string(),
            arabic: "كِتَابٌ".to_string(),
            english: "book".to_string(),
            transliteration: "kitābun".to_string(),
            category: Some("Objects".to_string()),
            difficulty: 1,
            datasource: VocabularyDataSource::MedinaBook1,
        }
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(PracticeSize::Random50.to_string(), "random50");
        assert_eq!("custom".parse::<PracticeSize>().unwrap(), PracticeSize::Custom);
        assert_eq!(
            serde_json::to_value(PracticeSize::All).unwrap(),
            serde_json::json!("all")
        );

        assert_eq!(PracticeMode::ArabicToEnglish.to_string(), "arabic-to-english");
        assert_eq!(
            "english-to-arabic".parse::<PracticeMode>().unwrap(),
            PracticeMode::EnglishToArabic
        );
        assert_eq!(
            serde_json::to_value(PracticeMode::EnglishToArabic).unwrap(),
            serde_json::json!("english-to-arabic")
        );
    }

    #[test]
    fn test_faces_follow_mode() {
        let faces = PracticeMode::ArabicToEnglish.faces(&kitab());
        assert_eq!(faces.prompt, "كِتَابٌ");
        assert!(faces.prompt_rtl);

        let faces = PracticeMode::EnglishToArabic.faces(&kitab());
        assert_eq!(faces.prompt, "book");
        assert!(!faces.prompt_rtl);
        assert_eq!(faces.transliteration, "kitābun");
    }

    #[test]
    fn test_completed_card_counts_attempts() {
        let mut card = CardState::new(kitab());
        card.wrong_count = 2;
        card.review_cycle_count = 0;
        let completed = CompletedCard::from_card(card, false, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(completed.total_attempts, 3);
        assert_eq!(completed.wrong_count, 2);
        assert!(!completed.completed_in_review);
    }
}
