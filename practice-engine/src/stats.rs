use crate::cards::CompletedCard;

/// Summary shown when a session is finished.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi))]
pub struct CompletionStats {
    /// Cards answered right on the first try.
    pub perfect_count: usize,
    /// Cards that needed at least one retry.
    pub struggled_count: usize,
    /// Cards that were set aside for review more than once.
    pub multi_review_count: usize,
    pub average_attempts: f64,
    /// Share of the deck answered right first time, rounded to a whole percent.
    pub accuracy_percent: u32,
    pub total_cards: usize,
    /// Cards not yet completed. Zero once the session is complete.
    pub remaining: usize,
}

impl CompletionStats {
    pub fn derive(completed: &[CompletedCard], remaining: usize, total_cards: usize) -> Self {
        let perfect_count = completed.iter().filter(|card| card.wrong_count == 0).count();
        let struggled_count = completed.len() - perfect_count;
        let multi_review_count = completed
            .iter()
            .filter(|card| card.review_cycle_count > 1)
            .count();

        let average_attempts = if completed.is_empty() {
            0.0
        } else {
            let attempts: u64 = completed
                .iter()
                .map(|card| u64::from(card.total_attempts))
                .sum();
            attempts as f64 / completed.len() as f64
        };

        Self {
            perfect_count,
            struggled_count,
            multi_review_count,
            average_attempts,
            accuracy_percent: rounded_percent(perfect_count as u64, total_cards as u64),
            total_cards,
            remaining,
        }
    }
}

/// Counters shown while a session is running.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi))]
pub struct LiveProgress {
    /// Cards still in the active deck.
    pub remaining: usize,
    /// Cards waiting for the review pass.
    pub pending_review: usize,
    pub correct: u32,
    pub wrong: u32,
    pub total_cards: usize,
    /// Correct answers as a share of all answers so far.
    pub attempt_accuracy_percent: u32,
}

impl LiveProgress {
    pub fn attempt_accuracy(correct: u32, wrong: u32) -> u32 {
        rounded_percent(u64::from(correct), u64::from(correct) + u64::from(wrong))
    }
}

/// `part / whole` as a percentage, rounded half away from zero. Zero when `whole` is zero.
fn rounded_percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
