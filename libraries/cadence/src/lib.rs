//! Small library for driving application state through events.
//!
//! State is never mutated directly. Instead:
//! 1. User intents are validated against the current state and turned into events.
//! 2. Events are stamped with a time and a sequence index, then "applied" to the state.
//! 3. Effects that must happen later (animations finishing, answers resolving) are scheduled
//!    on a [`data_model::Timeline`] as events of their own, and applied once a [`Clock`] says
//!    they are due.
//!
//! Because every transition is an event, replaying the recorded events from the initial state
//! reproduces the current state exactly.

pub mod clock;
pub mod data_model;

pub use clock::{Clock, ManualClock, SystemClock};

use crate::data_model::{Event, Timestamped};

/// A state that is built by folding events over it.
///
/// Folding happens in two steps so that expensive derived data is only computed once per batch:
/// every event goes through [`PartialAppState::process_event`], then the result goes through
/// [`PartialAppState::finalize`].
pub trait PartialAppState: Sized {
    type Event: Event;

    /// What events are folded into. Usually `Self`.
    type Partial: Sized;

    fn process_event(partial: Self::Partial, event: &Timestamped<Self::Event>) -> Self::Partial;

    /// Turns the folded value back into a full state.
    fn finalize(partial: Self::Partial) -> Self;
}

/// One-event-at-a-time folding, for states that can be turned back into their partial form.
pub trait AppState: PartialAppState {
    fn apply_event(self, event: &Timestamped<Self::Event>) -> Self;
}

impl<T> AppState for T
where
    T: PartialAppState,
    T::Partial: From<T>,
{
    fn apply_event(self, event: &Timestamped<Self::Event>) -> Self {
        T::finalize(T::process_event(T::Partial::from(self), event))
    }
}

/// Folds `events` over `initial` in the order given and finalizes once at the end.
pub fn fold_events<'a, S>(
    initial: S::Partial,
    events: impl IntoIterator<Item = &'a Timestamped<S::Event>>,
) -> S
where
    S: PartialAppState,
    S::Event: 'a,
{
    let partial = events
        .into_iter()
        .fold(initial, |partial, event| S::process_event(partial, event));
    S::finalize(partial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    enum CounterEvent {
        Add(i64),
        Reset,
    }

    impl Event for CounterEvent {
        fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
            serde_json::to_value(self)
        }

        fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error> {
            serde_json::from_value(json.clone())
        }
    }

    #[derive(Debug, PartialEq)]
    struct Counter {
        total: i64,
        events_seen: usize,
    }

    impl PartialAppState for Counter {
        type Event = CounterEvent;
        type Partial = Self;

        fn process_event(mut partial: Self, event: &Timestamped<CounterEvent>) -> Self {
            partial.events_seen += 1;
            match event.event {
                CounterEvent::Add(n) => partial.total += n,
                CounterEvent::Reset => partial.total = 0,
            }
            partial
        }

        fn finalize(partial: Self) -> Self {
            partial
        }
    }

    fn stamp(sequence: usize, event: CounterEvent) -> Timestamped<CounterEvent> {
        Timestamped {
            timestamp: Utc.timestamp_opt(1_700_000_000 + sequence as i64, 0).unwrap(),
            sequence,
            event,
        }
    }

    #[test]
    fn test_apply_event() {
        let counter = Counter {
            total: 0,
            events_seen: 0,
        };
        let counter = counter.apply_event(&stamp(0, CounterEvent::Add(5)));
        assert_eq!(counter.total, 5);
        assert_eq!(counter.events_seen, 1);
    }

    #[test]
    fn test_fold_matches_one_at_a_time() {
        let events = vec![
            stamp(0, CounterEvent::Add(2)),
            stamp(1, CounterEvent::Add(3)),
            stamp(2, CounterEvent::Reset),
            stamp(3, CounterEvent::Add(7)),
        ];

        let folded: Counter = fold_events(
            Counter {
                total: 0,
                events_seen: 0,
            },
            &events,
        );

        let mut stepped = Counter {
            total: 0,
            events_seen: 0,
        };
        for event in &events {
            stepped = stepped.apply_event(event);
        }

        assert_eq!(folded, stepped);
        assert_eq!(folded.total, 7);
        assert_eq!(folded.events_seen, 4);
    }
}
