use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// An event that can be stored in a transcript.
///
/// Implementors usually serialize through a versioned wrapper enum so that old transcripts keep
/// deserializing after the event type grows.
pub trait Event: Sized {
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error>;
    fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error>;
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Timestamped<T> {
    pub timestamp: DateTime<Utc>,
    /// Position of the event among all events applied to the same state.
    pub sequence: usize,
    pub event: T,
}

impl<T> Timestamped<T> {
    pub fn as_ref(&self) -> Timestamped<&T> {
        Timestamped {
            timestamp: self.timestamp,
            sequence: self.sequence,
            event: &self.event,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Timestamped<U> {
        Timestamped {
            timestamp: self.timestamp,
            sequence: self.sequence,
            event: f(self.event),
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Timestamped<U>, E> {
        Ok(Timestamped {
            timestamp: self.timestamp,
            sequence: self.sequence,
            event: f(self.event)?,
        })
    }
}

impl<T: Event> Timestamped<T> {
    pub fn to_json(&self) -> Result<Timestamped<serde_json::Value>, serde_json::Error> {
        self.as_ref().try_map(|event| event.to_json())
    }

    pub fn from_json(json: Timestamped<serde_json::Value>) -> Result<Self, serde_json::Error> {
        json.try_map(|value| {
            T::from_json(&value).inspect_err(|e| {
                log::error!("Error deserializing event JSON into event type: {e:?} in `{value}`");
            })
        })
    }
}

/// Events waiting to be applied once their due time has passed.
///
/// Events due at the same instant come out in the order they were scheduled.
#[derive(Clone, Debug)]
pub struct Timeline<E> {
    pending: BTreeMap<(DateTime<Utc>, usize), E>,
    next_sequence: usize,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            pending: BTreeMap::new(),
            next_sequence: 0,
        }
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `event` to become due at `due`. Returns its scheduling sequence number.
    pub fn schedule(&mut self, due: DateTime<Utc>, event: E) -> usize {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.pending.insert((due, sequence), event);
        sequence
    }

    /// Removes and returns the earliest event that is due at `now`, if any.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<Timestamped<E>> {
        let (&(due, _), _) = self.pending.first_key_value()?;
        if due > now {
            return None;
        }
        self.pending
            .pop_first()
            .map(|((timestamp, sequence), event)| Timestamped {
                timestamp,
                sequence,
                event,
            })
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, &E)> {
        self.pending.iter().map(|((due, _), event)| (*due, event))
    }

    /// Drops every pending event. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
