//! Causal dependency index.
//!
//! `caused_by_id` links an event to the event whose occurrence generated
//! it (a follow-up, prep work that spawned a review, and so on). Neither
//! side of such a link may be rescheduled independently, so this index
//! answers "is this event dependency-linked?" from plain id maps rather
//! than live object references. A cycle in the links (A causes B causes A)
//! is a data-integrity condition; every event on or feeding a cycle is
//! treated as pinned.

use std::collections::{HashMap, HashSet};

use crate::event::Event;

/// Index from event id to its causal neighborhood.
#[derive(Debug, Default)]
pub struct CausalIndex {
    dependents: HashMap<String, Vec<String>>,
    has_cause: HashSet<String>,
    cyclic: HashSet<String>,
}

impl CausalIndex {
    /// Build the index for one event list.
    pub fn build(events: &[Event]) -> Self {
        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        let mut has_cause = HashSet::new();
        let mut cause_of: HashMap<&str, &str> = HashMap::new();

        for event in events {
            if let Some(cause) = event.caused_by_id.as_deref() {
                dependents
                    .entry(cause.to_string())
                    .or_default()
                    .push(event.id.clone());
                has_cause.insert(event.id.clone());
                cause_of.insert(event.id.as_str(), cause);
            }
        }

        // Walk each event's ancestor chain; revisiting a node means the
        // chain loops back on itself somewhere upstream.
        let mut cyclic = HashSet::new();
        for event in events {
            let mut seen: HashSet<&str> = HashSet::new();
            let mut current = event.id.as_str();
            loop {
                if !seen.insert(current) {
                    cyclic.insert(event.id.clone());
                    break;
                }
                match cause_of.get(current) {
                    Some(&next) => current = next,
                    None => break,
                }
            }
        }

        Self {
            dependents,
            has_cause,
            cyclic,
        }
    }

    /// Ids of the events generated by the given event.
    pub fn dependents_of(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the event has generated at least one dependent.
    pub fn is_cause(&self, id: &str) -> bool {
        self.dependents.contains_key(id)
    }

    /// Whether the event was generated by another event.
    pub fn has_cause(&self, id: &str) -> bool {
        self.has_cause.contains(id)
    }

    /// Whether the event sits on (or leads into) a causal cycle.
    pub fn in_cycle(&self, id: &str) -> bool {
        self.cyclic.contains(id)
    }

    /// Whether the event participates in any causal relationship and must
    /// therefore not be rescheduled on its own.
    pub fn is_dependency_linked(&self, id: &str) -> bool {
        self.has_cause(id) || self.is_cause(id) || self.in_cycle(id)
    }
}
