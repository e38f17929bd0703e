//! Append-only event log
//!
//! Records every mutation for later statistics. The log grows without bound;
//! at the scale of a single shop's inventory that is acceptable and trimming
//! it is a non-goal. It is never consulted for store or grid correctness.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::core::identity::ProductId;
use crate::core::product::Product;

/// How many names the top-added / top-removed lists keep
const TOP_NAMES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Add,
    Edit,
    Delete,
    Move,
    Pick,
    Return,
}

impl EventKind {
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::Add,
            EventKind::Edit,
            EventKind::Delete,
            EventKind::Move,
            EventKind::Pick,
            EventKind::Return,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Add => "add",
            EventKind::Edit => "edit",
            EventKind::Delete => "delete",
            EventKind::Move => "move",
            EventKind::Pick => "pick",
            EventKind::Return => "return",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shallow copy of the product fields worth keeping in the audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventProduct {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lot: String,
    #[serde(default, rename = "expiry")]
    pub expiry_text: String,
    pub date_added: DateTime<Utc>,
}

impl From<&Product> for EventProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            lot: product.lot.clone(),
            expiry_text: product.expiry_text.clone(),
            date_added: product.date_added,
        }
    }
}

impl EventProduct {
    /// Label used in the top-added/top-removed tallies
    fn tally_label(&self) -> Option<&str> {
        if !self.name.trim().is_empty() {
            Some(self.name.trim())
        } else if !self.lot.trim().is_empty() {
            Some(self.lot.trim())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub product: EventProduct,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn append(&mut self, kind: EventKind, product: &Product) {
        self.events.push(Event {
            kind,
            product: EventProduct::from(product),
            at: Utc::now(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Aggregate the log on demand; nothing is maintained incrementally
    pub fn stats(&self) -> EventStats {
        let mut counts: HashMap<EventKind, usize> = HashMap::new();
        let mut added: HashMap<String, usize> = HashMap::new();
        let mut removed: HashMap<String, usize> = HashMap::new();
        let mut added_ids: HashSet<&ProductId> = HashSet::new();

        for event in &self.events {
            *counts.entry(event.kind).or_default() += 1;
            match event.kind {
                EventKind::Add => {
                    added_ids.insert(&event.product.id);
                    if let Some(label) = event.product.tally_label() {
                        *added.entry(label.to_string()).or_default() += 1;
                    }
                }
                EventKind::Delete => {
                    if let Some(label) = event.product.tally_label() {
                        *removed.entry(label.to_string()).or_default() += 1;
                    }
                }
                _ => {}
            }
        }

        // dwell = removal time minus date_added, over delete events whose
        // product also has a matched add event in this log
        let mut dwell_seconds: i64 = 0;
        let mut dwell_count: i64 = 0;
        for event in &self.events {
            if event.kind == EventKind::Delete && added_ids.contains(&event.product.id) {
                dwell_seconds += (event.at - event.product.date_added).num_seconds();
                dwell_count += 1;
            }
        }
        let average_dwell = if dwell_count > 0 {
            Some(Duration::seconds(dwell_seconds / dwell_count))
        } else {
            None
        };

        EventStats {
            counts,
            top_added: top_entries(added),
            top_removed: top_entries(removed),
            average_dwell,
        }
    }
}

fn top_entries(tallies: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = tallies.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(TOP_NAMES);
    entries
}

/// Read-side aggregation over the event log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStats {
    pub counts: HashMap<EventKind, usize>,
    pub top_added: Vec<(String, usize)>,
    pub top_removed: Vec<(String, usize)>,
    pub average_dwell: Option<Duration>,
}

impl EventStats {
    pub fn count(&self, kind: EventKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Product {
        Product::new(name.to_string(), String::new(), String::new())
    }

    #[test]
    fn test_append_records_kind_snapshot_and_time() {
        let mut log = EventLog::new();
        let p = named("Milk");
        log.append(EventKind::Add, &p);
        assert_eq!(log.len(), 1);
        let event = &log.events()[0];
        assert_eq!(event.kind, EventKind::Add);
        assert_eq!(event.product.id, p.id);
        assert_eq!(event.product.name, "Milk");
    }

    #[test]
    fn test_counts_per_kind() {
        let mut log = EventLog::new();
        let p = named("Milk");
        log.append(EventKind::Add, &p);
        log.append(EventKind::Move, &p);
        log.append(EventKind::Move, &p);
        log.append(EventKind::Delete, &p);
        let stats = log.stats();
        assert_eq!(stats.count(EventKind::Add), 1);
        assert_eq!(stats.count(EventKind::Move), 2);
        assert_eq!(stats.count(EventKind::Delete), 1);
        assert_eq!(stats.count(EventKind::Pick), 0);
    }

    #[test]
    fn test_top_added_sorted_by_count() {
        let mut log = EventLog::new();
        for _ in 0..3 {
            log.append(EventKind::Add, &named("Milk"));
        }
        log.append(EventKind::Add, &named("Bread"));
        let stats = log.stats();
        assert_eq!(stats.top_added[0], ("Milk".to_string(), 3));
        assert_eq!(stats.top_added[1], ("Bread".to_string(), 1));
    }

    #[test]
    fn test_tally_falls_back_to_lot_and_skips_blank() {
        let mut log = EventLog::new();
        log.append(
            EventKind::Add,
            &Product::new(String::new(), "L-42".into(), String::new()),
        );
        log.append(
            EventKind::Add,
            &Product::new(String::new(), String::new(), "2025-01-01".into()),
        );
        let stats = log.stats();
        assert_eq!(stats.top_added, vec![("L-42".to_string(), 1)]);
    }

    #[test]
    fn test_average_dwell_matched_pairs_only() {
        let mut log = EventLog::new();
        let mut p = named("Milk");
        p.date_added = Utc::now() - Duration::hours(10);
        log.append(EventKind::Add, &p);
        log.append(EventKind::Delete, &p);

        // deleted but never added in this log: excluded from dwell
        let stray = named("Stray");
        log.append(EventKind::Delete, &stray);

        let stats = log.stats();
        let dwell = stats.average_dwell.unwrap();
        assert!(dwell >= Duration::hours(10));
        assert!(dwell < Duration::hours(11));
    }

    #[test]
    fn test_average_dwell_none_without_pairs() {
        let mut log = EventLog::new();
        log.append(EventKind::Add, &named("Milk"));
        assert_eq!(log.stats().average_dwell, None);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut log = EventLog::new();
        log.append(EventKind::Add, &named("Milk"));
        log.append(EventKind::Pick, &named("Bread"));
        let json = serde_json::to_string(&log).unwrap();
        let back: EventLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
