//! history.rs — in-memory log of recent exchanges for the debug endpoint.
//!
//! Entries never store user text, only a short digest of it.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::dataset::records::Urgency;

/// Which surface produced an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Chat,
    Predict,
    Solution,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExchangeEntry {
    pub ts_unix: u64,
    pub kind: ExchangeKind,
    pub urgency: Urgency,
    /// Short outcome label: the reply source, or the predicted disease.
    pub label: String,
    /// Anonymized digest of the user input.
    pub digest: String,
}

#[derive(Debug)]
pub struct ExchangeHistory {
    inner: Mutex<Vec<ExchangeEntry>>,
    cap: usize,
}

impl ExchangeHistory {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn record(&self, kind: ExchangeKind, urgency: Urgency, label: &str, input: &str) {
        let entry = ExchangeEntry {
            ts_unix: now_unix(),
            kind,
            urgency,
            label: label.to_string(),
            digest: anon_hash(input),
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<ExchangeEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("history mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hashed id for user input. Never log or store the raw text.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_digest_not_text() {
        let history = ExchangeHistory::with_capacity(10);
        history.record(
            ExchangeKind::Chat,
            Urgency::Low,
            "dataset",
            "my knee hurts",
        );

        let last = history.snapshot_last_n(1);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].label, "dataset");
        assert_eq!(last[0].digest.len(), 12);
        assert!(!last[0].digest.contains("knee"));
    }

    #[test]
    fn capacity_drops_the_oldest_entries() {
        let history = ExchangeHistory::with_capacity(3);
        for i in 0..5 {
            history.record(
                ExchangeKind::Predict,
                Urgency::Low,
                &format!("label-{}", i),
                "input",
            );
        }

        assert_eq!(history.len(), 3);
        let labels: Vec<String> = history
            .snapshot_last_n(10)
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, vec!["label-2", "label-3", "label-4"]);
    }

    #[test]
    fn digest_is_stable_per_input() {
        assert_eq!(anon_hash("headache"), anon_hash("headache"));
        assert_ne!(anon_hash("headache"), anon_hash("headaches"));
    }
}
