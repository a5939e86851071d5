use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Category of an engine decision, for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    #[serde(rename = "Content Analysis")]
    ContentAnalysis,
    #[serde(rename = "Adaptive Learning")]
    AdaptiveLearning,
    #[serde(rename = "Strategic Planning")]
    StrategicPlanning,
    #[serde(rename = "Proactive Suggestion")]
    ProactiveSuggestion,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContentAnalysis => "Content Analysis",
            Self::AdaptiveLearning => "Adaptive Learning",
            Self::StrategicPlanning => "Strategic Planning",
            Self::ProactiveSuggestion => "Proactive Suggestion",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionLogEntry {
    pub seq: u64,
    pub kind: DecisionKind,
    pub reasoning: String,
    pub action: String,
}

/// Append-only audit trail of engine decisions. Never read by the decision
/// logic itself.
///
/// Sequence numbers start at 1 and increase per recorded entry. A bounded
/// log evicts the oldest entries ring-buffer style once the capacity is
/// reached; eviction does not affect the sequence counter.
#[derive(Debug, Clone)]
pub struct DecisionLog {
    entries: VecDeque<DecisionLogEntry>,
    capacity: Option<usize>,
    next_seq: u64,
}

impl DecisionLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: None,
            next_seq: 1,
        }
    }

    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            capacity: Some(capacity.max(1)),
            next_seq: 1,
        }
    }

    /// Appends one entry and returns its sequence number.
    pub fn record(
        &mut self,
        kind: DecisionKind,
        reasoning: impl Into<String>,
        action: impl Into<String>,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(DecisionLogEntry {
            seq,
            kind,
            reasoning: reasoning.into(),
            action: action.into(),
        });
        if let Some(capacity) = self.capacity {
            while self.entries.len() > capacity {
                self.entries.pop_front();
            }
        }
        seq
    }

    pub fn entries(&self) -> impl Iterator<Item = &DecisionLogEntry> {
        self.entries.iter()
    }

    /// The last `n` entries in recorded order.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &DecisionLogEntry> {
        self.entries
            .iter()
            .skip(self.entries.len().saturating_sub(n))
    }

    pub fn last(&self) -> Option<&DecisionLogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DecisionLog {
    fn default() -> Self {
        Self::new()
    }
}
