//! The confidence gate: proceed to answer synthesis, or refuse.
//!
//! The gate converts a retrieval outcome into a proceed/refuse verdict
//! before any generative work is attempted. Its comparison semantics are
//! part of the contract and must not drift: refusal on strictly
//! `best_score < threshold`, proceed on `best_score >= threshold`. The
//! numeric threshold itself is calibration, carried in configuration.

use std::fmt;

/// Machine-readable reason a request was refused at the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRefusal {
    /// The question was empty after trimming (checked upstream, before
    /// retrieval).
    EmptyQuestion,
    /// Retrieval returned no results at all.
    NoEvidence,
    /// The best retrieval score fell below the configured threshold.
    BelowThreshold,
}

impl fmt::Display for GateRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            GateRefusal::EmptyQuestion => "Empty question",
            GateRefusal::NoEvidence => "No supporting sources found",
            GateRefusal::BelowThreshold => "Evidence below threshold",
        };
        f.write_str(message)
    }
}

/// Verdict of the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Enough evidence: continue to answer synthesis.
    Proceed,
    /// Not enough evidence: refuse with the given reason.
    Refuse(GateRefusal),
}

/// Evidence-sufficiency gate with a tunable threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    threshold: f32,
}

impl ConfidenceGate {
    /// Create a gate with the given score threshold.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// The configured threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Decide whether retrieval produced enough evidence to answer.
    pub fn decide(&self, best_score: f32, result_count: usize) -> GateOutcome {
        if result_count == 0 {
            return GateOutcome::Refuse(GateRefusal::NoEvidence);
        }
        if best_score < self.threshold {
            return GateOutcome::Refuse(GateRefusal::BelowThreshold);
        }
        GateOutcome::Proceed
    }
}
