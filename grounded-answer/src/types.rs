//! Response types shared across the answering pipeline.

use grounded_retriever::retrieval::GateRefusal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clamp a raw similarity score into the `[0, 1]` confidence range.
///
/// Raw inner-product scores live in `[-1, 1]` and can drift slightly
/// outside it through floating-point error; confidence reported to callers
/// never does.
pub fn clamp_confidence(raw: f32) -> f32 {
    raw.clamp(0.0, 1.0)
}

/// Machine-readable reason an answer was refused.
///
/// Every refusal surfaces as a structured [`AnswerResult`] with a
/// human-diagnosable reason string, never as a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    /// The question was empty after trimming.
    EmptyQuestion,
    /// Retrieval returned nothing.
    NoEvidence,
    /// The best retrieval score fell below the threshold.
    BelowThreshold,
    /// A generated draft lacked its mandatory quote section.
    MissingQuoteSection,
    /// No quote line was verbatim-present in the evidence.
    NoVerbatimEvidence,
    /// The generated answer text was empty after cleanup.
    EmptyFinalAnswer,
    /// The generator itself reported insufficient evidence.
    ModelDeclined,
    /// An embedding or generation call failed.
    CollaboratorFailure,
}

impl fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            RefusalReason::EmptyQuestion => "Empty question",
            RefusalReason::NoEvidence => "No supporting sources found",
            RefusalReason::BelowThreshold => "Evidence below threshold",
            RefusalReason::MissingQuoteSection => "Answer draft missing its quote section",
            RefusalReason::NoVerbatimEvidence => {
                "No verbatim supporting quote found in evidence"
            }
            RefusalReason::EmptyFinalAnswer => "Generated answer was empty",
            RefusalReason::ModelDeclined => "Model reported insufficient evidence",
            RefusalReason::CollaboratorFailure => "Upstream model call failed",
        };
        f.write_str(message)
    }
}

impl From<GateRefusal> for RefusalReason {
    fn from(refusal: GateRefusal) -> Self {
        match refusal {
            GateRefusal::EmptyQuestion => RefusalReason::EmptyQuestion,
            GateRefusal::NoEvidence => RefusalReason::NoEvidence,
            GateRefusal::BelowThreshold => RefusalReason::BelowThreshold,
        }
    }
}

/// The outbound response for one question.
///
/// Exactly one of `answer` and `reason` is populated: a refusal carries a
/// reason, empty sources, and zero confidence; an accepted answer carries
/// the evidence ids that contributed and the clamped best score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    pub confidence: f32,
    pub reason: Option<String>,
}

impl AnswerResult {
    /// A structured refusal with the given reason.
    pub fn refusal(reason: RefusalReason) -> Self {
        Self {
            answer: None,
            sources: Vec::new(),
            confidence: 0.0,
            reason: Some(reason.to_string()),
        }
    }

    /// An accepted answer backed by the given evidence ids. The raw score
    /// is clamped into `[0, 1]` before it becomes confidence.
    pub fn answered(answer: String, sources: Vec<String>, raw_score: f32) -> Self {
        Self {
            answer: Some(answer),
            sources,
            confidence: clamp_confidence(raw_score),
            reason: None,
        }
    }

    /// Returns `true` when this result is a refusal.
    pub fn is_refusal(&self) -> bool {
        self.answer.is_none()
    }
}
