//! The request-scoped answering pipeline.
//!
//! Retrieval, gating, synthesis, and verification for one question at a
//! time. The only long-lived state is the loaded index inside the
//! retriever; it is read-only for the process lifetime, so concurrent
//! questions need no locking here.

use crate::config::{AnswerMode, PipelineConfig};
use crate::generate::{self, GenerationProvider};
use crate::intents;
use crate::types::{AnswerResult, RefusalReason};
use crate::verify;
use grounded_retriever::retrieval::{ConfidenceGate, GateOutcome, RetrievalResult, Retriever};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Join evidence texts in rank order for prompting and verification.
pub fn evidence_text(results: &[RetrievalResult]) -> String {
    results
        .iter()
        .map(|result| result.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One loaded pipeline: retriever, gate, and answer strategy.
///
/// `answer` never returns an error. Collaborator failures (embedding or
/// generation calls) fold into a generic refusal so a bad request can
/// never take down the shared index.
pub struct SupportPipeline {
    retriever: Retriever,
    gate: ConfidenceGate,
    mode: AnswerMode,
    generator: Option<Arc<dyn GenerationProvider>>,
    top_k: usize,
    max_answer_chars: usize,
}

impl SupportPipeline {
    /// Assemble a pipeline. Generative mode requires a generator up
    /// front; failing here keeps the service fail-fast at startup.
    pub fn new(
        retriever: Retriever,
        config: &PipelineConfig,
        generator: Option<Arc<dyn GenerationProvider>>,
    ) -> anyhow::Result<Self> {
        if config.mode == AnswerMode::Generative && generator.is_none() {
            anyhow::bail!("generative mode requires a generation provider");
        }
        Ok(Self {
            retriever,
            gate: ConfidenceGate::new(config.threshold),
            mode: config.mode,
            generator,
            top_k: config.top_k,
            max_answer_chars: config.max_answer_chars,
        })
    }

    /// Answer one question, or refuse with a structured reason.
    pub async fn answer(&self, question: &str) -> AnswerResult {
        let question = question.trim();
        if question.is_empty() {
            warn!("Refusal | best=0.0000 | reason=Empty question");
            return AnswerResult::refusal(RefusalReason::EmptyQuestion);
        }

        let (results, best_score) = match self.retriever.retrieve(question, self.top_k).await {
            Ok(retrieved) => retrieved,
            Err(e) => {
                error!("retrieval failed: {e}");
                return AnswerResult::refusal(RefusalReason::CollaboratorFailure);
            }
        };
        info!(
            "question={question:?} best={best_score:.4} top_k={}",
            self.top_k
        );

        match self.gate.decide(best_score, results.len()) {
            GateOutcome::Refuse(refusal) => {
                warn!("Refusal | best={best_score:.4} | reason={refusal}");
                AnswerResult::refusal(refusal.into())
            }
            GateOutcome::Proceed => {
                let evidence = evidence_text(&results);
                let sources: Vec<String> =
                    results.iter().map(|result| result.id.clone()).collect();
                match self.mode {
                    AnswerMode::Templated => {
                        let answer = intents::respond(question, &evidence);
                        AnswerResult::answered(answer, sources, best_score)
                    }
                    AnswerMode::Generative => {
                        self.generate_answer(question, &evidence, sources, best_score)
                            .await
                    }
                }
            }
        }
    }

    async fn generate_answer(
        &self,
        question: &str,
        evidence: &str,
        sources: Vec<String>,
        best_score: f32,
    ) -> AnswerResult {
        // Construction guarantees a generator in generative mode.
        let Some(generator) = &self.generator else {
            return AnswerResult::refusal(RefusalReason::CollaboratorFailure);
        };

        let prompt = generate::build_grounded_prompt(question, evidence);
        let raw = match generator.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(provider = generator.provider_name(), "generation failed: {e}");
                return AnswerResult::refusal(RefusalReason::CollaboratorFailure);
            }
        };

        let draft = generate::clean_draft(&raw, self.max_answer_chars);
        if generate::is_self_refusal(&draft) {
            warn!("Refusal | best={best_score:.4} | reason=model declined");
            return AnswerResult::refusal(RefusalReason::ModelDeclined);
        }

        match verify::verify_draft(&draft, evidence) {
            Ok(verified) => AnswerResult::answered(verified.answer, sources, best_score),
            Err(rejection) => {
                let reason = RefusalReason::from(rejection);
                warn!("Refusal | best={best_score:.4} | reason={reason}");
                AnswerResult::refusal(reason)
            }
        }
    }
}
