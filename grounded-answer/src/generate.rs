//! Constrained answer generation with a quote obligation.
//!
//! The prompt instructs the model to answer only from the supplied
//! evidence, to emit a fixed "unknown" phrase when the evidence is
//! insufficient, and to append a labeled quote section with sentences
//! copied verbatim from the evidence. The verifier in [`crate::verify`]
//! holds the model to that obligation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Anchor token separating echoed prompt preamble from the model's answer.
pub const FINAL_ANSWER_ANCHOR: &str = "FINAL ANSWER:";

/// Label the model must use for its verbatim-quote section.
pub const QUOTE_SECTION_LABEL: &str = "QUOTES";

/// Fixed phrase the model must emit when the evidence does not contain
/// the answer. Matched as a case-insensitive prefix of the cleaned draft.
pub const UNKNOWN_PHRASE: &str = "I don't have that information in the provided context.";

/// Prompt section labels that must never leak into a delivered answer.
/// The quote label is deliberately absent, verification needs it intact.
const INTERNAL_LABELS: &[&str] = &["INSTRUCTIONS:", "CONTEXT:", "QUESTION:"];

/// Marker appended when a draft is truncated to the length cap.
const ELLIPSIS: char = '…';

/// A text-generation backend invoked once per question.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a completion for the prompt. No retries, no streaming.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;

    /// Short name for logs.
    fn provider_name(&self) -> &str;
}

/// Build the grounded prompt for one question and its evidence.
pub fn build_grounded_prompt(question: &str, evidence: &str) -> String {
    format!(
        "INSTRUCTIONS:\n\
         You are a restaurant customer-support assistant. Answer the question \
         using ONLY the context below.\n\
         If the context does not contain the answer, reply with exactly this \
         sentence and nothing else: {UNKNOWN_PHRASE}\n\
         After your answer, add a section labeled {QUOTE_SECTION_LABEL} \
         containing 1-3 sentences copied word for word from the context.\n\
         \n\
         CONTEXT:\n\
         {evidence}\n\
         \n\
         QUESTION:\n\
         {question}\n\
         \n\
         {FINAL_ANSWER_ANCHOR}\n"
    )
}

/// Clean a raw completion into a draft: keep only the text after the last
/// anchor occurrence, strip leaked internal labels, and truncate to
/// `max_chars` with an ellipsis marker.
pub fn clean_draft(raw: &str, max_chars: usize) -> String {
    let after_anchor = match raw.rfind(FINAL_ANSWER_ANCHOR) {
        Some(position) => &raw[position + FINAL_ANSWER_ANCHOR.len()..],
        None => raw,
    };
    let mut draft = after_anchor.to_string();
    for label in INTERNAL_LABELS {
        draft = draft.replace(label, "");
    }
    let draft = draft.trim();
    if draft.chars().count() > max_chars {
        let mut truncated: String = draft.chars().take(max_chars).collect();
        truncated.push(ELLIPSIS);
        truncated
    } else {
        draft.to_string()
    }
}

/// True when the draft is the model's own refusal, which bypasses
/// verification and becomes a structured refusal.
pub fn is_self_refusal(draft: &str) -> bool {
    draft
        .trim()
        .to_lowercase()
        .starts_with(&UNKNOWN_PHRASE.to_lowercase())
}

/// Generation backend speaking the Ollama `/api/generate` protocol.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            temperature,
        })
    }
}

#[async_trait]
impl GenerationProvider for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };
        tracing::debug!(model = %self.model, "sending generation request");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;
        Ok(response.response)
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_question_evidence_and_anchor() {
        let prompt = build_grounded_prompt("do you deliver?", "DELIVERY\nWithin Abuja only.");
        assert!(prompt.contains("do you deliver?"));
        assert!(prompt.contains("Within Abuja only."));
        assert!(prompt.trim_end().ends_with(FINAL_ANSWER_ANCHOR));
    }

    #[test]
    fn clean_keeps_text_after_last_anchor() {
        let raw = format!(
            "echoed preamble {FINAL_ANSWER_ANCHOR} draft one {FINAL_ANSWER_ANCHOR} the real answer"
        );
        assert_eq!(clean_draft(&raw, 100), "the real answer");
    }

    #[test]
    fn clean_strips_internal_labels_but_keeps_quote_label() {
        let raw = format!("CONTEXT: leaked\nWe deliver.\n{QUOTE_SECTION_LABEL}\nWe deliver.");
        let draft = clean_draft(&raw, 200);
        assert!(!draft.contains("CONTEXT:"));
        assert!(draft.contains(QUOTE_SECTION_LABEL));
    }

    #[test]
    fn clean_truncates_with_ellipsis() {
        let raw = "a".repeat(50);
        let draft = clean_draft(&raw, 10);
        assert_eq!(draft.chars().count(), 11);
        assert!(draft.ends_with(ELLIPSIS));
    }

    #[test]
    fn self_refusal_is_case_insensitive_prefix() {
        assert!(is_self_refusal(UNKNOWN_PHRASE));
        assert!(is_self_refusal(
            "i DON'T have that information in the provided context. Sorry!"
        ));
        assert!(!is_self_refusal("We are open 9am-9pm."));
    }
}
