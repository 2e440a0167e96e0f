//! End-to-end pipeline behavior: refusal scenarios, templated answers,
//! and generative answers held to the quote obligation.

use async_trait::async_trait;
use grounded_answer::{
    AnswerMode, GenerationProvider, PipelineConfig, SupportPipeline,
};
use grounded_context::{ChunkingStrategy, SectionChunker};
use grounded_embed::HashEmbedder;
use grounded_retriever::retrieval::{IndexBuilder, IndexStore, Retriever};
use std::sync::Arc;

const KB: &str = "\
ABOUT US\n\
We are a family restaurant in Wuse, Abuja, serving Nigerian dishes daily.\n\
\n\
MENU\n\
- Jollof rice\n\
- Egusi soup with pounded yam\n\
- Fried plantain\n\
\n\
DELIVERY\n\
We deliver within Abuja only, via our own dispatch riders.\n\
\n\
OPENING HOURS\n\
- Mon-Sun: 9:00am - 9:00pm\n\
\n\
PAYMENT\n\
We accept bank transfer and POS payment. We do not accept cash on delivery.\n";

/// Test double that returns a fixed completion.
struct ScriptedGenerator {
    reply: String,
}

impl ScriptedGenerator {
    fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
        })
    }
}

#[async_trait]
impl GenerationProvider for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.reply.clone())
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

async fn build_retriever() -> Retriever {
    let dir = tempfile::tempdir().unwrap();
    let store = IndexStore::new(dir.path());
    let provider = Arc::new(HashEmbedder::new(128));
    IndexBuilder::new(ChunkingStrategy::Sections(SectionChunker::new(2, 10)))
        .build_and_save(provider.as_ref(), KB, &store)
        .await
        .unwrap();
    Retriever::from_store(&store, provider).unwrap()
}

fn templated_config() -> PipelineConfig {
    // Hash embeddings score lower than real model embeddings, so the
    // tests that exercise the answer path run with a permissive gate.
    PipelineConfig::default().with_threshold(-1.0)
}

#[tokio::test]
async fn empty_question_refuses_before_retrieval() {
    let pipeline = SupportPipeline::new(build_retriever().await, &templated_config(), None).unwrap();
    let result = pipeline.answer("   ").await;
    assert_eq!(result.answer, None);
    assert_eq!(result.reason.as_deref(), Some("Empty question"));
    assert_eq!(result.confidence, 0.0);
    assert!(result.sources.is_empty());
}

#[tokio::test]
async fn below_threshold_refuses_with_empty_sources() {
    let config = PipelineConfig::default().with_threshold(1.1);
    let pipeline = SupportPipeline::new(build_retriever().await, &config, None).unwrap();
    let result = pipeline.answer("what are your opening hours?").await;
    assert_eq!(result.answer, None);
    assert_eq!(result.reason.as_deref(), Some("Evidence below threshold"));
    assert!(result.sources.is_empty());
    assert_eq!(result.confidence, 0.0);
}

#[tokio::test]
async fn price_question_gets_fixed_message_with_sources() {
    let pipeline = SupportPipeline::new(build_retriever().await, &templated_config(), None).unwrap();
    let result = pipeline.answer("how much is the jollof rice?").await;
    let answer = result.answer.expect("templated answer");
    assert!(answer.contains("can’t confirm a price"));
    assert!(!result.sources.is_empty());
    assert!(result.sources[0].starts_with("chunk_"));
    assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
}

#[tokio::test]
async fn templated_hours_answer_reads_evidence() {
    let pipeline = SupportPipeline::new(build_retriever().await, &templated_config(), None).unwrap();
    let result = pipeline.answer("what are your opening hours?").await;
    let answer = result.answer.expect("templated answer");
    assert!(answer.contains("9:00am - 9:00pm"));
}

#[tokio::test]
async fn generative_accepts_verbatim_quote() {
    let generator = ScriptedGenerator::new(
        "FINAL ANSWER:\nWe deliver only inside Abuja.\nQUOTES\nWe deliver within Abuja only, via our own dispatch riders.",
    );
    let config = templated_config().with_mode(AnswerMode::Generative);
    let pipeline =
        SupportPipeline::new(build_retriever().await, &config, Some(generator)).unwrap();

    let result = pipeline.answer("do you deliver to my area?").await;
    assert_eq!(result.answer.as_deref(), Some("We deliver only inside Abuja."));
    assert_eq!(result.reason, None);
    assert!(!result.sources.is_empty());
}

#[tokio::test]
async fn generative_rejects_paraphrased_quote() {
    let generator = ScriptedGenerator::new(
        "FINAL ANSWER:\nWe deliver only inside Abuja.\nQUOTES\nDeliveries are restricted to the capital region.",
    );
    let config = templated_config().with_mode(AnswerMode::Generative);
    let pipeline =
        SupportPipeline::new(build_retriever().await, &config, Some(generator)).unwrap();

    let result = pipeline.answer("do you deliver to my area?").await;
    assert_eq!(result.answer, None);
    assert_eq!(
        result.reason.as_deref(),
        Some("No verbatim supporting quote found in evidence")
    );
    assert!(result.sources.is_empty());
}

#[tokio::test]
async fn generative_model_refusal_passes_through() {
    let generator = ScriptedGenerator::new(
        "FINAL ANSWER:\nI don't have that information in the provided context.",
    );
    let config = templated_config().with_mode(AnswerMode::Generative);
    let pipeline =
        SupportPipeline::new(build_retriever().await, &config, Some(generator)).unwrap();

    let result = pipeline.answer("do you cater weddings?").await;
    assert_eq!(result.answer, None);
    assert_eq!(
        result.reason.as_deref(),
        Some("Model reported insufficient evidence")
    );
}

#[tokio::test]
async fn generator_failure_folds_into_refusal() {
    struct FailingGenerator;

    #[async_trait]
    impl GenerationProvider for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("backend unreachable")
        }

        fn provider_name(&self) -> &str {
            "failing"
        }
    }

    let config = templated_config().with_mode(AnswerMode::Generative);
    let pipeline = SupportPipeline::new(
        build_retriever().await,
        &config,
        Some(Arc::new(FailingGenerator)),
    )
    .unwrap();

    let result = pipeline.answer("do you deliver?").await;
    assert_eq!(result.answer, None);
    assert_eq!(result.reason.as_deref(), Some("Upstream model call failed"));
}

#[tokio::test]
async fn generative_mode_requires_generator_at_construction() {
    let config = templated_config().with_mode(AnswerMode::Generative);
    assert!(SupportPipeline::new(build_retriever().await, &config, None).is_err());
}
