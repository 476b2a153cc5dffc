//! Retrieve → prompt → generate pipeline

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::Generator;
use crate::retrieval::Bm25Retriever;
use crate::types::ScoredDocument;

/// Everything one pipeline run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Retrieved documents, most relevant first
    pub documents: Vec<ScoredDocument>,
    /// Prompt handed to the generator
    pub prompt: String,
    /// Generated replies, possibly empty
    pub replies: Vec<String>,
}

impl PipelineOutput {
    /// First reply, if any
    pub fn first_reply(&self) -> Option<&str> {
        self.replies.first().map(String::as_str)
    }
}

/// Question answering pipeline wiring retriever, prompt builder and generator
#[derive(Clone)]
pub struct RagPipeline {
    retriever: Bm25Retriever,
    prompt_builder: PromptBuilder,
    generator: Arc<dyn Generator>,
}

impl RagPipeline {
    pub fn new(
        retriever: Bm25Retriever,
        prompt_builder: PromptBuilder,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            retriever,
            prompt_builder,
            generator,
        }
    }

    pub fn retriever(&self) -> &Bm25Retriever {
        &self.retriever
    }

    pub fn prompt_builder(&self) -> &PromptBuilder {
        &self.prompt_builder
    }

    pub fn generator(&self) -> &Arc<dyn Generator> {
        &self.generator
    }

    /// Answer a question. Generator failures propagate unchanged.
    pub async fn run(&self, question: &str) -> Result<PipelineOutput> {
        let start = Instant::now();

        let documents = self.retriever.retrieve(question);
        let prompt = self.prompt_builder.build(question, documents.as_slice());
        tracing::debug!(
            "Built prompt ({} chars) from {} documents",
            prompt.len(),
            documents.len()
        );

        let replies = self.generator.generate(&prompt).await?;

        tracing::info!(
            "Pipeline finished in {}ms: {} documents, {} replies ({})",
            start.elapsed().as_millis(),
            documents.len(),
            replies.len(),
            self.generator.name()
        );

        Ok(PipelineOutput {
            documents,
            prompt,
            replies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RetrieverConfig, DEFAULT_TEMPLATE};
    use crate::error::Error;
    use crate::providers::FixedGenerator;
    use crate::seed::example_documents;
    use crate::store::InMemoryDocumentStore;
    use async_trait::async_trait;

    fn retriever() -> Bm25Retriever {
        let store = Arc::new(InMemoryDocumentStore::default());
        store.write(example_documents());
        Bm25Retriever::new(store, &RetrieverConfig::default()).unwrap()
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<Vec<String>> {
            Err(Error::llm("out of memory"))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn model(&self) -> &str {
            "none"
        }
    }

    #[tokio::test]
    async fn test_run_feeds_retrieved_documents_to_generator() {
        let generator = Arc::new(FixedGenerator::new(["Mary"]));
        let pipeline = RagPipeline::new(
            retriever(),
            PromptBuilder::new(DEFAULT_TEMPLATE).unwrap(),
            generator.clone(),
        );

        let output = pipeline.run("Who is a chartered accountant?").await.unwrap();
        assert_eq!(output.first_reply(), Some("Mary"));
        assert_eq!(output.documents[0].content(), "Mary is a chartered accountant");

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], output.prompt);
        assert!(output.prompt.contains("Mary is a chartered accountant"));
        assert!(!output.prompt.contains("brussels sprouts"));
        assert!(output.prompt.contains("Question: Who is a chartered accountant?"));
    }

    #[tokio::test]
    async fn test_run_with_no_replies() {
        let pipeline = RagPipeline::new(
            retriever(),
            PromptBuilder::new(DEFAULT_TEMPLATE).unwrap(),
            Arc::new(FixedGenerator::empty()),
        );

        let output = pipeline.run("anything").await.unwrap();
        assert!(output.first_reply().is_none());
        assert!(output.documents.is_empty());
    }

    #[tokio::test]
    async fn test_generator_error_propagates() {
        let pipeline = RagPipeline::new(
            retriever(),
            PromptBuilder::new(DEFAULT_TEMPLATE).unwrap(),
            Arc::new(FailingGenerator),
        );

        assert!(matches!(pipeline.run("who?").await, Err(Error::Llm(_))));
    }
}
