//! Complete answer flow: Cache -> Retrieve -> Generate -> Cache

use std::sync::Arc;

use tracing::debug;
use tracing::info;

use super::ContextOutcome;
use super::ResponseCache;
use super::RetrievedPassage;
use super::Retriever;
use crate::errors::Result;
use crate::llm::prompts::build_rag_prompt;
use crate::llm::prompts::CLARIFICATION_MESSAGE;
use crate::llm::AnswerGenerator;

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    /// Returned verbatim from the response cache
    Cache,
    /// Freshly generated and cached
    Generated,
    /// Nothing relevant was retrieved; the clarification message is returned
    NoMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatAnswer {
    pub text: String,
    pub source: AnswerSource,
    /// Passages the answer was generated from; empty for cached answers
    pub passages: Vec<RetrievedPassage>,
}

/// Answers questions using the cache, the retriever and the generator
pub struct ChatService {
    retriever: Retriever,
    cache: ResponseCache,
    generator: Arc<dyn AnswerGenerator>,
}

impl ChatService {
    pub fn new(
        retriever: Retriever,
        cache: ResponseCache,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            retriever,
            cache,
            generator,
        }
    }

    /// Answer one question
    ///
    /// Cached answers are returned without embedding or regeneration.
    /// `NoMatch` yields the clarification message and is not cached, so the
    /// question can be answered once the corpus grows.
    pub async fn ask(&mut self, question: &str) -> Result<ChatAnswer> {
        if let Some(answer) = self.cache.get(question) {
            info!("(Cached Response)");
            return Ok(ChatAnswer {
                text: answer.to_string(),
                source: AnswerSource::Cache,
                passages: Vec::new(),
            });
        }

        let passages = self.retriever.retrieve(question).await?;
        let context = match self.retriever.context_for(&passages) {
            ContextOutcome::Context(context) => context,
            ContextOutcome::NoMatch => {
                debug!("No passage within threshold; asking for clarification");
                return Ok(ChatAnswer {
                    text: CLARIFICATION_MESSAGE.to_string(),
                    source: AnswerSource::NoMatch,
                    passages,
                });
            }
        };

        debug!("Context length: {} chars", context.len());
        let prompt = build_rag_prompt(question, &context);
        let answer = self.generator.complete(&prompt).await?;

        self.cache.put(question, answer.as_str())?;
        Ok(ChatAnswer {
            text: answer,
            source: AnswerSource::Generated,
            passages,
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}
