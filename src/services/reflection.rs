//! Reflection questions shown after a break
//!
//! The provider is asked once per break. Any failure, timeout, or empty
//! reply is replaced by the local templated set so a break always ends with
//! something to answer.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::generator::{GenerateError, TextGenerator};

pub const DEFAULT_QUESTION_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionQuestion {
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl ReflectionQuestion {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: String::new(),
        }
    }
}

/// The fixed set used whenever the provider cannot help
pub fn fallback_questions(topic: &str) -> Vec<ReflectionQuestion> {
    let topic = topic.trim();
    vec![
        ReflectionQuestion::new(format!("What is the most important concept from {topic}?")),
        ReflectionQuestion::new(format!("How would you apply {topic} in a real-world scenario?")),
        ReflectionQuestion::new(format!("Explain {topic} in your own words.")),
    ]
}

pub struct ReflectionGenerator {
    generator: Arc<dyn TextGenerator>,
    count: usize,
    timeout: Duration,
}

impl ReflectionGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, count: usize, timeout: Duration) -> Self {
        Self {
            generator,
            count: count.max(1),
            timeout,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Questions for `topic` using the configured batch size
    pub async fn questions(&self, topic: &str) -> Vec<ReflectionQuestion> {
        self.questions_with_count(topic, self.count).await
    }

    /// Never fails and never returns an empty batch.
    pub async fn questions_with_count(&self, topic: &str, count: usize) -> Vec<ReflectionQuestion> {
        let count = count.max(1);
        match self.request(topic, count).await {
            Ok(questions) => {
                info!(topic, count = questions.len(), "Reflection questions generated");
                questions
            }
            Err(e) => {
                warn!(topic, error = %e, "Reflection question generation failed, using fallback set");
                fallback_questions(topic)
            }
        }
    }

    async fn request(&self, topic: &str, count: usize) -> Result<Vec<ReflectionQuestion>, GenerateError> {
        debug!(topic, count, timeout = ?self.timeout, "request: called");
        let reply = tokio::time::timeout(self.timeout, self.generator.generate_questions(topic, count))
            .await
            .map_err(|_| GenerateError::Timeout(self.timeout))??;

        let questions: Vec<ReflectionQuestion> = reply
            .into_iter()
            .filter_map(|q| {
                let question = q.question.trim();
                (!question.is_empty()).then(|| ReflectionQuestion::new(question))
            })
            .take(count)
            .collect();

        if questions.is_empty() {
            return Err(GenerateError::InvalidResponse("no usable questions".to_string()));
        }
        Ok(questions)
    }
}
