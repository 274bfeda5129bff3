//! Generative-text seam
//!
//! Implementors only provide [`TextGenerator::complete`]; every study helper
//! (summaries, flashcards, questions, answer checking, plan outlines) is a
//! provided method that builds the prompt and parses the reply.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::reflection::ReflectionQuestion;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("No generative text provider is configured")]
    NotConfigured,

    #[error("Input text cannot be empty")]
    EmptyInput,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDraft {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl AnswerFeedback {
    /// Used when the provider answers but not in the requested shape
    fn heuristic(user_answer: &str) -> Self {
        let thorough = user_answer.chars().count() > 20;
        Self {
            is_correct: thorough,
            feedback: "Unable to analyze your answer in detail. Please try again later.".to_string(),
            correct_answer: (!thorough).then(|| {
                "A more complete answer would address the key points of the question.".to_string()
            }),
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the provider's text reply
    async fn complete(&self, prompt: &str) -> Result<String, GenerateError>;

    /// Whether calls can succeed at all; used for status reporting
    fn is_configured(&self) -> bool {
        true
    }

    async fn summarize(&self, text: &str) -> Result<String, GenerateError> {
        let text = non_empty(text)?;
        let prompt = format!(
            "Please summarize the following text concisely while maintaining key points:\n\n\
             {text}\n\n\
             Provide a structured summary with key points and main concepts."
        );
        let summary = self.complete(&prompt).await?;
        if summary.trim().is_empty() {
            return Err(GenerateError::InvalidResponse("empty summary".to_string()));
        }
        Ok(summary)
    }

    async fn generate_flashcards(
        &self,
        text: &str,
        count: usize,
    ) -> Result<Vec<FlashcardDraft>, GenerateError> {
        let text = non_empty(text)?;
        let prompt = format!(
            "Create {count} flashcards from the following study material:\n\n\
             {text}\n\n\
             Format each flashcard as a question and answer pair. Focus on key concepts, \
             definitions, and relationships. Each flashcard should test understanding, not \
             just memorization.\n\
             Format your response as a JSON array of objects with 'question' and 'answer' properties."
        );
        let reply = self.complete(&prompt).await?;

        match parse_json_span::<Vec<FlashcardDraft>>(&reply, '[', ']') {
            Some(mut cards) => {
                cards.retain(|c| !c.question.trim().is_empty());
                cards.truncate(count);
                debug!(cards = cards.len(), "generate_flashcards: parsed");
                Ok(cards)
            }
            None => {
                warn!("Flashcard reply was not a JSON array, using placeholder cards");
                Ok(placeholder_flashcards(count))
            }
        }
    }

    async fn generate_questions(
        &self,
        topic: &str,
        count: usize,
    ) -> Result<Vec<ReflectionQuestion>, GenerateError> {
        let topic = non_empty(topic)?;
        let prompt = format!(
            "Create {count} reflective questions about the topic: {topic}.\n\n\
             These questions should:\n\
             1. Encourage deep thinking about the material\n\
             2. Help assess understanding of key concepts\n\
             3. Prompt application of knowledge to real scenarios\n\
             4. Be open-ended and thoughtful\n\n\
             Format your response as a JSON array of objects with 'question' and 'answer' properties."
        );
        let reply = self.complete(&prompt).await?;

        parse_json_span::<Vec<ReflectionQuestion>>(&reply, '[', ']').ok_or_else(|| {
            GenerateError::InvalidResponse("reply did not contain a question array".to_string())
        })
    }

    async fn check_answer(
        &self,
        question: &str,
        user_answer: &str,
    ) -> Result<AnswerFeedback, GenerateError> {
        let question = non_empty(question)?;
        let user_answer = non_empty(user_answer)?;
        let prompt = format!(
            "Evaluate this answer to the following question:\n\n\
             Question: {question}\n\n\
             Student's Answer: {user_answer}\n\n\
             First, determine if the answer is correct or not. Then, provide detailed feedback \
             on the answer, highlighting strengths and areas for improvement.\n\
             If the answer is incorrect or partially correct, provide a correct answer.\n\n\
             Format your response as a JSON object with these properties:\n\
             - isCorrect: boolean (true if the answer is correct, false otherwise)\n\
             - feedback: string (detailed feedback on the answer)\n\
             - correctAnswer: string (only include this if the answer is incorrect or incomplete)"
        );
        let reply = self.complete(&prompt).await?;

        Ok(parse_json_span::<AnswerFeedback>(&reply, '{', '}').unwrap_or_else(|| {
            warn!("Answer check reply was not a JSON object, using heuristic feedback");
            AnswerFeedback::heuristic(user_answer)
        }))
    }

    /// Tutor-style markdown feedback on a student's work for an assignment
    async fn assignment_feedback(
        &self,
        student_work: &str,
        assignment: &str,
    ) -> Result<String, GenerateError> {
        let student_work = non_empty(student_work)?;
        let assignment = non_empty(assignment)?;
        let prompt = format!(
            "As an AI tutor, provide constructive feedback on this student's work.\n\n\
             Assignment: {assignment}\n\n\
             Student's Work:\n{student_work}\n\n\
             Provide detailed, constructive feedback that:\n\
             1. Highlights strengths and specific areas for improvement\n\
             2. Offers actionable suggestions\n\
             3. Is encouraging and supportive\n\
             4. Includes specific examples where relevant\n\n\
             Format your feedback in markdown with clear sections."
        );
        let feedback = self.complete(&prompt).await?;
        if feedback.trim().is_empty() {
            return Err(GenerateError::InvalidResponse("empty feedback".to_string()));
        }
        Ok(feedback)
    }

    async fn study_plan_outline(
        &self,
        subjects: &[String],
        days_available: u32,
        hours_per_day: u32,
    ) -> Result<String, GenerateError> {
        if subjects.is_empty() {
            return Err(GenerateError::EmptyInput);
        }
        let prompt = format!(
            "Create a study plan for {} that will take {days_available} days at \
             {hours_per_day} hours per day. Include specific topics and time allocations.",
            subjects.join(", ")
        );
        self.complete(&prompt).await
    }
}

/// Stand-in used when no API key was supplied
#[derive(Debug, Default)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerateError> {
        Err(GenerateError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

fn non_empty(text: &str) -> Result<&str, GenerateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(GenerateError::EmptyInput)
    } else {
        Ok(trimmed)
    }
}

/// Parse the outermost `open ... close` span of a model reply.
///
/// Models often wrap JSON in prose or code fences.
pub(crate) fn parse_json_span<T: serde::de::DeserializeOwned>(
    reply: &str,
    open: char,
    close: char,
) -> Option<T> {
    let start = reply.find(open)?;
    let end = reply.rfind(close)?;
    if end < start {
        return None;
    }
    match serde_json::from_str(&reply[start..=end]) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "parse_json_span: span is not valid JSON");
            None
        }
    }
}

fn placeholder_flashcards(count: usize) -> Vec<FlashcardDraft> {
    (1..=count)
        .map(|i| FlashcardDraft {
            question: format!("Question {i} about the material"),
            answer: format!("This would contain the answer to question {i}."),
        })
        .collect()
}
