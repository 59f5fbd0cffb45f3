//! The thin chat layer that sits between a user interface and the [`Classifier`].
//!
//! It owns the concerns the classifier deliberately leaves to its caller:
//! skipping blank questions, turning per-call failures into a friendly
//! reply, and keeping a slow prediction from blocking an async caller.

use std::sync::Arc;
use std::time::Duration;

use log::{error, warn};

use crate::classifier::Classifier;

/// Reply shown when the model could not produce an answer for this turn
pub const COULD_NOT_ANSWER: &str = "Sorry, I could not answer that.";

/// True when a question has something besides whitespace in it
pub fn is_answerable(question: &str) -> bool {
    !question.trim().is_empty()
}

/// One completed question and answer exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub question: String,
    pub reply: String,
}

/// Routes user questions to a shared [`Classifier`].
#[derive(Debug, Clone)]
pub struct ChatShell {
    classifier: Arc<Classifier>,
    timeout: Option<Duration>,
}

impl ChatShell {
    pub fn new(classifier: Arc<Classifier>) -> Self {
        Self { classifier, timeout: None }
    }

    /// Bounds how long [`respond_async`](Self::respond_async) waits for a prediction
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Answers on the calling thread. Returns `None` for blank questions.
    pub fn respond(&self, question: &str) -> Option<ChatTurn> {
        if !is_answerable(question) {
            return None;
        }
        let reply = answer_or_apologize(&self.classifier, question);
        Some(ChatTurn { question: question.to_string(), reply })
    }

    /// Answers on a blocking worker thread, giving up after the configured timeout.
    ///
    /// A timed-out prediction keeps running in the background and its
    /// result is discarded.
    pub async fn respond_async(&self, question: &str) -> Option<ChatTurn> {
        if !is_answerable(question) {
            return None;
        }

        let classifier = Arc::clone(&self.classifier);
        let owned = question.to_string();
        let task = tokio::task::spawn_blocking(move || answer_or_apologize(&classifier, &owned));

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!("No answer within {:?}, giving up on this turn", limit);
                    return Some(ChatTurn {
                        question: question.to_string(),
                        reply: COULD_NOT_ANSWER.to_string(),
                    });
                }
            },
            None => task.await,
        };

        let reply = joined.unwrap_or_else(|e| {
            error!("Prediction task failed: {}", e);
            COULD_NOT_ANSWER.to_string()
        });
        Some(ChatTurn { question: question.to_string(), reply })
    }
}

fn answer_or_apologize(classifier: &Classifier, question: &str) -> String {
    classifier.classify(question).unwrap_or_else(|e| {
        error!("Could not answer {:?}: {}", question, e);
        COULD_NOT_ANSWER.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_questions_are_not_answerable() {
        assert!(!is_answerable(""));
        assert!(!is_answerable("   "));
        assert!(!is_answerable("\t\n"));
        assert!(is_answerable(" ? "));
        assert!(is_answerable("Is water wet?"));
    }
}
