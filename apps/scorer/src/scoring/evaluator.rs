//! Candidate evaluation: builds the prompt, calls the completion API, and
//! parses the semi-structured response defensively.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::context::ProjectContext;
use crate::llm_client::CompletionApi;
use crate::scoring::models::EvaluationResult;
use crate::scoring::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM};

/// Cooldown before the single retry after a rate-limit rejection.
const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(30);

/// Scores one candidate at a time against the shared position context.
pub struct CandidateScorer {
    api: Arc<dyn CompletionApi>,
    context: Arc<ProjectContext>,
    clock: Arc<dyn Clock>,
}

impl CandidateScorer {
    pub fn new(
        api: Arc<dyn CompletionApi>,
        context: Arc<ProjectContext>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            context,
            clock,
        }
    }

    /// Evaluates a candidate, degrading to the error-fallback result on any
    /// unrecoverable failure. A rate-limited call is retried exactly once
    /// after a fixed cooldown; no other failure is retried.
    pub async fn evaluate(
        &self,
        name: &str,
        resume_text: &str,
        experiences: &str,
        screening_answers: &str,
    ) -> EvaluationResult {
        let prompt = self.build_prompt(name, resume_text, experiences, screening_answers);

        match self.api.complete(EVALUATION_SYSTEM, &prompt).await {
            Ok(text) => parse_response(name, &text),
            Err(e) if e.is_rate_limit() => {
                warn!(
                    "Rate limited evaluating {name}. Waiting {} seconds...",
                    RATE_LIMIT_COOLDOWN.as_secs()
                );
                self.clock.sleep(RATE_LIMIT_COOLDOWN).await;
                match self.api.complete(EVALUATION_SYSTEM, &prompt).await {
                    Ok(text) => parse_response(name, &text),
                    Err(retry_e) => {
                        error!("Retry failed for {name}: {retry_e}");
                        EvaluationResult::error_fallback()
                    }
                }
            }
            Err(e) => {
                error!("Error evaluating candidate {name}: {e}");
                EvaluationResult::error_fallback()
            }
        }
    }

    fn build_prompt(
        &self,
        name: &str,
        resume_text: &str,
        experiences: &str,
        screening_answers: &str,
    ) -> String {
        EVALUATION_PROMPT_TEMPLATE
            .replace("{position_context}", self.context.load())
            .replace("{name}", name)
            .replace("{experiences}", experiences)
            .replace("{screening_answers}", screening_answers)
            .replace("{resume_text}", resume_text)
    }
}

/// Staged parse: direct JSON first, then the first-to-last-brace substring,
/// then the error fallback.
fn parse_response(name: &str, text: &str) -> EvaluationResult {
    match serde_json::from_str(text) {
        Ok(result) => {
            info!("Successfully parsed response for {name}");
            result
        }
        Err(_) => match extract_json_object(text).and_then(|json| serde_json::from_str(json).ok())
        {
            Some(result) => result,
            None => {
                error!("No valid JSON found in response for {name}");
                EvaluationResult::error_fallback()
            }
        },
    }
}

/// Returns the substring spanning the first `{` to the last `}`, if any.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
