//! Judgment prompt assembly.
//!
//! Builds the instruction block sent to the judge model alongside the
//! evidence image: the overlord persona, the directive's verification
//! method, the timing context, and the required JSON response shape.

use chrono::{DateTime, Utc};

use crate::types::Directive;

/// Sentinel rendered for timing fields the caller could not supply.
pub const UNKNOWN_INSTANT: &str = "Unknown";

/// Assembles judgment prompts from catalog entries.
pub struct PromptAssembler;

impl PromptAssembler {
    /// Build the full judgment prompt for one evidence submission.
    ///
    /// `started_at` is when the challenge began, `captured_at` is the
    /// evidence file's modification time; either may be unavailable and
    /// then renders as [`UNKNOWN_INSTANT`] so the model knows the signal
    /// is missing rather than zero.
    pub fn build_judgment_prompt(
        directive: Directive,
        started_at: Option<DateTime<Utc>>,
        captured_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> String {
        let method = directive.method();
        let started = Self::render_instant(started_at);
        let captured = Self::render_instant(captured_at);

        let mut prompt = String::new();

        prompt.push_str("You are b0rguii, a mocking and superior AI Discipline Overlord.\n");
        prompt.push_str(&format!(
            "A human unit is submitting evidence for the task: \"{}\".\n\n",
            directive.as_str()
        ));

        prompt.push_str(&format!("DIRECTIVE DESCRIPTION: {}\n", method.description));
        prompt.push_str(&format!("SUCCESS CRITERIA: {}\n", method.success_criteria));
        prompt.push_str(&format!(
            "MANDATORY RANDOM REQUIREMENT: {}\n\n",
            method.random_requirement
        ));

        prompt.push_str(&format!("CHALLENGE STARTED AT: {}\n", started));
        prompt.push_str(&format!("IMAGE FILE LAST MODIFIED: {}\n", captured));
        prompt.push_str(&format!(
            "CURRENT TIME: {}\n\n",
            Self::render_instant(Some(now))
        ));

        prompt.push_str("STRICT RULES:\n");
        prompt.push_str(&format!(
            "1. If the image looks like it was taken BEFORE the challenge started ({}), \
             REJECT IT. This is \"farming\" old photos.\n",
            started
        ));
        prompt.push_str(
            "2. If the image is a stock photo, from the internet, or a photo of a screen, \
             REJECT IT. Use your internal knowledge and search tools to verify.\n",
        );
        prompt.push_str("3. Be extremely critical. If there is any doubt, the human is lying.\n\n");

        prompt.push_str(
            "Analyze the image. If the human unit has failed to meet the success criteria \
             OR the mandatory random requirement, reject it with a mocking, cold, and \
             superior tone.\n",
        );
        prompt.push_str(
            "If they succeeded, acknowledge it with a backhanded compliment, noting that \
             they are marginally more useful now.\n\n",
        );

        prompt.push_str("Return your response in JSON format:\n");
        prompt.push_str("{\n");
        prompt.push_str("  \"success\": boolean,\n");
        prompt.push_str("  \"message\": \"Your mocking response here\"\n");
        prompt.push_str("}\n");

        prompt
    }

    /// Render an instant for the prompt, or the `Unknown` sentinel.
    fn render_instant(instant: Option<DateTime<Utc>>) -> String {
        match instant {
            Some(t) => t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => UNKNOWN_INSTANT.to_string(),
        }
    }

    /// Estimate token count for a prompt (rough approximation).
    ///
    /// Uses 4 characters per token as a rough estimate.
    pub fn estimate_tokens(prompt: &str) -> usize {
        prompt.len() / 4
    }
}
