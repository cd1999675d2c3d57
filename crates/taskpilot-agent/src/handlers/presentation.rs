//! Presentation outlines.

use tracing::debug;

use taskpilot_intent::Intent;
use taskpilot_llm::TextCompletion;

use crate::error::Result;
use crate::output::TaskOutput;

pub const DEFAULT_TOPIC: &str = "Business Review";
pub const DEFAULT_SLIDES: u64 = 10;

pub fn outline_prompt(topic: &str, slides: u64) -> String {
    format!(
        "Create a {slides}-slide presentation outline on: {topic}\n\
         For each slide include:\n\
         - Slide title\n\
         - 3–4 bullet points\n\
         - Speaker notes (1–2 sentences)\n"
    )
}

pub async fn run(model: &dyn TextCompletion, intent: &Intent) -> Result<TaskOutput> {
    let topic = intent.param_str("topic").unwrap_or(DEFAULT_TOPIC);
    let slides = intent.param_u64("slides").unwrap_or(DEFAULT_SLIDES);
    debug!(topic, slides, "generating presentation outline");
    let text = model.complete(&outline_prompt(topic, slides)).await?;
    Ok(TaskOutput::Text { text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_topic_and_count() {
        let prompt = outline_prompt("Q3 Hiring", 6);
        assert!(prompt.starts_with("Create a 6-slide presentation outline on: Q3 Hiring"));
        assert!(prompt.contains("Speaker notes"));
    }
}
