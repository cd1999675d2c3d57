//! Report generation: one completion, returned verbatim.

use tracing::debug;

use taskpilot_intent::Intent;
use taskpilot_llm::TextCompletion;

use crate::error::Result;
use crate::output::TaskOutput;

pub const DEFAULT_REPORT_TYPE: &str = "summary";

pub fn report_prompt(report_type: &str) -> String {
    format!(
        "Generate a professional {report_type} report with sections:\n\
         1. Executive Summary\n\
         2. Key Metrics (with sample numbers)\n\
         3. Analysis\n\
         4. Recommendations\n\
         5. Next Steps\n\
         \n\
         Format in markdown.\n"
    )
}

pub async fn run(model: &dyn TextCompletion, intent: &Intent) -> Result<TaskOutput> {
    let report_type = intent.param_str("type").unwrap_or(DEFAULT_REPORT_TYPE);
    debug!(report_type, "generating report");
    let text = model.complete(&report_prompt(report_type)).await?;
    Ok(TaskOutput::Text { text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_type_and_sections() {
        let prompt = report_prompt("quarterly");
        assert!(prompt.starts_with("Generate a professional quarterly report"));
        for section in [
            "Executive Summary",
            "Key Metrics (with sample numbers)",
            "Recommendations",
            "Next Steps",
        ] {
            assert!(prompt.contains(section), "missing {section}");
        }
        assert!(prompt.contains("Format in markdown."));
    }
}
