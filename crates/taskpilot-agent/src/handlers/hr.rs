//! HR workflow checklists.  A static lookup, no model call.

use taskpilot_intent::Intent;

use crate::output::TaskOutput;

const ONBOARDING: &[&str] = &[
    "Create employee profile",
    "Generate welcome email",
    "Setup system accounts",
    "Schedule orientation",
    "Assign mentor",
    "Create training plan",
];

const OFFBOARDING: &[&str] = &[
    "Initiate exit process",
    "Schedule exit interview",
    "Revoke system access",
    "Process final payroll",
    "Transfer knowledge docs",
    "Update org chart",
];

const LEAVE_REQUEST: &[&str] = &[
    "Validate leave balance",
    "Check team coverage",
    "Notify manager",
    "Update calendar",
    "Adjust workload",
];

/// The checklist for a workflow name.  Unknown names get onboarding.
pub fn checklist(workflow: &str) -> &'static [&'static str] {
    match workflow {
        "offboarding" => OFFBOARDING,
        "leave_request" => LEAVE_REQUEST,
        _ => ONBOARDING,
    }
}

pub fn run(intent: &Intent) -> TaskOutput {
    let workflow = intent.param_str("workflow").unwrap_or("onboarding");
    TaskOutput::Checklist {
        steps: checklist(workflow).iter().map(|s| (*s).to_owned()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn with_workflow(name: &str) -> Intent {
        let mut intent = Intent::fallback("hr");
        intent.parameters.insert("workflow".into(), json!(name));
        intent
    }

    #[test]
    fn offboarding_is_stable() {
        let first = run(&with_workflow("offboarding"));
        let second = run(&with_workflow("offboarding"));
        assert_eq!(first, second);
        let TaskOutput::Checklist { steps } = first else {
            panic!("expected checklist");
        };
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[2], "Revoke system access");
    }

    #[test]
    fn leave_request_has_five_steps() {
        assert_eq!(checklist("leave_request").len(), 5);
    }

    #[test]
    fn unknown_and_missing_default_to_onboarding() {
        assert_eq!(checklist("relocation"), ONBOARDING);
        let TaskOutput::Checklist { steps } = run(&Intent::fallback("hr")) else {
            panic!("expected checklist");
        };
        assert_eq!(steps[0], "Create employee profile");
    }
}
