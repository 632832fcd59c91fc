//! Workflow-run job wire types and the failing-jobs summary.
//!
//! The wire types live here (rather than in `fixbot-github`) so that the
//! summary logic and the client crate share one definition.

use serde::{Deserialize, Serialize};

/// One job execution of a workflow run, as returned by the jobs listing.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowJob {
    pub name: String,
    /// `None` while a job is still in progress.
    pub conclusion: Option<String>,
    #[serde(default)]
    pub steps: Vec<JobStep>,
}

/// One step within a job execution.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStep {
    pub name: String,
    pub conclusion: Option<String>,
}

/// A job that did not succeed, reduced to what the prompt needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailingJob {
    pub name: String,
    pub conclusion: String,
    pub steps: Vec<FailingStep>,
}

/// A non-successful step of a failing job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailingStep {
    pub name: String,
    pub conclusion: String,
}

fn is_success(conclusion: Option<&str>) -> bool {
    conclusion == Some("success")
}

/// Keeps the jobs (and, within them, the steps) whose conclusion is not
/// `success`. An empty result is valid: it means nothing actionable failed.
pub fn summarize_failures(jobs: &[WorkflowJob]) -> Vec<FailingJob> {
    jobs.iter()
        .filter(|job| !is_success(job.conclusion.as_deref()))
        .map(|job| FailingJob {
            name: job.name.clone(),
            conclusion: job.conclusion.clone().unwrap_or_default(),
            steps: job
                .steps
                .iter()
                .filter(|step| !is_success(step.conclusion.as_deref()))
                .map(|step| FailingStep {
                    name: step.name.clone(),
                    conclusion: step.conclusion.clone().unwrap_or_default(),
                })
                .collect(),
        })
        .collect()
}

/// Renders the failing-jobs summary the way it is embedded in the prompt.
pub fn render_summary(failing: &[FailingJob]) -> String {
    serde_json::to_string_pretty(failing).unwrap_or_else(|_| "[]".to_string())
}
