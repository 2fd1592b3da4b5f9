//! Pipeline configuration: per-stage models, temperatures, and tool bindings.

use warden_domain::{ReviewReport, Stage, StagePrompts, StageSpec, ToolSpec};

/// Tool names bound to each stage. The Reporter is constrained by its
/// output schema instead of tools.
fn tool_names(stage: Stage) -> &'static [&'static str] {
    match stage {
        Stage::Planner => &["fetch_pr_diff", "list_changed_files"],
        Stage::Reviewer => &["read_file", "check_style"],
        Stage::Verifier => &["read_file", "check_style"],
        Stage::Reporter => &[],
    }
}

/// Fixed sampling temperature per stage. Planning tolerates a little
/// variation; verification and reporting do not.
fn temperature(stage: Stage) -> f32 {
    match stage {
        Stage::Planner => 0.2,
        Stage::Reviewer => 0.3,
        Stage::Verifier => 0.1,
        Stage::Reporter => 0.1,
    }
}

/// Model assignment for the four stages.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub planner_model: String,
    pub reviewer_model: String,
    pub verifier_model: String,
    pub reporter_model: String,
}

impl PipelineConfig {
    pub fn new(
        planner_model: impl Into<String>,
        reviewer_model: impl Into<String>,
        verifier_model: impl Into<String>,
        reporter_model: impl Into<String>,
    ) -> Self {
        Self {
            planner_model: planner_model.into(),
            reviewer_model: reviewer_model.into(),
            verifier_model: verifier_model.into(),
            reporter_model: reporter_model.into(),
        }
    }

    pub fn model(&self, stage: Stage) -> &str {
        match stage {
            Stage::Planner => &self.planner_model,
            Stage::Reviewer => &self.reviewer_model,
            Stage::Verifier => &self.verifier_model,
            Stage::Reporter => &self.reporter_model,
        }
    }

    /// Assemble the four stage specs in pipeline order.
    ///
    /// Tool definitions are drawn from `tools` by name; the terminal
    /// stage carries the strict report schema instead.
    pub fn stage_specs(&self, tools: &ToolSpec) -> Vec<StageSpec> {
        Stage::all()
            .into_iter()
            .map(|stage| {
                let mut spec =
                    StageSpec::new(stage, self.model(stage), StagePrompts::instructions(stage))
                        .with_description(StagePrompts::description(stage))
                        .with_temperature(temperature(stage))
                        .with_tools(tools.select(tool_names(stage)));
                if stage.is_terminal() {
                    spec = spec.with_output_schema(ReviewReport::json_schema());
                }
                spec
            })
            .collect()
    }
}
