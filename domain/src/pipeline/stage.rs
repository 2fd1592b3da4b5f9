//! The fixed review pipeline stages.

use serde::{Deserialize, Serialize};

/// One position in the four-step review pipeline.
///
/// Execution order is exactly Planner → Reviewer → Verifier → Reporter.
/// The successor table is fixed: there is no way to express a branch or
/// a cycle with this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Parses the change set and builds a review plan.
    Planner,
    /// Inspects changed code and drafts review comments.
    Reviewer,
    /// Cross-checks drafted comments against the actual code.
    Verifier,
    /// Aggregates findings into the structured report. Terminal.
    Reporter,
}

impl Stage {
    /// The entry stage, where the user's review request is submitted.
    pub fn entry() -> Self {
        Stage::Planner
    }

    /// The designated next hop, or `None` for the terminal stage.
    pub fn successor(&self) -> Option<Stage> {
        match self {
            Stage::Planner => Some(Stage::Reviewer),
            Stage::Reviewer => Some(Stage::Verifier),
            Stage::Verifier => Some(Stage::Reporter),
            Stage::Reporter => None,
        }
    }

    /// Whether this stage ends the pipeline.
    pub fn is_terminal(&self) -> bool {
        self.successor().is_none()
    }

    /// All stages in pipeline order.
    pub fn all() -> [Stage; 4] {
        [
            Stage::Planner,
            Stage::Reviewer,
            Stage::Verifier,
            Stage::Reporter,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Planner => "planner",
            Stage::Reviewer => "reviewer",
            Stage::Verifier => "verifier",
            Stage::Reporter => "reporter",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
