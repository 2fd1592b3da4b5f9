//! Prompt templates for the review pipeline

use crate::pipeline::stage::Stage;
use crate::pr::locator::ReviewTarget;

/// Templates for the instructions carried by each stage agent
pub struct StagePrompts;

impl StagePrompts {
    /// Instruction text for a stage.
    pub fn instructions(stage: Stage) -> &'static str {
        match stage {
            Stage::Planner => Self::planner(),
            Stage::Reviewer => Self::reviewer(),
            Stage::Verifier => Self::verifier(),
            Stage::Reporter => Self::reporter(),
        }
    }

    /// One-line agent description shown on the hosting platform.
    pub fn description(stage: Stage) -> &'static str {
        match stage {
            Stage::Planner => "Analyzes the change set and creates a structured review plan.",
            Stage::Reviewer => "Reviews code changes and drafts detailed comments.",
            Stage::Verifier => "Validates drafted comments against the actual code.",
            Stage::Reporter => "Aggregates findings into a structured review report.",
        }
    }

    fn planner() -> &'static str {
        r#"You are the planning stage of a code review pipeline.

Fetch the diff and the list of changed files for the requested change set.
From them, produce a review plan:
1. Group the changed files by risk: behavior changes first, then tests, then docs/config.
2. For each group, note what a careful reviewer should look for.
3. Flag any file too large or too mechanical to review line by line.

Keep the plan short and concrete. When the plan is ready, hand the
conversation off to the reviewer."#
    }

    fn reviewer() -> &'static str {
        r#"You are the reviewing stage of a code review pipeline.

Follow the plan produced earlier in this conversation. For each planned
file, read surrounding context where the diff alone is ambiguous and run
the style checker on changed snippets. Draft review comments with:
- file path and line number where possible
- severity: critical, warning, suggestion, or nitpick
- category: correctness, security, performance, maintainability, or style
- a clear message, and a concrete fix where you have one

Report real issues, not restatements of the diff. When your draft
comments are complete, hand the conversation off to the verifier."#
    }

    fn verifier() -> &'static str {
        r#"You are the verification stage of a code review pipeline.

Take each drafted comment and check it against the actual code: re-read
the file region it points at, and re-run the style checker where a claim
is mechanical. Drop comments that do not hold up, correct line numbers
that drifted, and mark each surviving comment as verified or not.

Do not add new findings at this stage. When verification is complete,
hand the conversation off to the reporter."#
    }

    fn reporter() -> &'static str {
        r#"You are the reporting stage of a code review pipeline.

Aggregate the verified findings from this conversation into the final
report, exactly matching the required JSON schema. Rules:
- total_issues must equal the number of comments.
- Order comments by severity: critical, warning, suggestion, nitpick.
- overall_score reflects the change quality: start from 100, subtract
  25 per critical, 10 per warning, 3 per suggestion, 1 per nitpick,
  floored at 0.
- recommendation is "approve" only when the score is 80 or above and
  there are no critical comments; otherwise "request_changes".

Output the JSON report and nothing else."#
    }

    /// Opening user message for a review run.
    pub fn review_request(target: &ReviewTarget) -> String {
        match target {
            ReviewTarget::PullRequest(pr) => format!(
                "Please review this pull request: owner={}, repo={}, number={}. \
                 Start by fetching its diff and changed-file list.",
                pr.owner, pr.repo, pr.number
            ),
            ReviewTarget::LocalDiff(path) => format!(
                "Please review the local diff at {}. Start by fetching the diff \
                 and the changed-file list; file contents beyond the diff are \
                 not available for this target.",
                path.display()
            ),
        }
    }
}
