//! Run Review use case — the orchestration state machine.
//!
//! Drives one conversation from the entry stage to the terminal stage:
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            ▼                              │ results fed back
//!     AWAITING_MODEL ──tool call──▶ DISPATCHING_TOOL
//!        │      │
//!        │      └──hand-off──▶ HANDED_OFF ──▶ AWAITING_MODEL
//!        │
//!        └──terminal output──▶ validate ──▶ report | SchemaViolation
//! ```
//!
//! The platform delivers each turn as an ordered event list; events after
//! a hand-off belong to the next stage, so in-order processing realizes
//! the `HANDED_OFF → AWAITING_MODEL` transition without an extra
//! round-trip. Within a turn, tool calls are dispatched strictly in the
//! order the agent issued them and their results are returned in that
//! same order.
//!
//! Teardown runs on every exit path (success, any error, and
//! cancellation) and its failures never mask the run's outcome.

use crate::ports::agent_platform::{AgentPlatform, PlatformError, Turn, TurnEvent};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::tool_executor::{ToolDispatchError, ToolExecutorPort};
use crate::use_cases::build_chain::{BuildChainError, BuildChainUseCase};
use crate::use_cases::shared::check_cancelled;
use crate::use_cases::teardown::teardown_agents;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use warden_domain::{
    Chain, ReportValidationError, ReviewReport, Stage, StageSpec, ToolOutcome,
};

/// Errors that can terminate a review run
#[derive(Error, Debug)]
pub enum RunReviewError {
    #[error(transparent)]
    Provisioning(#[from] BuildChainError),

    #[error("Unknown tool '{name}' requested by the {stage} agent")]
    UnknownTool { stage: Stage, name: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unexpected hand-off from the {from} agent to '{to}'")]
    UnexpectedHandoff { from: Stage, to: String },

    #[error("Conversation ended at the {0} stage without reaching the reporter")]
    IncompleteRun(Stage),

    #[error("Platform step limit exceeded during the {0} stage")]
    StepLimitExceeded(Stage),

    #[error("Platform error during the {stage} stage: {source}")]
    Platform {
        stage: Stage,
        #[source]
        source: PlatformError,
    },

    #[error(transparent)]
    Report(#[from] ReportValidationError),

    #[error("Review cancelled")]
    Cancelled,
}

/// Observable states of the run loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    AwaitingModel,
    DispatchingTool,
    HandedOff,
}

/// Input for the RunReview use case
#[derive(Debug, Clone)]
pub struct RunReviewInput {
    /// Stage specs in pipeline order.
    pub specs: Vec<StageSpec>,
    /// The user's review request, the sole conversational input.
    pub request: String,
}

impl RunReviewInput {
    pub fn new(specs: Vec<StageSpec>, request: impl Into<String>) -> Self {
        Self {
            specs,
            request: request.into(),
        }
    }
}

/// Use case for running the full review pipeline
pub struct RunReviewUseCase<P: AgentPlatform + 'static, T: ToolExecutorPort + 'static> {
    platform: Arc<P>,
    tools: Arc<T>,
    cancellation: Option<CancellationToken>,
}

impl<P, T> RunReviewUseCase<P, T>
where
    P: AgentPlatform + 'static,
    T: ToolExecutorPort + 'static,
{
    pub fn new(platform: Arc<P>, tools: Arc<T>) -> Self {
        Self {
            platform,
            tools,
            cancellation: None,
        }
    }

    /// Attach a cancellation token; cancellation is an error-terminal
    /// path and still runs teardown.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunReviewInput) -> Result<ReviewReport, RunReviewError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunReviewInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<ReviewReport, RunReviewError> {
        let chain = BuildChainUseCase::new(Arc::clone(&self.platform))
            .execute(input.specs)
            .await?;

        let outcome = self.drive(&chain, &input.request, progress).await;

        // Scoped release: the chain is deleted whatever `drive` returned.
        let attempts = teardown_agents(self.platform.as_ref(), chain.handles()).await;
        debug!(attempts, "chain teardown finished");

        outcome
    }

    /// The run loop proper: one conversation, entry stage to terminal.
    async fn drive(
        &self,
        chain: &Chain,
        request: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<ReviewReport, RunReviewError> {
        let mut stage = Stage::entry();
        let mut state = RunState::AwaitingModel;
        debug!(?state, %stage, "run loop started");
        progress.on_stage_start(stage);
        info!("Submitting review request to the {stage} agent");

        let mut turn = self
            .round_trip(stage, self.platform.start_conversation(chain.entry(), request))
            .await?;
        let conversation = turn.conversation.clone();

        loop {
            let mut results: Vec<ToolOutcome> = Vec::new();
            let mut terminal_text: Option<String> = None;

            for event in std::mem::take(&mut turn.events) {
                match event {
                    TurnEvent::Message(text) => {
                        terminal_text = Some(text);
                    }
                    TurnEvent::ToolCall(call) => {
                        state = RunState::DispatchingTool;
                        debug!(?state, tool = %call.name, call_id = %call.call_id, "dispatching tool call");
                        self.ensure_not_cancelled()?;
                        progress.on_tool_call(stage, &call);
                        let outcome = match self.tools.dispatch(&call).await {
                            Ok(outcome) => outcome,
                            Err(ToolDispatchError::UnknownTool(name)) => {
                                return Err(RunReviewError::UnknownTool { stage, name });
                            }
                            Err(ToolDispatchError::Configuration(message)) => {
                                return Err(RunReviewError::Configuration(message));
                            }
                        };
                        results.push(outcome);
                        state = RunState::AwaitingModel;
                    }
                    TurnEvent::Handoff { to } => {
                        let Some(next) = stage.successor() else {
                            return Err(RunReviewError::UnexpectedHandoff { from: stage, to });
                        };
                        if chain.handle(next).id != to {
                            return Err(RunReviewError::UnexpectedHandoff { from: stage, to });
                        }
                        state = RunState::HandedOff;
                        debug!(?state, from = %stage, to = %next, "hand-off accepted");
                        progress.on_handoff(stage, next);
                        info!("Hand-off: {stage} -> {next}");
                        stage = next;
                        // Context carries forward; only output produced by
                        // the new current stage counts toward the terminal.
                        terminal_text = None;
                        progress.on_stage_start(stage);
                        state = RunState::AwaitingModel;
                    }
                }
            }

            if !results.is_empty() {
                debug!(?state, %stage, batch = results.len(), "returning tool results in request order");
                turn = self
                    .round_trip(
                        stage,
                        self.platform.continue_with_results(&conversation, results),
                    )
                    .await?;
                continue;
            }

            // No pending tool results: the conversation is as far along as
            // the platform will take it.
            return match terminal_text {
                Some(raw) if stage.is_terminal() => {
                    let report = ReviewReport::parse(&raw)?;
                    progress.on_report_ready();
                    info!(
                        score = report.overall_score,
                        issues = report.total_issues,
                        "review report validated"
                    );
                    Ok(report)
                }
                _ => Err(RunReviewError::IncompleteRun(stage)),
            };
        }
    }

    /// One platform round-trip with cancellation support and error
    /// mapping tied to the current stage.
    async fn round_trip(
        &self,
        stage: Stage,
        request: impl Future<Output = Result<Turn, PlatformError>>,
    ) -> Result<Turn, RunReviewError> {
        self.ensure_not_cancelled()?;
        let result = match &self.cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(RunReviewError::Cancelled),
                result = request => result,
            },
            None => request.await,
        };
        result.map_err(|source| match source {
            PlatformError::StepLimitExceeded => RunReviewError::StepLimitExceeded(stage),
            source => RunReviewError::Platform { stage, source },
        })
    }

    fn ensure_not_cancelled(&self) -> Result<(), RunReviewError> {
        check_cancelled(&self.cancellation).map_err(|_| RunReviewError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{
        handoff, message, report_payload, stage_specs, tool_call, RecordingExecutor,
        ScriptedPlatform,
    };

    fn use_case(
        platform: Arc<ScriptedPlatform>,
        executor: Arc<RecordingExecutor>,
    ) -> RunReviewUseCase<ScriptedPlatform, RecordingExecutor> {
        RunReviewUseCase::new(platform, executor)
    }

    fn input() -> RunReviewInput {
        RunReviewInput::new(stage_specs(), "Please review pull request acme/widgets#42")
    }

    #[tokio::test]
    async fn test_full_pipeline_produces_validated_report() {
        let platform = Arc::new(ScriptedPlatform::new(vec![
            // Planner gathers the diff and the file list.
            Ok(Turn::new(
                "conv_1",
                vec![
                    tool_call("c1", "fetch_pr_diff"),
                    tool_call("c2", "list_changed_files"),
                ],
            )),
            // Planner finishes, hands off; reviewer starts reading code.
            Ok(Turn::new(
                "conv_1",
                vec![
                    message("plan ready"),
                    handoff(Stage::Reviewer),
                    tool_call("c3", "read_file"),
                ],
            )),
            // Reviewer done; verifier re-checks one mechanical claim.
            Ok(Turn::new(
                "conv_1",
                vec![handoff(Stage::Verifier), tool_call("c4", "check_style")],
            )),
            // Verifier hands off; reporter emits the structured report.
            Ok(Turn::new(
                "conv_1",
                vec![handoff(Stage::Reporter), message(&report_payload())],
            )),
        ]));
        let executor = Arc::new(RecordingExecutor::with_review_tools());

        let report = use_case(Arc::clone(&platform), Arc::clone(&executor))
            .execute(input())
            .await
            .unwrap();

        assert_eq!(report.overall_score, 95);
        assert_eq!(report.total_issues, 0);
        // Results were returned in request order, batch by batch.
        assert_eq!(
            executor.dispatched_ids(),
            vec!["c1", "c2", "c3", "c4"]
        );
        assert_eq!(
            platform.result_batches(),
            vec![
                vec!["c1".to_string(), "c2".to_string()],
                vec!["c3".to_string()],
                vec!["c4".to_string()],
            ]
        );
        // Teardown ran after success.
        assert_eq!(platform.deleted_ids().len(), 4);
    }

    #[tokio::test]
    async fn test_in_batch_result_order_matches_request_order() {
        let platform = Arc::new(ScriptedPlatform::new(vec![
            Ok(Turn::new(
                "conv_1",
                vec![
                    tool_call("z9", "check_style"),
                    tool_call("a1", "read_file"),
                    tool_call("m5", "fetch_pr_diff"),
                ],
            )),
            // End the run immediately afterwards.
            Ok(Turn::new(
                "conv_1",
                vec![
                    handoff(Stage::Reviewer),
                    handoff(Stage::Verifier),
                    handoff(Stage::Reporter),
                    message(&report_payload()),
                ],
            )),
        ]));
        let executor = Arc::new(RecordingExecutor::with_review_tools());

        use_case(Arc::clone(&platform), Arc::clone(&executor))
            .execute(input())
            .await
            .unwrap();

        // Issue order, not id order, decides both dispatch and batch order.
        assert_eq!(executor.dispatched_ids(), vec!["z9", "a1", "m5"]);
        assert_eq!(
            platform.result_batches(),
            vec![vec!["z9".to_string(), "a1".to_string(), "m5".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_fatal_and_still_tears_down() {
        let platform = Arc::new(ScriptedPlatform::new(vec![Ok(Turn::new(
            "conv_1",
            vec![tool_call("c1", "run_shell")],
        ))]));
        let executor = Arc::new(RecordingExecutor::with_review_tools());

        let err = use_case(Arc::clone(&platform), executor)
            .execute(input())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunReviewError::UnknownTool {
                stage: Stage::Planner,
                ref name,
            } if name == "run_shell"
        ));
        assert_eq!(platform.deleted_ids().len(), 4);
    }

    #[tokio::test]
    async fn test_out_of_order_handoff_is_a_protocol_violation() {
        // Planner tries to skip straight to the reporter.
        let platform = Arc::new(ScriptedPlatform::new(vec![Ok(Turn::new(
            "conv_1",
            vec![TurnEvent::Handoff {
                to: "ag_reporter".to_string(),
            }],
        ))]));
        let executor = Arc::new(RecordingExecutor::with_review_tools());

        let err = use_case(Arc::clone(&platform), executor)
            .execute(input())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunReviewError::UnexpectedHandoff {
                from: Stage::Planner,
                ref to,
            } if to == "ag_reporter"
        ));
        assert_eq!(platform.deleted_ids().len(), 4);
    }

    #[tokio::test]
    async fn test_schema_violation_surfaces_payload_and_tears_down() {
        let bad = report_payload().replace("\"total_issues\": 0", "\"total_issues\": 3");
        let platform = Arc::new(ScriptedPlatform::new(vec![Ok(Turn::new(
            "conv_1",
            vec![
                handoff(Stage::Reviewer),
                handoff(Stage::Verifier),
                handoff(Stage::Reporter),
                message(&bad),
            ],
        ))]));
        let executor = Arc::new(RecordingExecutor::with_review_tools());

        let err = use_case(Arc::clone(&platform), executor)
            .execute(input())
            .await
            .unwrap_err();

        match err {
            RunReviewError::Report(validation) => {
                assert!(validation.payload().contains("\"total_issues\": 3"));
            }
            other => panic!("expected schema violation, got {other:?}"),
        }
        assert_eq!(platform.deleted_ids().len(), 4);
    }

    #[tokio::test]
    async fn test_non_terminal_final_output_is_incomplete() {
        let platform = Arc::new(ScriptedPlatform::new(vec![Ok(Turn::new(
            "conv_1",
            vec![message("I think this PR is fine.")],
        ))]));
        let executor = Arc::new(RecordingExecutor::with_review_tools());

        let err = use_case(Arc::clone(&platform), executor)
            .execute(input())
            .await
            .unwrap_err();

        assert!(matches!(err, RunReviewError::IncompleteRun(Stage::Planner)));
        assert_eq!(platform.deleted_ids().len(), 4);
    }

    #[tokio::test]
    async fn test_step_limit_is_surfaced_distinctly() {
        let platform = Arc::new(ScriptedPlatform::new(vec![Err(
            PlatformError::StepLimitExceeded,
        )]));
        let executor = Arc::new(RecordingExecutor::with_review_tools());

        let err = use_case(Arc::clone(&platform), executor)
            .execute(input())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunReviewError::StepLimitExceeded(Stage::Planner)
        ));
        assert_eq!(platform.deleted_ids().len(), 4);
    }

    #[tokio::test]
    async fn test_cancellation_still_tears_down() {
        let platform = Arc::new(ScriptedPlatform::new(vec![Ok(Turn::new(
            "conv_1",
            vec![message(&report_payload())],
        ))]));
        let executor = Arc::new(RecordingExecutor::with_review_tools());
        let token = CancellationToken::new();
        token.cancel();

        let err = use_case(Arc::clone(&platform), executor)
            .with_cancellation(token)
            .execute(input())
            .await
            .unwrap_err();

        assert!(matches!(err, RunReviewError::Cancelled));
        // The chain was already provisioned; cancellation must not leak it.
        assert_eq!(platform.deleted_ids().len(), 4);
    }

    #[tokio::test]
    async fn test_provisioning_failure_skips_the_run_loop() {
        let platform = Arc::new(ScriptedPlatform::new(vec![]).failing_create_at(2));
        let executor = Arc::new(RecordingExecutor::with_review_tools());

        let err = use_case(Arc::clone(&platform), executor)
            .execute(input())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunReviewError::Provisioning(BuildChainError::Provisioning {
                stage: Stage::Verifier,
                ..
            })
        ));
        // Rollback happened inside the builder; no conversation started.
        assert_eq!(platform.deleted_ids().len(), 2);
        assert_eq!(platform.conversations_started(), 0);
    }
}
