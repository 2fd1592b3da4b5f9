//! Progress notification port for review runs

use warden_domain::{Stage, ToolCallRequest};

/// Callbacks for observing a review run as it progresses.
///
/// Implementations must be cheap and non-blocking; the run loop calls
/// these inline.
pub trait ProgressNotifier: Send + Sync {
    /// A stage has become the current agent.
    fn on_stage_start(&self, stage: Stage);

    /// The current agent requested a tool invocation.
    fn on_tool_call(&self, stage: Stage, call: &ToolCallRequest);

    /// Conversational control moved from one stage to the next.
    fn on_handoff(&self, from: Stage, to: Stage);

    /// The terminal stage produced a report that passed validation.
    fn on_report_ready(&self);
}

/// No-op progress notifier
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage) {}
    fn on_tool_call(&self, _stage: Stage, _call: &ToolCallRequest) {}
    fn on_handoff(&self, _from: Stage, _to: Stage) {}
    fn on_report_ready(&self) {}
}
