//! Console progress output for a review run

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use warden_application::ProgressNotifier;
use warden_domain::core::string::truncate;
use warden_domain::{Stage, ToolCallRequest};

/// Reports pipeline progress with a spinner per stage
pub struct ConsoleProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn stage_display_name(stage: Stage) -> &'static str {
        match stage {
            Stage::Planner => "Stage 1: Planner",
            Stage::Reviewer => "Stage 2: Reviewer",
            Stage::Verifier => "Stage 3: Verifier",
            Stage::Reporter => "Stage 4: Reporter",
        }
    }

    fn finish_current(&self, message: &str) {
        if let Some(spinner) = self.spinner.lock().unwrap().take() {
            spinner.finish_with_message(message.to_string());
        }
    }

    /// Short one-line summary of a tool call's arguments.
    fn describe_call(call: &ToolCallRequest) -> String {
        let mut parts: Vec<String> = call
            .arguments
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        parts.sort();
        truncate(&format!("{}({})", call.name, parts.join(", ")), 72)
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ConsoleProgress {
    fn on_stage_start(&self, stage: Stage) {
        self.finish_current("done");
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix(Self::stage_display_name(stage));
        spinner.set_message("working...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        *self.spinner.lock().unwrap() = Some(spinner);
    }

    fn on_tool_call(&self, _stage: Stage, call: &ToolCallRequest) {
        if let Some(spinner) = self.spinner.lock().unwrap().as_ref() {
            spinner.set_message(Self::describe_call(call));
        }
    }

    fn on_handoff(&self, _from: Stage, _to: Stage) {
        self.finish_current("done, handing off");
    }

    fn on_report_ready(&self) {
        self.finish_current("report validated");
    }
}
