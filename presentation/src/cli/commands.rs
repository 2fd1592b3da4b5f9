//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for diffwarden
#[derive(Parser, Debug)]
#[command(name = "diffwarden")]
#[command(author, version, about = "AI multi-agent code review for pull requests and diffs")]
#[command(long_about = r#"
DiffWarden reviews a change set with a fixed chain of four agents:

1. Planner:  fetches the diff and builds a review plan
2. Reviewer: inspects changed code and drafts comments
3. Verifier: cross-checks every drafted comment against the code
4. Reporter: emits the final structured report

Credentials are read from MISTRAL_API_KEY (agent platform) and
GITHUB_TOKEN (code host; only needed for PR targets).

Example:
  diffwarden https://github.com/acme/widgets/pull/42
  diffwarden changes.diff --json
"#)]
pub struct Cli {
    /// Pull request URL (https://host/owner/repo/pull/N) or a local
    /// unified-diff file path
    pub target: String,

    /// Print the raw JSON report instead of the formatted display
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}
