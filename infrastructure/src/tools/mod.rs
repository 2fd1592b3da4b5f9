//! Review tools: registry definitions and the executor adapter
//!
//! Four tools back the pipeline:
//!
//! | Tool | Bound to | Backed by |
//! |------|----------|-----------|
//! | `fetch_pr_diff` | Planner | code-host API / local diff file |
//! | `list_changed_files` | Planner | code-host API / diff headers |
//! | `read_file` | Reviewer, Verifier | code-host API (PR targets only) |
//! | `check_style` | Reviewer, Verifier | in-process checker |

pub mod executor;
pub mod registry;

pub use executor::{DiffSource, ReviewToolExecutor};
pub use registry::{review_tool_spec, CHECK_STYLE, FETCH_PR_DIFF, LIST_CHANGED_FILES, READ_FILE};
