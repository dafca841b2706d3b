//! Constants for the pilot CLI
//!
//! Output names shared with the hosting pipeline and the supervisor's fixed
//! timing values.

use std::time::Duration;

/// Output set to `true` or `false` once trigger evaluation has run
pub const OUTPUT_CONTAINS_TRIGGER: &str = "contains_trigger";

/// Output holding the tracking comment id
pub const OUTPUT_COMMENT_ID: &str = "claude_comment_id";

/// Output naming the branch created for an issue
pub const OUTPUT_CLAUDE_BRANCH: &str = "CLAUDE_BRANCH";

/// Output naming the base branch
pub const OUTPUT_BASE_BRANCH: &str = "BASE_BRANCH";

/// Output carrying the acquired platform token
pub const OUTPUT_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// Output carrying the merged MCP configuration
pub const OUTPUT_MCP_CONFIG: &str = "mcp_config";

/// Output carrying the reason preparation failed
pub const OUTPUT_PREPARE_ERROR: &str = "prepare_error";

/// Output set to `success` or `failure` after the assistant run
pub const OUTPUT_CONCLUSION: &str = "conclusion";

/// Output naming the persisted execution log
pub const OUTPUT_EXECUTION_FILE: &str = "execution_file";

/// Exported variable listing the allowed tools
pub const ENV_ALLOWED_TOOLS: &str = "ALLOWED_TOOLS";

/// Exported variable listing the disallowed tools
pub const ENV_DISALLOWED_TOOLS: &str = "DISALLOWED_TOOLS";

/// Exit code recorded when the assistant exceeds its time budget
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// How long a timed-out assistant gets between the graceful signal and the
/// forced kill
pub const TERMINATION_GRACE: Duration = Duration::from_secs(5);

/// How long to wait for the output reader after the process has exited
pub const DRAIN_GRACE: Duration = Duration::from_secs(5);
