//! Best-effort teardown of provisioned agents.
//!
//! Deletion failures for individual handles are logged and swallowed so
//! one failing deletion never prevents attempting the rest. Callers run
//! this on every exit path: success, error, or cancellation.

use crate::ports::agent_platform::AgentPlatform;
use tracing::{debug, warn};
use warden_domain::AgentHandle;

/// Attempt deletion of every handle. Returns the number of deletion
/// attempts made (always `handles.len()`).
pub async fn teardown_agents<P>(platform: &P, handles: &[AgentHandle]) -> usize
where
    P: AgentPlatform + ?Sized,
{
    let mut attempts = 0;
    for handle in handles {
        attempts += 1;
        match platform.delete_agent(handle).await {
            Ok(()) => debug!(%handle, "agent deleted"),
            Err(error) => warn!(%handle, %error, "agent deletion failed, continuing"),
        }
    }
    attempts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::ScriptedPlatform;
    use warden_domain::Stage;

    fn handles() -> Vec<AgentHandle> {
        Stage::all()
            .into_iter()
            .map(|stage| AgentHandle::new(format!("ag_{stage}"), stage))
            .collect()
    }

    #[tokio::test]
    async fn test_attempts_every_handle() {
        let platform = ScriptedPlatform::new(vec![]);
        let attempts = teardown_agents(&platform, &handles()).await;
        assert_eq!(attempts, 4);
        assert_eq!(platform.deleted_ids(), vec![
            "ag_planner",
            "ag_reviewer",
            "ag_verifier",
            "ag_reporter"
        ]);
    }

    #[tokio::test]
    async fn test_one_failing_deletion_does_not_stop_the_rest() {
        let platform = ScriptedPlatform::new(vec![]).failing_delete_for("ag_reviewer");
        let attempts = teardown_agents(&platform, &handles()).await;
        // The failure is swallowed; every handle still gets its attempt.
        assert_eq!(attempts, 4);
        assert_eq!(platform.deleted_ids().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_chain_makes_no_attempts() {
        let platform = ScriptedPlatform::new(vec![]);
        assert_eq!(teardown_agents(&platform, &[]).await, 0);
    }
}
