//! Build Chain use case
//!
//! Provisions the four stage agents and wires the hand-off edges between
//! consecutive stages. Two phases: create all agents first, then link;
//! hand-off wiring requires every handle to exist.
//!
//! Partial failure policy: if any creation or link fails, every agent
//! already created is deleted (best-effort) before the error propagates.
//! A failed build leaves no orphaned remote resources.

use crate::ports::agent_platform::{AgentPlatform, PlatformError};
use crate::use_cases::teardown::teardown_agents;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use warden_domain::{AgentHandle, Chain, Stage, StageSpec};

/// Errors that can occur while building the chain
#[derive(Error, Debug)]
pub enum BuildChainError {
    #[error("Stage specs must cover the four pipeline stages in order")]
    MisorderedSpecs,

    #[error("Failed to provision the {stage} agent: {source}")]
    Provisioning {
        stage: Stage,
        #[source]
        source: PlatformError,
    },

    #[error("Failed to wire hand-off {from} -> {to}: {source}")]
    Linking {
        from: Stage,
        to: Stage,
        #[source]
        source: PlatformError,
    },
}

/// Use case for provisioning the agent chain
pub struct BuildChainUseCase<P: AgentPlatform> {
    platform: Arc<P>,
}

impl<P: AgentPlatform> BuildChainUseCase<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self { platform }
    }

    /// Execute the two-phase build: create-all, then link-all.
    pub async fn execute(&self, specs: Vec<StageSpec>) -> Result<Chain, BuildChainError> {
        let stages: Vec<Stage> = specs.iter().map(|s| s.stage).collect();
        if stages != Stage::all() {
            return Err(BuildChainError::MisorderedSpecs);
        }

        // Phase 1: create agents, stopping at the first failure.
        let mut created: Vec<AgentHandle> = Vec::with_capacity(specs.len());
        for spec in &specs {
            match self.platform.create_agent(spec).await {
                Ok(handle) => {
                    debug!(%handle, model = %spec.model, "agent created");
                    created.push(handle);
                }
                Err(source) => {
                    warn!(
                        stage = %spec.stage,
                        rollback = created.len(),
                        "agent creation failed, rolling back created agents"
                    );
                    teardown_agents(self.platform.as_ref(), &created).await;
                    return Err(BuildChainError::Provisioning {
                        stage: spec.stage,
                        source,
                    });
                }
            }
        }

        // Phase 2: wire hand-off edges between consecutive stages.
        for pair in created.windows(2) {
            if let Err(source) = self.platform.link_handoff(&pair[0], &pair[1]).await {
                let (from, to) = (pair[0].stage, pair[1].stage);
                warn!(%from, %to, "hand-off wiring failed, rolling back chain");
                teardown_agents(self.platform.as_ref(), &created).await;
                return Err(BuildChainError::Linking { from, to, source });
            }
        }

        // The order pre-check above makes this infallible.
        let chain = Chain::new(created).map_err(|_| BuildChainError::MisorderedSpecs)?;
        info!(
            "Chain ready: {}",
            chain
                .handles()
                .iter()
                .map(|h| h.to_string())
                .collect::<Vec<_>>()
                .join(" -> ")
        );
        Ok(chain)
    }
}
