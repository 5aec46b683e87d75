//! Trait definitions for the external collaborators of a deployment.
//!
//! These traits abstract the build output and the blockchain so the
//! orchestration can be unit tested with mocks.

use {
    crate::{artifact::ArtifactRef, deployment::Confirmation},
    alloy::primitives::TxHash,
    anyhow::Result,
};

/// Turns an artifact reference into something that can be deployed on the
/// configured network with the configured account.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArtifactResolver: Send + Sync {
    /// Locates and loads the artifact and binds it to the network/account
    /// context. Fails if the artifact can not be found or is not deployable.
    async fn factory(&self, artifact: &ArtifactRef) -> Result<Box<dyn Factory>>;
}

/// A contract factory bound to one artifact. The orchestrator uses it for
/// exactly one deployment.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Factory: Send + Sync {
    /// Sends the deployment transaction. Returns as soon as the node accepted
    /// it, without waiting for inclusion.
    async fn submit(&self) -> Result<Box<dyn PendingDeployment>>;
}

/// A deployment transaction the node accepted but that might not be included
/// yet.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PendingDeployment: Send + Sync {
    fn tx_hash(&self) -> TxHash;

    /// Waits until the transaction got included and returns where the
    /// contract now lives. Fails if it reverted, the node gave up waiting or
    /// the configured timeout elapsed. Can only be awaited once.
    async fn confirm(&mut self) -> Result<Confirmation>;
}
