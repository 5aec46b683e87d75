use {
    crate::{
        artifact::ArtifactRef,
        deployment::Deployment,
        error::Error,
        traits::ArtifactResolver,
    },
    alloy::primitives::{Address, TxHash},
    tracing::instrument,
};

/// Progress of a single deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    FactoryAcquired,
    Submitted(TxHash),
    Confirmed(Address),
    Failed { kind: &'static str },
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Failed { .. })
    }

    /// Whether `next` may follow this stage. Stages only move forward and
    /// terminal stages never change.
    pub fn can_advance_to(&self, next: &Stage) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::FactoryAcquired)
                | (Self::FactoryAcquired, Self::Submitted(_))
                | (Self::Submitted(_), Self::Confirmed(_))
                | (
                    Self::Idle | Self::FactoryAcquired | Self::Submitted(_),
                    Self::Failed { .. }
                )
        )
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.can_advance_to(&next),
            "invalid deployment transition {self:?} -> {next:?}"
        );
        tracing::debug!(from = ?self, to = ?next, "deployment stage");
        *self = next;
    }
}

/// Drives one artifact from "not deployed" to "deployed and confirmed".
///
/// Every step runs exactly once and any failure ends the run. Calling
/// [`Deployer::deploy`] again starts an independent deployment, nothing is
/// cached between runs.
pub struct Deployer<R> {
    resolver: R,
    artifact: ArtifactRef,
}

impl<R: ArtifactResolver> Deployer<R> {
    pub fn new(resolver: R, artifact: ArtifactRef) -> Self {
        Self { resolver, artifact }
    }

    #[instrument(skip_all, fields(artifact = %self.artifact))]
    pub async fn deploy(&self) -> Result<Deployment, Error> {
        let mut stage = Stage::Idle;
        let result = self.run(&mut stage).await;
        if let Err(err) = &result {
            tracing::error!(?stage, kind = err.kind(), "deployment failed");
            stage.advance(Stage::Failed { kind: err.kind() });
        }
        result
    }

    async fn run(&self, stage: &mut Stage) -> Result<Deployment, Error> {
        let factory = self
            .resolver
            .factory(&self.artifact)
            .await
            .map_err(|source| Error::ArtifactResolution {
                artifact: self.artifact.clone(),
                source,
            })?;
        stage.advance(Stage::FactoryAcquired);

        let mut pending = factory.submit().await.map_err(Error::Submission)?;
        drop(factory);
        let tx_hash = pending.tx_hash();
        let mut deployment = Deployment::pending(tx_hash);
        stage.advance(Stage::Submitted(tx_hash));
        tracing::info!(?tx_hash, "submitted deployment transaction");

        let confirmation = pending
            .confirm()
            .await
            .map_err(|source| Error::Confirmation { tx_hash, source })?;
        deployment.confirm(confirmation);
        stage.advance(Stage::Confirmed(confirmation.address));
        tracing::info!(
            ?tx_hash,
            address = ?confirmation.address,
            block = ?confirmation.block_number,
            gas_used = confirmation.gas_used,
            "deployment confirmed"
        );

        Ok(deployment)
    }
}
