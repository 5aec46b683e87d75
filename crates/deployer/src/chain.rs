//! The network/account context deployments run against, backed by an alloy
//! provider.

use {
    crate::{
        artifact::{Artifact, ArtifactRef},
        deployment::Confirmation,
        traits::{ArtifactResolver, Factory, PendingDeployment},
    },
    alloy::{
        network::{Ethereum, EthereumWallet, ReceiptResponse as _, TransactionBuilder},
        primitives::{Address, TxHash},
        providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
        rpc::{
            client::ClientBuilder,
            types::{TransactionReceipt, TransactionRequest},
        },
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context as _, Result, ensure},
    std::{path::PathBuf, time::Duration},
    url::Url,
};

/// How long to wait for a deployment transaction to be confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Number of blocks (including the one with the transaction) that need to
    /// be mined.
    pub confirmations: u64,
    /// Give up waiting after this long. `None` waits for as long as the node
    /// connection lives.
    pub timeout: Option<Duration>,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            confirmations: 1,
            timeout: None,
        }
    }
}

/// Everything needed to deploy an artifact: where to find it, which node to
/// talk to and which account pays for it.
///
/// Constructing a context does not talk to the node. Connection problems
/// surface once a transaction gets submitted.
#[derive(Clone)]
pub struct Context {
    provider: DynProvider,
    /// Account of the configured private key. `None` deploys from the first
    /// account the node manages.
    signer: Option<Address>,
    artifacts_dir: PathBuf,
    policy: ConfirmationPolicy,
}

impl Context {
    pub fn new(
        node_url: &Url,
        private_key: Option<&str>,
        artifacts_dir: PathBuf,
        policy: ConfirmationPolicy,
    ) -> Result<Self> {
        let rpc = ClientBuilder::default().http(node_url.clone());
        let (provider, signer) = match private_key {
            Some(key) => {
                let signer: PrivateKeySigner = key
                    .trim()
                    .parse()
                    .context("could not parse deployer private key")?;
                let address = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::new(signer))
                    .connect_client(rpc)
                    .erased();
                (provider, Some(address))
            }
            None => (ProviderBuilder::new().connect_client(rpc).erased(), None),
        };

        Ok(Self {
            provider,
            signer,
            artifacts_dir,
            policy,
        })
    }
}

#[async_trait::async_trait]
impl ArtifactResolver for Context {
    async fn factory(&self, artifact: &ArtifactRef) -> Result<Box<dyn Factory>> {
        let artifact = Artifact::resolve(artifact, &self.artifacts_dir)?;
        tracing::debug!(
            name = %artifact.name,
            path = %artifact.path.display(),
            bytecode_len = artifact.bytecode.len(),
            "loaded artifact"
        );
        Ok(Box::new(ContractFactory {
            provider: self.provider.clone(),
            signer: self.signer,
            artifact,
            policy: self.policy,
        }))
    }
}

/// Deploys the creation code of one artifact.
pub struct ContractFactory {
    provider: DynProvider,
    signer: Option<Address>,
    artifact: Artifact,
    policy: ConfirmationPolicy,
}

impl ContractFactory {
    async fn deployer_account(&self) -> Result<Address> {
        if let Some(signer) = self.signer {
            return Ok(signer);
        }
        let accounts = self
            .provider
            .get_accounts()
            .await
            .context("could not fetch accounts managed by the node")?;
        accounts
            .first()
            .copied()
            .context("node manages no accounts, configure a private key")
    }
}

#[async_trait::async_trait]
impl Factory for ContractFactory {
    async fn submit(&self) -> Result<Box<dyn PendingDeployment>> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .context("could not fetch chain id")?;
        let from = self.deployer_account().await?;
        tracing::info!(chain_id, ?from, artifact = %self.artifact.name, "deploying contract");
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(self.artifact.bytecode.clone());
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .with_context(|| {
                format!("failed to send {} deployment from {from}", self.artifact.name)
            })?;
        let tx_hash = *pending.tx_hash();
        tracing::debug!(?tx_hash, ?from, "node accepted deployment transaction");

        Ok(Box::new(PendingContract {
            tx_hash,
            pending: Some(
                pending
                    .with_required_confirmations(self.policy.confirmations)
                    .with_timeout(self.policy.timeout),
            ),
        }))
    }
}

pub struct PendingContract {
    tx_hash: TxHash,
    pending: Option<PendingTransactionBuilder<Ethereum>>,
}

#[async_trait::async_trait]
impl PendingDeployment for PendingContract {
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn confirm(&mut self) -> Result<Confirmation> {
        let pending = self
            .pending
            .take()
            .context("deployment confirmation was already awaited")?;
        let receipt = pending
            .get_receipt()
            .await
            .context("failed waiting for the deployment receipt")?;
        confirmation(&receipt)
    }
}

/// Extracts the deployed contract from a receipt, rejecting reverted
/// deployments.
fn confirmation(receipt: &TransactionReceipt) -> Result<Confirmation> {
    ensure!(
        receipt.status(),
        "contract construction reverted in block {} after using {} gas",
        receipt
            .block_number
            .map_or_else(|| "<unknown>".to_string(), |block| block.to_string()),
        receipt.gas_used,
    );
    let address = receipt
        .contract_address
        .context("receipt does not contain a contract address")?;
    Ok(Confirmation {
        address,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    })
}
