use {
    crate::artifact::ArtifactRef,
    alloy::primitives::TxHash,
    thiserror::Error,
};

/// Why a deployment run failed. Every variant is terminal for the run.
#[derive(Debug, Error)]
pub enum Error {
    /// The artifact could not be located or loaded. Nothing was sent to the
    /// network.
    #[error("failed to resolve artifact {artifact}: {source:#}")]
    ArtifactResolution {
        artifact: ArtifactRef,
        source: anyhow::Error,
    },
    /// The network rejected the deployment transaction before inclusion.
    #[error("deployment transaction was rejected: {0:#}")]
    Submission(#[source] anyhow::Error),
    /// The deployment transaction was sent but never confirmed, or it was
    /// included and failed on-chain.
    #[error("deployment transaction {tx_hash} was not confirmed: {source:#}")]
    Confirmation {
        tx_hash: TxHash,
        source: anyhow::Error,
    },
    #[error("{0:#}")]
    Unclassified(#[from] anyhow::Error),
}

impl Error {
    /// Short machine friendly name of the failure class, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ArtifactResolution { .. } => "artifact_resolution",
            Self::Submission(_) => "submission",
            Self::Confirmation { .. } => "confirmation",
            Self::Unclassified(_) => "unclassified",
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, anyhow::anyhow};

    #[test]
    fn display_includes_context_chain() {
        let err = Error::Submission(anyhow!("insufficient funds").context("failed to send"));
        assert_eq!(
            err.to_string(),
            "deployment transaction was rejected: failed to send: insufficient funds"
        );
        assert_eq!(err.kind(), "submission");

        let err = Error::ArtifactResolution {
            artifact: ArtifactRef::parse("Missing"),
            source: anyhow!("no artifact named Missing.json"),
        };
        assert_eq!(
            err.to_string(),
            "failed to resolve artifact Missing: no artifact named Missing.json"
        );
    }

    #[test]
    fn unclassified_keeps_context_chain() {
        let err = Error::from(anyhow!("invalid private key"));
        assert_eq!(err.to_string(), "invalid private key");
        assert_eq!(err.kind(), "unclassified");

        let err = Error::from(
            anyhow!("odd number of digits").context("could not parse deployer private key"),
        );
        assert_eq!(
            err.to_string(),
            "could not parse deployer private key: odd number of digits"
        );
    }
}
