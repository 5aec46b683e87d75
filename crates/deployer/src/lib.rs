pub mod arguments;
pub mod artifact;
pub mod chain;
pub mod deployment;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod traits;

pub use {
    artifact::ArtifactRef,
    deployment::Deployment,
    error::Error,
    orchestrator::Deployer,
    outcome::Outcome,
};
use {arguments::Arguments, chain::Context, std::io};

/// Deploys the configured artifact once, reports the outcome on
/// stdout/stderr and returns the process exit code.
pub async fn run(args: Arguments) -> u8 {
    let artifact = ArtifactRef::parse(&args.artifact);
    let label = artifact.label();
    let result = match Context::new(
        &args.node_url,
        args.private_key.as_deref(),
        args.artifacts_dir.clone(),
        args.confirmation_policy(),
    ) {
        Ok(context) => Deployer::new(context, artifact).deploy().await,
        Err(err) => {
            tracing::error!(?err, "failed to set up network context");
            Err(Error::Unclassified(err))
        }
    };
    Outcome::new(label, result).report(&mut io::stdout().lock(), &mut io::stderr().lock())
}
