use {
    crate::chain::ConfirmationPolicy,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
        time::Duration,
    },
    url::Url,
};

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,deployer=info,observe=info")]
    pub log_filter: String,

    /// Output log lines as JSON.
    #[clap(long, env)]
    pub log_json: bool,
}

impl Display for LoggingArguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            log_json,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_json: {log_json}")?;
        Ok(())
    }
}

#[derive(clap::Parser)]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// Name of the contract to deploy, or a path to its build artifact JSON.
    #[clap(long, env, default_value = "ServiceManager")]
    pub artifact: String,

    /// Directory the build system writes artifacts to. Searched recursively
    /// when the artifact is given by name.
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Hex encoded private key of the deploying account. Without it the first
    /// account managed by the node deploys the contract.
    #[clap(long, env)]
    pub private_key: Option<String>,

    /// Number of blocks that need to be mined on top of (and including) the
    /// deployment before it counts as confirmed.
    #[clap(
        long,
        env,
        default_value = "1",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub confirmations: u64,

    /// Give up waiting for the confirmation after this long, e.g. `2m`. Waits
    /// indefinitely by default.
    #[clap(long, env, value_parser = humantime::parse_duration)]
    pub confirmation_timeout: Option<Duration>,
}

impl Arguments {
    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            confirmations: self.confirmations,
            timeout: self.confirmation_timeout,
        }
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            logging,
            artifact,
            artifacts_dir,
            node_url,
            private_key,
            confirmations,
            confirmation_timeout,
        } = self;

        write!(f, "{logging}")?;
        writeln!(f, "artifact: {artifact}")?;
        writeln!(f, "artifacts_dir: {}", artifacts_dir.display())?;
        writeln!(f, "node_url: {node_url}")?;
        display_secret_option(f, "private_key", private_key)?;
        writeln!(f, "confirmations: {confirmations}")?;
        display_option(
            f,
            "confirmation_timeout",
            &(*confirmation_timeout).map(humantime::format_duration),
        )?;
        Ok(())
    }
}

pub fn display_secret_option<T>(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<T>,
) -> fmt::Result {
    display_option(f, name, &option.as_ref().map(|_| "SECRET"))
}

pub fn display_option(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<impl Display>,
) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}
