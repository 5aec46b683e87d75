use {
    crate::{deployment::Deployment, error::Error},
    alloy::primitives::Address,
    anyhow::anyhow,
    std::io::Write,
};

/// The single terminal result of a run.
#[derive(Debug)]
pub enum Outcome {
    Deployed { label: String, address: Address },
    Failed(Error),
}

impl Outcome {
    pub fn new(label: String, result: Result<Deployment, Error>) -> Self {
        match result {
            Ok(deployment) => match deployment.address() {
                Some(address) => Self::Deployed { label, address },
                None => Self::Failed(Error::Unclassified(anyhow!(
                    "deployment {} finished without confirmation",
                    deployment.tx_hash()
                ))),
            },
            Err(err) => Self::Failed(err),
        }
    }

    /// Writes the outcome to the operator facing output and returns the
    /// process exit code. The address goes to `stdout` and is the only thing
    /// ever written there; failures go to `stderr`.
    pub fn report(self, stdout: &mut impl Write, stderr: &mut impl Write) -> u8 {
        let err = match self {
            Self::Deployed { label, address } => {
                match writeln!(stdout, "{label} address :  {address}").and_then(|()| stdout.flush())
                {
                    Ok(()) => return 0,
                    Err(err) => Error::Unclassified(
                        anyhow::Error::new(err).context("failed to write deployed address"),
                    ),
                }
            }
            Self::Failed(err) => err,
        };
        // Nothing left to report to if stderr is gone as well.
        let _ = writeln!(stderr, "{err}");
        1
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::deployment::Confirmation,
        alloy::primitives::{B256, address},
        std::io,
    };

    const ADDRESS: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

    fn confirmed() -> Deployment {
        let mut deployment = Deployment::pending(B256::repeat_byte(1));
        deployment.confirm(Confirmation {
            address: ADDRESS,
            block_number: Some(1),
            gas_used: 1,
        });
        deployment
    }

    fn report(outcome: Outcome) -> (u8, String, String) {
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let code = outcome.report(&mut stdout, &mut stderr);
        (
            code,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        )
    }

    #[test]
    fn success_prints_exactly_one_address() {
        let (code, stdout, stderr) = report(Outcome::new(
            "service manager".to_string(),
            Ok(confirmed()),
        ));
        assert_eq!(code, 0);
        assert_eq!(
            stdout,
            "service manager address :  0x5FbDB2315678afecb367f032d93F642f64180aa3\n"
        );
        assert!(stderr.is_empty());
    }

    #[test]
    fn failure_prints_error_only() {
        let (code, stdout, stderr) = report(Outcome::new(
            "service manager".to_string(),
            Err(Error::Submission(anyhow!("insufficient funds"))),
        ));
        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert_eq!(stderr, "deployment transaction was rejected: insufficient funds\n");
    }

    #[test]
    fn unconfirmed_deployment_is_a_failure() {
        let outcome = Outcome::new(
            "service manager".to_string(),
            Ok(Deployment::pending(B256::repeat_byte(1))),
        );
        assert!(matches!(outcome, Outcome::Failed(Error::Unclassified(_))));
        let (code, stdout, _) = report(outcome);
        assert_eq!(code, 1);
        assert!(stdout.is_empty());
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unwritable_address_is_a_failure() {
        let mut stderr = Vec::new();
        let code = Outcome::new("service manager".to_string(), Ok(confirmed()))
            .report(&mut Closed, &mut stderr);
        assert_eq!(code, 1);
        assert_eq!(
            String::from_utf8(stderr).unwrap(),
            "failed to write deployed address: broken pipe\n"
        );
    }
}
