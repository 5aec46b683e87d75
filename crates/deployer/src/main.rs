use {clap::Parser, deployer::arguments::Arguments, std::process::ExitCode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Arguments::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Nothing left to report to if the terminal is gone.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    observe::tracing::initialize(&observe::Config::new(
        &args.logging.log_filter,
        args.logging.log_json,
    ));
    tracing::info!("running deployer with validated arguments:\n{}", args);
    ExitCode::from(deployer::run(args).await)
}
