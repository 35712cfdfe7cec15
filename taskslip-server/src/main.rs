use std::process::ExitCode;

use taskslip_server::{Server, StartupError, setup_environment};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The logger may not be up yet
            eprintln!("taskslip-server: {}", e);
            tracing::error!(error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    // 1. .env, config, logger, printer
    let (config, state) = setup_environment()?;

    // 2. serve until Ctrl-C
    Server::new(config, state).run().await
}
