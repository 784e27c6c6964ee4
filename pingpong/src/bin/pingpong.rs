use std::process::ExitCode;

use pingpong::{client, server, Config, Error, Mode};

async fn run() -> Result<(), Error> {
    let config = Config::from_args()?;

    match config.mode {
        Mode::Server => {
            tracing::info!("start process in server mode");
            server::run(&config).await
        }
        Mode::Client => {
            tracing::info!("start process in client mode");
            client::run(&config).await.map(drop)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    pingpong::trace_init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
