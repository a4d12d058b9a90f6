use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use boards_client::{
    BoardsClient,
    cli::{Args, execute},
    logging::init_logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Hold the guard so buffered log lines are flushed on exit
    let _log_guard = init_logging(args.log_config());
    info!(version = boards_client::VERSION, "Starting boards");

    let settings = args.resolve_settings()?;
    let client = BoardsClient::connect(&settings)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding requests");
            on_interrupt.cancel();
        }
    });

    let output = execute(&args.command, &client, &cancel).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
