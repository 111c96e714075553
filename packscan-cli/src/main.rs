use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Track packed items by scanning their QR codes and print each shipping label once
#[derive(Parser)]
#[command(name = "packscan", version)]
struct Cli {
    /// Directory holding default.toml / {RUN_MODE}.toml / local.toml
    #[arg(long, env = "PACKSCAN_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "packscan_cli=debug,packscan_order=info,packscan_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = packscan_store::Config::load_from(&cli.config_dir)?;
    tracing::info!("Loading orders from {}", config.orders.path.display());

    let (mut session, worker) = packscan_cli::build_session(&config).await?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    session.run(stdin, tokio::io::stdout()).await?;

    // Let queued labels reach the printer before exiting
    drop(session);
    if let Err(e) = worker.await {
        tracing::error!("Print spooler ended abnormally: {}", e);
    }
    Ok(())
}
