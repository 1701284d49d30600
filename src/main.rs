use clap::Parser;
use inscribe_lib::bootstrap::tracing::init_tracing_subscriber;
use inscribe_lib::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let output = cli::run(cli).await?;
    println!("{output}");
    Ok(())
}
