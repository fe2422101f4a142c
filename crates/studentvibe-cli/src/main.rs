use anyhow::Result;
use clap::Parser;
use studentvibe_cli::{run, Args};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    println!("Loading StudentVibe...");
    println!("Target persona: {}", args.persona);

    let output = run(args).await?;
    println!("Success! File saved to: {}", output.display());

    Ok(())
}
