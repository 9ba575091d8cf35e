use aws_cert_utils::cli::{handle_command, Cli};
use aws_cert_utils::utils::errors::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    if let Err(e) = handle_command(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
