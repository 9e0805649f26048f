use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = backend_relay::cli::Cli::parse();
    if let Err(e) = backend_relay::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
