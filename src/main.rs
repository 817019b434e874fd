use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = ghost::cli::Cli::parse();
    if let Err(e) = ghost::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
