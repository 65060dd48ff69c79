use clap::Parser;
use phenoprobe::cli::{self, Cli};
use tokio::signal;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let args = Cli::parse();

    tokio::select! {
        result = cli::execute(args) => {
            if let Err(e) = result {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            eprintln!("Interrupted");
            std::process::exit(130);
        }
    }
}
