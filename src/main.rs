use clap::Parser;
use runwatch::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), runwatch::AppError> {
    run(Cli::parse()).await
}
