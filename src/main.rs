use clap::Parser;
use image_inspector::cli::{Args, Runner};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = Runner::new(args).run().await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
