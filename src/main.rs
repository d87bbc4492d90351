//! Coco UCI Chess Engine

use coco_chess::uci::Uci;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("Coco Chess v0.1.0 - UCI Chess Engine");

    let mut uci = Uci::stdout();
    uci.run();
}
