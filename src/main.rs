//! # Adventure
//!
//! Console front end: `adventure <bundle-dir> [classic|standard|scrolling]`.
//!

mod term;

use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    term::main();
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
