//! attendsync main entrypoint.

use attendsync::run;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_env("ATTENDSYNC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    println!();
    if let Err(e) = run() {
        attendsync::ui::messages::error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
