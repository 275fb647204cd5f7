use std::io;
use std::process;

use bitperft::board::init_attack_tables;
use bitperft::shell::Shell;
use log::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = init_attack_tables() {
        error!("{e}");
        process::exit(1);
    }

    let stdout = io::stdout();
    let mut shell = Shell::new(stdout.lock());

    // Each argument is one command line, run before stdin.
    for arg in std::env::args().skip(1) {
        match shell.execute(&arg) {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                error!("output failed: {e}");
                process::exit(1);
            }
        }
    }

    if let Err(e) = shell.run(io::stdin().lock()) {
        error!("output failed: {e}");
        process::exit(1);
    }
}
