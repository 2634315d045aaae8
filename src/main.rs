mod app;
mod cli;

use presetctl::{config::Config, logging};

fn main() {
    let cli = cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: {:#}", e);
        Config::default()
    });

    let level = logging::effective_level(logging::parse_level(&config.logging.level), cli.verbose);
    if let Err(e) = logging::init(level) {
        eprintln!("Warning: could not initialise logging: {:#}", e);
    }

    app::run(cli, &config);
}
