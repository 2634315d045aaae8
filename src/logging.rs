//! Tracing subscriber setup for the binary.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse a level name from the config file; unknown names fall back to `warn`
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "error" => Level::ERROR,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::WARN,
    }
}

/// Raise `base` by one step per `-v`
pub fn effective_level(base: Level, verbosity: u8) -> Level {
    let ladder = [
        Level::ERROR,
        Level::WARN,
        Level::INFO,
        Level::DEBUG,
        Level::TRACE,
    ];
    let start = ladder.iter().position(|l| *l == base).unwrap_or(1);
    let idx = (start + verbosity as usize).min(ladder.len() - 1);
    ladder[idx]
}

/// Install a global stderr subscriber at `level`
pub fn init(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
