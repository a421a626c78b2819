//! Duration fields example

use envconfig::{Envconfig, Specification};
use std::time::Duration;

#[derive(Debug, Default, Envconfig)]
struct Config {
    #[envconfig(default = "30s")]
    pub request_timeout: Duration,

    #[envconfig(default = "1h30m")]
    pub session_ttl: Duration,

    #[envconfig(default = "250ms")]
    pub poll_interval: Duration,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("WORKER_POLL_INTERVAL", "1.5s");

    let config = Config::from_env("worker")?;

    println!("Durations:");
    println!("  Request Timeout: {:?}", config.request_timeout);
    println!("  Session TTL: {:?}", config.session_ttl);
    println!("  Poll Interval: {:?}", config.poll_interval);

    // Negative intervals do not fit in a Duration
    std::env::set_var("WORKER_SESSION_TTL", "-1h");
    match Config::from_env("worker") {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Rejected: {e}"),
    }

    Ok(())
}
