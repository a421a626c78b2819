//! Alternate names example

use envconfig::{Envconfig, Specification};

#[derive(Debug, Default, Envconfig)]
struct Config {
    // Reads BILLING_SHARED_TOKEN, then SHARED_TOKEN
    #[envconfig(name = "shared_token")]
    pub token: String,

    // Reads BILLING_DB_HOST, then DB_HOST, then falls back to the default
    #[envconfig(name = "db_host", default = "localhost")]
    pub database_host: String,
}

fn main() -> anyhow::Result<()> {
    // One token shared by every service, no prefix
    std::env::set_var("SHARED_TOKEN", "global-token");
    // Overridden for this service only
    std::env::set_var("BILLING_DB_HOST", "billing-db.internal");

    let config = Config::from_env("billing")?;

    println!("Configuration with alternate names:");
    println!("  Token: {}", config.token);
    println!("  Database Host: {}", config.database_host);

    Ok(())
}
