//! Listing the variables a config reads

use envconfig::Envconfig;
use std::time::Duration;

#[derive(Debug, Default, Envconfig)]
struct Config {
    #[envconfig(required)]
    pub database_url: String,

    #[envconfig(name = "shared_token")]
    pub token: String,

    #[envconfig(default = "8080")]
    pub port: u16,

    #[envconfig(default = "30s")]
    pub timeout: Duration,
}

fn main() -> anyhow::Result<()> {
    let mut config = Config::default();

    print!("{}", envconfig::usage_table("myapp", &mut config)?);
    println!();
    println!("{}", envconfig::usage_json("myapp", &mut config)?);

    Ok(())
}
