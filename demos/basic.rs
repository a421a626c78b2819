//! Basic usage example

use envconfig::Envconfig;

#[derive(Debug, Default, Envconfig)]
struct Config {
    // Loaded from MYAPP_DATABASE_URL; binding fails if it is unset
    #[envconfig(required)]
    pub database_url: String,

    // With default value
    #[envconfig(default = "127.0.0.1:8080")]
    pub server_addr: String,

    // Numeric type, hex and octal are accepted too
    #[envconfig(default = 10)]
    pub max_connections: u32,

    // Boolean type; unset leaves `false` from Default
    pub debug_mode: bool,
}

fn main() -> anyhow::Result<()> {
    // Set environment variables for demonstration
    std::env::set_var("MYAPP_DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("MYAPP_SERVER_ADDR", "0.0.0.0:3000");

    // Load configuration
    let mut config = Config::default();
    envconfig::process("myapp", &mut config)?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Server Address: {}", config.server_addr);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Debug Mode: {}", config.debug_mode);

    Ok(())
}
