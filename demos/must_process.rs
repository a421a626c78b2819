//! Fail fast on invalid configuration

use envconfig::Envconfig;

#[derive(Debug, Default, Envconfig)]
struct Config {
    #[envconfig(required)]
    pub api_key: String,

    #[envconfig(default = "8080")]
    pub port: u16,
}

fn main() {
    std::env::set_var("GATEWAY_API_KEY", "secret-key-123");

    // Panics with the binding error instead of returning it
    let mut config = Config::default();
    envconfig::must_process("gateway", &mut config);

    println!("Gateway listening on port {}", config.port);
}
