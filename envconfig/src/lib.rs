//! Populate configuration structs from prefixed environment variables
//!
//! `envconfig` binds the public fields of a struct to environment variables
//! named `PREFIX_FIELD`. Values are converted to the field's type; unset
//! fields fall back to a default, fail when required, or keep the value they
//! already had.
//!
//! # Features
//!
//! - **Declarative**: field table generated by `#[derive(Envconfig)]`
//! - **In place**: binds into a struct you own, so unset fields keep their value
//! - **Alternate names**: `name = "..."` also reads the unprefixed variable
//! - **Durations**: `std::time::Duration` fields accept `1h30m`, `250ms`, `1.5s`
//! - **Key listing**: [`usage`], [`usage_json`] and [`usage_table`] describe every variable read
//!
//! # Value Parsing
//!
//! - Strings: taken verbatim, including the empty string
//! - Integers: `42`, `-7`, `0x2A`, `0o52`, `052`, `0b101010`, range checked per width
//! - Booleans: `1 t T TRUE true True` and `0 f F FALSE false False`
//! - Floats: `1.5`, `-2e-3`, `inf`, `NaN`
//! - Durations: `300ms`, `1h30m`, `2.5s`; units `ns us µs ms s m h`
//!
//! Fields of any other type are skipped.
//!
//! # Example
//!
//! ```rust
//! use envconfig::Envconfig;
//! use std::time::Duration;
//!
//! #[derive(Debug, Default, Envconfig)]
//! struct Config {
//!     #[envconfig(default = "8080")]
//!     pub port: u16,
//!
//!     #[envconfig(required)]
//!     pub database_url: String,
//!
//!     #[envconfig(default = "30s")]
//!     pub timeout: Duration,
//! }
//!
//! # fn main() -> Result<(), envconfig::Error> {
//! #     std::env::set_var("MYAPP_DATABASE_URL", "postgres://localhost/db");
//! let mut config = Config::default();
//! envconfig::process("myapp", &mut config)?;
//! assert_eq!(config.database_url, "postgres://localhost/db");
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! #     Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! ## `#[envconfig(name = "ALT")]`
//!
//! Replace the field name in the key. The field is read from `PREFIX_ALT`,
//! and if that is unset, from `ALT` without the prefix. This lets one
//! variable be shared by several services.
//!
//! ```rust
//! use envconfig::{Envconfig, Specification};
//!
//! #[derive(Default, Envconfig)]
//! struct Config {
//!     // Reads APP_SHARED_TOKEN, then SHARED_TOKEN
//!     #[envconfig(name = "shared_token")]
//!     pub token: String,
//! }
//! # std::env::set_var("SHARED_TOKEN", "abc");
//! # let config = Config::from_env("app").unwrap();
//! # assert_eq!(config.token, "abc");
//! ```
//!
//! ## `#[envconfig(default = "value")]`
//!
//! Used when no variable is set. The literal goes through the same conversion
//! as an environment value, so `default = "0x10"` and `default = 16` are the
//! same for an integer field.
//!
//! ## `#[envconfig(required)]`
//!
//! Fail with [`Error::MissingRequiredKey`] when no variable is set and there
//! is no default. A default always satisfies `required`.
//!
//! ## `#[envconfig(skip)]`
//!
//! Leave the field out of binding entirely. Private fields are always left
//! out.

#[doc(hidden)]
pub mod de;

mod env;
mod error;
mod process;
mod spec;
mod usage;

pub use env::{Environment, ProcessEnv};
pub use envconfig_derive::Envconfig;
pub use error::{Error, ParseError};
pub use process::{must_process, must_process_with, process, process_with};
pub use spec::{Field, FieldDescriptor, Shape, Slot, Specification};
pub use usage::{usage, usage_json, usage_table, VarInfo};
