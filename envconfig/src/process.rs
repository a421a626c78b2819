//! The binder: resolve one key per field and assign the converted value

use crate::env::{Environment, ProcessEnv};
use crate::error::{Error, ParseError};
use crate::spec::{Field, FieldDescriptor, Shape, Specification};

/// Where a field's raw value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Env,
    Fallback,
    Default,
}

impl Source {
    #[cfg(feature = "tracing")]
    fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Fallback => "fallback",
            Self::Default => "default",
        }
    }
}

/// A raw value and where it came from.
#[derive(Debug)]
struct Resolved {
    value: String,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    source: Source,
}

/// Populate `spec` from the process environment.
///
/// Each settable field is looked up as `PREFIX_NAME` (uppercased), where
/// `NAME` is the field name or its `name = "..."` alternate. Fields with an
/// alternate name fall back to the unprefixed alternate. Unset fields take
/// their default, fail when `required`, or are left as they are.
///
/// # Errors
///
/// - [`Error::InvalidSpecification`] if `spec` is not a struct
/// - [`Error::MissingRequiredKey`] for a required field with no value and no default
/// - [`Error::Parse`] when a value cannot be converted to the field's type
///
/// Binding stops at the first error.
pub fn process<S>(prefix: &str, spec: &mut S) -> Result<(), Error>
where
    S: Specification + ?Sized,
{
    process_with(prefix, spec, &ProcessEnv)
}

/// Populate `spec`, resolving keys against `env` instead of the process environment.
///
/// # Errors
///
/// Same as [`process`].
pub fn process_with<S, E>(prefix: &str, spec: &mut S, env: &E) -> Result<(), Error>
where
    S: Specification + ?Sized,
    E: Environment + ?Sized,
{
    let fields = match spec.shape() {
        Shape::Record(fields) => fields,
        Shape::Other(type_name) => return Err(Error::InvalidSpecification { type_name }),
    };

    for field in fields {
        bind_field(prefix, field, env).inspect_err(|_err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(key = ?_err.key(), "environment binding failed");
        })?;
    }
    Ok(())
}

/// Like [`process`], but panics if binding fails.
///
/// # Panics
///
/// On any error [`process`] would return.
pub fn must_process<S>(prefix: &str, spec: &mut S)
where
    S: Specification + ?Sized,
{
    must_process_with(prefix, spec, &ProcessEnv);
}

/// Like [`process_with`], but panics if binding fails.
///
/// # Panics
///
/// On any error [`process_with`] would return.
pub fn must_process_with<S, E>(prefix: &str, spec: &mut S, env: &E)
where
    S: Specification + ?Sized,
    E: Environment + ?Sized,
{
    if let Err(err) = process_with(prefix, spec, env) {
        panic!("{err}");
    }
}

fn bind_field<E>(prefix: &str, field: Field<'_>, env: &E) -> Result<(), Error>
where
    E: Environment + ?Sized,
{
    let Field { descriptor, slot } = field;
    let key = descriptor.key(prefix);

    let Some(resolved) = resolve(&descriptor, &key, env) else {
        #[cfg(feature = "tracing")]
        tracing::debug!(key = %key, field = descriptor.name, required = descriptor.required, "unset");

        if descriptor.required {
            return Err(Error::missing(key));
        }
        return Ok(());
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        key = %key,
        field = descriptor.name,
        source = resolved.source.as_str(),
        fallback_key = ?descriptor.fallback_key().filter(|_| resolved.source == Source::Fallback),
        "resolved"
    );

    // Errors name the primary key even when the fallback supplied the value
    slot.assign(&resolved.value).map_err(|_| {
        Error::from(ParseError {
            key,
            field: descriptor.name,
            type_name: descriptor.type_name,
            value: resolved.value,
        })
    })
}

/// Primary key, then the unprefixed alternate name, then the default.
fn resolve<E>(descriptor: &FieldDescriptor, key: &str, env: &E) -> Option<Resolved>
where
    E: Environment + ?Sized,
{
    if let Some(value) = env.lookup(key) {
        return Some(Resolved {
            value,
            source: Source::Env,
        });
    }

    if let Some(fallback) = descriptor.fallback_key() {
        if let Some(value) = env.lookup(&fallback) {
            return Some(Resolved {
                value,
                source: Source::Fallback,
            });
        }
    }

    descriptor.default_value().map(|value| Resolved {
        value: value.to_string(),
        source: Source::Default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Slot;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Hand-written field table, the way the derive macro would generate it.
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Spec {
        port: u16,
        token: String,
        timeout: Duration,
        debug: bool,
        ratio: f64,
        level: i8,
        tags: Vec<String>,
    }

    fn desc(name: &'static str, type_name: &'static str) -> FieldDescriptor {
        FieldDescriptor {
            name,
            type_name,
            alt: None,
            default: None,
            required: false,
        }
    }

    impl Specification for Spec {
        fn shape(&mut self) -> Shape<'_> {
            Shape::Record(vec![
                Field::new(
                    FieldDescriptor {
                        default: Some("8080"),
                        ..desc("Port", "u16")
                    },
                    Slot::from(&mut self.port),
                ),
                Field::new(
                    FieldDescriptor {
                        alt: Some("shared_token"),
                        required: true,
                        ..desc("Token", "String")
                    },
                    Slot::from(&mut self.token),
                ),
                Field::new(desc("Timeout", "Duration"), Slot::from(&mut self.timeout)),
                Field::new(desc("Debug", "bool"), Slot::from(&mut self.debug)),
                Field::new(desc("Ratio", "f64"), Slot::from(&mut self.ratio)),
                Field::new(desc("Level", "i8"), Slot::from(&mut self.level)),
                Field::new(desc("Tags", "Vec<String>"), Slot::Unsupported),
            ])
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_binds_every_kind() {
        let vars = env(&[
            ("APP_PORT", "9090"),
            ("APP_SHARED_TOKEN", "secret"),
            ("APP_TIMEOUT", "1m30s"),
            ("APP_DEBUG", "t"),
            ("APP_RATIO", "0.75"),
            ("APP_LEVEL", "-0x10"),
            ("APP_TAGS", "a,b"),
        ]);
        let mut spec = Spec::default();
        process_with("app", &mut spec, &vars).unwrap();

        assert_eq!(spec.port, 9090);
        assert_eq!(spec.token, "secret");
        assert_eq!(spec.timeout, Duration::from_secs(90));
        assert!(spec.debug);
        assert_eq!(spec.ratio, 0.75);
        assert_eq!(spec.level, -16);
        assert!(spec.tags.is_empty());
    }

    #[test]
    fn test_default_used_when_unset() {
        let vars = env(&[("SHARED_TOKEN", "t")]);
        let mut spec = Spec::default();
        process_with("APP", &mut spec, &vars).unwrap();
        assert_eq!(spec.port, 8080);
    }

    #[test]
    fn test_empty_value_is_found() {
        let vars = env(&[("APP_SHARED_TOKEN", "")]);
        let mut spec = Spec {
            token: "before".to_string(),
            ..Spec::default()
        };
        process_with("APP", &mut spec, &vars).unwrap();
        assert_eq!(spec.token, "");
    }

    #[test]
    fn test_fallback_to_unprefixed_alternate() {
        let vars = env(&[("SHARED_TOKEN", "global")]);
        let mut spec = Spec::default();
        process_with("APP", &mut spec, &vars).unwrap();
        assert_eq!(spec.token, "global");
    }

    #[test]
    fn test_prefixed_key_wins_over_fallback() {
        let vars = env(&[("APP_SHARED_TOKEN", "local"), ("SHARED_TOKEN", "global")]);
        let mut spec = Spec::default();
        process_with("APP", &mut spec, &vars).unwrap();
        assert_eq!(spec.token, "local");
    }

    #[test]
    fn test_missing_required_names_primary_key_and_stops() {
        let vars = env(&[("APP_DEBUG", "true")]);
        let mut spec = Spec::default();
        let err = process_with("app", &mut spec, &vars).unwrap_err();

        assert!(matches!(&err, Error::MissingRequiredKey { key } if key == "APP_SHARED_TOKEN"));
        // Port comes before the failing field, Debug after it.
        assert_eq!(spec.port, 8080);
        assert!(!spec.debug);
    }

    #[test]
    fn test_unset_optional_field_left_untouched() {
        let vars = env(&[("SHARED_TOKEN", "t")]);
        let mut spec = Spec {
            ratio: 2.5,
            ..Spec::default()
        };
        process_with("APP", &mut spec, &vars).unwrap();
        assert_eq!(spec.ratio, 2.5);
    }

    #[test]
    fn test_parse_error_carries_raw_value() {
        let vars = env(&[("SHARED_TOKEN", "t"), ("APP_PORT", "not-a-number")]);
        let mut spec = Spec::default();
        let err = process_with("APP", &mut spec, &vars).unwrap_err();

        match err {
            Error::Parse(err) => {
                assert_eq!(err.key, "APP_PORT");
                assert_eq!(err.field, "Port");
                assert_eq!(err.type_name, "u16");
                assert_eq!(err.value, "not-a-number");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_stops_at_first_failure() {
        let vars = env(&[
            ("SHARED_TOKEN", "t"),
            ("APP_TIMEOUT", "soon"),
            ("APP_DEBUG", "true"),
        ]);
        let mut spec = Spec::default();
        let err = process_with("APP", &mut spec, &vars).unwrap_err();

        assert_eq!(err.key(), Some("APP_TIMEOUT"));
        assert!(!spec.debug);
    }

    #[test]
    fn test_parse_error_from_fallback_names_primary_key() {
        struct Workers {
            count: u8,
        }
        impl Specification for Workers {
            fn shape(&mut self) -> Shape<'_> {
                Shape::Record(vec![Field::new(
                    FieldDescriptor {
                        alt: Some("worker_count"),
                        ..desc("Count", "u8")
                    },
                    Slot::from(&mut self.count),
                )])
            }
        }

        let vars = env(&[("WORKER_COUNT", "many")]);
        let err = process_with("APP", &mut Workers { count: 0 }, &vars).unwrap_err();
        assert_eq!(err.key(), Some("APP_WORKER_COUNT"));
        assert_eq!(
            err.to_string(),
            "assigning APP_WORKER_COUNT to Count: converting 'many' to type u8"
        );
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_tracing_events_name_keys_not_values() {
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Capture {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let vars = env(&[("SHARED_TOKEN", "hunter2"), ("APP_LEVEL", "loud")]);
        let err = tracing::subscriber::with_default(subscriber, || {
            process_with("APP", &mut Spec::default(), &vars).unwrap_err()
        });
        assert_eq!(err.key(), Some("APP_LEVEL"));

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("APP_PORT"));
        assert!(output.contains("\"default\""));
        assert!(output.contains("SHARED_TOKEN"));
        assert!(output.contains("\"fallback\""));
        assert!(output.contains("unset"));
        assert!(output.contains("environment binding failed"));
        assert!(!output.contains("hunter2"));
        assert!(!output.contains("loud"));
    }

    #[test]
    fn test_invalid_default_is_a_parse_error() {
        struct BadDefault {
            port: u16,
        }
        impl Specification for BadDefault {
            fn shape(&mut self) -> Shape<'_> {
                Shape::Record(vec![Field::new(
                    FieldDescriptor {
                        default: Some("eighty"),
                        ..desc("Port", "u16")
                    },
                    Slot::from(&mut self.port),
                )])
            }
        }

        let err = process_with("APP", &mut BadDefault { port: 0 }, &env(&[])).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError { ref key, ref value, .. }) if key == "APP_PORT" && value == "eighty"));
    }

    #[test]
    fn test_idempotent_on_fresh_records() {
        let vars = env(&[("SHARED_TOKEN", "t"), ("APP_TIMEOUT", "2s")]);
        let mut first = Spec::default();
        let mut second = Spec::default();
        process_with("APP", &mut first, &vars).unwrap();
        process_with("APP", &mut second, &vars).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_non_records() {
        let vars = env(&[]);
        let err = process_with("APP", &mut 42_u32, &vars).unwrap_err();
        assert!(matches!(err, Error::InvalidSpecification { type_name: "u32" }));

        let err = process_with("APP", &mut vec!["a".to_string()], &vars).unwrap_err();
        assert!(matches!(err, Error::InvalidSpecification { .. }));
    }

    #[test]
    #[should_panic(expected = "required key APP_SHARED_TOKEN missing value")]
    fn test_must_process_panics() {
        must_process_with("APP", &mut Spec::default(), &env(&[]));
    }

    #[test]
    fn test_must_process_returns_on_success() {
        let mut spec = Spec::default();
        must_process_with("APP", &mut spec, &env(&[("SHARED_TOKEN", "t")]));
        assert_eq!(spec.token, "t");
    }
}
